//! Filesystem names for library items.

use std::collections::HashMap;

/// Characters removed from titles before they become file names.
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Delete every forbidden character.  No substitution, no escaping.
pub fn normalize_filename(title: &str) -> String {
    title.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)).collect()
}

/// What to do when two items normalise to the same directory name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CollisionPolicy {
    /// Later items overwrite earlier ones' files (last write wins).
    #[default]
    Overwrite,
    /// Later items get ` (2)`, ` (3)`, ... appended.
    Suffix,
}

/// Hands out item names for one run according to a [`CollisionPolicy`].
#[derive(Debug, Default)]
pub struct NameRegistry {
    policy: CollisionPolicy,
    seen: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    /// The name the next item with normalised name `name` should use.
    pub fn claim(&mut self, name: &str) -> String {
        let count = self.seen.entry(name.to_string()).or_insert(0);
        *count += 1;
        match self.policy {
            CollisionPolicy::Overwrite => name.to_string(),
            CollisionPolicy::Suffix if *count == 1 => name.to_string(),
            CollisionPolicy::Suffix => format!("{name} ({count})"),
        }
    }
}
