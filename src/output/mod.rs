//! Library materialisation.
//!
//! Builds the complete output tree in a fresh staging directory next to the
//! public output directory, then swaps it into place.  The public path only
//! ever holds the previous complete tree or the new complete tree:
//!
//! ```text
//! STAGING ──ok──► PROMOTING ──► DONE
//!    │
//!    └──err──► ROLLED_BACK   (staging removed, public tree untouched)
//! ```
//!
//! Each item becomes
//!
//! ```text
//! <output>/<name>/<name>.strm   video URL
//! <output>/<name>/<name>.nfo    metadata document
//! <output>/<name>/<name>.<ext>  thumbnail, when one could be fetched
//! ```

pub mod naming;
pub mod nfo;
pub mod thumbnail;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::resolve::ResolvedItem;
use naming::{normalize_filename, CollisionPolicy, NameRegistry};
use thumbnail::ThumbnailFetcher;

const STAGING_PREFIX: &str = ".rss2strm-staging-";

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("cannot create staging directory in {path}: {source}")]
    Stage { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot promote staging tree to {path}: {source}")]
    Promote { path: PathBuf, source: io::Error },
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub items: usize,
    pub thumbnails: usize,
    pub thumbnail_failures: usize,
    /// Items skipped because their name normalised to nothing.
    pub skipped: usize,
}

pub struct Materializer<'a> {
    output_dir: PathBuf,
    staging_root: Option<PathBuf>,
    collision: CollisionPolicy,
    fetcher: Option<&'a dyn ThumbnailFetcher>,
}

impl<'a> Materializer<'a> {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            staging_root: None,
            collision: CollisionPolicy::default(),
            fetcher: None,
        }
    }

    /// Directory in which the staging tree is created.  Defaults to the
    /// output directory's parent; must be on the same filesystem.
    pub fn staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Without a fetcher no thumbnails are downloaded.
    pub fn thumbnails(mut self, fetcher: &'a dyn ThumbnailFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    fn resolved_staging_root(&self) -> PathBuf {
        if let Some(root) = &self.staging_root {
            return root.clone();
        }
        match self.output_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Stage every item, then promote the staged tree to the output path.
    pub fn materialize(&self, items: &[ResolvedItem]) -> Result<MaterializeReport, MaterializeError> {
        let staging = self.create_staging()?;
        debug!(staging = %staging.path().display(), "staging directory created");

        let report = match self.stage_items(staging.path(), items) {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "staging failed, rolling back");
                rollback(staging);
                return Err(err);
            }
        };

        if let Err(err) = self.promote(&staging) {
            error!(error = %err, "promotion failed, rolling back");
            rollback(staging);
            return Err(err);
        }

        info!(
            output = %self.output_dir.display(),
            items = report.items,
            thumbnails = report.thumbnails,
            "library promoted"
        );
        Ok(report)
    }

    fn create_staging(&self) -> Result<TempDir, MaterializeError> {
        let root = self.resolved_staging_root();
        let stage_err = |source| MaterializeError::Stage {
            path: root.clone(),
            source,
        };
        fs::create_dir_all(&root).map_err(stage_err)?;
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&root)
            .map_err(stage_err)
    }

    fn stage_items(
        &self,
        staging: &Path,
        items: &[ResolvedItem],
    ) -> Result<MaterializeReport, MaterializeError> {
        let mut report = MaterializeReport::default();
        let mut names = NameRegistry::new(self.collision);

        for item in items {
            let normalized = normalize_filename(&item.title);
            if normalized.trim().is_empty() {
                warn!(title = %item.title, "title has no usable characters, item skipped");
                report.skipped += 1;
                continue;
            }
            let name = names.claim(&normalized);
            let item_dir = staging.join(&name);

            fs::create_dir_all(&item_dir).map_err(|source| MaterializeError::Write {
                path: item_dir.clone(),
                source,
            })?;
            write_file(&item_dir.join(format!("{name}.strm")), item.video_url.as_bytes())?;
            write_file(
                &item_dir.join(format!("{name}.nfo")),
                nfo::render(&item.metadata).as_bytes(),
            )?;
            report.items += 1;
            debug!(%name, url = %item.video_url, "item staged");

            if let (Some(url), Some(fetcher)) = (&item.metadata.thumbnail, self.fetcher) {
                match save_thumbnail(fetcher, url, &item_dir, &name) {
                    Ok(path) => {
                        report.thumbnails += 1;
                        debug!(path = %path.display(), "thumbnail saved");
                    }
                    Err(err) => {
                        report.thumbnail_failures += 1;
                        warn!(%name, %url, error = %err, "thumbnail skipped");
                    }
                }
            }
        }

        Ok(report)
    }

    /// Move the previous tree aside, move staging in, then drop the previous
    /// tree.  If the second rename fails the previous tree is moved back.
    fn promote(&self, staging: &TempDir) -> Result<(), MaterializeError> {
        let output = &self.output_dir;
        let promote_err = |source| MaterializeError::Promote {
            path: output.clone(),
            source,
        };

        let previous = match fs::symlink_metadata(output) {
            Ok(_) => {
                let mut aside = staging.path().as_os_str().to_owned();
                aside.push(".previous");
                let aside = PathBuf::from(aside);
                fs::rename(output, &aside).map_err(promote_err)?;
                Some(aside)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(promote_err(err)),
        };

        if let Err(err) = fs::rename(staging.path(), output) {
            if let Some(aside) = &previous {
                if let Err(restore) = fs::rename(aside, output) {
                    error!(
                        previous = %aside.display(),
                        error = %restore,
                        "could not restore previous library"
                    );
                }
            }
            return Err(promote_err(err));
        }

        if let Some(aside) = previous {
            let removed = if aside.is_dir() {
                fs::remove_dir_all(&aside)
            } else {
                fs::remove_file(&aside)
            };
            if let Err(err) = removed {
                warn!(path = %aside.display(), error = %err, "could not remove previous library");
            }
        }
        // The staging path no longer exists, so dropping the guard is a no-op.
        Ok(())
    }
}

fn rollback(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(err) = staging.close() {
        warn!(path = %path.display(), error = %err, "could not remove staging directory");
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), MaterializeError> {
    fs::write(path, contents).map_err(|source| MaterializeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes to `<name>.part`, then renames to `<name>.<ext>`.  The partial
/// file is removed when either step fails.
fn save_thumbnail(
    fetcher: &dyn ThumbnailFetcher,
    url: &str,
    item_dir: &Path,
    name: &str,
) -> anyhow::Result<PathBuf> {
    let bytes = fetcher.fetch(url)?;
    let target = item_dir.join(format!("{name}.{}", thumbnail::extension_for(url)));
    let partial = item_dir.join(format!("{name}.part"));

    let written = fs::write(&partial, &bytes).and_then(|()| fs::rename(&partial, &target));
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(err.into());
    }
    Ok(target)
}
