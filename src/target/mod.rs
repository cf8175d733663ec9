//! Targets: one media file and its progress through lookup, choice and relocation.

mod discover;
mod metadata;
mod parse;
pub mod template;

pub use discover::{qualifying_paths, FileFilter};
pub use metadata::{MediaKind, Metadata};
pub use parse::guess_from_path;

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Configuration;
use crate::errors::{MediaNameError, Result};
use crate::fs_ops::{relocate_file, OnDuplicate};
use crate::provider::{Provider, Query};
use template::{render_directory, render_file_name, NameStyle};

/// Where a target came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: PathBuf,
    pub filename: String,
}

/// One unit of work.
#[derive(Debug, Clone)]
pub struct Target {
    pub source: Source,
    /// Fields parsed from the file name; used to build the provider query.
    pub guess: Metadata,
    metadata: Option<Metadata>,
    destination: Option<PathBuf>,
}

impl Target {
    /// Build a target for `path`, honouring the `media` directive if present.
    pub fn new(path: impl Into<PathBuf>, config: &Configuration) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let forced = config.text("media").parse::<MediaKind>().ok();
        let guess = guess_from_path(&path, forced);
        Self {
            source: Source { path, filename },
            guess,
            metadata: None,
            destination: None,
        }
    }

    /// Discover qualifying files under `raw_paths` and wrap each in a Target, in stable order.
    pub fn populate_paths<P: AsRef<Path>>(raw_paths: &[P], config: &Configuration) -> Result<Vec<Target>> {
        Ok(qualifying_paths(raw_paths, config)?
            .into_iter()
            .map(|p| Target::new(p, config))
            .collect())
    }

    /// Confirmed metadata, once a candidate was chosen.
    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn media(&self) -> MediaKind {
        self.metadata.as_ref().map_or(self.guess.media, |m| m.media)
    }

    pub fn query(&self) -> Query {
        Query::from_metadata(&self.guess)
    }

    /// Ask `provider` for candidates, keeping at most `hits` (0 = no limit).
    pub fn lookup(&self, provider: &dyn Provider, hits: usize) -> Result<Vec<Metadata>> {
        let query = self.query();
        debug!(file = %self.source.filename, query = ?query, "Looking up metadata");
        let mut candidates = provider.search(&query)?;
        if candidates.is_empty() {
            return Err(MediaNameError::LookupNotFound(query.describe()));
        }
        if hits > 0 {
            candidates.truncate(hits);
        }
        Ok(candidates)
    }

    /// Accept `candidate` and compute the destination path from the naming templates.
    pub fn confirm(&mut self, mut candidate: Metadata, config: &Configuration) -> Result<&Path> {
        if candidate.extension.is_empty() {
            candidate.extension = self.guess.extension.clone();
        }
        let (dir_key, name_key) = match candidate.media {
            MediaKind::Movie => ("movie_directory", "movie_template"),
            MediaKind::Television => ("television_directory", "television_template"),
        };
        let style = NameStyle {
            scene: config.flag("scene"),
            lowercase: config.flag("lowercase"),
        };
        let base = self.source.path.parent().unwrap_or_else(|| Path::new("."));
        let invalid = |reason: String| MediaNameError::ConfigValidation(format!("{name_key}: {reason}"));
        let name = render_file_name(config.text(name_key), &candidate, style).map_err(invalid)?;
        let dir = render_directory(config.text(dir_key), &candidate, base)
            .map_err(|reason| MediaNameError::ConfigValidation(format!("{dir_key}: {reason}")))?;

        self.metadata = Some(candidate);
        Ok(self.destination.insert(dir.join(name)).as_path())
    }

    /// Move the file to its destination. Under the `test` preference nothing is touched.
    ///
    /// On success the stored destination is updated to the path actually written.
    pub fn relocate(&mut self, config: &Configuration) -> Result<PathBuf> {
        let dest = self.destination.clone().ok_or_else(|| MediaNameError::RelocationFailed {
            source_path: self.source.path.clone(),
            destination: PathBuf::new(),
            reason: "no destination has been confirmed".into(),
        })?;
        let policy = config
            .text("on_duplicate")
            .parse::<OnDuplicate>()
            .map_err(MediaNameError::ConfigValidation)?;
        if config.flag("test") {
            info!(src = %self.source.path.display(), dest = %dest.display(), %policy, "dry-run: would move file");
            return Ok(dest);
        }

        match relocate_file(&self.source.path, &dest, policy) {
            Ok(written) => {
                self.destination = Some(written.clone());
                Ok(written)
            }
            Err(e) => match e.downcast::<MediaNameError>() {
                Ok(typed) => Err(typed),
                Err(other) => Err(MediaNameError::RelocationFailed {
                    source_path: self.source.path.clone(),
                    destination: dest,
                    reason: format!("{other:#}"),
                }),
            },
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source.filename)
    }
}
