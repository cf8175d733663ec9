//! Expand raw input paths into the ordered list of qualifying media files.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::errors::{MediaNameError, Result};

/// Extension mask plus blacklist, both taken from configuration.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    blacklist: Vec<Regex>,
}

impl FileFilter {
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let extensions = config
            .list("extension_mask")
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        let blacklist = config
            .list("blacklist")
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        MediaNameError::ConfigValidation(format!(
                            "blacklist pattern '{pattern}' is invalid: {e}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { extensions, blacklist })
    }

    pub fn accepts(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        let ext_ok = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|e| self.extensions.iter().any(|m| *m == e));
        if !ext_ok {
            return false;
        }
        if let Some(re) = self.blacklist.iter().find(|re| re.is_match(&name)) {
            debug!(path = %path.display(), pattern = %re.as_str(), "blacklisted");
            return false;
        }
        true
    }
}

/// Resolve `raw_paths` to a sorted, de-duplicated list of qualifying files.
pub fn qualifying_paths<P: AsRef<Path>>(raw_paths: &[P], config: &Configuration) -> Result<Vec<PathBuf>> {
    let filter = FileFilter::from_config(config)?;
    let max_depth = if config.flag("recurse") { usize::MAX } else { 1 };
    let report_missing = config.flag("report_missing");
    let mut found = BTreeSet::new();

    for raw in raw_paths {
        let raw = raw.as_ref();
        let Ok(path) = dunce::canonicalize(raw) else {
            if report_missing {
                warn!(path = %raw.display(), "Skipping path that does not exist");
            } else {
                debug!(path = %raw.display(), "Skipping path that does not exist");
            }
            continue;
        };
        if path.is_file() {
            if filter.accepts(&path) {
                found.insert(path);
            }
            continue;
        }
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| match e {
                Ok(e) => Some(e),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
        {
            if filter.accepts(entry.path()) {
                found.insert(entry.into_path());
            }
        }
    }

    debug!(count = found.len(), "Discovered media files");
    Ok(found.into_iter().collect())
}
