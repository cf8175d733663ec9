//! Destination conflict policy.
//!
//! Policy:
//! - Fail: keep the requested name; the caller rejects the move if it already exists.
//! - Overwrite: keep the requested name; the caller replaces an existing file.
//! - RenameWithSuffix: pick a free name by appending " (n)" before the extension.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnDuplicate {
    #[default]
    Fail,
    Overwrite,
    RenameWithSuffix,
}

impl FromStr for OnDuplicate {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" | "skip" | "" => Ok(OnDuplicate::Fail),
            "overwrite" | "replace" => Ok(OnDuplicate::Overwrite),
            "rename" | "suffix" => Ok(OnDuplicate::RenameWithSuffix),
            other => Err(format!(
                "invalid on_duplicate policy '{other}' (expected fail, overwrite or rename)"
            )),
        }
    }
}

impl fmt::Display for OnDuplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OnDuplicate::Fail => "fail",
            OnDuplicate::Overwrite => "overwrite",
            OnDuplicate::RenameWithSuffix => "rename",
        })
    }
}

/// Compute the path to move to inside `dst_dir` for the requested `name`.
///
/// For Fail/Overwrite this is simply `dst_dir/name`; for RenameWithSuffix the
/// first free of `name`, `name (2)`, `name (3)`, ... is returned.
pub fn resolve_destination(dst_dir: &Path, name: &OsStr, policy: OnDuplicate) -> PathBuf {
    let candidate = dst_dir.join(name);
    match policy {
        OnDuplicate::Fail | OnDuplicate::Overwrite => candidate,
        OnDuplicate::RenameWithSuffix if !candidate.exists() => candidate,
        OnDuplicate::RenameWithSuffix => unique_with_numeric_suffix(dst_dir, name),
    }
}

/// Examples:
/// - "Movie (1999).mkv" -> "Movie (1999) (2).mkv"
/// - ".nfo" -> ".nfo (2)"
fn unique_with_numeric_suffix(dst_dir: &Path, name: &OsStr) -> PathBuf {
    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let ext: Option<&OsStr> = base.extension();

    const MAX_TRIES: u64 = 10_000;
    for n in 2..=MAX_TRIES {
        let candidate = dst_dir.join(name_with_suffix(&stem, ext, &format!(" ({n})")));
        if !candidate.exists() {
            return candidate;
        }
        if n == 4 {
            trace!(name = ?name, dir = %dst_dir.display(), "several numbered duplicates already present");
        }
    }
    dst_dir.join(name_with_suffix(&stem, ext, " (final)"))
}

#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// Join `stem + suffix + [.ext]`, shortening the stem so the result fits a file name.
fn name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let ext_part = ext.map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();
    let budget = MAX_FILENAME_LEN.saturating_sub(suffix.len() + ext_part.len());

    let mut out = match stem.to_str() {
        Some(s) if s.len() > budget => {
            let mut cut = budget;
            while cut > 0 && !s.is_char_boundary(cut) {
                cut -= 1;
            }
            OsString::from(if cut == 0 { "f" } else { &s[..cut] })
        }
        _ => stem.to_os_string(),
    };
    out.push(suffix);
    out.push(ext_part);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn free_name_is_kept() {
        let td = tempdir().unwrap();
        let dst = resolve_destination(td.path(), OsStr::new("Alien (1979).mkv"), OnDuplicate::RenameWithSuffix);
        assert_eq!(dst, td.path().join("Alien (1979).mkv"));
    }

    #[test]
    fn collisions_increment_suffix() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("Alien (1979).mkv"), b"1").unwrap();
        fs::write(td.path().join("Alien (1979) (2).mkv"), b"2").unwrap();
        let dst = resolve_destination(td.path(), OsStr::new("Alien (1979).mkv"), OnDuplicate::RenameWithSuffix);
        assert_eq!(dst, td.path().join("Alien (1979) (3).mkv"));
    }

    #[test]
    fn fail_and_overwrite_return_requested_name() {
        let td = tempdir().unwrap();
        fs::write(td.path().join("x.mp4"), b"x").unwrap();
        for policy in [OnDuplicate::Fail, OnDuplicate::Overwrite] {
            assert_eq!(
                resolve_destination(td.path(), OsStr::new("x.mp4"), policy),
                td.path().join("x.mp4")
            );
        }
    }

    #[test]
    fn long_names_are_shortened_to_fit() {
        let stem = "a".repeat(300);
        let name = name_with_suffix(OsStr::new(&stem), Some(OsStr::new("mkv")), " (2)");
        assert_eq!(name.len(), MAX_FILENAME_LEN);
        assert!(name.to_string_lossy().ends_with(" (2).mkv"));
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("rename".parse::<OnDuplicate>().unwrap(), OnDuplicate::RenameWithSuffix);
        assert_eq!("Overwrite".parse::<OnDuplicate>().unwrap(), OnDuplicate::Overwrite);
        assert_eq!("fail".parse::<OnDuplicate>().unwrap(), OnDuplicate::Fail);
        assert!("sometimes".parse::<OnDuplicate>().is_err());
    }
}
