//! Single-file relocation.
//! Attempts an atomic rename; on cross-filesystem or other rename errors falls back
//! to a safe copy+rename and only then removes the source.

use anyhow::{anyhow, bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::atomic::{is_cross_device, rename_into_place};
use super::copy::safe_copy_and_rename;
use super::duplicate::{resolve_destination, OnDuplicate};
use super::helpers::io_error_with_help;
use super::util;

/// Move `src` to `dest`, creating missing parent directories.
///
/// Returns the path actually written, which differs from `dest` only under
/// `OnDuplicate::RenameWithSuffix`. The source is left untouched on failure.
pub fn relocate_file(src: &Path, dest: &Path, policy: OnDuplicate) -> Result<PathBuf> {
    if !src.is_file() {
        bail!("source is not a regular file: {}", src.display());
    }
    if same_file(src, dest) {
        debug!(path = %src.display(), "source already at destination");
        return Ok(dest.to_path_buf());
    }

    let dest_dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| anyhow!("destination has no parent directory: {}", dest.display()))?;
    let name = dest
        .file_name()
        .ok_or_else(|| anyhow!("destination missing a file name: {}", dest.display()))?;

    fs::create_dir_all(dest_dir).map_err(io_error_with_help("create destination directory", dest_dir))?;

    let dest = resolve_destination(dest_dir, name, policy);
    if dest.exists() {
        match policy {
            OnDuplicate::Overwrite if dest.is_file() => {
                debug!(dest = %dest.display(), "overwriting existing destination");
            }
            _ => bail!(crate::errors::MediaNameError::DestinationExists(dest)),
        }
    }

    match rename_into_place(src, &dest, policy == OnDuplicate::Overwrite) {
        Ok(()) => {
            info!(src = %src.display(), dest = %dest.display(), "Renamed file atomically");
            Ok(dest)
        }
        Err(e) => {
            if is_cross_device(&e) {
                debug!(src = %src.display(), dest = %dest.display(), "Different filesystems, copying instead");
            } else {
                warn!(error = %e, src = %src.display(), "Rename failed, falling back to copy");
            }

            copy_then_remove_source(src, &dest)?;
            info!(src = %src.display(), dest = %dest.display(), "Copied file and removed source");
            Ok(dest)
        }
    }
}

/// Copy fallback. A destination displaced by an overwrite is parked beside it
/// and put back if the copy or the source removal fails.
fn copy_then_remove_source(src: &Path, dest: &Path) -> Result<()> {
    let displaced = if dest.is_file() {
        let backup = util::backup_path(dest);
        fs::rename(dest, &backup).map_err(io_error_with_help("set aside existing destination", dest))?;
        Some(backup)
    } else {
        None
    };
    let restore = |displaced: &Option<PathBuf>| {
        if let Some(backup) = displaced
            && let Err(e) = fs::rename(backup, dest)
        {
            warn!(error = %e, backup = %backup.display(), dest = %dest.display(), "Could not restore displaced destination");
        }
    };

    if let Err(e) = safe_copy_and_rename(src, dest) {
        restore(&displaced);
        return Err(e);
    }
    if let Err(e) = fs::remove_file(src) {
        // Only the untouched source and the previous destination may remain.
        let _ = fs::remove_file(dest);
        restore(&displaced);
        return Err(io_error_with_help("remove original file", src)(e));
    }
    if let Some(backup) = displaced
        && let Err(e) = fs::remove_file(&backup)
    {
        warn!(error = %e, backup = %backup.display(), "Could not remove displaced destination");
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
