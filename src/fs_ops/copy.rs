//! Copy fallback for moves a rename cannot do (usually across filesystems).
//!
//! The copy goes to a hidden partial file next to the destination and is only
//! renamed into place once complete and fsynced. The source is never touched.

use anyhow::{anyhow, bail, Result};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::atomic::rename_into_place;
use super::helpers::io_error_with_help;
use super::{io_copy, util};

/// Copy `src` to `dest` via a partial file. An existing `dest` is replaced,
/// so callers apply the duplicate policy first.
pub(super) fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;

    let src_meta = fs::metadata(src).map_err(io_error_with_help("stat source", src))?;
    let needed = src_meta.len();
    let available = fs2::available_space(dest_dir)
        .map_err(io_error_with_help("query free space", dest_dir))?;
    if available < needed {
        bail!(
            "not enough space in '{}' for '{}': need {} bytes, have {} bytes",
            dest_dir.display(),
            src.display(),
            needed,
            available
        );
    }

    let partial = util::partial_path(dest);
    let result = io_copy::copy_streaming(src, &partial)
        .map_err(io_error_with_help("copy to partial file", &partial))
        .and_then(|copied| {
            if copied != needed {
                bail!("short copy: wrote {copied} of {needed} bytes");
            }
            let mtime = FileTime::from_last_modification_time(&src_meta);
            if let Err(e) = filetime::set_file_mtime(&partial, mtime) {
                debug!(error = %e, path = %partial.display(), "could not carry over mtime");
            }
            rename_into_place(&partial, dest, true)
                .map_err(io_error_with_help("move partial file into place", dest))
        });

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}
