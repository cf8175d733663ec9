//! Single-rename moves.
//!
//! A rename either lands the whole file or nothing, so it is always tried first.
//! Failures come back as raw `io::Error` so the caller can tell a cross-device
//! move (handled by copying) from a real refusal.

use std::fs;
use std::io;
use std::path::Path;

/// Rename `src` onto `dst`. With `replace`, an existing `dst` is overwritten
/// (Windows needs the old file removed first).
pub(super) fn rename_into_place(src: &Path, dst: &Path, replace: bool) -> io::Result<()> {
    #[cfg(windows)]
    if replace && dst.is_file() {
        match fs::remove_file(dst) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    #[cfg(not(windows))]
    let _ = replace;

    fs::rename(src, dst)?;

    if let Some(parent) = dst.parent() {
        // The rename already happened; a failed directory sync only weakens durability.
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}

/// True when `e` means source and destination live on different filesystems.
pub(super) fn is_cross_device(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    #[cfg(unix)]
    if e.raw_os_error() == Some(libc::EXDEV) {
        return true;
    }
    // ERROR_NOT_SAME_DEVICE
    #[cfg(windows)]
    if e.raw_os_error() == Some(17) {
        return true;
    }
    false
}
