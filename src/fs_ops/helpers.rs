//! I/O error helpers.
//!
//! Enriches io::Error with the operation, the path and a short hint so that a
//! relocation failure reported to the operator says what to fix.
//!
//! Usage:
//!   fs::create_dir_all(dir).map_err(io_error_with_help("create directory", dir))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
            libc::EBUSY => Some("resource busy; ensure no other process is using the file"),
            libc::ENOENT => Some("path not found; verify it exists"),
            libc::EEXIST => Some("already exists; choose another name or allow overwriting"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ENAMETOOLONG => Some("file name or path too long; shorten the naming template"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    #[cfg(windows)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            5 => Some("access denied; check permissions"),
            17 => Some("not same device; cross-filesystem move"),
            32 => Some("sharing violation; file is in use"),
            112 => Some("insufficient disk space"),
            206 => Some("file name or path too long; shorten the naming template"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }
    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists; choose another name or allow overwriting"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    msg
}

/// Returns a closure for `.map_err(...)` converting io::Error -> anyhow::Error with a hint.
pub(super) fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_operation_path_and_hint() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        let msg = io_error_with_help("open source", Path::new("/x/y.mkv"))(err).to_string();
        assert!(msg.contains("open source '/x/y.mkv'"), "{msg}");
        assert!(msg.contains("verify it exists"), "{msg}");
    }
}
