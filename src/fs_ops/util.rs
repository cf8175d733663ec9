use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix of the partial copies written during a fallback move.
pub(super) const PARTIAL_PREFIX: &str = ".medianame.";

static SEQ: AtomicU64 = AtomicU64::new(0);

fn hidden_sibling(dest: &Path, suffix: &str) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    dest.with_file_name(format!("{PARTIAL_PREFIX}{}.{seq}.{name}.{suffix}", std::process::id()))
}

/// Hidden sibling of `dest` used while a copy is in flight,
/// e.g. `.medianame.4242.0.Alien (1979).mkv.part`.
pub(super) fn partial_path(dest: &Path) -> PathBuf {
    hidden_sibling(dest, "part")
}

/// Hidden sibling holding a file displaced by an overwrite until the move completes.
pub(super) fn backup_path(dest: &Path) -> PathBuf {
    hidden_sibling(dest, "bak")
}

#[cfg(unix)]
pub(super) fn fsync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub(super) fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
