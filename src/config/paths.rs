//! Where medianame keeps its files.
//! Config lives under the OS config dir, logs under the OS data dir, each with a
//! `$HOME` fallback for minimal environments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "MEDIANAME_CONFIG";

/// Config file name looked up in the working directory.
pub const LOCAL_CONFIG_NAME: &str = ".medianame.xml";

const APP_DIR: &str = "medianame";

/// `<base>/medianame/<file>`, or `$HOME/<fallback...>/medianame/<file>` when the
/// platform directory is unknown.
fn app_file(base: Option<PathBuf>, home_fallback: &[&str], file: &str) -> Option<PathBuf> {
    let base = base.or_else(|| {
        let home = std::env::var_os("HOME").map(PathBuf::from)?;
        Some(home_fallback.iter().fold(home, |p, part| p.join(part)))
    })?;
    Some(base.join(APP_DIR).join(file))
}

/// `config.xml` under the OS config directory.
pub fn default_config_path() -> Option<PathBuf> {
    app_file(dirs::config_dir(), &[".config"], "config.xml")
}

pub fn default_log_path() -> Option<PathBuf> {
    app_file(dirs::data_dir(), &[".local", "share"], "medianame.log")
}

/// True if any existing ancestor of `path` is a symlink.
/// Used before writing config or log files.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    for anc in path.ancestors().skip(1) {
        if anc.as_os_str().is_empty() {
            continue;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}
