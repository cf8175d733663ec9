//! XML configuration file support.
//! - Locates config.xml ($MEDIANAME_CONFIG, ./.medianame.xml, then the OS config dir).
//! - Reads a flat `<config><key>value</key>...</config>` document (quick_xml).
//! - Writes the preference set back atomically with 0600 permissions.
//!
//! Notes:
//! - This module only moves text in and out of the file; key validation and
//!   value coercion happen in `Configuration::load_file_from`.

use anyhow::{bail, Result};
use quick_xml::de::from_str as from_xml_str;
use quick_xml::escape::escape;
use serde_json::Value;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::keys;
use super::paths::{default_config_path, path_has_symlink_ancestor, CONFIG_ENV, LOCAL_CONFIG_NAME};
use crate::errors::MediaNameError;
use crate::platform::{set_dir_mode_0700, write_config_secure_0600};

/// Find the configuration file to load, if any exists.
pub fn config_find() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        let p = PathBuf::from(p);
        debug!(path = %p.display(), "Using {CONFIG_ENV}");
        return p.is_file().then_some(p);
    }
    let local = PathBuf::from(LOCAL_CONFIG_NAME);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|p| p.is_file())
}

/// Path `--write-config` should target: the explicit env path, else the OS default.
pub fn config_write_path() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// Read the raw key/value pairs from an XML config file.
pub fn config_load(path: &Path) -> Result<BTreeMap<String, String>, MediaNameError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MediaNameError::ConfigNotFound
        } else {
            MediaNameError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        }
    })?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    from_xml_str::<BTreeMap<String, String>>(&content).map_err(|e| MediaNameError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Render entries as the flat XML document understood by `config_load`.
pub fn render_config<'a>(entries: impl Iterator<Item = (&'a str, &'a Value)>) -> String {
    let mut out = String::from(
        "<!--\n  medianame configuration (XML)\n  Lists are comma separated; write \\, for a literal comma. Empty elements fall back to defaults.\n  CLI flags override values in this file.\n-->\n<config>\n",
    );
    for (key, value) in entries {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Array(items) => keys::join_list(items.iter().filter_map(Value::as_str)),
            other => other.to_string(),
        };
        out.push_str(&format!("  <{key}>{}</{key}>\n", escape(text.as_str())));
    }
    out.push_str("</config>\n");
    out
}

/// Write entries to `path`, replacing any existing file atomically.
pub fn config_write<'a>(path: &Path, entries: impl Iterator<Item = (&'a str, &'a Value)>) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to write config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        let created = !parent.exists();
        fs::create_dir_all(parent)?;
        if created {
            let _ = set_dir_mode_0700(parent);
        }
    }
    write_config_secure_0600(path, render_config(entries).as_bytes())?;
    info!(path = %path.display(), "Wrote configuration file");
    Ok(())
}
