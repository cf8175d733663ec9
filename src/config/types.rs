//! Core configuration types.
//! - Configuration is the layered, read-only key/value view used by every stage.
//! - ConfigView is a borrowed filter over one key partition.
//! - LogLevel represents verbosity with simple parsing helpers.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use super::keys::{self, Partition};
use super::xml;
use crate::errors::{MediaNameError, Result};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Layered configuration: defaults < persisted file < explicit overrides.
///
/// Overrides are kept so that a file loaded after construction never shadows them.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    entries: BTreeMap<String, Value>,
    overrides: BTreeMap<String, Value>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            entries: keys::preference_defaults(),
            overrides: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Build a configuration from defaults plus `overrides`.
    /// Any unknown key (or a value of the wrong kind) fails the whole construction.
    pub fn new<I, K>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut cfg = Self::default();
        let validated = validate_entries(overrides, |_| true)?;
        cfg.entries.extend(validated.clone());
        cfg.overrides = validated;
        Ok(cfg)
    }

    /// Discover and apply the persisted configuration file. Returns the path loaded.
    pub fn load_file(&mut self) -> Result<PathBuf> {
        let path = xml::config_find().ok_or(MediaNameError::ConfigNotFound)?;
        self.load_file_from(&path)
    }

    /// Apply a specific configuration file as the file layer.
    pub fn load_file_from(&mut self, path: &Path) -> Result<PathBuf> {
        let raw = xml::config_load(path)?;
        let mut typed = Vec::with_capacity(raw.len());
        for (key, text) in raw {
            // Empty elements mean "unset".
            if text.trim().is_empty() && keys::is_preference(&key) {
                continue;
            }
            match keys::classify(&key) {
                Some((Partition::Preference, kind)) => {
                    let value = kind.coerce(&text).map_err(|reason| MediaNameError::ConfigParse {
                        path: path.to_path_buf(),
                        reason: format!("{key}: {reason}"),
                    })?;
                    typed.push((key, value));
                }
                _ if keys::is_directive(&key) => {
                    return Err(MediaNameError::ConfigValidation(format!(
                        "{key} is a directive and cannot be set from a file"
                    )));
                }
                _ => {
                    return Err(MediaNameError::ConfigValidation(format!(
                        "{key} is not a valid field"
                    )));
                }
            }
        }
        let validated = validate_entries(typed, keys::is_preference)?;
        for (key, value) in validated {
            if !self.overrides.contains_key(&key) {
                self.entries.insert(key, value);
            }
        }
        debug!(path = %path.display(), "Applied configuration file");
        Ok(path.to_path_buf())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Boolean lookup; absent or non-boolean keys read as false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn integer(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    /// Text lookup; absent keys read as "".
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Effective log level; unknown names fall back to the default.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(self.text("log_level")).unwrap_or_default()
    }

    /// Optional log file; an empty string disables file logging.
    pub fn log_file(&self) -> Option<PathBuf> {
        let raw = self.text("log_file").trim();
        (!raw.is_empty()).then(|| PathBuf::from(raw))
    }

    pub fn preference_view(&self) -> ConfigView<'_> {
        ConfigView {
            config: self,
            partition: Partition::Preference,
        }
    }

    pub fn directive_view(&self) -> ConfigView<'_> {
        ConfigView {
            config: self,
            partition: Partition::Directive,
        }
    }

    /// Canonical JSON of every entry, keys sorted. Display/debugging only.
    pub fn to_json(&self) -> Result<String> {
        to_json(&self.entries)
    }

    /// Persist the preference view to `path` (XML).
    pub fn write_file(&self, path: &Path) -> anyhow::Result<()> {
        xml::config_write(path, self.preference_view().iter())
    }
}

/// Read-only view over one partition of a Configuration.
#[derive(Debug, Clone, Copy)]
pub struct ConfigView<'a> {
    config: &'a Configuration,
    partition: Partition,
}

impl<'a> ConfigView<'a> {
    fn includes(&self, key: &str) -> bool {
        matches!(keys::classify(key), Some((p, _)) if p == self.partition)
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        if self.includes(key) {
            self.config.get(key)
        } else {
            None
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Value)> + '_ {
        self.config.iter().filter(|(k, _)| self.includes(k))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> Result<String> {
        let subset: BTreeMap<&str, &Value> = self.iter().collect();
        to_json(&subset)
    }
}

/// Validate every entry before anything is applied. Nulls are dropped.
fn validate_entries<I, K>(entries: I, allowed: impl Fn(&str) -> bool) -> Result<BTreeMap<String, Value>>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let mut out = BTreeMap::new();
    for (key, value) in entries {
        let key: String = key.into();
        let Some((_, kind)) = keys::classify(&key).filter(|_| allowed(&key)) else {
            return Err(MediaNameError::ConfigValidation(format!(
                "{key} is not a valid field"
            )));
        };
        if value.is_null() {
            continue;
        }
        if !kind.accepts(&value) {
            return Err(MediaNameError::ConfigValidation(format!(
                "{key} must be {}",
                kind.name()
            )));
        }
        out.insert(key, value);
    }
    Ok(out)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| MediaNameError::ConfigValidation(format!("cannot serialize configuration: {e}")))
}
