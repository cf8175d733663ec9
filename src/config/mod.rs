//! Config module.
//! Provides the key universe, the layered Configuration, default paths and XML file I/O.

pub mod keys;
pub mod paths;
pub mod types;
pub mod xml;

pub use keys::{KeyKind, Partition, DIRECTIVE_KEYS, PREFERENCE_KEYS};
pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor, CONFIG_ENV};
pub use types::{ConfigView, Configuration, LogLevel};
