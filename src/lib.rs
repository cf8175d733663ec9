//! Core library for `medianame`.
//!
//! Discovers media files, guesses what they are from their names, asks a
//! metadata provider for candidates, lets an operator (or batch mode) choose
//! one and moves the file to a templated destination.
//!
//! The binary is a thin shell over [`processor::Processor`]; everything here is
//! usable on its own with a custom [`provider::Provider`] or [`choice::Chooser`].

pub mod choice;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod processor;
pub mod provider;
pub mod shutdown;
pub mod target;

pub use choice::{AutoChooser, Choice, Chooser, TerminalChooser};
pub use config::{Configuration, LogLevel, default_config_path, default_log_path, path_has_symlink_ancestor};
pub use errors::MediaNameError;
pub use fs_ops::OnDuplicate;
pub use processor::{Grade, Outcome, OutcomeKind, Processor, Record, Summary};
pub use provider::{ParsedNameProvider, Provider, Query};
pub use target::{MediaKind, Metadata, Target};
