//! CLI definition and parsing.
//! Defines Args and turns the flags the user actually set into configuration overrides.
//!
//! Notes:
//! - Nothing here reads the config file; precedence is handled by `Configuration`.
//! - Boolean flags are only ever switched on from the command line.

use clap::{Parser, ValueHint};
use serde_json::{json, Value};
use std::path::PathBuf;

/// Interactively rename and relocate media files.
/// CLI flags override values from the configuration file.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "medianame",
    author,
    about = "Rename and relocate media files using canonical metadata",
    disable_version_flag = true
)]
pub struct Args {
    /// Files or directories to process.
    #[arg(value_name = "TARGETS", value_hint = ValueHint::AnyPath)]
    pub targets: Vec<PathBuf>,

    #[arg(short = 'b', long, help = "Batch mode: pick the top candidate without prompting")]
    pub batch: bool,

    #[arg(short = 'r', long, help = "Descend into sub-directories")]
    pub recurse: bool,

    #[arg(long, help = "Scene-style names: lowercase, dots instead of spaces")]
    pub scene: bool,

    #[arg(long, help = "Lowercase rendered names")]
    pub lowercase: bool,

    #[arg(long, help = "Disable colored output")]
    pub nocolor: bool,

    #[arg(short = 'v', long, help = "Print configuration and target listings")]
    pub verbose: bool,

    #[arg(short = 'd', long, help = "Print each target's parsed fields")]
    pub debug: bool,

    /// Dry-run: compute destinations but do not touch any file.
    #[arg(short = 't', long, visible_alias = "dry-run", help = "Show what would be done, but do not move files")]
    pub test: bool,

    #[arg(long, value_name = "N", help = "Maximum candidates presented per file")]
    pub hits: Option<u64>,

    #[arg(long, value_name = "EXT", value_delimiter = ',', help = "Qualifying file extensions, comma separated")]
    pub extension_mask: Option<Vec<String>>,

    #[arg(long, value_name = "REGEX", value_delimiter = ',', help = "File name patterns to ignore, comma separated")]
    pub blacklist: Option<Vec<String>>,

    #[arg(long, value_name = "POLICY", value_parser = ["fail", "overwrite", "rename"], help = "What to do when the destination exists")]
    pub on_duplicate: Option<String>,

    /// One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    #[arg(long, value_hint = ValueHint::FilePath, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Emit logs in structured JSON")]
    pub log_json: bool,

    #[arg(long, value_name = "TEMPLATE", help = "Destination directory template for movies")]
    pub movie_directory: Option<String>,

    #[arg(long, value_name = "TEMPLATE", help = "File name template for movies")]
    pub movie_template: Option<String>,

    #[arg(long, value_name = "TEMPLATE", help = "Destination directory template for episodes")]
    pub television_directory: Option<String>,

    #[arg(long, value_name = "TEMPLATE", help = "File name template for episodes")]
    pub television_template: Option<String>,

    #[arg(long, value_name = "KIND", value_parser = ["movie", "television", "tv"], help = "Treat every file as this media kind")]
    pub media: Option<String>,

    #[arg(long, help = "Print the effective configuration as JSON and exit")]
    pub config: bool,

    #[arg(long, help = "Save current preferences to the configuration file and exit")]
    pub write_config: bool,

    #[arg(short = 'V', long, help = "Print version and exit")]
    pub version: bool,
}

impl Args {
    /// Configuration overrides for every flag the user set, in key order of the table.
    pub fn overrides(&self) -> Vec<(String, Value)> {
        let mut out: Vec<(String, Value)> = Vec::new();
        let mut flag = |key: &str, on: bool| {
            if on {
                out.push((key.to_string(), Value::Bool(true)));
            }
        };
        flag("batch", self.batch);
        flag("recurse", self.recurse);
        flag("scene", self.scene);
        flag("lowercase", self.lowercase);
        flag("nocolor", self.nocolor);
        flag("verbose", self.verbose);
        flag("debug", self.debug);
        flag("test", self.test);
        flag("log_json", self.log_json);
        flag("config", self.config);
        flag("write_config", self.write_config);
        flag("version", self.version);

        if let Some(n) = self.hits {
            out.push(("hits".into(), json!(n)));
        }
        if let Some(list) = &self.extension_mask {
            out.push(("extension_mask".into(), json!(trimmed(list))));
        }
        if let Some(list) = &self.blacklist {
            out.push(("blacklist".into(), json!(trimmed(list))));
        }
        let texts = [
            ("on_duplicate", &self.on_duplicate),
            ("log_level", &self.log_level),
            ("movie_directory", &self.movie_directory),
            ("movie_template", &self.movie_template),
            ("television_directory", &self.television_directory),
            ("television_template", &self.television_template),
            ("media", &self.media),
        ];
        for (key, value) in texts {
            if let Some(v) = value {
                out.push((key.into(), Value::String(v.clone())));
            }
        }
        if let Some(p) = &self.log_file {
            out.push(("log_file".into(), Value::String(p.to_string_lossy().into_owned())));
        }
        out
    }
}

fn trimmed(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn parse() -> Args {
    Args::parse()
}
