use clap::Parser;
use serde_json::json;
use std::path::PathBuf;

use medianame::cli::Args;
use medianame::{Configuration, MediaKind, Target};

fn config_from(argv: &[&str]) -> Configuration {
    let args = Args::try_parse_from(argv).unwrap();
    Configuration::new(args.overrides()).unwrap()
}

#[test]
fn every_override_is_a_known_key() {
    let cfg = config_from(&[
        "medianame",
        "--batch",
        "--recurse",
        "--scene",
        "--lowercase",
        "--nocolor",
        "--verbose",
        "--debug",
        "--test",
        "--hits",
        "3",
        "--extension-mask",
        "mkv,avi",
        "--blacklist",
        "^trailer",
        "--on-duplicate",
        "rename",
        "--log-level",
        "debug",
        "--log-file",
        "/tmp/medianame.log",
        "--log-json",
        "--movie-directory",
        "Movies/{title}",
        "--movie-template",
        "{title}{extension}",
        "--television-directory",
        "TV/{series}/Season {season}",
        "--television-template",
        "{series} {season}x{episode:02}{extension}",
        "--media",
        "television",
        "--config",
        "--write-config",
        "--version",
        "some/dir",
    ]);

    assert!(cfg.flag("batch") && cfg.flag("recurse") && cfg.flag("test"));
    assert_eq!(cfg.integer("hits"), Some(3));
    assert_eq!(cfg.list("extension_mask"), vec!["mkv", "avi"]);
    assert_eq!(cfg.list("blacklist"), vec!["^trailer"]);
    assert_eq!(cfg.text("on_duplicate"), "rename");
    assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/medianame.log")));
    assert_eq!(cfg.directive_view().len(), 4);
}

#[test]
fn defaults_survive_when_flags_are_absent() {
    let cfg = config_from(&["medianame"]);
    assert_eq!(cfg, Configuration::default());
    assert_eq!(cfg.integer("hits"), Some(5));
    assert!(cfg.flag("report_missing"));
}

#[test]
fn short_version_flag_is_a_directive() {
    let cfg = config_from(&["medianame", "-V"]);
    assert_eq!(cfg.directive_view().get("version"), Some(&json!(true)));
}

#[test]
fn media_directive_forces_kind() {
    let cfg = config_from(&["medianame", "--media", "tv"]);
    let target = Target::new("/library/Alien.1979.mkv", &cfg);
    assert_eq!(target.media(), MediaKind::Television);
    assert_eq!(target.guess.series.as_deref(), Some("Alien"));
}

#[test]
fn bad_policy_is_a_usage_error() {
    let err = Args::try_parse_from(["medianame", "--on-duplicate", "clobber"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
}
