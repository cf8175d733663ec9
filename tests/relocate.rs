use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use medianame::{Configuration, MediaNameError, Metadata, ParsedNameProvider, Target};

fn setup(root: &Path, extra: &[(&str, serde_json::Value)]) -> (Configuration, Target, PathBuf) {
    let src_dir = root.join("incoming");
    let dest_dir = root.join("library");
    fs::create_dir_all(&src_dir).unwrap();
    let src = src_dir.join("Alien.1979.1080p.BluRay.mkv");
    fs::write(&src, b"xenomorph").unwrap();

    let mut overrides = vec![(
        "movie_directory".to_string(),
        json!(format!("{}/{{title}}", dest_dir.display())),
    )];
    overrides.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));
    let cfg = Configuration::new(overrides).unwrap();
    let target = Target::new(&src, &cfg);
    (cfg, target, dest_dir.join("Alien").join("Alien (1979).mkv"))
}

fn confirm(target: &mut Target, cfg: &Configuration) -> PathBuf {
    let candidates = target.lookup(&ParsedNameProvider, 5).unwrap();
    target.confirm(candidates[0].clone(), cfg).unwrap().to_path_buf()
}

#[test]
fn moves_into_missing_directories() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[]);

    assert_eq!(confirm(&mut target, &cfg), expected);
    let written = target.relocate(&cfg).unwrap();

    assert_eq!(written, expected);
    assert_eq!(fs::read(&expected).unwrap(), b"xenomorph");
    assert!(!target.source.path.exists());
    assert_eq!(target.metadata(), Some(&{
        let mut m = Metadata::movie("Alien", Some(1979));
        m.extension = ".mkv".into();
        m
    }));
}

#[test]
fn collision_under_fail_is_rejected_and_source_kept() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[]);
    fs::create_dir_all(expected.parent().unwrap()).unwrap();
    fs::write(&expected, b"original").unwrap();

    confirm(&mut target, &cfg);
    let err = target.relocate(&cfg).unwrap_err();

    assert!(matches!(err, MediaNameError::DestinationExists(ref p) if *p == expected));
    assert_eq!(fs::read(&expected).unwrap(), b"original");
    assert_eq!(fs::read(&target.source.path).unwrap(), b"xenomorph");
}

#[test]
fn rename_policy_appends_suffix() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[("on_duplicate", json!("rename"))]);
    fs::create_dir_all(expected.parent().unwrap()).unwrap();
    fs::write(&expected, b"original").unwrap();

    confirm(&mut target, &cfg);
    let written = target.relocate(&cfg).unwrap();

    assert_eq!(written, expected.with_file_name("Alien (1979) (2).mkv"));
    assert_eq!(target.destination(), Some(written.as_path()));
    assert_eq!(fs::read(&expected).unwrap(), b"original");
    assert_eq!(fs::read(&written).unwrap(), b"xenomorph");
}

#[test]
fn overwrite_policy_replaces_file() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[("on_duplicate", json!("overwrite"))]);
    fs::create_dir_all(expected.parent().unwrap()).unwrap();
    fs::write(&expected, b"original").unwrap();

    confirm(&mut target, &cfg);
    target.relocate(&cfg).unwrap();

    assert_eq!(fs::read(&expected).unwrap(), b"xenomorph");
    assert!(!target.source.path.exists());
}

#[test]
fn dry_run_touches_nothing() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[("test", json!(true))]);

    confirm(&mut target, &cfg);
    let written = target.relocate(&cfg).unwrap();

    assert_eq!(written, expected);
    assert!(!expected.exists());
    assert!(!td.path().join("library").exists());
    assert!(target.source.path.exists());
}

#[test]
fn relocate_without_confirm_fails() {
    let td = tempdir().unwrap();
    let (cfg, mut target, _) = setup(td.path(), &[]);
    let err = target.relocate(&cfg).unwrap_err();
    assert!(matches!(err, MediaNameError::RelocationFailed { .. }));
    assert!(target.source.path.exists());
}

#[test]
fn empty_directory_template_stays_beside_source() {
    let td = tempdir().unwrap();
    let src = td.path().join("Lost.S01E04.Walkabout.avi");
    fs::write(&src, b"island").unwrap();
    let cfg = Configuration::default();
    let mut target = Target::new(&src, &cfg);

    let dest = confirm(&mut target, &cfg);
    assert_eq!(dest, td.path().join("Lost - S01E04 - Walkabout.avi"));
    target.relocate(&cfg).unwrap();
    assert!(dest.exists());
}

/// Lock `dir` read-only. Returns false when the process ignores directory
/// permissions (root), in which case the caller has nothing to observe.
#[cfg(unix)]
fn lock_dir(dir: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o555)).unwrap();
    let check = dir.join(".write-check");
    if fs::write(&check, b"").is_ok() {
        let _ = fs::remove_file(&check);
        unlock_dir(dir);
        return false;
    }
    true
}

#[cfg(unix)]
fn unlock_dir(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
}

fn leftovers(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with(".medianame."))
        .collect()
}

#[cfg(unix)]
#[test]
fn unwritable_destination_leaves_no_partial_copy() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[]);
    let locked = expected.parent().unwrap();
    fs::create_dir_all(locked).unwrap();
    if !lock_dir(locked) {
        return;
    }

    confirm(&mut target, &cfg);
    let result = target.relocate(&cfg);
    unlock_dir(locked);

    assert!(matches!(result, Err(MediaNameError::RelocationFailed { .. })));
    assert_eq!(fs::read_dir(locked).unwrap().count(), 0);
    assert_eq!(fs::read(&target.source.path).unwrap(), b"xenomorph");
}

// A read-only source directory makes the rename fail, the copy succeed and the
// source removal fail, so the move has to be undone.
#[cfg(unix)]
#[test]
fn failed_source_removal_rolls_back_copy() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[]);
    let incoming = target.source.path.parent().unwrap().to_path_buf();
    if !lock_dir(&incoming) {
        return;
    }

    confirm(&mut target, &cfg);
    let result = target.relocate(&cfg);
    unlock_dir(&incoming);

    assert!(matches!(result, Err(MediaNameError::RelocationFailed { .. })));
    assert_eq!(fs::read(&target.source.path).unwrap(), b"xenomorph");
    assert!(!expected.exists());
    assert!(leftovers(expected.parent().unwrap()).is_empty());
}

#[cfg(unix)]
#[test]
fn failed_overwrite_keeps_previous_destination() {
    let td = tempdir().unwrap();
    let (cfg, mut target, expected) = setup(td.path(), &[("on_duplicate", json!("overwrite"))]);
    fs::create_dir_all(expected.parent().unwrap()).unwrap();
    fs::write(&expected, b"precious").unwrap();
    let incoming = target.source.path.parent().unwrap().to_path_buf();
    if !lock_dir(&incoming) {
        return;
    }

    confirm(&mut target, &cfg);
    let result = target.relocate(&cfg);
    unlock_dir(&incoming);

    assert!(matches!(result, Err(MediaNameError::RelocationFailed { .. })));
    assert_eq!(fs::read(&target.source.path).unwrap(), b"xenomorph");
    assert_eq!(fs::read(&expected).unwrap(), b"precious");
    assert!(leftovers(expected.parent().unwrap()).is_empty());
}
