use std::fs;

use lab_sample_engine::config::{load_or_create, Config};

fn scratch_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("lab_sample_engine_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch dir");
    dir.join(name)
}

#[test]
fn missing_file_writes_defaults() {
    let path = scratch_path("fresh.toml");
    let _ = fs::remove_file(&path);
    let cfg = load_or_create(&path).expect("defaults");
    assert_eq!(cfg, Config::default());
    assert!(path.exists());
    assert_eq!(load_or_create(&path).expect("reload"), cfg);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let path = scratch_path("partial.toml");
    fs::write(&path, "language = \"ko\"\n[kf_factor]\nsame_day_only = true\n").expect("write");
    let cfg = load_or_create(&path).expect("parse");
    assert_eq!(cfg.language, "ko");
    assert!(cfg.kf_factor.same_day_only);
    assert_eq!(cfg.display.percent, 4);
    assert_eq!(cfg.display.mass, 4);
    assert_eq!(cfg.display.volume, 3);
    assert!(cfg.session_settings().kf_same_day.is_some());
    assert!(Config::default().session_settings().kf_same_day.is_none());
}

#[test]
fn broken_file_is_reported() {
    let path = scratch_path("broken.toml");
    fs::write(&path, "language = [").expect("write");
    assert!(load_or_create(&path).is_err());
}
