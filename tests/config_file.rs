use std::fs;

use simeq::config::Config;
use simeq::session::Level;

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config.locale, "zh-HK");
    assert_eq!(config.level, Level::Guided);
}

#[test]
fn save_creates_parent_dirs_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("simeq").join("config.toml");

    let mut config = Config::default();
    config.theme = "paper".to_string();
    config.locale = "en".to_string();
    config.level = Level::Direct;
    config.keypad_visible = false;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.theme, "paper");
    assert_eq!(loaded.locale, "en");
    assert_eq!(loaded.level, Level::Direct);
    assert!(!loaded.keypad_visible);
    assert!(loaded.question_bank.is_none());
}

#[test]
fn unknown_locale_on_disk_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "locale = \"de\"\ntheme = \"chalkboard\"\n").unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.locale, "zh-HK");
    assert_eq!(config.theme, "chalkboard");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "level = 3\n").unwrap();
    assert!(Config::load_from(&path).is_err());
}
