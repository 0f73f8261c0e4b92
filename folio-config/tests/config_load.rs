use folio_common::Theme;
use folio_config::{ConfigLoadError, FolioConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
terminal:
  tick_ms: 60
  prompt: "${FOLIO_IT_USER}@folio:~"
  script:
    - "$ whoami"
    - "$ echo ${FOLIO_IT_USER} $HOME"
particles:
  count: 12
ui:
  theme: light
"#;
    let p = write_yaml(&tmp, "folio.yaml", file_yaml);

    let config = temp_env::with_var("FOLIO_IT_USER", Some("ada"), || {
        FolioConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load folio config")
    });

    assert_eq!(config.version.as_deref(), Some("0.1"));
    assert_eq!(config.terminal.tick_ms, 60);
    assert_eq!(config.terminal.reset_delay_ms, 2000);
    assert_eq!(config.terminal.prompt, "ada@folio:~");
    assert_eq!(
        config.terminal.script,
        Some(vec![
            "$ whoami".to_string(),
            "$ echo ${FOLIO_IT_USER} $HOME".to_string()
        ])
    );
    assert_eq!(config.particles.count, 12);
    assert!(config.particles.enabled);
    assert_eq!(config.ui.theme, Theme::Light);
}

#[test]
#[serial]
fn script_lines_keep_dollar_signs_while_other_strings_expand() {
    let yaml = "terminal:\n  prompt: \"$FOLIO_IT_HOST:~\"\n  script:\n    - \"$ cd $FOLIO_IT_HOST\"\n";
    let config = temp_env::with_var("FOLIO_IT_HOST", Some("box"), || {
        FolioConfigLoader::new().with_yaml_str(yaml).load().unwrap()
    });

    assert_eq!(config.terminal.prompt, "box:~");
    assert_eq!(
        config.terminal.script,
        Some(vec!["$ cd $FOLIO_IT_HOST".to_string()])
    );
}

#[test]
#[serial]
fn env_overrides_win_over_files() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "folio.yaml", "terminal:\n  tick_ms: 60\n");

    let config = temp_env::with_vars(
        [
            ("FOLIO__TERMINAL__TICK_MS", Some("25")),
            ("FOLIO__PARTICLES__ENABLED", Some("false")),
        ],
        || FolioConfigLoader::new().with_file(&p).load().unwrap(),
    );

    assert_eq!(config.terminal.tick_ms, 25);
    assert!(!config.particles.enabled);
}

#[test]
#[serial]
fn missing_optional_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = FolioConfigLoader::new()
        .with_optional_file(tmp.path().join("nope.yaml"))
        .load()
        .unwrap();
    assert_eq!(config.terminal.tick_ms, 80);
    assert_eq!(config.terminal.cursor_blink_ms, 500);
}

#[test]
#[serial]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = FolioConfigLoader::new()
        .with_file(tmp.path().join("nope.yaml"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Source(_)));
}

#[test]
#[serial]
fn zero_reset_delay_is_invalid() {
    let err = FolioConfigLoader::new()
        .with_yaml_str("terminal:\n  reset_delay_ms: 0\n")
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Invalid(msg) if msg.contains("reset_delay_ms")));
}
