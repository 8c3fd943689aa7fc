/// Loading trainer configuration from disk
use solfege::config::TrainerConfig;
use solfege::error::ConfigError;
use std::fs;
use std::time::Duration;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
present_intervals = false
seed = 1234

[tone]
duration_secs = 0.75
gain = 0.2

[timing]
feedback_revert_ms = 300
"#,
    )
    .unwrap();

    let config = TrainerConfig::load(&path).unwrap();
    assert!(!config.present_intervals);
    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.tone.duration_secs, 0.75);
    assert_eq!(config.tone.gain, 0.2);
    assert_eq!(config.tone.sample_rate, 44100);
    assert_eq!(config.timing.feedback_revert(), Duration::from_millis(300));
    assert_eq!(config.timing.next_prompt_delay(), Duration::from_secs(1));
}

#[test]
fn test_explicit_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    let err = TrainerConfig::load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[tone\nduration_secs = ").unwrap();

    let err = TrainerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("Invalid config"), "{}", err);
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.toml");

    let mut config = TrainerConfig::default();
    config.timing.next_prompt_delay_ms = 1500;
    config.save(&path).unwrap();

    assert_eq!(TrainerConfig::load(&path).unwrap(), config);
}

#[test]
fn test_to_toml_returns_document() {
    let config = TrainerConfig {
        seed: Some(5),
        ..TrainerConfig::default()
    };
    let toml = config.to_toml().unwrap();
    assert!(toml.contains("seed = 5"));
    assert!(toml.contains("[timing]"));
}

#[test]
fn test_save_to_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("config.toml");
    let err = TrainerConfig::default().save(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
