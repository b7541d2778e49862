use colang_core::config::Settings;
use colang_core::error::ColangError;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn settings_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_json_settings() {
    let file = settings_file(".json", r#"{ "maxNumberOfProblems": 5 }"#);
    let settings = Settings::from_path(file.path()).unwrap();
    assert_eq!(settings.max_number_of_problems, 5);
    assert!(settings.report_unknown_lines);
}

#[test]
fn test_load_yaml_settings() {
    let file = settings_file(".yaml", "reportUnknownLines: false\n");
    let settings = Settings::from_path(file.path()).unwrap();
    assert_eq!(settings.max_number_of_problems, 1000);
    assert!(!settings.report_unknown_lines);

    let file = settings_file(".yml", "maxNumberOfProblems: 2\n");
    assert_eq!(Settings::from_path(file.path()).unwrap().max_number_of_problems, 2);
}

#[test]
fn test_unsupported_extension() {
    let file = settings_file(".toml", "maxNumberOfProblems = 1\n");
    match Settings::from_path(file.path()) {
        Err(ColangError::UnsupportedSettingsFormat { path }) => {
            assert!(path.ends_with(".toml"));
        }
        other => panic!("Expected UnsupportedSettingsFormat, got {other:?}"),
    }
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    assert!(matches!(
        Settings::from_path(&path),
        Err(ColangError::Io { .. })
    ));
}

#[test]
fn test_malformed_json() {
    let file = settings_file(".json", "{ not json");
    assert!(matches!(
        Settings::from_path(file.path()),
        Err(ColangError::Json(_))
    ));
}

#[test]
fn test_settings_drive_validation() {
    let file = settings_file(".json", r#"{ "reportUnknownLines": false }"#);
    let settings = Settings::from_path(file.path()).unwrap();
    let result = colang_core::analyze_with_settings("%%%\nbot missing\n", "cfg.co", &settings);
    let messages: Vec<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(messages, vec!["Bot 'missing' does not exist"]);
}
