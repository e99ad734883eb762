//! Unit tests for configuration loading.

use super::*;
use std::io::Write as _;

fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_a_valid_configuration() {
    let file = write_temp_config(
        "organization: acme\nrepositories:\n  - name: service\nteam:\n  - name: developers\n    level: push\n",
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.organization, "acme");
    assert_eq!(config.repositories.len(), 1);
    assert_eq!(config.team_permissions.len(), 1);
}

#[test]
fn missing_file_is_a_read_error() {
    let err = load_config(std::path::Path::new("/nonexistent/repositories.yaml")).unwrap_err();
    assert!(matches!(err, Error::ConfigRead { .. }));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let file = write_temp_config("organization: [unclosed\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn invalid_settings_are_rejected() {
    let file = write_temp_config("organization: acme\nrepositories: []\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
