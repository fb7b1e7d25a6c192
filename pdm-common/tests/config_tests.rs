//! Configuration file resolution tests
//!
//! Tests that touch PDM_CONFIG are marked #[serial] so they do not race on
//! the process environment.

use pdm_common::config::{
    resolve_config_path, ConfigLocation, ConfigOverrides, ConfigSource, ServerConfig, CONFIG_ENV_VAR,
};
use pdm_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_cli_path_beats_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let location = resolve_config_path(Some(Path::new("/tmp/from-cli.toml")));
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(location, ConfigLocation::Explicit(PathBuf::from("/tmp/from-cli.toml")));
}

#[test]
#[serial]
fn test_env_path_used_without_cli() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let location = resolve_config_path(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(location, ConfigLocation::Explicit(PathBuf::from("/tmp/from-env.toml")));
}

#[test]
#[serial]
fn test_default_location_without_overrides() {
    env::remove_var(CONFIG_ENV_VAR);
    match resolve_config_path(None) {
        ConfigLocation::Default(path) => assert!(path.ends_with("pdm/pdm-web.toml")),
        ConfigLocation::None => {}
        other => panic!("unexpected location {:?}", other),
    }
}

#[test]
#[serial]
fn test_load_full_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config(
        r#"
        host = "0.0.0.0"
        port = 8100
        upload_dir = "/var/lib/pdm/uploads"
        identifier_column = "Product ID"
        max_upload_bytes = 1024

        [predict]
        dashboard = false

        [models]
        maintenance = "/opt/models/m.onnx"
        failure_type = "/opt/models/f.onnx"

        [logging]
        level = "debug"
        "#,
    );

    let (config, source) = ServerConfig::load(Some(file.path()), ConfigOverrides::default()).unwrap();
    assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(config.bind_address(), "0.0.0.0:8100");
    assert_eq!(config.upload_dir, PathBuf::from("/var/lib/pdm/uploads"));
    assert_eq!(config.identifier_column.as_deref(), Some("Product ID"));
    assert_eq!(config.max_upload_bytes, 1024);
    assert!(!config.dashboard);
    assert_eq!(config.maintenance_model, PathBuf::from("/opt/models/m.onnx"));
    assert_eq!(config.failure_type_model, PathBuf::from("/opt/models/f.onnx"));
    assert_eq!(config.log_level, "debug");
}

#[test]
#[serial]
fn test_explicit_missing_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let err = ServerConfig::load(
        Some(Path::new("/nonexistent/pdm-web.toml")),
        ConfigOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_malformed_file_is_error() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config("port = \"not a number\"");
    let err = ServerConfig::load(Some(file.path()), ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
#[serial]
fn test_overrides_apply_on_top_of_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let file = write_config("port = 8100\nupload_dir = \"from-file\"");
    let overrides = ConfigOverrides {
        upload_dir: Some(PathBuf::from("from-cli")),
        dashboard: Some(false),
        ..Default::default()
    };

    let (config, _) = ServerConfig::load(Some(file.path()), overrides).unwrap();
    assert_eq!(config.port, 8100);
    assert_eq!(config.upload_dir, PathBuf::from("from-cli"));
    assert!(!config.dashboard);
}
