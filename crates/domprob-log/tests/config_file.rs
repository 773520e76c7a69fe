use domprob_log::{load_config, load_config_with, ConfigError, LogLevel};

#[test]
fn load_config_reads_toml_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("domprob.toml");
    std::fs::write(
        &path,
        r#"
        [logging]
        level = "debug"

        [default_logger]
        name = "orders"
        level = "info"
        "#,
    )
    .expect("should write config file");

    let config = load_config_with(Some(&path.to_string_lossy()), |_| None)
        .expect("config should load");

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.default_logger.name, "orders");
    assert_eq!(config.default_logger.level, LogLevel::Info);
}

#[test]
fn environment_overrides_apply_on_top_of_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("domprob.toml");
    std::fs::write(&path, "[default_logger]\nname = \"orders\"\n")
        .expect("should write config file");

    let config = load_config_with(Some(&path.to_string_lossy()), |key| match key {
        "DOMPROB_LOGGER_NAME" => Some("audit".to_string()),
        _ => None,
    })
    .expect("config should load");

    assert_eq!(config.default_logger.name, "audit");
    assert_eq!(config.default_logger.level, LogLevel::Debug);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("does-not-exist.toml");

    let config =
        load_config_with(Some(&path.to_string_lossy()), |_| None).expect("missing file is not an error");

    assert_eq!(config, domprob_log::Config::default());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[logging\nlevel = ").expect("should write config file");

    let result = load_config(Some(&path.to_string_lossy()));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn directory_path_is_a_read_error() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    let result = load_config(Some(&dir.path().to_string_lossy()));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}
