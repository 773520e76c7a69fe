use domprob_log::{init_logging, ConfigError, LoggingConfig};

#[test]
fn second_install_reports_an_error_instead_of_panicking() {
    let config = LoggingConfig {
        level: "not a [valid filter".to_string(),
        json: false,
    };

    init_logging(&config).expect("first install should succeed");

    let again = init_logging(&LoggingConfig::default());
    assert!(matches!(again, Err(ConfigError::Subscriber(_))));
}
