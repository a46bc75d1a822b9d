use serial_test::serial;

use super::load_config;
use super::settings::Settings;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert!(!settings.node.first_message_bypass);
    assert_eq!(settings.node.bypass_interval_ms, 0);
}

#[test]
#[serial]
fn test_load_config_falls_back_to_defaults() {
    temp_env::with_vars_unset(["SERVER_HOST", "SERVER_PORT"], || {
        let settings = load_config().expect("config should load without any sources");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.node.first_message_bypass);
        assert_eq!(settings.node.bypass_interval_ms, 0);
    });
}

#[test]
#[serial]
fn test_environment_overrides_server_host() {
    temp_env::with_var("SERVER_HOST", Some("0.0.0.0"), || {
        let settings = load_config().expect("config should load from environment");
        assert_eq!(settings.server.host, "0.0.0.0");
        // untouched values still come from the defaults
        assert_eq!(settings.node.bypass_interval_ms, 0);
    });
}
