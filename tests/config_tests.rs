use std::collections::HashMap;

use loan_tracker::config::{Config, ConfigError, ConfigManager, Environment};
use tempfile::tempdir;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_base_profile() {
    let cfg = Config::default();
    assert!(!cfg.debug);
    assert!(cfg.graphiql_enabled);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.log_level, "INFO");
    assert_eq!(cfg.locale, "en-US");
    assert_eq!(cfg.currency, "USD");
}

#[test]
fn profiles_toggle_debug_and_graphiql() {
    let dev = Config::for_environment(Environment::Development);
    assert!(dev.debug && dev.graphiql_enabled);
    let prod = Config::for_environment(Environment::Production);
    assert!(!prod.debug && !prod.graphiql_enabled);
    let test = Config::for_environment(Environment::Testing);
    assert!(test.debug && !test.graphiql_enabled);
}

#[test]
fn server_variables_override_profile() {
    let cfg = Config::from_lookup(lookup(&[
        ("APP_ENV", "production"),
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("LOG_LEVEL", "DEBUG"),
    ]))
    .unwrap();
    assert_eq!(cfg.environment, Environment::Production);
    assert_eq!(cfg.bind_address(), "127.0.0.1:8080");
    assert_eq!(cfg.log_directive(), "loan_tracker=debug");
}

#[test]
fn profiles_pin_debug_and_graphiql_over_environment() {
    let prod = Config::from_lookup(lookup(&[
        ("APP_ENV", "production"),
        ("FLASK_DEBUG", "true"),
        ("GRAPHIQL_ENABLED", "true"),
    ]))
    .unwrap();
    assert!(!prod.debug);
    assert!(!prod.graphiql_enabled);

    let dev = Config::from_lookup(lookup(&[("FLASK_DEBUG", "false"), ("GRAPHIQL_ENABLED", "false")]))
        .unwrap();
    assert!(dev.debug && dev.graphiql_enabled);
}

#[test]
fn base_config_reads_flask_debug() {
    let base = Config::base_from_lookup(lookup(&[("FLASK_DEBUG", "TRUE"), ("DEBUG", "false")])).unwrap();
    assert!(base.debug);
    assert!(base.graphiql_enabled);

    let ignored = Config::base_from_lookup(lookup(&[("DEBUG", "true")])).unwrap();
    assert!(!ignored.debug);
}

#[test]
fn non_true_flags_read_as_false() {
    let cfg = Config::base_from_lookup(lookup(&[("GRAPHIQL_ENABLED", "yes")])).unwrap();
    assert!(!cfg.graphiql_enabled);
}

#[test]
fn bad_port_is_rejected() {
    let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
}

#[test]
fn unknown_environment_is_rejected() {
    assert!(Config::from_lookup(lookup(&[("APP_ENV", "staging")])).is_err());
}

#[test]
fn manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("home")).expect("manager");

    assert_eq!(manager.load().expect("defaults"), Config::default());

    let mut cfg = Config::for_environment(Environment::Testing);
    cfg.locale = "de-DE".into();
    cfg.currency = "EUR".into();
    manager.save(&cfg).expect("save config");

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, cfg);
    assert_eq!(loaded.locale_config().decimal_separator, ',');
    assert_eq!(loaded.currency_code().as_str(), "EUR");
    assert!(!manager.path().with_extension("json.tmp").exists());
}

#[test]
fn partial_config_files_fill_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.path(), r#"{"port": 9000}"#).unwrap();
    let loaded = manager.load().unwrap();
    assert_eq!(loaded.port, 9000);
    assert_eq!(loaded.host, "0.0.0.0");
}
