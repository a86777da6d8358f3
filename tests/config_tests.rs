//! Configuration loading, environment overrides and startup helpers

use bllvm_chainparams::config::{LOG_FILTER_ENV, LOG_JSON_ENV, NETWORK_ENV};
use bllvm_chainparams::{LoggingConfig, NetworkVariant, ParamsConfig};
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    std::env::remove_var(NETWORK_ENV);
    std::env::remove_var(LOG_FILTER_ENV);
    std::env::remove_var(LOG_JSON_ENV);
}

fn temp_file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_json_round_trip() {
    let config = ParamsConfig {
        network: "regtest".to_string(),
        logging: Some(LoggingConfig {
            filter: Some("bllvm_chainparams=debug".to_string()),
            json_format: true,
        }),
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    config.to_json_file(&path).unwrap();

    let loaded = ParamsConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(ParamsConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_toml_file() {
    let file = temp_file_with(
        ".toml",
        "network = \"testnet\"\n\n[logging]\nfilter = \"warn\"\n",
    );
    let config = ParamsConfig::from_file(file.path()).unwrap();
    assert_eq!(config.network_variant().unwrap(), NetworkVariant::Testnet);
    let logging = config.logging.unwrap();
    assert_eq!(logging.filter.as_deref(), Some("warn"));
    assert!(!logging.json_format);
}

#[test]
fn test_missing_fields_default() {
    let file = temp_file_with(".json", "{}");
    let config = ParamsConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.network, "main");
    assert!(config.logging.is_none());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ParamsConfig::from_json_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_unknown_network_fails_validation() {
    let file = temp_file_with(".json", r#"{"network": "mainnet"}"#);
    let config = ParamsConfig::from_json_file(file.path()).unwrap();
    assert!(config.validate().is_err());
    assert!(config.load_bundle().is_err());
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var(NETWORK_ENV, "regtest");
    std::env::set_var(LOG_FILTER_ENV, "trace");
    std::env::set_var(LOG_JSON_ENV, "1");

    let mut config = ParamsConfig::default();
    config.apply_env_overrides();
    clear_env();

    assert_eq!(config.network, "regtest");
    assert_eq!(
        config.logging,
        Some(LoggingConfig {
            filter: Some("trace".to_string()),
            json_format: true,
        })
    );
}

#[test]
#[serial]
fn test_no_env_leaves_config_untouched() {
    clear_env();
    let mut config = ParamsConfig {
        network: "testnet".to_string(),
        logging: None,
    };
    config.apply_env_overrides();
    assert_eq!(config.network, "testnet");
    assert!(config.logging.is_none());
}

#[test]
fn test_load_bundle_selects_network() {
    let config = ParamsConfig {
        network: "regtest".to_string(),
        logging: None,
    };
    let bundle = config.load_bundle().unwrap();
    assert_eq!(bundle.variant(), NetworkVariant::Regtest);
    assert_eq!(bundle.pow.bits, 0x207f_ffff);

    let (registry, fresh) = config.load_registry().unwrap();
    assert_eq!(*fresh, *bundle);
    assert_eq!(registry.variants().count(), 3);
}
