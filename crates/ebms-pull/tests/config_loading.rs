//! Engine configuration from TOML files

#![allow(clippy::unwrap_used)]

use assert_matches::assert_matches;
use ebms_core::{CoreError, DEFAULT_MPC};
use ebms_mpc::ChannelOrigin;
use ebms_pull::{EngineConfig, PullEngine, PullError};
use ebms_testkit::*;
use std::io::Write;
use std::time::Duration;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_engine_from_config_file() {
    let file = write_config(
        r#"
        producer_timeout_ms = 1500
        channels = ["urn:mpc:orders"]
        declared_channels = ["urn:mpc:invoices"]
        "#,
    );

    let config = EngineConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.producer_timeout(), Duration::from_millis(1500));

    let engine = PullEngine::from_config(config).unwrap();
    assert_eq!(
        engine.lookup_channel(DEFAULT_MPC).unwrap().origin(),
        ChannelOrigin::Default
    );
    assert_eq!(
        engine.lookup_channel("urn:mpc:orders").unwrap().origin(),
        ChannelOrigin::Registered
    );

    assert_matches!(
        engine
            .handle_pull_request(Some("urn:mpc:invoices"), &pull_exchange())
            .await,
        Err(PullError::EmptyChannel { .. })
    );
    assert_eq!(
        engine.lookup_channel("urn:mpc:invoices").unwrap().origin(),
        ChannelOrigin::Lazy
    );
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert_matches!(
        EngineConfig::load_from_file(&dir.path().join("absent.toml")),
        Err(CoreError::Config { .. })
    );
}

#[test]
fn test_invalid_channel_in_file_is_config_error() {
    let file = write_config("channels = [\"two words\"]");
    assert_matches!(
        EngineConfig::load_from_file(file.path()),
        Err(CoreError::Config { .. })
    );
}

#[test]
fn test_zero_timeout_in_file_is_config_error() {
    let file = write_config("producer_timeout_ms = 0");
    assert_matches!(
        EngineConfig::load_from_file(file.path()),
        Err(CoreError::Config { .. })
    );
}
