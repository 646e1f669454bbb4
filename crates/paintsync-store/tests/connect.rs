//! Offline connection tests for `MongoStore`. No server is required: every
//! test targets an address nothing listens on.

use std::time::Duration;

use paintsync_core::StoreSettings;
use paintsync_store::{ConnectError, MongoStore};

fn unreachable_settings() -> StoreSettings {
    StoreSettings {
        hostname: "127.0.0.1".to_string(),
        port: 9,
        dial_timeout: Duration::from_secs(1),
        ..StoreSettings::default()
    }
}

#[tokio::test]
async fn connect_to_closed_port_is_unreachable() {
    let started = std::time::Instant::now();
    let result = MongoStore::connect(&unreachable_settings()).await;

    let Err(err) = result else {
        panic!("connect to a closed port should fail");
    };
    match err {
        ConnectError::Unreachable {
            ref host,
            timeout_secs,
            ..
        } => {
            assert_eq!(host, "127.0.0.1:9");
            assert_eq!(timeout_secs, 1);
        }
        other => panic!("expected Unreachable, got: {other:?}"),
    }
    assert!(
        started.elapsed() < Duration::from_secs(10),
        "dial timeout was not honoured: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn connect_error_does_not_leak_password() {
    let settings = StoreSettings {
        password: "hunter2".to_string(),
        ..unreachable_settings()
    };
    let Err(err) = MongoStore::connect(&settings).await else {
        panic!("connect to a closed port should fail");
    };
    assert!(!err.to_string().contains("hunter2"), "password leaked: {err}");
}

#[tokio::test]
async fn malformed_options_are_an_invalid_url() {
    let settings = StoreSettings {
        options: "connectTimeoutMS=soon".to_string(),
        ..unreachable_settings()
    };
    let Err(err) = MongoStore::connect(&settings).await else {
        panic!("malformed options should fail");
    };
    match err {
        ConnectError::InvalidUrl { ref url, .. } => {
            assert!(url.contains("****"), "url should be redacted: {url}");
        }
        other => panic!("expected InvalidUrl, got: {other:?}"),
    }
}
