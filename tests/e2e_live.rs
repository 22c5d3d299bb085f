//! End-to-end tests against a real FTP server
//!
//! These tests connect to the server configured in .env.
//! All tests are marked #[ignore] to prevent running in normal CI.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --features live-tests --test e2e_live -- --ignored --nocapture
//! ```
//!
//! # Environment variables (.env file)
//!
//! - `FTP_RELAY_HOST` - Server hostname (required)
//! - `FTP_RELAY_PORT`, `FTP_RELAY_USERNAME`, `FTP_RELAY_PASSWORD` - optional
//! - `FTP_RELAY_LIVE_PATHS` - comma separated files that exist on the server
//!   (default: the configured probe path)

#![cfg(feature = "live-tests")]

mod common;

use common::{has_live_credentials, live_paths, load_live_config};
use ftp_relay::FtpDownloader;
use serial_test::serial;

#[tokio::test]
#[ignore]
#[serial]
async fn test_live_probe() {
    if !has_live_credentials() {
        eprintln!("Skipping: FTP_RELAY_HOST not found in .env");
        return;
    }

    let config = load_live_config().unwrap();
    let path = live_paths(&config).remove(0);
    let downloader = FtpDownloader::new(config).unwrap();

    let report = downloader.probe_download(Some(path.as_str())).await.unwrap();
    println!("{}", serde_json::to_string_pretty(&report).unwrap());

    assert!(report.success, "probe of {path} failed: {:?}", report.error);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_live_batch_download() {
    if !has_live_credentials() {
        eprintln!("Skipping: FTP_RELAY_HOST not found in .env");
        return;
    }

    let config = load_live_config().unwrap();
    let paths = live_paths(&config);
    let downloader = FtpDownloader::new(config).unwrap();

    let report = downloader.download_batch(&paths, 2).await.unwrap();

    for (path, content) in &report.data {
        println!("{path}: {:?} chars", content.as_ref().map(|c| c.chars().count()));
    }
    assert_eq!(report.failed(), 0, "resolved: {:?}", report.resolved);
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_live_known_files() {
    if !has_live_credentials() {
        eprintln!("Skipping: FTP_RELAY_HOST not found in .env");
        return;
    }

    let downloader = FtpDownloader::new(load_live_config().unwrap()).unwrap();

    let files = downloader.check_known_files().await.unwrap();
    for file in &files {
        println!("{} ({} bytes, {:?})", file.path, file.size, file.date);
    }
}

#[tokio::test]
#[ignore]
#[serial]
async fn test_live_bad_password() {
    if !has_live_credentials() {
        eprintln!("Skipping: FTP_RELAY_HOST not found in .env");
        return;
    }

    let mut config = load_live_config().unwrap();
    config.endpoint.password = "definitely-not-the-password".to_string();
    let downloader = FtpDownloader::new(config).unwrap();

    let result = downloader.list_directory("/").await;
    assert!(result.unwrap_err().is_connection());
}
