//! In-memory FTP trees for integration tests

use super::config::fast_config;
use chrono::{TimeZone, Utc};
use ftp_relay::transport::MemoryTransport;
use ftp_relay::{Config, FtpDownloader, RemoteEntry};
use std::sync::Arc;

/// Receipt export as served under `/www/receipt`
pub const RECEIPT_CSV: &str = "receipt_id;store;total\n1001;BEL;12.50\n1002;BEL;7.20\n";

/// Cart items export as served under `/www/cartitem`
pub const CARTITEM_CSV: &str = "receipt_id;sku;qty\n1001;A-1;2\n1002;B-7;1\n";

/// A server that lays out files the way the relay's clients expect
///
/// - `/www/receipt/receipt_bel_2025-02-21.csv` exists as written
/// - `/www/cartitem/cartitem_bel_2025-02-21.csv` only exists without the
///   leading slash
/// - `/www/cartitem` cannot be listed
pub fn shop_server() -> MemoryTransport {
    let day = Utc.with_ymd_and_hms(2025, 2, 21, 6, 0, 0).single();

    MemoryTransport::new()
        .with_file("/www/receipt/receipt_bel_2025-02-21.csv", RECEIPT_CSV)
        .with_file("www/cartitem/cartitem_bel_2025-02-21.csv", CARTITEM_CSV)
        .with_directory(
            "/www",
            vec![
                RemoteEntry::file("index.html", 512, day),
                RemoteEntry::file("robots.txt", 24, day),
            ],
        )
        .with_directory(
            "/www/receipt",
            vec![RemoteEntry::file(
                "receipt_bel_2025-02-21.csv",
                RECEIPT_CSV.len() as u64,
                day,
            )],
        )
        .with_broken_directory("/www/cartitem", "550 Permission denied")
}

/// Relay over `transport` with [`fast_config`]
pub fn relay(transport: &MemoryTransport) -> Arc<FtpDownloader> {
    relay_with(transport, fast_config())
}

/// Relay over `transport` with `config`
pub fn relay_with(transport: &MemoryTransport, config: Config) -> Arc<FtpDownloader> {
    Arc::new(
        FtpDownloader::with_transport(config, Arc::new(transport.clone()))
            .expect("test config is valid"),
    )
}
