//! Run the relay's HTTP API against the FTP server named in the environment.
//!
//! ```bash
//! FTP_RELAY_HOST=ftp.example.com FTP_RELAY_USERNAME=user FTP_RELAY_PASSWORD=pass \
//!     cargo run --example relay_server
//! ```
//!
//! Variables can also come from a `.env` file. Set `RUST_LOG` to change the
//! log filter (default `info,tower_http=info`).

use ftp_relay::{Config, FtpDownloader, run_with_shutdown};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint.address(),
        bind = %config.server.api.bind_address,
        batch_size = config.transfer.batch_size,
        "Starting ftp-relay"
    );

    let downloader = FtpDownloader::new(config)?;
    run_with_shutdown(downloader).await?;

    Ok(())
}
