//! DevCamper Server - Main entry point

use anyhow::Result;
use devcamper_common::logging::{init_logging, LogConfig};
use tracing::info;

use devcamper_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Binary defaults first, then `LOG_*` variables on top
    let log_config = LogConfig::builder()
        .log_file_prefix("devcamper-server")
        .filter_directives("devcamper_server=debug,tower_http=debug,mongodb=info")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting DevCamper Server");

    let config = Config::load()?;
    info!(
        environment = ?config.server.environment,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host,
        config.server.port
    );

    api::serve(config).await
}
