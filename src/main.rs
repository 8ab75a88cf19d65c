use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use taskd::{config::ServerConfig, rest, storage::Storage, AppContext};
use tracing::info;

#[derive(Parser)]
#[command(name = "taskd", about = "Task management REST API daemon", version)]
struct Args {
    /// HTTP server port
    #[arg(long, env = "TASKD_PORT")]
    port: Option<u16>,

    /// Bind address for the HTTP server (default: 127.0.0.1; use 0.0.0.0 for LAN access)
    #[arg(long, env = "TASKD_BIND")]
    bind_address: Option<String>,

    /// Data directory for the SQLite database
    #[arg(long, env = "TASKD_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKD_LOG")]
    log: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the process environment is used as-is.
    // Must run before clap so env-backed flags see .env values.
    let _ = dotenv::dotenv();

    let args = Args::parse();
    let config = Arc::new(ServerConfig::new(
        args.port,
        args.data_dir,
        args.log,
        args.bind_address,
    ));

    tracing_subscriber::fmt()
        .with_env_filter(config.log.as_str())
        .compact()
        .init();

    let storage = Arc::new(Storage::new(&config.data_dir).await?);
    info!("database ready at {}", config.data_dir.display());

    let ctx = Arc::new(AppContext { config, storage });
    rest::start_rest_server(ctx).await
}
