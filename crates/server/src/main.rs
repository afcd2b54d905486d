mod config;
mod highscore;
mod routes;
mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use parking_lot::Mutex;

use config::ServerConfig;
use highscore::HighscoreStore;
use routes::AppState;

#[derive(Parser)]
#[command(name = "blockfall-server")]
#[command(about = "Blockfall game server")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value_t = 600, help = "Base gravity period in milliseconds")]
    base_period_ms: u64,

    #[arg(long, default_value = "highscores.json")]
    highscore_file: PathBuf,

    #[arg(long, default_value = "frontend", help = "Static asset directory")]
    static_dir: PathBuf,

    #[arg(long, help = "Seed session RNGs for reproducible piece sequences")]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = ServerConfig {
        base_period: Duration::from_millis(args.base_period_ms),
        highscore_path: args.highscore_file,
        static_dir: args.static_dir,
        seed: args.seed,
    };

    let highscores = HighscoreStore::load(config.highscore_path.clone());
    let state = AppState {
        config: Arc::new(config),
        highscores: Arc::new(Mutex::new(highscores)),
    };

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, routes::router(state)).await?;

    Ok(())
}
