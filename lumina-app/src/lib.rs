pub mod commands;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use commands::Console;
use infrastructure::AppState;
use modules::ConfigModule;
use shared::AppResult;

/// 默认日志过滤，可用 RUST_LOG 覆盖
const DEFAULT_LOG_FILTER: &str = "lumina=info";

pub async fn run() -> AppResult<()> {
    // .env 可选
    dotenv::dotenv().ok();

    // 初始化日志（输出到 stderr，stdout 留给控制台）
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Lumina starting...");

    let config = ConfigModule::from_env().load().await?;
    let seed_demo = config.session.seed_demo;
    let state = AppState::new(config)?;

    if seed_demo {
        state.inbox.seed_demo().await?;
    }

    let mut console = Console::new(&state.inbox, tokio::io::stdout());
    console.run(BufReader::new(tokio::io::stdin())).await?;

    tracing::info!("Lumina stopped");
    Ok(())
}
