use anyhow::Result;
use liftlog::config::Config;
use liftlog::logging::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logger(config.log_level);
    liftlog_server::run(config).await
}
