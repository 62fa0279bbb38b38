use clap::Parser as _;
use gomoku_lib::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    gomoku_lib::init_tracing(config.log_level);
    gomoku_lib::run(config).await
}
