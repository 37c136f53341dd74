use clap::Parser;

use bookshelf_mcp::config::{init_tracing, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(&config.log_level);

    bookshelf_mcp::interface::mcp::run(config.library).await
}
