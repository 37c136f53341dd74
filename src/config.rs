use std::path::PathBuf;

use clap::Parser;

/// 起動設定。コマンドライン引数と環境変数から読む。
#[derive(Debug, Clone, Parser)]
#[command(name = "bookshelf-mcp", version, about = "Personal book catalog as an MCP server")]
pub struct Config {
    /// Library file (one `Title|Author|Year|Genre|Read` record per line)
    #[arg(env = "BOOKSHELF_LIBRARY", default_value = "library.txt")]
    pub library: PathBuf,

    /// Log filter for stderr output (e.g. "info", "bookshelf_mcp=debug")
    #[arg(long, env = "BOOKSHELF_LOG", default_value = "info")]
    pub log_level: String,
}

/// tracingを初期化する。stdoutはMCPプロトコルが使うので、ログは必ずstderrへ。
/// `RUST_LOG` が設定されていればそちらを優先する。
pub fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
