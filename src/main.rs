use clap::Parser;

use linkvault::cli::Cli;
use linkvault::config::StaticConfig;
use linkvault::interfaces::cli::run_cli;
use linkvault::system::init_logging;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    // guard 必须存活到程序结束，保证日志刷盘
    let guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    let result = run_cli(cli.command, &config).await;
    drop(guard);

    if let Err(e) = result {
        eprintln!("{}", e.format_simple());
        std::process::exit(1);
    }
}
