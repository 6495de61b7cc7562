//! ipbot CLI: run the IP-reporting Telegram bot. Config from env and
//! optional CLI args.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use ipbot_runtime::{run_bot, BotConfig};

#[derive(Parser)]
#[command(name = "ipbot")]
#[command(about = "Telegram bot that reports the host's IP addresses", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = BotConfig::load(token)?;
            ipbot_core::init_tracing(config.log_file.as_deref())?;

            let cancel = CancellationToken::new();
            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("shutdown signal received");
                    signal_cancel.cancel();
                }
            });

            run_bot(config, cancel).await
        }
    }
}
