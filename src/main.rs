//! HID Explorer CLI
//!
//! Lists HID devices, prints report descriptors and sends/receives raw
//! reports as hex text.

use clap::Parser;
use hid_explorer::ExplorerConfig;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;
use commands::OutputOptions;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(ExplorerConfig::default_path);
    let config = ExplorerConfig::load(&config_path)?;

    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));

    let filters = config.effective_filters(&cli.filter());
    let options = OutputOptions {
        color: !cli.no_color,
        live_input: false,
    };

    match cli.command {
        Commands::List => {
            commands::device::list(&filters, options).await?;
        }
        Commands::Info { device } => {
            commands::device::info(&filters, device, options).await?;
        }
        Commands::Describe { file } => {
            commands::device::describe(&file)?;
        }
        Commands::Send { device, hex } => {
            commands::report::send(&filters, device, &hex, options).await?;
        }
        Commands::Monitor { device, count } => {
            let limit = count.or(config.monitor.max_reports);
            commands::report::monitor(&filters, device, limit, options).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the configured level
fn init_logging(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
