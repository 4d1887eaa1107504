use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::FmtSubscriber;

use bidds_cli::{BiddsConfig, Cli, Commands};

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = BiddsConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Convert(args) => commands::convert::handle(args, &config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Conversion failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
