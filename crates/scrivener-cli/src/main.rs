//! Scrivener CLI - generate evidence-grounded documentation skills.

use clap::Parser;
use scrivener_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> scrivener_cli::Result<bool> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Generate(args) => {
            commands::execute_generate(args, &config, cli.api_key.as_deref(), &formatter).await
        }
        Command::Verify(args) => commands::execute_verify(args, &config, &formatter).await,
        Command::Analyze(args) => {
            commands::execute_analyze(args, &config, &formatter).await?;
            Ok(true)
        }
    }
}
