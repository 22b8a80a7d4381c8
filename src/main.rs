use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chatterm::{Commands, Container, ContainerConfig, RenderMode, Router, Settings};

#[derive(Parser)]
#[command(name = "chatterm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log request details, finish reasons and token usage (same as DEBUG=true)
    #[arg(long, global = true)]
    debug: bool,

    /// Use the offline echo backend; no API key required
    #[arg(long, global = true)]
    mock: bool,

    /// Load environment variables from this file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Override MODEL_NAME
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Override RENDER_MODE (prompt or messages)
    #[arg(long, global = true, value_parser = parse_render_mode)]
    mode: Option<RenderMode>,

    #[arg(long, global = true)]
    no_spinner: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_render_mode(value: &str) -> Result<RenderMode, String> {
    value.parse().map_err(|e: chatterm::DomainError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings decide the log level (DEBUG), so read them first and report
    // any error once logging is up.
    let settings = Settings::load(cli.env_file.as_deref());
    let debug_enabled = cli.debug || settings.as_ref().map(|s| s.debug).unwrap_or(false);

    let level = if debug_enabled {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut settings = settings?;
    settings.debug = debug_enabled;
    if let Some(model) = cli.model {
        settings.session = settings.session.with_model(model);
    }
    if let Some(mode) = cli.mode {
        settings.session = settings.session.with_render_mode(mode);
    }
    debug!("Session config: {:?}", settings.session);

    let container = Container::new(ContainerConfig {
        settings,
        mock: cli.mock,
        spinner: !cli.no_spinner && !debug_enabled,
    })?;

    let router = Router::new(&container);
    let output = router.route(cli.command.unwrap_or(Commands::Chat)).await?;
    println!("{}", output);

    Ok(())
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["chatterm"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn ask_joins_trailing_words() {
        let cli = Cli::try_parse_from(["chatterm", "--mock", "ask", "what", "time"]).unwrap();
        assert!(cli.mock);
        assert_eq!(
            cli.command,
            Some(Commands::Ask {
                text: vec!["what".to_string(), "time".to_string()]
            })
        );
    }

    #[test]
    fn ask_requires_text() {
        assert!(Cli::try_parse_from(["chatterm", "ask"]).is_err());
    }

    #[test]
    fn mode_flag_is_validated() {
        let cli = Cli::try_parse_from(["chatterm", "--mode", "prompt"]).unwrap();
        assert_eq!(cli.mode, Some(RenderMode::FlatPrompt));
        assert!(Cli::try_parse_from(["chatterm", "--mode", "telepathy"]).is_err());
    }
}
