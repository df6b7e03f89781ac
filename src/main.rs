use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use profile_analyzer::app_log;
use profile_analyzer::config::DEFAULT_CONFIG_FILE;
use profile_analyzer::console::{ConsoleAlert, ConsoleOutput};
use profile_analyzer::page::{
    MemoryButton, MemoryDocument, MemoryInput, Page, BUTTON_ID, INPUT_ID, OUTPUT_ID,
};
use profile_analyzer::{AnalysisTrigger, ClientConfig, HttpTransport, ProfileAction};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "profile-analyzer")]
#[command(about = "Trigger VK profile analysis on the profile service")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Service base URL, overrides the configuration file
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (default: wait forever)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Configuration file with `local` and `production` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the analysis for one profile id
    Analyze { vk_id: String },
    /// Show the stored profile without re-running the analysis
    Show { vk_id: String },
    /// Read one profile id per line and analyze each as it arrives
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
        config.validate()?;
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }

    init_logging(&config)?;
    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if config_path.exists() {
        app_log!(
            info,
            "Loaded {} configuration from {}",
            ClientConfig::get_environment(),
            config_path.display()
        );
    } else {
        app_log!(info, "No configuration file found, using defaults");
    }
    app_log!(info, "Profile service: {}", config.base_url);

    let transport = Arc::new(HttpTransport::from_config(&config)?);
    let input = Arc::new(MemoryInput::default());
    let button = Arc::new(MemoryButton::new());
    let document = MemoryDocument::new()
        .with_input(INPUT_ID, input.clone())
        .with_button(BUTTON_ID, button.clone())
        .with_output(OUTPUT_ID, Arc::new(ConsoleOutput::new()));
    let page = Page::bind(&document, Arc::new(ConsoleAlert))?;
    let trigger = AnalysisTrigger::new(page, transport);

    match cli.command {
        Command::Analyze { vk_id } => {
            input.set_value(&vk_id);
            trigger.run().await;
        }
        Command::Show { vk_id } => {
            input.set_value(&vk_id);
            trigger.with_action(ProfileAction::Fetch).run().await;
        }
        Command::Interactive => {
            let trigger = Arc::new(trigger);
            let mut outcomes = trigger.attach()?;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut clicks = 0usize;

            while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
                input.set_value(&line);
                button.click();
                clicks += 1;
            }

            app_log!(debug, "Input closed, waiting for {} invocation(s)", clicks);
            for _ in 0..clicks {
                if outcomes.recv().await.is_none() {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &ClientConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    Ok(())
}
