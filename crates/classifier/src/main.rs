//! Ticket intent classification CLI
//!
//! ```text
//! ticket-intent [--debug] <subject> <description>
//! ticket-intent [--debug] < tickets.jsonl
//! ```
//!
//! Without positional arguments, reads one `{"subject", "description"}`
//! object per stdin line and prints one JSON result per line.

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::io::{BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use ticket_intent_classifier::Orchestrator;
use ticket_intent_config::{load_settings, Settings};

/// Classify the intent of support tickets
#[derive(Parser, Debug)]
#[command(name = "ticket-intent")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Args {
    /// Include the per-intent score decomposition
    #[arg(short, long)]
    debug: bool,

    /// Configuration environment (`config/{env}.yaml`)
    #[arg(long, env = "TICKET_INTENT_ENV")]
    env: Option<String>,

    /// Ticket subject; omit both positionals to read JSON lines from stdin
    #[arg(requires = "description")]
    subject: Option<String>,

    /// Ticket description
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TicketLine {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    description: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = args.env.clone();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&settings);
    tracing::debug!(
        environment = ?settings.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let orchestrator =
        Orchestrator::from_settings(&settings).context("failed to build classifier")?;

    match (args.subject, args.description) {
        (Some(subject), Some(description)) => {
            let response = orchestrator
                .classify_ticket(&subject, &description, args.debug)
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        _ => classify_stdin(&orchestrator, args.debug).await?,
    }

    Ok(())
}

async fn classify_stdin(orchestrator: &Orchestrator, debug: bool) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let ticket: TicketLine = serde_json::from_str(&line)
            .with_context(|| format!("invalid ticket on line {}", index + 1))?;

        let response = orchestrator
            .classify_ticket(&ticket.subject, &ticket.description, debug)
            .await;
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
    }
    Ok(())
}

/// Logs go to stderr; stdout carries results only
fn init_tracing(settings: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &settings.observability.log_level;
        format!("ticket_intent={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if settings.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
