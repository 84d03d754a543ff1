mod client;
mod config;
mod model;
mod present;
mod session;
mod ui;

use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use client::DiagnosticClient;
use config::Config;
use model::Query;
use session::ChatSession;
use ui::Activity;

const DEFAULT_LOG_FILTER: &str = "medchat=info";

#[derive(Parser)]
#[command(author, version, about = "Chat client for the symptom diagnostic service")]
struct Cli {
    /// Diagnostic endpoint that receives the symptom text
    #[arg(long, env = "MEDCHAT_ENDPOINT", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// User agent sent with every request
    #[arg(long, env = "MEDCHAT_USER_AGENT")]
    user_agent: Option<String>,

    /// Submit this text once and exit instead of starting the chat
    text: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let activity = Activity::default();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::registry()
        .with(log_filter(rust_log.as_deref()))
        .with(tracing_subscriber::fmt::layer().with_writer(activity.clone()))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        &cli.endpoint,
        cli.user_agent.unwrap_or_else(config::default_user_agent),
    )?;
    let client = DiagnosticClient::new(&config)?;
    tracing::debug!(endpoint = %config.endpoint(), "client ready");

    if !cli.text.is_empty() {
        return ask_once(client, &activity, &cli.text.join(" ")).await;
    }

    chat(client, &activity).await
}

/// `RUST_LOG` when it is set and parses, `medchat=info` otherwise
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

async fn ask_once(client: DiagnosticClient, activity: &Activity, text: &str) -> Result<()> {
    let Some(query) = Query::new(text) else {
        bail!("nothing to submit: the text is blank");
    };

    let mut session = ChatSession::new(client);
    let waiting = activity.start();
    let turn = session.send(&query).await;
    drop(waiting);

    ui::display_entries(turn.entries);
    if !turn.succeeded {
        bail!("the diagnostic service could not be reached");
    }
    Ok(())
}

async fn chat(client: DiagnosticClient, activity: &Activity) -> Result<()> {
    ui::display_welcome(client.endpoint().as_str());

    let mut session = ChatSession::new(client);
    let mut stdin = io::stdin().lock();

    while let Some(input) = ui::read_input(&mut stdin)? {
        if ui::is_quit(&input) {
            break;
        }
        // blank lines are never sent
        let Some(query) = Query::new(input) else {
            continue;
        };

        let waiting = activity.start();
        let turn = session.send(&query).await;
        drop(waiting);

        ui::display_entries(turn.entries);
    }

    if !session.log().is_empty() {
        tracing::info!(entries = session.log().len(), "chat closed");
    }
    println!("\nGoodbye! Take care!");
    Ok(())
}
