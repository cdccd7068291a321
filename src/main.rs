//! Concierge CLI
//!
//! Command-line front end for the Enterprise AI Assistant service:
//! - Chat interactively with rolling history
//! - Ask a single question
//! - Show the metrics dashboard
//! - Generate a config file

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use concierge::chat::{ChatSession, Transcript, TurnOutcome};
use concierge::config::{generate_default_config, Config, LoggingConfig};
use concierge::dashboard::{self, DashboardLoader, DashboardSnapshot, TerminalSurface};
use concierge::terminal::TerminalRenderer;
use concierge::{AssistantClient, SubmitRejected};

#[derive(Parser)]
#[command(name = "concierge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with the Enterprise AI Assistant and view its metrics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Assistant service URL (overrides config)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat (/clear, /history, /tier, /severity, /quit)
    Chat {
        /// User tier sent with each query
        #[arg(long)]
        tier: Option<String>,
        /// Severity sent with each query
        #[arg(long)]
        severity: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// The question
        query: Vec<String>,
        #[arg(long)]
        tier: Option<String>,
        #[arg(long)]
        severity: Option<String>,
    },

    /// Show the metrics dashboard
    Dashboard {
        /// Print Chart.js configurations instead of terminal charts
        #[arg(long)]
        json: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, report) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => {
            let (config, report) = Config::load_default();
            (config, Some(report))
        }
    };
    if let Some(url) = cli.base_url {
        config.client.base_url = url;
    }

    init_logging(&config.logging);
    // The config search ran before the subscriber existed
    if let Some(report) = report {
        report.log();
    }

    match cli.command {
        Commands::Chat { tier, severity } => {
            let tier = tier.unwrap_or_else(|| config.chat.default_tier.clone());
            let severity = severity.unwrap_or_else(|| config.chat.default_severity.clone());
            run_chat(&config, tier, severity).await?;
        }

        Commands::Ask {
            query,
            tier,
            severity,
        } => {
            let tier = tier.unwrap_or_else(|| config.chat.default_tier.clone());
            let severity = severity.unwrap_or_else(|| config.chat.default_severity.clone());
            let client = AssistantClient::new(config.client.http())?;
            let mut session = ChatSession::with_messages(Transcript::new(), config.chat.messages());

            match session.submit(&client, &query.join(" "), &tier, &severity).await {
                Ok(TurnOutcome::Replied) => {
                    if let Some(turn) = session.history().last() {
                        println!("{}", turn.content);
                    }
                }
                Ok(_) => {
                    eprintln!("{}", config.chat.error_message);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            }
        }

        Commands::Dashboard { json } => {
            let client = AssistantClient::new(config.client.http())?;

            if json {
                match client.dashboard_data().await {
                    Ok(snapshot) => {
                        let configs: Vec<_> = dashboard::chart_specs(&snapshot)
                            .iter()
                            .map(|spec| spec.to_chartjs())
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&configs)?);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Error fetching dashboard data");
                        eprintln!("{}", config.dashboard.error_notice);
                        std::process::exit(1);
                    }
                }
            } else {
                let mut surface = TerminalSurface::new(std::io::stdout());
                let loader = DashboardLoader::with_notice(config.dashboard.error_notice.clone());
                match loader.load(&client, &mut surface).await {
                    Ok(snapshot) => print_summary(&snapshot),
                    Err(_) => std::process::exit(1),
                }
            }
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("concierge={}", logging.level).into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run_chat(config: &Config, mut tier: String, mut severity: String) -> anyhow::Result<()> {
    let client = AssistantClient::new(config.client.http())?;
    let renderer = TerminalRenderer::new(std::io::stdout(), std::io::stdout().is_terminal());
    let mut session = ChatSession::with_messages(renderer, config.chat.messages());

    tracing::info!(
        session_id = %session.id(),
        base_url = %config.client.base_url,
        "Chat session started"
    );
    session.clear();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if let Some(command) = input.strip_prefix('/') {
            let (name, arg) = command.split_once(' ').unwrap_or((command, ""));
            match name {
                "quit" | "exit" => break,
                "clear" => session.clear(),
                "history" => {
                    println!("{}\n", serde_json::to_string_pretty(session.history())?);
                }
                "tier" if !arg.trim().is_empty() => {
                    tier = arg.trim().to_string();
                    println!("tier = {}\n", tier);
                }
                "severity" if !arg.trim().is_empty() => {
                    severity = arg.trim().to_string();
                    println!("severity = {}\n", severity);
                }
                _ => println!("Commands: /clear, /history, /tier <name>, /severity <level>, /quit\n"),
            }
            continue;
        }

        match session.submit(&client, input, &tier, &severity).await {
            Ok(_) | Err(SubmitRejected::EmptyQuery) => {}
            Err(e) => tracing::warn!(error = %e, "Query not submitted"),
        }
    }

    tracing::info!(
        session_id = %session.id(),
        turns = session.history().len(),
        "Chat session ended"
    );
    Ok(())
}

fn print_summary(snapshot: &DashboardSnapshot) {
    println!("Total requests: {:.0}", snapshot.total_requests());
    if let Some(mean) = snapshot.mean_response_time() {
        println!("Mean response time: {:.2}s", mean);
    }
    if let Some(rate) = snapshot
        .time_series
        .success_rate
        .as_ref()
        .and_then(|rates| rates.last())
    {
        let label = snapshot
            .time_series
            .labels
            .last()
            .map(String::as_str)
            .unwrap_or("latest");
        println!("Success rate ({}): {:.1}%", label, rate);
    }
}
