// crates/fitcli/src/main.rs

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitclient::{spawn_warm_up, ClientConfig, HttpScoringService, DEFAULT_BASE_URL};
use fitcore::{
    Document, DocumentPrompt, ScoringService, SubmissionEvent, SubmissionInput, SubmitOutcome,
    DEFAULT_DOCUMENT_NAME,
};
use fitruntime::{ControllerConfig, SubmissionController};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fitstack")]
#[command(about = "Role clarity reports for your resume", long_about = None)]
struct Cli {
    /// Base URL of the scoring service
    #[arg(long, global = true, env = "FITSTACK_BACKEND_URL", default_value = DEFAULT_BASE_URL)]
    backend_url: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a resume and print the report
    Evaluate {
        /// Path to the resume PDF
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// GitHub profile link
        #[arg(long, default_value = "")]
        github: String,

        /// LinkedIn profile link
        #[arg(long, default_value = "")]
        linkedin: String,

        /// JSON file overriding the stage schedule and minimum duration
        #[arg(long)]
        timing: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the scoring service is reachable
    Ping,

    /// Show the effective stage schedule
    Schedule {
        #[arg(long)]
        timing: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Evaluate {
            file,
            github,
            linkedin,
            timing,
            json,
        } => {
            let input = SubmissionInput::new()
                .with_github(github)
                .with_linkedin(linkedin);
            let input = match file {
                Some(path) => input.with_document(read_document(&path)?),
                None => input,
            };
            evaluate(&cli.backend_url, input, timing, json).await?;
        }

        Commands::Ping => {
            ping(&cli.backend_url).await?;
        }

        Commands::Schedule { timing } => {
            let config = load_timing(timing.as_deref())?;
            print!("{}", render::render_schedule(&config));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_timing(path: Option<&Path>) -> Result<ControllerConfig> {
    match path {
        Some(path) => ControllerConfig::from_file(path)
            .with_context(|| format!("Failed to load timing from {}", path.display())),
        None => Ok(ControllerConfig::default()),
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_DOCUMENT_NAME);
    Ok(Document::new(file_name, bytes))
}

/// File picker for a terminal: the request is printed by the event listener,
/// the path itself is read by `ask_for_document`.
struct TerminalPrompt;

impl DocumentPrompt for TerminalPrompt {
    fn request_document(&self) {
        tracing::debug!("File selection requested");
    }
}

async fn ask_for_document() -> Result<Option<Document>> {
    eprint!("Path to resume PDF (empty to quit): ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;

    let path = line.trim();
    if path.is_empty() {
        return Ok(None);
    }
    read_document(Path::new(path)).map(Some)
}

async fn evaluate(
    backend_url: &str,
    mut input: SubmissionInput,
    timing: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let service = Arc::new(HttpScoringService::new(
        ClientConfig::default().with_base_url(backend_url),
    )?);
    spawn_warm_up(service.clone());

    let config = load_timing(timing.as_deref())?;
    let controller = Arc::new(
        SubmissionController::new(service, config).with_prompt(Arc::new(TerminalPrompt)),
    );

    // With --json, progress goes to stderr so stdout stays parseable
    let event_task = tokio::spawn(print_events(controller.subscribe(), json));

    let outcome = loop {
        let outcome = tokio::select! {
            outcome = controller.submit(input.clone()) => outcome?,
            _ = tokio::signal::ctrl_c() => {
                controller.teardown();
                break SubmitOutcome::Discarded;
            }
        };

        if outcome != SubmitOutcome::DocumentRequested {
            break outcome;
        }
        // Give the listener a moment to print the request before prompting
        tokio::time::sleep(Duration::from_millis(20)).await;
        match ask_for_document().await? {
            Some(document) => input.document = Some(document),
            None => break outcome,
        }
    };

    let result = controller.result();
    drop(controller);
    let _ = tokio::time::timeout(Duration::from_millis(200), event_task).await;

    match outcome {
        SubmitOutcome::Completed => {
            let result = result.context("Completed submission left no result")?;
            if json {
                println!("{}", serde_json::to_string_pretty(result.as_ref())?);
            } else {
                println!();
                print!("{}", render::render_report(&result));
            }
            Ok(())
        }
        SubmitOutcome::Failed(reason) => Err(anyhow::anyhow!("Evaluation failed: {}", reason)),
        SubmitOutcome::DocumentRequested | SubmitOutcome::Discarded => Ok(()),
    }
}

async fn print_events(mut events: broadcast::Receiver<SubmissionEvent>, to_stderr: bool) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = render::progress_line(&event) {
                    if to_stderr {
                        eprintln!("{}", line);
                    } else {
                        println!("{}", line);
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn ping(backend_url: &str) -> Result<()> {
    let service = HttpScoringService::new(ClientConfig::default().with_base_url(backend_url))?;
    println!("🔍 Pinging {}", service.base_url());

    match service.warm_up().await {
        Ok(()) => {
            println!("✅ Scoring service is reachable");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Scoring service is unreachable: {}", e)),
    }
}
