use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use documind::chat::run_chat;
use documind::gemini::GeminiClient;
use documind::indexer::ingest_file;
use documind::progress::ProgressLog;
use documind::rag::embeddings::GeminiEmbedder;
use documind::rag::generation::GeminiGenerator;
use documind::rag::vector_store::SupabaseStore;
use documind::rag::RagEngine;
use documind::Settings;

#[derive(Parser, Debug)]
#[command(name = "documind")]
#[command(about = "Document-grounded Q&A with hallucination evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest a document into the vector store
    Upload {
        /// Path to a PDF or text file
        file: PathBuf,
    },
    /// Interactive Q&A against the knowledge base
    Chat,
}

struct Services {
    embedder: Arc<GeminiEmbedder>,
    vector_store: Arc<SupabaseStore>,
    generator: Arc<GeminiGenerator>,
}

fn connect(settings: &Settings) -> Result<Services> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    let http = builder.build().context("Failed to build HTTP client")?;

    let gemini = GeminiClient::new(&settings.gemini, http.clone());
    Ok(Services {
        embedder: Arc::new(GeminiEmbedder::new(
            gemini.clone(),
            settings.gemini.embedding_model.as_str(),
        )),
        vector_store: Arc::new(SupabaseStore::new(&settings.supabase, http)),
        generator: Arc::new(GeminiGenerator::new(
            gemini,
            settings.gemini.generation_model.as_str(),
        )),
    })
}

async fn handle_upload<M>(
    settings: &Settings,
    services: &Services,
    log: &ProgressLog<M>,
    file: &Path,
) -> Result<()> {
    tracing::info!("=== Upload Mode ===");

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(format!("Ingesting {}", file.display()));
    log.attach(&pb);
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = ingest_file(
        file,
        services.embedder.as_ref(),
        services.vector_store.as_ref(),
        settings.chunking,
        settings.embed_batch_size,
    )
    .await;
    pb.finish_and_clear();
    log.detach();

    let count = result.with_context(|| format!("Ingestion of {} failed", file.display()))?;
    tracing::info!("Done - {} chunks ingested from '{}'.", count, file.display());
    Ok(())
}

async fn handle_chat(settings: &Settings, services: Services) -> Result<()> {
    let engine = RagEngine::new(
        services.embedder,
        services.vector_store,
        services.generator,
        settings.retrieval,
    );

    run_chat(&engine, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;
    Ok(())
}

async fn run<M>(command: Command, log: &ProgressLog<M>) -> Result<()> {
    let settings = Settings::load().context("Invalid configuration")?;
    let services = connect(&settings)?;

    match command {
        Command::Upload { file } => handle_upload(&settings, &services, log, &file).await,
        Command::Chat => handle_chat(&settings, services).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let log = ProgressLog::new(std::io::stderr);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(log.clone())
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(command, &log).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
