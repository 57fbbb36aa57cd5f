//! # docchat CLI
//!
//! Shell around the retrieval pipeline: loads PDFs from a documents
//! directory, builds the in-memory index, and answers questions either
//! one-shot (`ask`) or in an interactive loop (`chat`).
//!
//! ```bash
//! export MODEL_NAME=mistral-7b-instruct
//! export INFERENCE_SERVER_URL=http://vllm.local:8000
//!
//! docchat chat --docs ./docs
//! docchat ask "What is the refund policy?" --docs ./docs
//! ```
//!
//! `MODEL_NAME` and `INFERENCE_SERVER_URL` are required; see
//! [`config::Config`] for the optional knobs.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use docchat::config::Config;
use docchat::embedding::Embedder;
use docchat::error::PipelineError;
use docchat::extract::read_pdf_dir;
use docchat::llm::OpenAiCompatClient;
use docchat::session::{ChatSession, SessionOptions};

/// Chat with your PDF documentation from the terminal.
#[derive(Parser)]
#[command(
    name = "docchat",
    about = "Retrieval-augmented question answering over local PDF documents",
    version
)]
struct Cli {
    /// Directory scanned for *.pdf files. Overrides DOCS_DIR.
    #[arg(long, global = true)]
    docs: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the documents directory, then answer questions interactively.
    Chat,

    /// Index the documents directory and answer a single question.
    Ask {
        /// The question to answer.
        question: String,
    },
}

const NO_INDEX_WARNING: &str = "No documents indexed yet. Add PDFs to the documents directory first.";

#[cfg(feature = "local-embeddings")]
fn make_embedder(model: &str) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(docchat::embedding::LocalEmbedder::new(model)?))
}

#[cfg(not(feature = "local-embeddings"))]
fn make_embedder(_model: &str) -> Result<Arc<dyn Embedder>> {
    anyhow::bail!("docchat was built without the local-embeddings feature")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docchat=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let docs_dir = cli.docs.unwrap_or_else(|| config.docs_dir.clone());

    let embedder = make_embedder(&config.embedding.model)?;
    let model = Arc::new(OpenAiCompatClient::new(config.model.clone())?);
    let mut session = ChatSession::new(embedder, model, SessionOptions::from_config(&config));

    let documents = read_pdf_dir(&docs_dir)
        .with_context(|| format!("Failed to load documents from {}", docs_dir.display()))?;
    if documents.is_empty() {
        // No index is built; questions will get the not-ready warning.
        eprintln!("Warning: no PDFs found in {}", docs_dir.display());
    } else {
        let chunks = session.rebuild_index(&documents).await?;
        eprintln!(
            "Indexed {} chunks from {} documents in {}",
            chunks,
            documents.len(),
            docs_dir.display()
        );
    }

    match cli.command {
        Commands::Ask { question } => {
            answer_one(&mut session, &question).await;
        }
        Commands::Chat => {
            chat_loop(&mut session).await?;
        }
    }

    Ok(())
}

async fn answer_one(session: &mut ChatSession, question: &str) {
    match session.ask(question).await {
        Ok(answer) => println!("{}", answer),
        Err(PipelineError::IndexNotReady) => eprintln!("{}", NO_INDEX_WARNING),
        Err(e) => {
            tracing::error!(error = %e, "turn failed");
            eprintln!("Sorry, I could not answer that. Please try again.");
        }
    }
}

async fn chat_loop(session: &mut ChatSession) -> Result<()> {
    println!("Ask a question about your documents (Ctrl-D to exit).");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        answer_one(session, question).await;
        println!();
    }

    Ok(())
}
