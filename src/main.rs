//! LoreClaw CLI: ingest knowledge, pull news, and ask questions.
//!
//! The store is in-memory and per-process: `ask` can preload documents with
//! `--ingest` so retrieval has something local to work with, and falls back
//! to live web search otherwise.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use loreclaw_adapters::{
    DuckDuckGoSearch, OpenAiEmbeddings, OpenAiGenerator, PlainTextExtractor, SearchNewsFeed,
};
use loreclaw_core::config::LoreClawConfig;
use loreclaw_index::KnowledgeStore;
use loreclaw_ingest::Ingestor;
use loreclaw_retrieve::{Assistant, HybridRetriever};

#[derive(Parser)]
#[command(name = "loreclaw", version, about = "Hybrid knowledge retrieval for QA assistants")]
struct Cli {
    /// Path to a config file (default: ~/.loreclaw/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve context for a question and synthesize an answer
    Ask {
        question: String,
        /// Documents to ingest before answering
        #[arg(long)]
        ingest: Vec<PathBuf>,
        /// Topic to pull news for before answering
        #[arg(long)]
        news: Option<String>,
        /// Print the assembled context instead of calling the model
        #[arg(long)]
        dry_run: bool,
    },
    /// Ingest documents and report how many passages were inserted
    Ingest { paths: Vec<PathBuf> },
    /// Pull news for a topic and report how many passages were inserted
    News { topic: String },
}

struct Engine {
    ingestor: Ingestor,
    retriever: HybridRetriever,
    config: LoreClawConfig,
}

fn build_engine(config: LoreClawConfig) -> anyhow::Result<Engine> {
    let store = Arc::new(KnowledgeStore::new());
    let embedder = Arc::new(OpenAiEmbeddings::from_config(&config));
    let web = Arc::new(DuckDuckGoSearch::new(&config.search).context("web search adapter")?);

    let ingestor = Ingestor::new(
        Arc::clone(&store),
        embedder.clone(),
        &config.chunking,
        &config.retrieval,
    )
    .with_news_feed(Arc::new(SearchNewsFeed::new(
        web.clone(),
        config.retrieval.k_web,
    )))
    .with_extractor(Arc::new(PlainTextExtractor::new()));

    let retriever = HybridRetriever::new(store, embedder, web, config.retrieval.clone());

    Ok(Engine { ingestor, retriever, config })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loreclaw=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => LoreClawConfig::load_from(path)?,
        None => LoreClawConfig::load()?,
    };
    let engine = build_engine(config)?;

    match cli.command {
        Command::Ask { question, ingest, news, dry_run } => {
            if !ingest.is_empty() {
                let n = engine.ingestor.add_documents(&ingest).await;
                tracing::info!(passages = n, "documents ingested");
            }
            if let Some(topic) = news {
                let n = engine.ingestor.update_with_news(&topic).await;
                tracing::info!(passages = n, topic, "news ingested");
            }

            if dry_run {
                let items = engine.retriever.get_relevant(&question).await;
                if items.is_empty() {
                    println!("(no context retrieved)");
                }
                for (i, item) in items.iter().enumerate() {
                    println!(
                        "[{}] score={:.3} {} {}\n{}\n",
                        i + 1,
                        item.score,
                        item.provenance,
                        item.source_uri,
                        item.text.trim()
                    );
                }
            } else {
                let model = Arc::new(OpenAiGenerator::from_config(&engine.config));
                let assistant = Assistant::new(engine.retriever, model);
                let answer = assistant.answer(&question).await?;
                println!("{answer}");
            }
        }
        Command::Ingest { paths } => {
            let n = engine.ingestor.add_documents(&paths).await;
            let store = engine.ingestor.store();
            println!("inserted {n} passages ({} total in store)", store.len());
            for (kind, count) in store.source_counts() {
                println!("  {kind}: {count}");
            }
        }
        Command::News { topic } => {
            let n = engine.ingestor.update_with_news(&topic).await;
            println!("inserted {n} passages for topic '{topic}'");
        }
    }

    Ok(())
}
