use anyhow::Result;
use clap::{Parser, Subcommand};
use temubalik_core::{normalize_stages, SearchEngine};
use temubalik_loader::load_directory;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "temubalik")]
#[command(about = "Local Indonesian document retrieval with tf-idf and generalized Jaccard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a folder of text documents in memory and rank them against a query
    Search {
        /// Folder containing .txt/.md documents
        #[arg(long)]
        docs: String,
        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        query: String,
    },
    /// Show the output of every normalization stage for a text
    Preprocess { text: String },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { docs, top_k, query } => run_search(&docs, &query, top_k),
        Commands::Preprocess { text } => {
            run_preprocess(&text);
            Ok(())
        }
    }
}

fn run_search(docs: &str, query: &str, top_k: usize) -> Result<()> {
    let engine = SearchEngine::new();
    let documents = load_directory(docs)?;
    let total = engine.build_index(documents)?;
    tracing::info!(total, vocabulary = engine.vocabulary_size(), "index built");

    let outcome = engine.search(query, top_k)?;
    println!("query: {:?} -> {:?}", query, outcome.query.text);
    println!("ranking {} of {} documents:", outcome.hits.len(), outcome.total);
    for hit in &outcome.hits {
        println!("{:>4}.  {:<40}  {:.4}", hit.rank, hit.document_id, hit.score);
    }
    Ok(())
}

fn run_preprocess(text: &str) {
    let stages = normalize_stages(text);
    println!("original:          {}", stages.original);
    println!("case folding:      {}", stages.case_folding);
    println!("tokenizing:        {}", stages.tokenizing);
    println!("filtering:         {}", stages.filtering);
    println!("stopword removal:  {}", stages.stopword_removal);
    println!("stemming:          {}", stages.stemming);
}
