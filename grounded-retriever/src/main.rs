use clap::{Parser, Subcommand};
use grounded_context::{ChunkingStrategy, SectionChunker, SlidingWindowChunker};
use grounded_embed::{EmbedConfig, FastEmbedProvider};
use grounded_retriever::retrieval::{IndexBuilder, IndexStore};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// A CLI tool to build and inspect Grounded knowledge-base indexes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the index snapshot (vectors.bin + chunks.json)
    #[arg(short, long, default_value = ".grounded")]
    index_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the index from a knowledge-base text file
    Index {
        /// Path to the UTF-8 knowledge document
        kb_file: PathBuf,
        /// Chunking strategy: "window" or "sections"
        #[arg(long, default_value = "window")]
        strategy: String,
        /// Window size in characters (window strategy)
        #[arg(long, default_value_t = 700)]
        size: usize,
        /// Window overlap in characters (window strategy)
        #[arg(long, default_value_t = 120)]
        overlap: usize,
        /// Minimum viable section count (sections strategy)
        #[arg(long, default_value_t = 6)]
        min_sections: usize,
        /// Minimum chunk length in characters (sections strategy)
        #[arg(long, default_value_t = 20)]
        min_chunk_len: usize,
        /// Embedding model name
        #[arg(long, default_value = "all-MiniLM-L6-v2")]
        model: String,
    },
    /// Show statistics about a persisted index snapshot
    Stats,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let store = IndexStore::new(&args.index_dir);

    match args.command {
        Commands::Index {
            kb_file,
            strategy,
            size,
            overlap,
            min_sections,
            min_chunk_len,
            model,
        } => {
            let raw_text = std::fs::read_to_string(&kb_file)?;

            let strategy = match strategy.as_str() {
                "sections" => {
                    ChunkingStrategy::Sections(SectionChunker::new(min_sections, min_chunk_len))
                }
                "window" => {
                    ChunkingStrategy::SlidingWindow(SlidingWindowChunker::new(size, overlap))
                }
                other => anyhow::bail!("Unknown strategy: {other}"),
            };

            let provider = FastEmbedProvider::create(
                EmbedConfig::new(model).with_show_download_progress(true),
            )
            .await?;

            let builder = IndexBuilder::new(strategy);
            let (index, chunks) = builder
                .build_and_save(&provider, &raw_text, &store)
                .await?;

            println!(
                "Indexed {} chunks ({}d vectors) from {} into {}",
                chunks.len(),
                index.dimension(),
                kb_file.display(),
                args.index_dir.display()
            );
        }
        Commands::Stats => {
            let (index, chunks) = store.load()?;
            println!("Index snapshot: {}", args.index_dir.display());
            println!("  vectors:   {}", index.len());
            println!("  dimension: {}", index.dimension());
            println!("  chunks:    {}", chunks.len());
            if let Some(first) = chunks.first() {
                let preview: String = first.text.chars().take(80).collect();
                println!("  first chunk: {preview}");
            }
        }
    }

    Ok(())
}
