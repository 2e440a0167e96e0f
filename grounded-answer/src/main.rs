use clap::{Parser, Subcommand};
use grounded_answer::{
    AnswerMode, OllamaGenerator, PipelineConfig, SupportPipeline,
};
use grounded_embed::FastEmbedProvider;
use grounded_retriever::retrieval::{IndexStore, Retriever};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ask questions against a Grounded knowledge-base index.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file; defaults apply if it does not exist
    #[arg(short, long, default_value = "grounded.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one question and print the result as JSON
    Ask {
        /// The customer question
        question: String,
    },
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
    let config = if args.config.exists() {
        PipelineConfig::load(&args.config)?
    } else {
        PipelineConfig::default()
    };

    // Index load is fail-fast: no questions are served without it.
    let provider = Arc::new(FastEmbedProvider::create(config.embedding.clone()).await?);
    let store = IndexStore::new(&config.index_dir);
    let retriever = Retriever::from_store(&store, provider)?;

    let generator: Option<Arc<dyn grounded_answer::GenerationProvider>> = match config.mode {
        AnswerMode::Generative => Some(Arc::new(OllamaGenerator::new(
            config.generator.base_url.clone(),
            config.generator.model.clone(),
            config.generator.temperature,
        )?)),
        AnswerMode::Templated => None,
    };

    let pipeline = SupportPipeline::new(retriever, &config, generator)?;

    match args.command {
        Commands::Ask { question } => {
            let result = pipeline.answer(&question).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
