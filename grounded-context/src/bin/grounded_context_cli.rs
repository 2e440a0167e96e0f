use clap::Parser;
use grounded_context::text::{ChunkingStrategy, SectionChunker, SlidingWindowChunker};
use std::fs;
use std::io::{self, Read};

/// A CLI tool to chunk knowledge-base text files into JSON output.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<String>,

    /// Chunking strategy: "window" or "sections".
    #[arg(short, long, default_value = "window")]
    strategy: String,

    /// Window size in characters (window strategy only).
    #[arg(long, default_value_t = 700)]
    size: usize,

    /// Window overlap in characters (window strategy only).
    #[arg(long, default_value_t = 120)]
    overlap: usize,

    /// Minimum viable section count before falling back to line splitting
    /// (sections strategy only).
    #[arg(long, default_value_t = 6)]
    min_sections: usize,

    /// Minimum chunk length in characters (sections strategy only).
    #[arg(long, default_value_t = 20)]
    min_chunk_len: usize,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let file_content = if let Some(input_path) = args.input {
        fs::read_to_string(input_path)?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let strategy = match args.strategy.as_str() {
        "sections" => {
            ChunkingStrategy::Sections(SectionChunker::new(args.min_sections, args.min_chunk_len))
        }
        "window" => ChunkingStrategy::SlidingWindow(SlidingWindowChunker::new(
            args.size,
            args.overlap,
        )),
        other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unknown strategy: {other} (expected \"window\" or \"sections\")"),
            ));
        }
    };

    let chunks = strategy.chunks(&file_content);

    let json_output = serde_json::to_string_pretty(&chunks)?;
    println!("{}", json_output);

    Ok(())
}
