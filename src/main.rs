use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use chunksmith::{
    collect_sources, Chunk, ChunkRecord, ChunkStrategy, Chunker, KeepSeparator, LengthUnit,
    OutputFormat, RecordWriter, Settings, StdinSource, TextChunker, TextSource,
};

// ── CLI ─────────────────────────────────────────────────────────────

/// Split text documents into overlapping, size-bounded chunks.
#[derive(Parser, Debug)]
#[command(name = "chunksmith", version, about)]
struct Cli {
    /// Files or directories to chunk. Reads stdin when none are given.
    inputs: Vec<PathBuf>,

    /// Path to a settings TOML file with a [chunking] table.
    #[arg(long, env = "CHUNKSMITH_CONFIG")]
    config: Option<PathBuf>,

    /// Chunking strategy: recursive or character.
    #[arg(long, env = "CHUNKSMITH_STRATEGY", value_parser = parse_name::<ChunkStrategy>)]
    strategy: Option<ChunkStrategy>,

    /// Target maximum chunk size, in length units.
    #[arg(long, env = "CHUNKSMITH_CHUNK_SIZE")]
    chunk_size: Option<usize>,

    /// Overlap carried between neighbouring chunks.
    #[arg(long, env = "CHUNKSMITH_CHUNK_OVERLAP")]
    chunk_overlap: Option<usize>,

    /// Separator tier, coarsest first. Repeat for several tiers.
    #[arg(long = "separator")]
    separators: Vec<String>,

    /// Treat separators as regular expressions.
    #[arg(long)]
    pattern: bool,

    /// Where matched separators go: none, start or end.
    #[arg(long, env = "CHUNKSMITH_KEEP_SEPARATOR", value_parser = parse_name::<KeepSeparator>)]
    keep_separator: Option<KeepSeparator>,

    /// Keep leading and trailing whitespace on chunks.
    #[arg(long)]
    no_strip: bool,

    /// Length unit: chars, bytes, graphemes or tokens.
    #[arg(long, env = "CHUNKSMITH_LENGTH_UNIT", value_parser = parse_name::<LengthUnit>)]
    length_unit: Option<LengthUnit>,

    /// Output format: jsonl or text.
    #[arg(
        long,
        env = "CHUNKSMITH_FORMAT",
        default_value = "jsonl",
        value_parser = parse_name::<OutputFormat>
    )]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    verbose: bool,
}

/// Parse a CLI value using the same names the settings file accepts
fn parse_name<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unrecognised value '{}'", value))
}

impl Cli {
    /// Load the settings file (if any) and apply flag overrides on top
    fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => {
                let settings = Settings::from_file(path)
                    .with_context(|| format!("loading settings from {}", path.display()))?;
                info!(path = %path.display(), "loaded settings");
                settings
            }
            None => Settings::default(),
        };

        let chunking = &mut settings.chunking;
        if let Some(strategy) = self.strategy {
            chunking.strategy = strategy;
        }
        if let Some(size) = self.chunk_size {
            chunking.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            chunking.chunk_overlap = overlap;
        }
        if !self.separators.is_empty() {
            chunking.separators = self.separators.clone();
        }
        if self.pattern {
            chunking.is_pattern = true;
        }
        if let Some(keep) = self.keep_separator {
            chunking.keep_separator = keep;
        }
        if self.no_strip {
            chunking.strip_whitespace = false;
        }
        if let Some(unit) = self.length_unit {
            chunking.length_unit = unit;
        }

        Ok(settings)
    }
}

// ── main ────────────────────────────────────────────────────────────

struct Document {
    name: String,
    chunks: Vec<Chunk>,
}

fn chunk_source(chunker: &Chunker, source: &dyn TextSource) -> Result<Document> {
    let text = source
        .read_text()
        .with_context(|| format!("reading {}", source.name()))?;
    let chunks = chunker.chunk_with_metadata(&text);
    debug!(source = source.name(), chunks = chunks.len(), "chunked document");
    Ok(Document {
        name: source.name().to_string(),
        chunks,
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let start_time = Instant::now();
    let settings = cli.settings()?;
    let chunker = settings
        .build_chunker()
        .context("invalid chunking settings")?;
    let chunk_size = chunker.config().chunk_size();

    info!(
        strategy = ?chunker.strategy(),
        chunk_size,
        chunk_overlap = chunker.config().chunk_overlap(),
        length_unit = ?settings.chunking.length_unit,
        "chunker ready"
    );

    let documents: Vec<Document> = if cli.inputs.is_empty() {
        vec![chunk_source(&chunker, &StdinSource)?]
    } else {
        let sources = collect_sources(&cli.inputs).context("collecting input files")?;
        if sources.is_empty() {
            warn!("no text files found in the given inputs");
        }
        sources
            .par_iter()
            .map(|source| chunk_source(&chunker, source))
            .collect::<Result<_>>()?
    };

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(BufWriter::new(stdout.lock()), cli.format);
    let document_count = documents.len();
    let mut oversized = 0;

    for document in documents {
        for chunk in document.chunks {
            if chunk.metadata.size > chunk_size {
                oversized += 1;
            }
            let record = ChunkRecord::new(&document.name, chunk);
            writer.write(&record).context("writing chunk record")?;
        }
    }

    let chunk_count = writer.written();
    writer.finish().context("flushing output")?;

    info!(
        documents = document_count,
        chunks = chunk_count,
        oversized,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "chunking complete"
    );

    Ok(())
}
