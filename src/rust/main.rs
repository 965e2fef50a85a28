use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialogvec::{AggregationStrategy, DocumentVectorizer, EmbeddingTable, VectorizerConfig};
use log::{info, warn};

/// Turn `speaker<TAB>line` records into `label<TAB>feature vector` rows
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Plain-text embedding file (GloVe or word2vec text format)
    #[arg(short, long)]
    embeddings: PathBuf,

    /// Dialogue records, one `speaker<TAB>line` per line. Reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Aggregation strategy: max, min or mean. Overrides the config file
    #[arg(short, long)]
    strategy: Option<String>,

    /// JSON config with strategy, tokenizer and label settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lowercase tokens before lookup (emoticons keep their case)
    #[arg(long)]
    lowercase: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start_time = Instant::now();

    let mut config = match &args.config {
        Some(path) => VectorizerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => VectorizerConfig::default(),
    };
    if let Some(strategy) = &args.strategy {
        config.strategy = strategy.parse::<AggregationStrategy>()?;
    }
    if args.lowercase {
        config.tokenizer.preserve_case = false;
    }

    let table = EmbeddingTable::from_file(&args.embeddings)
        .with_context(|| format!("Failed to load embeddings from {}", args.embeddings.display()))?;
    let vectorizer = DocumentVectorizer::builder()
        .with_config(&config)
        .with_lookup(table)
        .build()?;
    let labels = config.labels.build()?;
    info!("Setup took {:.2?}", start_time.elapsed());

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let (speakers, lines) = read_records(reader)?;
    let features = vectorizer.vectorize(&lines)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut unknown_only = 0;
    for (speaker, row) in speakers.iter().zip(features.rows()) {
        if row.iter().all(|&x| x == 0.0) {
            unknown_only += 1;
        }
        let values: Vec<String> = row.iter().map(|x| x.to_string()).collect();
        writeln!(out, "{}\t{}", labels.normalize(speaker), values.join(" "))?;
    }
    out.flush()?;

    info!("=== Done ===");
    info!("Records: {}", speakers.len());
    info!("All-zero rows: {}", unknown_only);
    info!("Total time: {:.2?}", start_time.elapsed());
    Ok(())
}

/// Speaker fields are kept verbatim, so label matching stays exact.
fn read_records(reader: impl BufRead) -> Result<(Vec<String>, Vec<String>)> {
    let mut speakers = Vec::new();
    let mut lines = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once('\t') {
            Some((speaker, text)) => {
                speakers.push(speaker.to_string());
                lines.push(text.to_string());
            }
            None => {
                warn!("Skipping line {}: expected `speaker<TAB>line`", idx + 1);
            }
        }
    }

    if speakers.is_empty() {
        bail!("No `speaker<TAB>line` records found in input");
    }
    Ok((speakers, lines))
}
