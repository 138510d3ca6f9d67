//! Reads tokenized sentences from stdin and appends `\t<pos>:<prob>` for
//! every "it". Lines are passed through as bytes.
//!
//! Usage: nada_it <weights> <ngrams> [--store compressed|plain] [--config nada.json]

use anyhow::{Context, Result};
use clap::Parser;
use nada_it::config::{Args, Config};
use nada_it::{Detector, FeatureWeights, NgramCounts, NgramStore};
use std::io::{self, BufWriter};
use std::time::Instant;
use tracing::info;

fn main() -> Result<()> {
    nada_it::init_tracing();
    let config = Config::from_args(Args::parse())?;

    let weights = FeatureWeights::load(&config.weights)?;
    let store = NgramStore::open(config.store, &config.ngrams)
        .with_context(|| format!("load n-gram counts {}", config.ngrams.display()))?;
    info!(kind = ?store.kind(), ngrams = store.len(), "n-gram store ready");
    let detector = Detector::new(weights, store);

    let start = Instant::now();
    let out = BufWriter::new(io::stdout().lock());
    let sentences = detector
        .run(io::stdin().lock(), out)
        .context("annotate stdin")?;

    info!(
        sentences,
        seconds = start.elapsed().as_secs_f64(),
        "finished predictions"
    );
    Ok(())
}
