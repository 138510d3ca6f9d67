//! Read and verify a compressed n-gram counts file
//!
//! Usage: read_ngrams <ngrams.bin> ["the _ be N" ...] [--json]

use anyhow::{Context, Result};
use clap::Parser;
use nada_it::keys::{unpack_key, POSITION_FLAG};
use nada_it::{CountPair, NgramCompressedCntMap, NgramCounts};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "read_ngrams")]
#[command(about = "Inspect a compressed n-gram counts file")]
struct Args {
    /// Compressed n-gram counts file
    path: PathBuf,

    /// 4-field windows with one `_`, e.g. "the _ be N"
    queries: Vec<String>,

    /// Print one JSON object per query instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Lookup<'a> {
    query: &'a str,
    key: Option<String>,
    counts: Option<CountPair>,
    error: Option<String>,
}

fn main() -> Result<()> {
    nada_it::init_tracing();
    let args = Args::parse();

    let store = NgramCompressedCntMap::initialize(&args.path)
        .with_context(|| format!("load {}", args.path.display()))?;

    if !args.json {
        let flagged = store
            .keys()
            .iter()
            .filter(|(key, _)| unpack_key(*key).iter().any(|t| *t >= POSITION_FLAG))
            .count();
        println!("=== {} ===", args.path.display());
        println!("Tokens:  {}", store.tokens().len());
        println!("Values:  {}", store.values().len());
        println!("N-grams: {}", store.keys().len());
        println!("  with a position flag: {}", flagged);
    }

    for query in &args.queries {
        let lookup = match store.query_key(query.as_bytes()) {
            Ok(key) => Lookup {
                query,
                key: key.map(|k| format!("{:012X}", k)),
                counts: Some(store.find(query.as_bytes())),
                error: None,
            },
            Err(err) => Lookup {
                query,
                key: None,
                counts: None,
                error: Some(err.to_string()),
            },
        };

        if args.json {
            println!("{}", serde_json::to_string(&lookup)?);
            continue;
        }
        println!("\n=== Lookup: '{}' ===", query);
        match (&lookup.error, &lookup.key) {
            (Some(err), _) => println!("Malformed query: {}", err),
            (None, None) => println!("Context token not in vocabulary"),
            (None, Some(key)) => {
                let counts = lookup.counts.unwrap_or(CountPair::ZERO);
                println!("key:  0x{}", key);
                println!("it:   {}", counts.it);
                println!("they: {}", counts.they);
            }
        }
    }

    Ok(())
}
