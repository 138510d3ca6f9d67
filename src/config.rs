//! Run configuration: command line, environment, and an optional JSON file.
//!
//! Explicit command-line (or environment) values win over the file.

use crate::store::StoreKind;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Detect pleonastic "it" in tokenized sentences read from stdin.
#[derive(Parser, Debug, Default)]
#[command(name = "nada_it")]
#[command(about = "Predict whether each \"it\" on stdin is pleonastic")]
pub struct Args {
    /// Feature weights file (`<feature> <weight>` pairs)
    #[arg(env = "NADA_WEIGHTS")]
    pub weights: Option<PathBuf>,

    /// N-gram counts file
    #[arg(env = "NADA_NGRAMS")]
    pub ngrams: Option<PathBuf>,

    /// Format of the n-gram counts file
    #[arg(long, value_enum, env = "NADA_STORE")]
    pub store: Option<StoreKind>,

    /// JSON file providing any of `weights`, `ngrams`, `store`
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub weights: Option<PathBuf>,
    pub ngrams: Option<PathBuf>,
    pub store: Option<StoreKind>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub weights: PathBuf,
    pub ngrams: PathBuf,
    pub store: StoreKind,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    pub fn merge(args: Args, file: FileConfig) -> Result<Self> {
        Ok(Self {
            weights: args
                .weights
                .or(file.weights)
                .context("no feature weights file given")?,
            ngrams: args
                .ngrams
                .or(file.ngrams)
                .context("no n-gram counts file given")?,
            store: args.store.or(file.store).unwrap_or_default(),
        })
    }
}
