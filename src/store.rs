//! The query contract shared by both n-gram count stores, and the
//! configuration-selected store itself.

use crate::compressed::NgramCompressedCntMap;
use crate::error::Result;
use crate::plain::NgramCntMap;
use crate::values::CountPair;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only (it, they) counts for 4-token windows such as `b"the _ is N"`.
///
/// Queries are raw bytes: store tokens may end mid-character. Unknown
/// tokens, unseen windows and malformed queries all answer
/// [`CountPair::ZERO`].
pub trait NgramCounts {
    fn find(&self, query: &[u8]) -> CountPair;

    /// Number of stored n-grams.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Binary dictionary-compressed store.
    #[default]
    Compressed,
    /// Tab-separated text, optionally gzipped.
    Plain,
}

#[derive(Debug, Clone)]
pub enum NgramStore {
    Compressed(NgramCompressedCntMap),
    Plain(NgramCntMap),
}

impl NgramStore {
    pub fn open(kind: StoreKind, path: &Path) -> Result<Self> {
        Ok(match kind {
            StoreKind::Compressed => Self::Compressed(NgramCompressedCntMap::initialize(path)?),
            StoreKind::Plain => Self::Plain(NgramCntMap::initialize(path)?),
        })
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Self::Compressed(_) => StoreKind::Compressed,
            Self::Plain(_) => StoreKind::Plain,
        }
    }
}

impl NgramCounts for NgramStore {
    fn find(&self, query: &[u8]) -> CountPair {
        match self {
            Self::Compressed(store) => store.find(query),
            Self::Plain(store) => store.find(query),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Compressed(store) => store.len(),
            Self::Plain(store) => store.len(),
        }
    }
}
