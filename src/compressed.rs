//! Dictionary-compressed n-gram count store.
//!
//! File layout, all integers little-endian, sections back to back with no
//! framing:
//! ```text
//! dictionary   see `dict`
//! values       see `values`
//! keys         see `keys`, runs to end of file
//! ```
//!
//! Lookups take a 4-token window with one `_` slot. The three real tokens
//! become the key; which slot held the wildcard is folded into the key by
//! adding [`POSITION_FLAG`] to one rank, so each token triple has four
//! distinct keys.

use crate::codec::ByteReader;
use crate::dict::{TokenDictionary, UNKNOWN_RANK};
use crate::error::{LoadError, QueryError, Result};
use crate::keys::{pack_key, KeyTable, POSITION_FLAG};
use crate::store::NgramCounts;
use crate::values::{CountPair, ValueTable};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Marker standing in for the target pronoun inside a query window.
pub const WILDCARD: &[u8] = b"_";

/// Number of fields in a query window.
pub const WINDOW: usize = 4;

#[derive(Debug, Default, Clone)]
pub struct NgramCompressedCntMap {
    token2rank: TokenDictionary,
    rank2values: ValueTable,
    token_val_map: KeyTable,
}

impl NgramCompressedCntMap {
    /// Memory-maps `path` and decodes the whole store from it.
    pub fn initialize(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Err(LoadError::Truncated {
                section: "dictionary",
                offset: 0,
            });
        }
        let mmap = unsafe { Mmap::map(&file)? };
        let store = Self::from_bytes(&mmap)?;
        info!(
            path = %path.display(),
            tokens = store.token2rank.len(),
            values = store.rank2values.len(),
            ngrams = store.token_val_map.len(),
            "loaded compressed n-gram counts"
        );
        Ok(store)
    }

    /// Decodes dictionary, value table and key stream, in that order.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(data);
        let token2rank = TokenDictionary::load(&mut reader)?;
        let rank2values = ValueTable::load(&mut reader)?;
        let token_val_map = KeyTable::load(&mut reader, &rank2values)?;
        Ok(Self {
            token2rank,
            rank2values,
            token_val_map,
        })
    }

    /// Resolves `query` to its count pair, rejecting malformed windows.
    pub fn try_find(&self, query: &[u8]) -> std::result::Result<CountPair, QueryError> {
        let key = match self.query_key(query)? {
            Some(key) => key,
            None => return Ok(CountPair::ZERO),
        };
        Ok(self
            .token_val_map
            .get(key)
            .and_then(|rank| self.rank2values.get(rank))
            .unwrap_or(CountPair::ZERO))
    }

    /// Packed key for `query`, or `None` when a context token is outside the
    /// vocabulary. Fields are matched byte for byte.
    pub fn query_key(&self, query: &[u8]) -> std::result::Result<Option<u64>, QueryError> {
        let fields: Vec<&[u8]> = query.split(|&b| b == b' ').collect();
        if fields.len() != WINDOW {
            return Err(QueryError::FieldCount(fields.len()));
        }
        let wildcards = fields.iter().filter(|f| **f == WILDCARD).count();
        if wildcards != 1 {
            return Err(QueryError::WildcardCount(wildcards));
        }

        let mut fill_position = WINDOW - 1;
        let mut toks = [UNKNOWN_RANK; 3];
        let mut next = 0;
        for (slot, field) in fields.iter().enumerate() {
            if *field == WILDCARD {
                fill_position = slot;
            } else {
                toks[next] = self.token2rank.rank(field);
                next += 1;
            }
        }
        if toks.contains(&UNKNOWN_RANK) {
            return Ok(None);
        }
        // The last slot is the unflagged encoding.
        if fill_position < WINDOW - 1 {
            toks[fill_position] = toks[fill_position].wrapping_add(POSITION_FLAG);
        }
        Ok(Some(pack_key(toks)))
    }

    pub fn tokens(&self) -> &TokenDictionary {
        &self.token2rank
    }

    pub fn values(&self) -> &ValueTable {
        &self.rank2values
    }

    pub fn keys(&self) -> &KeyTable {
        &self.token_val_map
    }
}

impl NgramCounts for NgramCompressedCntMap {
    fn find(&self, query: &[u8]) -> CountPair {
        self.try_find(query).unwrap_or_else(|err| {
            debug!(query = %String::from_utf8_lossy(query), %err, "malformed n-gram query");
            CountPair::ZERO
        })
    }

    fn len(&self) -> usize {
        self.token_val_map.len()
    }
}
