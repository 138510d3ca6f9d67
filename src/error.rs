//! Error types for n-gram store loading and querying.

use std::io;
use thiserror::Error;

/// Failure while loading an n-gram count store. Any of these leaves no
/// usable store behind.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{section} section truncated at byte {offset}")]
    Truncated { section: &'static str, offset: usize },

    #[error("dictionary token at byte {offset} is {len} bytes, limit is {max}")]
    TokenTooLong { offset: usize, len: usize, max: usize },

    #[error("value record declares rank {rank} but the table holds {count} entries")]
    ValueRankOutOfRange { rank: u16, count: usize },

    #[error("key stream must open with a NEWFIRST record, found lead {lead}")]
    MissingFirstRecord { lead: u16 },

    #[error("key record {record} references value rank {rank}, table holds {count} entries")]
    DanglingValueRank { record: usize, rank: u16, count: usize },

    #[error("key record {record} references value rank {rank}, which no value record assigned")]
    UnassignedValueRank { record: usize, rank: u16 },
}

/// A lookup string that does not describe a 4-token window with one
/// wildcard slot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("expected 4 space-separated fields, found {0}")]
    FieldCount(usize),

    #[error("expected exactly one '_' field, found {0}")]
    WildcardCount(usize),
}

pub type Result<T> = std::result::Result<T, LoadError>;
