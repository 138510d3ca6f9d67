//! Token dictionary: short pattern tokens to dense 16-bit ranks.
//!
//! Section layout:
//! ```text
//! count: u16
//! For each entry: len: u8, bytes: [u8; len], rank: u16
//! ```

use crate::codec::ByteReader;
use crate::error::{LoadError, Result};
use std::collections::HashMap;

const SECTION: &str = "dictionary";

/// Longest token the store vocabulary holds, in bytes.
pub const MAX_TOKEN_LEN: usize = 4;

/// Rank returned for tokens outside the vocabulary. Never assigned to a
/// real token.
pub const UNKNOWN_RANK: u16 = 0;

#[derive(Debug, Default, Clone)]
pub struct TokenDictionary {
    token2rank: HashMap<Box<[u8]>, u16>,
}

impl TokenDictionary {
    pub fn load(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = reader.read_u16(SECTION)?;
        let mut token2rank = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let offset = reader.position();
            let len = reader.read_u8(SECTION)? as usize;
            if len > MAX_TOKEN_LEN {
                return Err(LoadError::TokenTooLong {
                    offset,
                    len,
                    max: MAX_TOKEN_LEN,
                });
            }
            let token = reader.read_bytes(len, SECTION)?;
            let rank = reader.read_u16(SECTION)?;
            // A repeated token keeps its last rank.
            token2rank.insert(Box::from(token), rank);
        }
        Ok(Self { token2rank })
    }

    /// Rank of `token`, or [`UNKNOWN_RANK`] when it is not in the vocabulary.
    pub fn rank(&self, token: &[u8]) -> u16 {
        self.token2rank.get(token).copied().unwrap_or(UNKNOWN_RANK)
    }

    pub fn len(&self) -> usize {
        self.token2rank.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token2rank.is_empty()
    }
}
