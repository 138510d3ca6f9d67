//! Value table: deduplicated (it, they) count pairs indexed by value rank.
//!
//! Section layout:
//! ```text
//! count: u16
//! For each entry: it: u32, they: u32, rank: u16
//! ```
//! Records may arrive in any rank order; each lands at its declared slot.

use crate::codec::ByteReader;
use crate::error::{LoadError, Result};
use serde::Serialize;

const SECTION: &str = "values";

/// How often a context co-occurred with "it" versus other fillers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CountPair {
    pub it: u32,
    pub they: u32,
}

impl CountPair {
    pub const ZERO: CountPair = CountPair { it: 0, they: 0 };

    pub fn new(it: u32, they: u32) -> Self {
        Self { it, they }
    }
}

impl From<CountPair> for (u32, u32) {
    fn from(pair: CountPair) -> Self {
        (pair.it, pair.they)
    }
}

#[derive(Debug, Default, Clone)]
pub struct ValueTable {
    slots: Vec<Option<CountPair>>,
}

impl ValueTable {
    pub fn load(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = reader.read_u16(SECTION)? as usize;
        let mut slots = vec![None; count];
        for _ in 0..count {
            let it = reader.read_u32(SECTION)?;
            let they = reader.read_u32(SECTION)?;
            let rank = reader.read_u16(SECTION)?;
            let slot = slots
                .get_mut(rank as usize)
                .ok_or(LoadError::ValueRankOutOfRange { rank, count })?;
            *slot = Some(CountPair::new(it, they));
        }
        Ok(Self { slots })
    }

    /// Checks that a key record may point at `rank`.
    pub(crate) fn validate_rank(&self, rank: u16, record: usize) -> Result<()> {
        match self.slots.get(rank as usize) {
            Some(Some(_)) => Ok(()),
            Some(None) => Err(LoadError::UnassignedValueRank { record, rank }),
            None => Err(LoadError::DanglingValueRank {
                record,
                rank,
                count: self.slots.len(),
            }),
        }
    }

    pub fn get(&self, rank: u16) -> Option<CountPair> {
        self.slots.get(rank as usize).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
