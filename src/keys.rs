//! Key stream: delta-encoded (token1, token2, token3) -> value rank records.
//!
//! Records are written in an order where neighbours share leading tokens,
//! so each record carries only what changed since the previous one:
//! ```text
//! lead: u16
//!   lead == NEW_FIRST  -> token1: u16, token2: u16, token3: u16
//!   lead == NEW_SECOND -> token2: u16, token3: u16   (token1 carried)
//!   otherwise          -> token3 = lead              (token1, token2 carried)
//! value_rank: u16
//! ```
//! The stream runs to the end of the file; ending between records is the
//! normal termination.

use crate::codec::ByteReader;
use crate::error::{LoadError, Result};
use crate::values::ValueTable;
use std::collections::HashMap;

const SECTION: &str = "keys";

/// Lead marking a record that replaces all three tokens.
pub const NEW_FIRST: u16 = 65535;
/// Lead marking a record that keeps token1 and replaces token2 and token3.
pub const NEW_SECOND: u16 = 65534;

/// Added to one token rank of a query to mark where the wildcard sat.
pub const POSITION_FLAG: u16 = 32768;

/// Packs three ranks into the low 48 bits: `token1` highest, `token3` lowest.
pub fn pack_key(tokens: [u16; 3]) -> u64 {
    (tokens[2] as u64) | ((tokens[1] as u64) << 16) | ((tokens[0] as u64) << 32)
}

pub fn unpack_key(key: u64) -> [u16; 3] {
    [
        ((key >> 32) & 0xFFFF) as u16,
        ((key >> 16) & 0xFFFF) as u16,
        (key & 0xFFFF) as u16,
    ]
}

/// One fully resolved key record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    pub tokens: [u16; 3],
    pub value_rank: u16,
}

/// Expands the delta-encoded stream into full records.
pub struct KeyStreamDecoder<'r, 'a> {
    reader: &'r mut ByteReader<'a>,
    previous: Option<[u16; 3]>,
    failed: bool,
}

impl<'r, 'a> KeyStreamDecoder<'r, 'a> {
    pub fn new(reader: &'r mut ByteReader<'a>) -> Self {
        Self {
            reader,
            previous: None,
            failed: false,
        }
    }

    fn next_record(&mut self) -> Result<KeyRecord> {
        let lead = self.reader.read_u16(SECTION)?;
        let tokens = match (lead, self.previous) {
            (NEW_FIRST, _) => [
                self.reader.read_u16(SECTION)?,
                self.reader.read_u16(SECTION)?,
                self.reader.read_u16(SECTION)?,
            ],
            (_, None) => return Err(LoadError::MissingFirstRecord { lead }),
            (NEW_SECOND, Some([token1, _, _])) => [
                token1,
                self.reader.read_u16(SECTION)?,
                self.reader.read_u16(SECTION)?,
            ],
            (token3, Some([token1, token2, _])) => [token1, token2, token3],
        };
        let value_rank = self.reader.read_u16(SECTION)?;
        self.previous = Some(tokens);
        Ok(KeyRecord { tokens, value_rank })
    }
}

impl Iterator for KeyStreamDecoder<'_, '_> {
    type Item = Result<KeyRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_empty() {
            return None;
        }
        let record = self.next_record();
        self.failed = record.is_err();
        Some(record)
    }
}

/// Packed key -> value rank, the bulk of a loaded store.
#[derive(Debug, Default, Clone)]
pub struct KeyTable {
    entries: HashMap<u64, u16>,
}

impl KeyTable {
    /// Decodes the rest of `reader` as a key stream. Every value rank must
    /// name a filled slot of `values`.
    pub fn load(reader: &mut ByteReader<'_>, values: &ValueTable) -> Result<Self> {
        // Six bytes is the shortest record.
        let mut entries = HashMap::with_capacity(reader.remaining() / 6);
        for (index, record) in KeyStreamDecoder::new(reader).enumerate() {
            let KeyRecord { tokens, value_rank } = record?;
            values.validate_rank(value_rank, index)?;
            entries.insert(pack_key(tokens), value_rank);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: u64) -> Option<u16> {
        self.entries.get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u16)> + '_ {
        self.entries.iter().map(|(&k, &v)| (k, v))
    }
}

/// Writes records with the shortest form the decoder accepts.
#[cfg(test)]
pub(crate) fn encode_key_stream(records: &[KeyRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut previous: Option<[u16; 3]> = None;
    for record in records {
        let [t1, t2, t3] = record.tokens;
        match previous {
            Some([p1, p2, _]) if p1 == t1 && p2 == t2 && t3 < NEW_SECOND => {
                out.extend_from_slice(&t3.to_le_bytes());
            }
            Some([p1, _, _]) if p1 == t1 => {
                for v in [NEW_SECOND, t2, t3] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
            _ => {
                for v in [NEW_FIRST, t1, t2, t3] {
                    out.extend_from_slice(&v.to_le_bytes());
                }
            }
        }
        out.extend_from_slice(&record.value_rank.to_le_bytes());
        previous = Some(record.tokens);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn decode(data: &[u8]) -> Result<Vec<KeyRecord>> {
        let mut reader = ByteReader::new(data);
        KeyStreamDecoder::new(&mut reader).collect()
    }

    fn rec(tokens: [u16; 3], value_rank: u16) -> KeyRecord {
        KeyRecord { tokens, value_rank }
    }

    fn value_table(count: u16) -> ValueTable {
        let mut data = count.to_le_bytes().to_vec();
        for rank in 0..count {
            data.extend_from_slice(&(rank as u32 + 1).to_le_bytes());
            data.extend_from_slice(&0u32.to_le_bytes());
            data.extend_from_slice(&rank.to_le_bytes());
        }
        ValueTable::load(&mut ByteReader::new(&data)).unwrap()
    }

    #[test]
    fn pack_places_token1_highest() {
        assert_eq!(pack_key([1, 2, 3]), 0x0000_0001_0002_0003);
        assert_eq!(pack_key([0xFFFF, 0xFFFF, 0xFFFF]), 0x0000_FFFF_FFFF_FFFF);
        assert_eq!(unpack_key(pack_key([5, 32776, 9])), [5, 32776, 9]);
    }

    #[test]
    fn carries_tokens_across_record_forms() {
        let data = words(&[
            NEW_FIRST, 5, 6, 7, 0, // full record
            8, 1, // token3 only
            NEW_SECOND, 9, 10, 2, // token2 and token3
        ]);
        let records = decode(&data).unwrap();
        assert_eq!(
            records,
            vec![rec([5, 6, 7], 0), rec([5, 6, 8], 1), rec([5, 9, 10], 2)]
        );

        let table = KeyTable::load(&mut ByteReader::new(&data), &value_table(3)).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(pack_key([5, 6, 7])), Some(0));
        assert_eq!(table.get(pack_key([5, 6, 8])), Some(1));
        assert_eq!(table.get(pack_key([5, 9, 10])), Some(2));
    }

    #[test]
    fn empty_stream_yields_no_records() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn stream_must_open_with_new_first() {
        let err = decode(&words(&[7, 0])).unwrap_err();
        assert!(matches!(err, LoadError::MissingFirstRecord { lead: 7 }));

        let err = decode(&words(&[NEW_SECOND, 1, 2, 0])).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingFirstRecord { lead: NEW_SECOND }
        ));
    }

    #[test]
    fn record_cut_after_lead_is_truncation() {
        let data = words(&[NEW_FIRST, 1, 2, 3, 0, NEW_SECOND, 4]);
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, LoadError::Truncated { section: "keys", .. }));

        // dangling odd byte
        let mut data = words(&[NEW_FIRST, 1, 2, 3, 0]);
        data.push(0x01);
        assert!(decode(&data).is_err());
    }

    #[test]
    fn decoder_stops_after_first_error() {
        let data = words(&[5, 0, NEW_FIRST, 1, 2, 3, 0]);
        let mut reader = ByteReader::new(&data);
        let mut decoder = KeyStreamDecoder::new(&mut reader);
        assert!(decoder.next().unwrap().is_err());
        assert!(decoder.next().is_none());
    }

    #[test]
    fn value_rank_outside_table_is_rejected() {
        let data = words(&[NEW_FIRST, 1, 2, 3, 0, 4, 3]);
        let err = KeyTable::load(&mut ByteReader::new(&data), &value_table(2)).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DanglingValueRank { record: 1, rank: 3, count: 2 }
        ));
    }

    #[test]
    fn repeated_key_keeps_last_value_rank() {
        let data = words(&[NEW_FIRST, 1, 2, 3, 0, NEW_SECOND, 2, 3, 1]);
        let table = KeyTable::load(&mut ByteReader::new(&data), &value_table(2)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(pack_key([1, 2, 3])), Some(1));
    }

    #[test]
    fn reencoding_decoded_stream_reproduces_bytes() {
        let data = words(&[
            NEW_FIRST, 1, 2, 3, 0,
            4, 1,
            32773, 2, // flagged token3 still fits the short form
            NEW_SECOND, 32770, 3, 0,
            NEW_SECOND, 9, NEW_SECOND, 1, // token3 that collides with a lead
            NEW_FIRST, 32769, 2, 3, 2,
            NEW_FIRST, 7, 7, 7, 1,
        ]);
        let records = decode(&data).unwrap();
        assert_eq!(records.len(), 7);
        assert_eq!(records[4], rec([1, 9, NEW_SECOND], 1));
        assert_eq!(encode_key_stream(&records), data);
    }
}
