//! Plain-text n-gram counts, one window per line:
//! ```text
//! <w1 w2 w3 w4>\t<it count>\t<they count>
//! ```
//! Files ending in `.gz` are decompressed on the fly. Lines are bytes; the
//! n-gram field need not be UTF-8.

use crate::error::Result;
use crate::store::NgramCounts;
use crate::values::CountPair;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default, Clone)]
pub struct NgramCntMap {
    ngram2cnts: HashMap<Vec<u8>, CountPair>,
}

impl NgramCntMap {
    pub fn initialize(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::with_capacity(1 << 20, GzDecoder::new(file)))
        } else {
            Box::new(BufReader::with_capacity(1 << 20, file))
        };
        let map = Self::from_reader(reader)?;
        info!(
            path = %path.display(),
            ngrams = map.ngram2cnts.len(),
            "loaded plain n-gram counts"
        );
        Ok(map)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut ngram2cnts = HashMap::new();
        for (lineno, line) in reader.split(b'\n').enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let mut fields = line.splitn(3, |&b| b == b'\t');
            let ngram = fields.next().unwrap_or_default();
            let Some(it) = fields.next() else {
                warn!(line = lineno + 1, "skipping n-gram line without counts");
                continue;
            };
            let they = fields.next().unwrap_or_default();
            ngram2cnts.insert(ngram.to_vec(), CountPair::new(count(it), count(they)));
        }
        Ok(Self { ngram2cnts })
    }
}

/// Leading decimal digits of `field` after optional blanks and sign, as
/// `atoi` reads them: `"12abc"` is 12, `"2\t3"` is 2, anything else is 0.
fn count(field: &[u8]) -> u32 {
    let start = field
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(field.len());
    let digits = match field[start..].first() {
        Some(b'+') => &field[start + 1..],
        _ => &field[start..],
    };
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0u32, |n, &b| n.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

impl NgramCounts for NgramCntMap {
    fn find(&self, query: &[u8]) -> CountPair {
        self.ngram2cnts.get(query).copied().unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.ngram2cnts.len()
    }
}
