//! Feature extraction around one target "it".
//!
//! Binary (lexical) features are plain strings; real-valued features carry
//! log-scaled n-gram counts looked up in an [`NgramCounts`] store. Pattern
//! windows stay bytes because patterns are cut mid-character.

use crate::store::NgramCounts;
use std::collections::{BTreeMap, BTreeSet};

/// Placeholder for the target token inside n-gram windows.
pub const IT_MARKER: &[u8] = b"_";

const MAX_LEXICAL_NGRAM: usize = 5;
const MIN_LEXICAL_NGRAM: usize = 3;
const LEXICAL_SPACER: &[u8] = b"^";

pub const COUNT_NGRAM: usize = 4;
const SMOOTHING: f32 = 1.0;

const LEFT_OFFSETS: usize = 2;
const RIGHT_OFFSETS: usize = 5;
const RIGHT_BAG: usize = 19;
const LEFT_BAG: usize = 10;
const LEFT_TRIGGERS: &[&str] = &[
    "it", "It", "itself", "its", "NE", "that", "this", "and", "said", "says",
];

pub type RealFeatures = Vec<(String, f32)>;

/// Joins `size` tokens starting at `start` with `spacer`, the target slot
/// replaced by [`IT_MARKER`]. `None` if the window leaves the sentence.
pub fn ngram_window<T: AsRef<[u8]>>(
    start: isize,
    size: usize,
    target: usize,
    tokens: &[T],
    spacer: &[u8],
) -> Option<Vec<u8>> {
    if start < 0 {
        return None;
    }
    let start = start as usize;
    let window = tokens.get(start..start + size)?;
    let parts: Vec<&[u8]> = window
        .iter()
        .enumerate()
        .map(|(i, tok)| if start + i == target { IT_MARKER } else { tok.as_ref() })
        .collect();
    Some(parts.join(spacer))
}

fn window_starts(target: usize, size: usize) -> impl Iterator<Item = isize> {
    let target = target as isize;
    (target - (size as isize - 1))..=target
}

pub fn lexical_features(target: usize, lexemes: &[String]) -> Vec<String> {
    let mut feats = Vec::new();

    for size in (MIN_LEXICAL_NGRAM..=MAX_LEXICAL_NGRAM).rev() {
        for start in window_starts(target, size) {
            if let Some(ngram) = ngram_window(start, size, target, lexemes, LEXICAL_SPACER) {
                feats.push(String::from_utf8_lossy(&ngram).into_owned());
            }
        }
    }

    for offset in 1..=LEFT_OFFSETS.min(target) {
        feats.push(format!("L={}.{}", lexemes[target - offset], offset));
    }
    for offset in 1..=RIGHT_OFFSETS {
        match lexemes.get(target + offset) {
            Some(word) => feats.push(format!("R={word}.{offset}")),
            None => break,
        }
    }

    let right_end = lexemes.len().min(target + 1 + RIGHT_BAG);
    let right: BTreeSet<&str> = lexemes
        .get(target + 1..right_end)
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect();
    let left: BTreeSet<&str> = lexemes[target.saturating_sub(LEFT_BAG)..target]
        .iter()
        .map(String::as_str)
        .filter(|w| LEFT_TRIGGERS.contains(w))
        .collect();
    feats.extend(right.into_iter().map(|w| format!("R~{w}")));
    feats.extend(left.into_iter().map(|w| format!("L~{w}")));

    feats.push("bias".to_string());
    feats
}

fn log_count(count: u64) -> f32 {
    (count as f32 + SMOOTHING).ln()
}

pub fn count_features<P, S>(target: usize, patterns: &[P], store: &S) -> RealFeatures
where
    P: AsRef<[u8]>,
    S: NgramCounts + ?Sized,
{
    let size = COUNT_NGRAM;
    let mut feats = Vec::new();
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();

    for start in window_starts(target, size) {
        let offset = target as isize - start;
        let Some(ngram) = ngram_window(start, size, target, patterns, b" ") else {
            feats.push((format!("{size},{offset}+NGM=UNDEF"), 1.0));
            continue;
        };
        let counts = store.find(&ngram);
        for (label, count) in [("IT", counts.it), ("THEY", counts.they)] {
            if count != 0 {
                feats.push((format!("{size},{offset}+{label}"), log_count(count as u64)));
                *totals.entry(label).or_default() += count as u64;
            } else {
                feats.push((format!("{size},{offset}+{label}-UNDEF"), 1.0));
            }
        }
    }

    feats.extend(
        totals
            .into_iter()
            .map(|(label, total)| (format!("{size}+{label}"), log_count(total))),
    );
    feats
}
