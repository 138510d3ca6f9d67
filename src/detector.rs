//! Per-sentence pleonastic "it" prediction.
//!
//! Sentences are handled as bytes: input need not be UTF-8 and is echoed
//! back unchanged.

use crate::features::{count_features, lexical_features};
use crate::model::FeatureWeights;
use crate::pattern::{generalize_token, norm_word, patternize_token};
use crate::store::NgramCounts;
use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use unicode_normalization::UnicodeNormalization;

/// Splits on single spaces. Consecutive spaces give empty tokens; a single
/// trailing space does not.
pub fn tokenize(line: &[u8]) -> Vec<&[u8]> {
    let mut tokens: Vec<&[u8]> = line.split(|&b| b == b' ').collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

pub fn is_target(token: &[u8]) -> bool {
    token.eq_ignore_ascii_case(b"it")
}

/// NFC form of a UTF-8 line; any other bytes pass through untouched.
pub fn normalize_line(line: &[u8]) -> Cow<'_, [u8]> {
    match std::str::from_utf8(line) {
        Ok(text) => Cow::Owned(text.nfc().collect::<String>().into_bytes()),
        Err(_) => Cow::Borrowed(line),
    }
}

pub struct Detector<S> {
    weights: FeatureWeights,
    store: S,
}

impl<S: NgramCounts> Detector<S> {
    pub fn new(weights: FeatureWeights, store: S) -> Self {
        Self { weights, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `(position, probability)` for every "it" in the sentence.
    pub fn predict(&self, words: &[&[u8]]) -> Vec<(usize, f32)> {
        let targets: Vec<usize> = (0..words.len()).filter(|&i| is_target(words[i])).collect();
        if targets.is_empty() {
            return Vec::new();
        }

        let patterns: Vec<Vec<u8>> = words.iter().map(|w| patternize_token(w)).collect();
        // lexemes feed string features, so invalid bytes become U+FFFD
        let mut lexemes: Vec<String> = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let previous = lexemes.last().map(String::as_str).unwrap_or("");
            let next = words
                .get(i + 1)
                .map(|w| String::from_utf8_lossy(w))
                .unwrap_or_default();
            let word = norm_word(&String::from_utf8_lossy(word));
            let lexeme = generalize_token(&word, previous, &next);
            lexemes.push(lexeme);
        }

        targets
            .into_iter()
            .map(|pos| {
                let binary = lexical_features(pos, &lexemes);
                let real = count_features(pos, &patterns, &self.store);
                (pos, self.weights.predict(&binary, &real))
            })
            .collect()
    }

    /// The input line followed by `\t<pos>:<prob>` per target.
    pub fn annotate(&self, line: &[u8], normalized: &[u8]) -> Vec<u8> {
        let mut out = line.to_vec();
        for (pos, prob) in self.predict(&tokenize(normalized)) {
            // writing into a Vec cannot fail
            let _ = write!(out, "\t{pos}:{prob:.3}");
        }
        out
    }

    /// Annotates every `\n`-terminated line of `input` into `output`.
    /// Returns the number of lines read.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> io::Result<u64> {
        let mut line = Vec::new();
        let mut sentences = 0u64;
        loop {
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            if line.last() == Some(&b'\n') {
                line.pop();
            }
            let normalized = normalize_line(&line);
            output.write_all(&self.annotate(&line, &normalized))?;
            output.write_all(b"\n")?;
            sentences += 1;
        }
        output.flush()?;
        Ok(sentences)
    }
}
