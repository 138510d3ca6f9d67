//! Writes synthetic compressed n-gram files for integration tests.

use std::path::{Path, PathBuf};

pub const NEW_FIRST: u16 = 65535;
pub const NEW_SECOND: u16 = 65534;

#[derive(Default)]
pub struct StoreFile {
    tokens: Vec<(Vec<u8>, u16)>,
    values: Vec<(u32, u32, u16)>,
    keys: Vec<u8>,
}

impl StoreFile {
    pub fn token(mut self, text: &str, rank: u16) -> Self {
        self.tokens.push((text.as_bytes().to_vec(), rank));
        self
    }

    pub fn value(mut self, it: u32, they: u32, rank: u16) -> Self {
        self.values.push((it, they, rank));
        self
    }

    /// Raw key-stream words, written verbatim.
    pub fn keys(mut self, words: &[u16]) -> Self {
        self.keys.extend(words.iter().flat_map(|w| w.to_le_bytes()));
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = (self.tokens.len() as u16).to_le_bytes().to_vec();
        for (text, rank) in &self.tokens {
            out.push(text.len() as u8);
            out.extend_from_slice(text);
            out.extend_from_slice(&rank.to_le_bytes());
        }
        out.extend_from_slice(&(self.values.len() as u16).to_le_bytes());
        for (it, they, rank) in &self.values {
            out.extend_from_slice(&it.to_le_bytes());
            out.extend_from_slice(&they.to_le_bytes());
            out.extend_from_slice(&rank.to_le_bytes());
        }
        out.extend_from_slice(&self.keys);
        out
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.bytes()).expect("write store file");
        path
    }
}
