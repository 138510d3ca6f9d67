//! Little-endian cursor over a loaded store file.
//!
//! Every section reader pulls fixed-width integers through [`ByteReader`];
//! a short read is reported against the section being decoded.

use crate::error::{LoadError, Result};

pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, len: usize, section: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(LoadError::Truncated {
                section,
                offset: self.pos,
            });
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u8(&mut self, section: &'static str) -> Result<u8> {
        Ok(self.read_bytes(1, section)?[0])
    }

    pub fn read_u16(&mut self, section: &'static str) -> Result<u16> {
        let b = self.read_bytes(2, section)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self, section: &'static str) -> Result<u32> {
        let b = self.read_bytes(4, section)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
