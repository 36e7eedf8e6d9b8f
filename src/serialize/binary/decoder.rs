// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use std::collections::HashMap;

use crate::error::{DnsErrorKind, DnsResult};
use crate::rr::domain::Name;

/// This is non-destructive to the inner buffer, b/c names decoded earlier in
///  the message must stay addressable for compression pointers.
///
/// A UDP datagram arrives whole, so the decoder works over a flat slice with
///  an absolute cursor. Every name suffix parsed out of the buffer is recorded
///  in a cache keyed by its starting offset; a compression pointer resolves by
///  a single cache lookup rather than by re-parsing at the target offset. A
///  pointer to an offset at which no name was decoded is a format error.
pub struct BinDecoder<'a> {
    buffer: &'a [u8],
    index: usize,
    name_cache: HashMap<u16, Name>,
    cache_hits: usize,
}

impl<'a> BinDecoder<'a> {
    /// Creates a new BinDecoder
    ///
    /// # Arguments
    ///
    /// * `buffer` - buffer from which all data will be read
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            index: 0,
            name_cache: HashMap::new(),
            cache_hits: 0,
        }
    }

    /// Pop one byte from the buffer
    pub fn pop(&mut self) -> DnsResult<u8> {
        if self.index < self.buffer.len() {
            let byte = self.buffer[self.index];
            self.index += 1;
            Ok(byte)
        } else {
            Err("unexpected end of input reached".into())
        }
    }

    /// Returns the number of bytes remaining in the buffer
    pub fn len(&self) -> usize {
        self.buffer.len().saturating_sub(self.index)
    }

    /// Returns `true` if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Peek one byte forward, without moving the current index forward
    pub fn peek(&self) -> Option<u8> {
        if self.index < self.buffer.len() {
            Some(self.buffer[self.index])
        } else {
            None
        }
    }

    /// Returns the current index in the buffer
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records the name suffix which begins at the absolute `offset`.
    ///
    /// Pointers can only address 14 bits, names which start beyond that range
    ///  are not recorded.
    pub fn store_name(&mut self, offset: usize, name: &Name) {
        if offset < 0x3FFF_usize {
            self.name_cache.insert(offset as u16, name.clone());
        }
    }

    /// Looks up the name suffix previously decoded at the absolute `offset`.
    pub fn name_at(&mut self, offset: u16) -> Option<Name> {
        let name = self.name_cache.get(&offset).cloned();
        if name.is_some() {
            self.cache_hits += 1;
        }
        name
    }

    /// Number of compression pointers resolved through the cache so far.
    pub(crate) fn pointer_cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Reads a length-prefixed `<character-string>` from the buffer
    ///
    /// ```text
    /// <character-string> is a single
    /// length octet followed by that number of characters.  <character-string>
    /// is treated as binary information, and can be up to 256 characters in
    /// length (including the length octet).
    /// ```
    pub fn read_character_data(&mut self) -> DnsResult<&'a [u8]> {
        let length = self.pop()? as usize;
        self.read_slice(length)
    }

    /// Reads a Vec out of the buffer
    ///
    /// # Arguments
    ///
    /// * `len` - number of bytes to read from the buffer
    pub fn read_vec(&mut self, len: usize) -> DnsResult<Vec<u8>> {
        self.read_slice(len).map(ToOwned::to_owned)
    }

    /// Reads a slice out of the buffer, without allocating
    ///
    /// # Arguments
    ///
    /// * `len` - number of bytes to read from the buffer
    pub fn read_slice(&mut self, len: usize) -> DnsResult<&'a [u8]> {
        let end = self
            .index
            .checked_add(len)
            .ok_or(DnsErrorKind::Message("invalid length for slice"))?;
        if end > self.buffer.len() {
            return Err("buffer exhausted".into());
        }
        let slice: &'a [u8] = &self.buffer[self.index..end];
        self.index = end;
        Ok(slice)
    }

    /// Reads a byte from the buffer, equivalent to `Self::pop()`
    pub fn read_u8(&mut self) -> DnsResult<u8> {
        self.pop()
    }

    /// Reads the next 2 bytes into u16, big-endian
    pub fn read_u16(&mut self) -> DnsResult<u16> {
        self.read_slice(2).map(|s| u16::from_be_bytes([s[0], s[1]]))
    }

    /// Reads the next 4 bytes into u32, big-endian
    pub fn read_u32(&mut self) -> DnsResult<u32> {
        self.read_slice(4)
            .map(|s| u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_slice() {
        let deadbeef = b"deadbeef";
        let mut decoder = BinDecoder::new(deadbeef);

        let read = decoder.read_slice(4).expect("failed to read dead");
        assert_eq!(read, b"dead");

        let read = decoder.read_slice(2).expect("failed to read be");
        assert_eq!(read, b"be");

        let read = decoder.read_slice(0).expect("failed to read nothing");
        assert_eq!(read, b"");

        // this should fail
        assert!(decoder.read_slice(3).is_err());
    }

    #[test]
    fn test_read_u16_u32() {
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut decoder = BinDecoder::new(&bytes);

        assert_eq!(decoder.read_u16().unwrap(), 0x0102);
        assert_eq!(decoder.read_u32().unwrap(), 0x0304_0506);
        assert!(decoder.read_u16().is_err());
    }

    #[test]
    fn test_read_character_data() {
        let bytes = [3, b'a', b'b', b'c'];
        let mut decoder = BinDecoder::new(&bytes);
        assert_eq!(decoder.read_character_data().unwrap(), b"abc");
        assert_eq!(decoder.index(), 4);

        // length byte promises more data than is available
        let bytes = [4, b'a', b'b', b'c'];
        let mut decoder = BinDecoder::new(&bytes);
        assert!(decoder.read_character_data().is_err());
    }
}
