// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Binary serialization types

mod decoder;
mod encoder;

use std::net::{Ipv4Addr, Ipv6Addr};

pub use self::decoder::BinDecoder;
pub use self::encoder::{BinEncoder, EncodedSize, Place};

use crate::error::DnsResult;

/// A type which can be encoded into the DNS binary format
pub trait BinEncodable {
    /// Write the type to the stream
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()>;

    /// Returns the object in binary form
    fn to_bytes(&self) -> DnsResult<Vec<u8>> {
        let mut bytes = Vec::<u8>::new();
        {
            let mut encoder = BinEncoder::new(&mut bytes);
            self.emit(&mut encoder)?;
        }

        Ok(bytes)
    }
}

/// A trait for types which are deserializable from the DNS binary format
pub trait BinDecodable: Sized {
    /// Read the type from the stream
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self>;

    /// Returns the object parsed from binary form
    fn from_bytes(bytes: &[u8]) -> DnsResult<Self> {
        let mut decoder = BinDecoder::new(bytes);
        Self::read(&mut decoder)
    }
}

impl BinEncodable for u16 {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16(*self)
    }
}

impl BinDecodable for u16 {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        decoder.read_u16()
    }
}

impl BinEncodable for u32 {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u32(*self)
    }
}

impl BinDecodable for u32 {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        decoder.read_u32()
    }
}

impl BinEncodable for Ipv4Addr {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_vec(&self.octets())
    }
}

impl BinDecodable for Ipv4Addr {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        let octets = decoder.read_slice(4)?;
        Ok(Self::new(octets[0], octets[1], octets[2], octets[3]))
    }
}

impl BinEncodable for Ipv6Addr {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_vec(&self.octets())
    }
}

impl BinDecodable for Ipv6Addr {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        let octets = decoder.read_slice(16)?;
        let mut addr = [0_u8; 16];
        addr.copy_from_slice(octets);
        Ok(Self::from(addr))
    }
}
