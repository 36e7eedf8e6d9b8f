// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record data enum variants

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use enum_as_inner::EnumAsInner;
use tracing::trace;

use super::domain::Name;
use super::rdata;
use super::rdata::{MX, OPT, SOA, SRV, TXT};
use super::record_type::RecordType;
use crate::error::*;
use crate::serialize::binary::*;

/// Record data enum variants
///
/// [RFC 1035](https://tools.ietf.org/html/rfc1035), DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987
///
/// ```text
/// 3.3. Standard RRs
///
/// The following RR definitions are expected to occur, at least
/// potentially, in all classes.  In particular, NS, SOA, CNAME, and PTR
/// will be used in all classes, and have the same format in all classes.
/// Because their RDATA format is known, all domain names in the RDATA
/// section of these RRs may be compressed.
/// ```
///
/// Record types without a variant of their own are carried as raw bytes in
/// `Unknown`, together with their numeric type code.
#[derive(Debug, EnumAsInner, PartialEq, Eq, Clone)]
pub enum RData {
    /// IPv4 address record
    A(Ipv4Addr),

    /// IPv6 address record
    AAAA(Ipv6Addr),

    /// Canonical name record, alias of one name to another
    CNAME(Name),

    /// Delegation name record, alias of an entire subtree
    DNAME(Name),

    /// Mail exchange record
    MX(MX),

    /// Name server record
    NS(Name),

    /// Option record, the EDNS(0) pseudo-RR payload
    OPT(OPT),

    /// Pointer record, mostly used for reverse lookups
    PTR(Name),

    /// Start of authority record
    SOA(SOA),

    /// Service locator record
    SRV(SRV),

    /// Text record
    TXT(TXT),

    /// Unknown or unsupported record type, kept as raw bytes
    Unknown {
        /// numeric record TYPE code
        code: u16,
        /// raw RDATA bytes
        rdata: Vec<u8>,
    },
}

impl RData {
    /// Read the RData from the given Decoder
    ///
    /// The number of bytes consumed must match `rdata_length` exactly,
    ///  otherwise the record is malformed.
    pub fn read(
        decoder: &mut BinDecoder<'_>,
        record_type: RecordType,
        rdata_length: u16,
    ) -> DnsResult<Self> {
        let start_idx = decoder.index();

        trace!("reading {record_type} rdata");
        let result = match record_type {
            RecordType::A => Ipv4Addr::read(decoder).map(Self::A),
            RecordType::AAAA => Ipv6Addr::read(decoder).map(Self::AAAA),
            RecordType::CNAME => rdata::name::read(decoder).map(Self::CNAME),
            RecordType::DNAME => rdata::name::read(decoder).map(Self::DNAME),
            RecordType::MX => rdata::mx::read(decoder).map(Self::MX),
            RecordType::NS => rdata::name::read(decoder).map(Self::NS),
            RecordType::OPT => rdata::opt::read(decoder, rdata_length).map(Self::OPT),
            RecordType::PTR => rdata::name::read(decoder).map(Self::PTR),
            RecordType::SOA => rdata::soa::read(decoder).map(Self::SOA),
            RecordType::SRV => rdata::srv::read(decoder).map(Self::SRV),
            RecordType::TXT => rdata::txt::read(decoder, rdata_length).map(Self::TXT),
            RecordType::Unknown(code) => {
                decoder.read_vec(rdata_length as usize).map(|rdata| Self::Unknown { code, rdata })
            }
        };

        let rdata = result?;

        // we should have read rdata_length, but we did not
        let read = decoder.index() - start_idx;
        if read != rdata_length as usize {
            return Err(DnsErrorKind::IncorrectRDataLengthRead {
                read,
                len: rdata_length as usize,
            }
            .into());
        }

        Ok(rdata)
    }

    /// Write the RData from the given Encoder
    pub fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        match self {
            Self::A(address) => address.emit(encoder),
            Self::AAAA(address) => address.emit(encoder),
            Self::CNAME(name) | Self::DNAME(name) | Self::NS(name) | Self::PTR(name) => {
                rdata::name::emit(encoder, name)
            }
            Self::MX(mx) => rdata::mx::emit(encoder, mx),
            Self::OPT(opt) => rdata::opt::emit(encoder, opt),
            Self::SOA(soa) => rdata::soa::emit(encoder, soa),
            Self::SRV(srv) => rdata::srv::emit(encoder, srv),
            Self::TXT(txt) => rdata::txt::emit(encoder, txt),
            Self::Unknown { rdata, .. } => encoder.emit_vec(rdata),
        }
    }

    /// Converts this to a RecordType
    pub fn to_record_type(&self) -> RecordType {
        match self {
            Self::A(..) => RecordType::A,
            Self::AAAA(..) => RecordType::AAAA,
            Self::CNAME(..) => RecordType::CNAME,
            Self::DNAME(..) => RecordType::DNAME,
            Self::MX(..) => RecordType::MX,
            Self::NS(..) => RecordType::NS,
            Self::OPT(..) => RecordType::OPT,
            Self::PTR(..) => RecordType::PTR,
            Self::SOA(..) => RecordType::SOA,
            Self::SRV(..) => RecordType::SRV,
            Self::TXT(..) => RecordType::TXT,
            Self::Unknown { code, .. } => RecordType::Unknown(*code),
        }
    }
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::A(address) => write!(f, "{address}"),
            Self::AAAA(address) => write!(f, "{address}"),
            Self::CNAME(name) | Self::DNAME(name) | Self::NS(name) | Self::PTR(name) => {
                write!(f, "{name}")
            }
            Self::MX(mx) => write!(f, "{mx}"),
            Self::OPT(opt) => write!(f, "OPT ({} options)", opt.len()),
            Self::SOA(soa) => write!(f, "{soa}"),
            Self::SRV(srv) => write!(f, "{srv}"),
            Self::TXT(txt) => write!(f, "{txt}"),
            Self::Unknown { code, rdata } => write!(f, "TYPE{code} ({} bytes)", rdata.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn get_data() -> Vec<(RData, Vec<u8>)> {
        vec![
            (
                RData::A(Ipv4Addr::new(93, 184, 216, 34)),
                vec![93, 184, 216, 34],
            ),
            (
                RData::AAAA(Ipv6Addr::from_str("2606:2800:220:1::1").unwrap()),
                vec![0x26, 0x06, 0x28, 0x00, 0x02, 0x20, 0x00, 0x01, 0, 0, 0, 0, 0, 0, 0, 1],
            ),
            (
                RData::CNAME(Name::from_str("alias.example.com.").unwrap()),
                vec![
                    5, b'a', b'l', b'i', b'a', b's', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
                    3, b'c', b'o', b'm', 0,
                ],
            ),
            (
                RData::MX(MX::new(10, Name::from_str("mx.example.com.").unwrap())),
                vec![
                    0, 10, 2, b'm', b'x', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c',
                    b'o', b'm', 0,
                ],
            ),
            (
                RData::TXT(TXT::new(vec!["hi".to_string()])),
                vec![2, b'h', b'i'],
            ),
            (
                RData::Unknown {
                    code: 255,
                    rdata: vec![1, 2, 3],
                },
                vec![1, 2, 3],
            ),
        ]
    }

    #[test]
    fn test_read() {
        for (expect, binary) in get_data() {
            let length = binary.len() as u16;
            let mut decoder = BinDecoder::new(&binary);
            let got = RData::read(&mut decoder, expect.to_record_type(), length).unwrap();
            assert_eq!(got, expect);
        }
    }

    #[test]
    fn test_write_to() {
        for (rdata, expect) in get_data() {
            let mut bytes: Vec<u8> = Vec::new();
            {
                let mut encoder = BinEncoder::new(&mut bytes);
                rdata.emit(&mut encoder).unwrap();
            }
            assert_eq!(bytes, expect);
        }
    }

    #[test]
    fn test_rdata_length_mismatch_rejected() {
        // an A record whose RDLENGTH claims 5 bytes
        let binary = vec![93, 184, 216, 34, 0];
        let mut decoder = BinDecoder::new(&binary);
        let err = RData::read(&mut decoder, RecordType::A, 5).unwrap_err();
        assert!(matches!(
            err.kind(),
            DnsErrorKind::IncorrectRDataLengthRead { read: 4, len: 5 }
        ));
    }
}
