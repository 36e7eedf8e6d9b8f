// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! record type definitions

use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::*;
use crate::serialize::binary::*;

/// The type of the resource record.
///
/// This specifies the type of data in the RData field of the Resource Record
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    /// RFC 1035[1] IPv4 Address record
    A,
    /// RFC 3596[2] IPv6 address record
    AAAA,
    /// RFC 1035[1] Canonical name record
    CNAME,
    /// RFC 6672 Delegation name record
    DNAME,
    /// RFC 1035[1] Mail exchange record
    MX,
    /// RFC 1035[1] Name server record
    NS,
    /// RFC 6891 Option
    OPT,
    /// RFC 1035[1] Pointer record
    PTR,
    /// RFC 1035[1] and RFC 2308[9] Start of [a zone of] authority record
    SOA,
    /// RFC 2782 Service locator
    SRV,
    /// RFC 1035[1] Text record
    TXT,
    /// Unknown Record type, or unsupported
    Unknown(u16),
}

impl FromStr for RecordType {
    type Err = DnsError;

    /// Convert `&str` to `RecordType`
    ///
    /// ```
    /// use std::str::FromStr;
    /// use stub_dns::rr::record_type::RecordType;
    ///
    /// let var: RecordType = RecordType::from_str("A").unwrap();
    /// assert_eq!(RecordType::A, var);
    /// ```
    fn from_str(str: &str) -> DnsResult<Self> {
        match str {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::AAAA),
            "CNAME" => Ok(Self::CNAME),
            "DNAME" => Ok(Self::DNAME),
            "MX" => Ok(Self::MX),
            "NS" => Ok(Self::NS),
            "OPT" => Ok(Self::OPT),
            "PTR" => Ok(Self::PTR),
            "SOA" => Ok(Self::SOA),
            "SRV" => Ok(Self::SRV),
            "TXT" => Ok(Self::TXT),
            _ => Err(DnsErrorKind::Msg(format!("record type string unknown: {str}")).into()),
        }
    }
}

/// Convert from `u16` to `RecordType`, total: unassigned codes round-trip
///  through `Unknown`
impl From<u16> for RecordType {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::A,
            28 => Self::AAAA,
            5 => Self::CNAME,
            39 => Self::DNAME,
            15 => Self::MX,
            2 => Self::NS,
            41 => Self::OPT,
            12 => Self::PTR,
            6 => Self::SOA,
            33 => Self::SRV,
            16 => Self::TXT,
            _ => Self::Unknown(value),
        }
    }
}

/// Convert from `RecordType` to `u16`
impl From<RecordType> for u16 {
    fn from(rt: RecordType) -> Self {
        match rt {
            RecordType::A => 1,
            RecordType::AAAA => 28,
            RecordType::CNAME => 5,
            RecordType::DNAME => 39,
            RecordType::MX => 15,
            RecordType::NS => 2,
            RecordType::OPT => 41,
            RecordType::PTR => 12,
            RecordType::SOA => 6,
            RecordType::SRV => 33,
            RecordType::TXT => 16,
            RecordType::Unknown(code) => code,
        }
    }
}

impl BinEncodable for RecordType {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16((*self).into())
    }
}

impl BinDecodable for RecordType {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        decoder.read_u16().map(Self::from)
    }
}

impl Display for RecordType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::A => write!(f, "A"),
            Self::AAAA => write!(f, "AAAA"),
            Self::CNAME => write!(f, "CNAME"),
            Self::DNAME => write!(f, "DNAME"),
            Self::MX => write!(f, "MX"),
            Self::NS => write!(f, "NS"),
            Self::OPT => write!(f, "OPT"),
            Self::PTR => write!(f, "PTR"),
            Self::SOA => write!(f, "SOA"),
            Self::SRV => write!(f, "SRV"),
            Self::TXT => write!(f, "TXT"),
            Self::Unknown(code) => write!(f, "TYPE{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order() {
        let values = [
            (1_u16, RecordType::A),
            (2, RecordType::NS),
            (5, RecordType::CNAME),
            (6, RecordType::SOA),
            (12, RecordType::PTR),
            (15, RecordType::MX),
            (16, RecordType::TXT),
            (28, RecordType::AAAA),
            (33, RecordType::SRV),
            (39, RecordType::DNAME),
            (41, RecordType::OPT),
        ];

        for (code, record_type) in values {
            assert_eq!(RecordType::from(code), record_type);
            assert_eq!(u16::from(record_type), code);
        }
    }

    #[test]
    fn test_unknown_roundtrip() {
        let rt = RecordType::from(65280);
        assert_eq!(rt, RecordType::Unknown(65280));
        assert_eq!(u16::from(rt), 65280);
        assert_eq!(rt.to_string(), "TYPE65280");
    }
}
