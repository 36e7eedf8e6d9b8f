// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! option record for passing protocol options between the client and server

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use tracing::warn;

use crate::error::*;
use crate::serialize::binary::*;

/// The OPT record type is used for ExtendedDNS records.
///
/// These allow for additional information to be associated with the DNS request that otherwise
/// would require changes to the DNS protocol.
///
/// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6)
///
/// ```text
/// 6.1.2.  Wire Format
///
///    An OPT RR has a fixed part and a variable set of options expressed as
///    {attribute, value} pairs.  The fixed part holds some DNS metadata,
///    and also a small collection of basic extension elements that we
///    expect to be so popular that it would be a waste of wire space to
///    encode them as {attribute, value} pairs.
///
///    The variable part of an OPT RR may contain zero or more options in
///    the RDATA.  Each option MUST be treated as a bit field.  Each option
///    is encoded as:
///
///                   +0 (MSB)                            +1 (LSB)
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     0: |                          OPTION-CODE                          |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     2: |                         OPTION-LENGTH                         |
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///     4: |                                                               |
///        /                          OPTION-DATA                          /
///        /                                                               /
///        +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// The options are kept in wire order; the order of appearance carries no
/// defined meaning but survives a decode.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct OPT {
    options: Vec<EdnsOption>,
}

impl OPT {
    /// Creates a new OPT record data.
    ///
    /// # Arguments
    ///
    /// * `options` - the options in their wire order
    pub fn new(options: Vec<EdnsOption>) -> Self {
        Self { options }
    }

    /// The entire list of options, in wire order
    pub fn options(&self) -> &[EdnsOption] {
        &self.options
    }

    /// Get the first option matching the code
    pub fn get(&self, code: EdnsCode) -> Option<&EdnsOption> {
        self.options
            .iter()
            .find(|option| EdnsCode::from(*option) == code)
    }

    /// Append an option, the key is derived from the `EdnsOption`
    pub fn insert(&mut self, option: EdnsOption) {
        self.options.push(option);
    }

    /// Number of options carried
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if there are no options
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>, rdata_length: u16) -> DnsResult<OPT> {
    let start_idx = decoder.index();
    let rdata_length = rdata_length as usize;
    let mut options = Vec::new();

    while decoder.index() - start_idx < rdata_length {
        let code = EdnsCode::from(decoder.read_u16()?);
        let length = decoder.read_u16()? as usize;

        let remaining = rdata_length
            .checked_sub(decoder.index() - start_idx)
            .ok_or(DnsErrorKind::Message("OPT option header exceeds rdata length"))?;
        if length > remaining {
            return Err("OPT option length exceeds rdata length".into());
        }

        let data = decoder.read_slice(length)?;
        options.push(EdnsOption::from((code, data)));
    }

    Ok(OPT::new(options))
}

/// Write the RData from the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, opt: &OPT) -> DnsResult<()> {
    for option in opt.options() {
        encoder.emit_u16(EdnsCode::from(option).into())?;
        encoder.emit_u16(option.len())?;
        option.emit(encoder)?;
    }
    Ok(())
}

/// The code of the EDNS data option
#[derive(Hash, Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EdnsCode {
    /// [RFC 6891, Reserved](https://tools.ietf.org/html/rfc6891)
    Zero,

    /// [RFC 5001, NSID](https://tools.ietf.org/html/rfc5001)
    NSID,

    /// [RFC 7871, Client Subnet, Optional](https://tools.ietf.org/html/rfc7871)
    Subnet,

    /// [RFC 7873, DNS Cookies](https://tools.ietf.org/html/rfc7873)
    Cookie,

    /// [RFC 7828, edns-tcp-keepalive](https://tools.ietf.org/html/rfc7828)
    Keepalive,

    /// [RFC 7830, The EDNS(0) Padding](https://tools.ietf.org/html/rfc7830)
    Padding,

    /// Unknown, used to deal with unknown or unsupported codes
    Unknown(u16),
}

impl From<u16> for EdnsCode {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Zero,
            3 => Self::NSID,
            8 => Self::Subnet,
            10 => Self::Cookie,
            11 => Self::Keepalive,
            12 => Self::Padding,
            _ => Self::Unknown(value),
        }
    }
}

impl From<EdnsCode> for u16 {
    fn from(value: EdnsCode) -> Self {
        match value {
            EdnsCode::Zero => 0,
            EdnsCode::NSID => 3,
            EdnsCode::Subnet => 8,
            EdnsCode::Cookie => 10,
            EdnsCode::Keepalive => 11,
            EdnsCode::Padding => 12,
            EdnsCode::Unknown(value) => value,
        }
    }
}

/// [RFC 7871, Client Subnet in DNS Queries](https://tools.ietf.org/html/rfc7871)
///
/// ```text
///                +0 (MSB)                            +1 (LSB)
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  0: |                            FAMILY                             |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  2: |     SOURCE PREFIX-LENGTH      |     SCOPE PREFIX-LENGTH       |
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
///  4: |                           ADDRESS...                          /
///     +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
/// ```
///
/// Family 1 is IPv4, family 2 is IPv6. The address octets on the wire are
/// left-aligned; missing trailing octets read as zero, and the full address
/// width is written on emit.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ClientSubnet {
    source_prefix: u8,
    scope_prefix: u8,
    address: IpAddr,
}

impl ClientSubnet {
    /// Creates a new option for the client subnet
    pub fn new(source_prefix: u8, scope_prefix: u8, address: IpAddr) -> Self {
        Self {
            source_prefix,
            scope_prefix,
            address,
        }
    }

    /// The address family of the subnet, 1 for IPv4 and 2 for IPv6
    pub fn family(&self) -> u16 {
        match self.address {
            IpAddr::V4(..) => 1,
            IpAddr::V6(..) => 2,
        }
    }

    /// Leftmost number of significant octets of the address in the query
    pub fn source_prefix(&self) -> u8 {
        self.source_prefix
    }

    /// Leftmost number of significant octets of the address in the response
    pub fn scope_prefix(&self) -> u8 {
        self.scope_prefix
    }

    /// The address of the subnet, zero-padded to the family's full width
    pub fn address(&self) -> IpAddr {
        self.address
    }

    fn try_from_wire(data: &[u8]) -> DnsResult<Self> {
        if data.len() < 4 {
            return Err("client subnet option too short".into());
        }

        let family = u16::from_be_bytes([data[0], data[1]]);
        let source_prefix = data[2];
        let scope_prefix = data[3];
        let addr_octets = &data[4..];

        let address = match family {
            1 => {
                if addr_octets.len() > 4 {
                    return Err("client subnet address exceeds IPv4 width".into());
                }
                let mut octets = [0_u8; 4];
                octets[..addr_octets.len()].copy_from_slice(addr_octets);
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            2 => {
                if addr_octets.len() > 16 {
                    return Err("client subnet address exceeds IPv6 width".into());
                }
                let mut octets = [0_u8; 16];
                octets[..addr_octets.len()].copy_from_slice(addr_octets);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
            family => {
                return Err(DnsErrorKind::Msg(format!(
                    "unsupported client subnet family: {family}"
                ))
                .into())
            }
        };

        Ok(Self {
            source_prefix,
            scope_prefix,
            address,
        })
    }

    fn emit_wire(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        encoder.emit_u16(self.family())?;
        encoder.emit_u8(self.source_prefix)?;
        encoder.emit_u8(self.scope_prefix)?;
        match self.address {
            IpAddr::V4(addr) => encoder.emit_vec(&addr.octets()),
            IpAddr::V6(addr) => encoder.emit_vec(&addr.octets()),
        }
    }

    fn wire_len(&self) -> u16 {
        match self.address {
            IpAddr::V4(..) => 4 + 4,
            IpAddr::V6(..) => 4 + 16,
        }
    }
}

/// options used to pass information about capabilities between client and server
///
/// `note: Not all EdnsOptions are supported at this time.`
///
/// <http://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-13>
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
#[non_exhaustive]
pub enum EdnsOption {
    /// [RFC 7871, Client Subnet, Optional](https://tools.ietf.org/html/rfc7871)
    Subnet(ClientSubnet),

    /// Unknown, used to deal with unknown or unsupported codes
    Unknown(u16, Vec<u8>),
}

impl EdnsOption {
    /// Returns the length in bytes of the EdnsOption
    pub fn len(&self) -> u16 {
        match self {
            Self::Subnet(subnet) => subnet.wire_len(),
            Self::Unknown(_, data) => data.len() as u16,
        }
    }

    /// Returns `true` if the length in bytes of the EdnsOption is 0
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BinEncodable for EdnsOption {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        match self {
            Self::Subnet(subnet) => subnet.emit_wire(encoder),
            Self::Unknown(_, data) => encoder.emit_vec(data),
        }
    }
}

/// only the supported extensions are parsed, everything else is kept raw
impl<'a> From<(EdnsCode, &'a [u8])> for EdnsOption {
    fn from(value: (EdnsCode, &'a [u8])) -> Self {
        match value.0 {
            EdnsCode::Subnet => match ClientSubnet::try_from_wire(value.1) {
                Ok(subnet) => Self::Subnet(subnet),
                Err(e) => {
                    warn!("malformed client subnet option, keeping raw: {}", e);
                    Self::Unknown(value.0.into(), value.1.to_vec())
                }
            },
            _ => Self::Unknown(value.0.into(), value.1.to_vec()),
        }
    }
}

impl<'a> From<&'a EdnsOption> for EdnsCode {
    fn from(value: &'a EdnsOption) -> Self {
        match value {
            EdnsOption::Subnet(..) => Self::Subnet,
            EdnsOption::Unknown(code, _) => (*code).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test() {
        let mut rdata = OPT::default();
        rdata.insert(EdnsOption::Unknown(
            10,
            vec![0x0b, 0x64, 0xb4, 0xdc, 0xd7, 0xb0, 0xcc, 0x8f],
        ));
        rdata.insert(EdnsOption::Subnet(ClientSubnet::new(
            24,
            0,
            IpAddr::V4(Ipv4Addr::new(192, 0, 2, 0)),
        )));

        let mut bytes = Vec::new();
        let mut encoder: BinEncoder<'_> = BinEncoder::new(&mut bytes);
        assert!(emit(&mut encoder, &rdata).is_ok());
        let bytes = encoder.into_bytes();

        let mut decoder: BinDecoder<'_> = BinDecoder::new(bytes);
        let read_rdata = read(&mut decoder, bytes.len() as u16).expect("Decoding error");
        assert_eq!(rdata, read_rdata);
    }

    #[test]
    fn test_wire_order_preserved() {
        // cookie, then keepalive with an empty payload
        let bytes: Vec<u8> = vec![
            0x00, 0x0a, 0x00, 0x08, 0x0b, 0x64, 0xb4, 0xdc, 0xd7, 0xb0, 0xcc, 0x8f, // cookie
            0x00, 0x0b, 0x00, 0x00, // keepalive, zero length
        ];

        let mut decoder: BinDecoder<'_> = BinDecoder::new(&bytes);
        let opt = read(&mut decoder, bytes.len() as u16).expect("Decoding error");

        assert_eq!(opt.len(), 2);
        assert_eq!(EdnsCode::from(&opt.options()[0]), EdnsCode::Cookie);
        assert_eq!(EdnsCode::from(&opt.options()[1]), EdnsCode::Keepalive);
        assert_eq!(opt.options()[1], EdnsOption::Unknown(11, vec![]));
    }

    #[test]
    fn test_option_length_overrun_rejected() {
        // option claims 8 bytes of payload, rdata has only 2 left
        let bytes: Vec<u8> = vec![0x00, 0x0a, 0x00, 0x08, 0x01, 0x02];

        let mut decoder: BinDecoder<'_> = BinDecoder::new(&bytes);
        assert!(read(&mut decoder, bytes.len() as u16).is_err());
    }

    #[test]
    fn test_client_subnet_padding() {
        // 24-bit IPv4 prefix: only three address octets on the wire
        let bytes: Vec<u8> = vec![0x00, 0x01, 24, 0, 192, 0, 2];
        let subnet = ClientSubnet::try_from_wire(&bytes).expect("Decoding error");

        assert_eq!(subnet.family(), 1);
        assert_eq!(subnet.source_prefix(), 24);
        assert_eq!(subnet.scope_prefix(), 0);
        assert_eq!(subnet.address(), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 0)));
    }

    #[test]
    fn test_client_subnet_unknown_family_kept_raw() {
        let bytes: Vec<u8> = vec![0x00, 0x03, 0, 0, 1, 2];
        let option = EdnsOption::from((EdnsCode::Subnet, &bytes[..]));
        assert_eq!(option, EdnsOption::Unknown(8, bytes));
    }
}
