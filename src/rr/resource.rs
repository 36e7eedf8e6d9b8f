// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! resource record implementation

use std::fmt;

use crate::error::*;
use crate::rr::domain::Name;
use crate::rr::record_data::RData;
use crate::rr::record_type::RecordType;
use crate::rr::CLASS_IN;
use crate::serialize::binary::*;

/// Resource records are storage value in DNS, into which all key/value pair data is stored.
///
/// [RFC 1035](https://tools.ietf.org/html/rfc1035), DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987
///
/// ```text
/// 4.1.3. Resource record format
///
/// The answer, authority, and additional sections all share the same
/// format: a variable number of resource records, where the number of
/// records is specified in the corresponding count field in the header.
/// Each resource record has the following format:
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                                               /
///     /                      NAME                     /
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     CLASS                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                      TTL                      |
///     |                                               |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                   RDLENGTH                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     /                     RDATA                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
/// ```
///
/// The class is consumed on decode and never exposed, IN being the only class
/// this crate speaks; the raw word is retained internally because the OPT
/// pseudo-RR overloads it with the requestor's payload size.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Record {
    name_labels: Name,
    rr_type: RecordType,
    class_value: u16,
    ttl: u32,
    rdata: RData,
}

impl Record {
    /// Creates a record with the specified initial values.
    ///
    /// # Arguments
    ///
    /// * `name` - name of the resource records
    /// * `ttl` - time-to-live is the amount of time this record should be cached before refreshing
    /// * `rdata` - record data to associate with the Record, the RecordType is derived from it
    pub fn from_rdata(name: Name, ttl: u32, rdata: RData) -> Self {
        Self {
            name_labels: name,
            rr_type: rdata.to_record_type(),
            class_value: CLASS_IN,
            ttl,
            rdata,
        }
    }

    /// Returns the name of the record
    #[inline]
    pub fn name(&self) -> &Name {
        &self.name_labels
    }

    /// Returns the type of the RecordData in the record
    #[inline]
    pub fn record_type(&self) -> RecordType {
        self.rr_type
    }

    /// Returns the time-to-live of the record, for caching purposes
    #[inline]
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Returns the Record Data, i.e. the record information
    #[inline]
    pub fn data(&self) -> &RData {
        &self.rdata
    }

    /// Returns the RData consuming the Record
    #[inline]
    pub fn into_data(self) -> RData {
        self.rdata
    }

    /// The raw class word from the wire. For an OPT pseudo-record this is the
    ///  requestor's maximum payload size.
    pub(crate) fn class_value(&self) -> u16 {
        self.class_value
    }

    pub(crate) fn set_class_value(&mut self, class_value: u16) {
        self.class_value = class_value;
    }
}

impl BinEncodable for Record {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        self.name_labels.emit(encoder)?;
        self.rr_type.emit(encoder)?;
        encoder.emit_u16(self.class_value)?;
        encoder.emit_u32(self.ttl)?;

        // place the RData length
        let place = encoder.place::<u16>();

        // write the RData
        self.rdata.emit(encoder)?;

        // get the length written
        let len = encoder.len_since_place(&place);
        assert!(len <= u16::MAX as usize);

        // replace the location with the length
        place.replace(encoder, len as u16)?;
        Ok(())
    }
}

impl BinDecodable for Record {
    /// parse a resource record from the decoder
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        // NAME            an owner name, i.e., the name of the node to which this
        //                 resource record pertains.
        let name_labels: Name = Name::read(decoder)?;

        // TYPE            two octets containing one of the RR TYPE codes.
        let rr_type: RecordType = RecordType::read(decoder)?;

        if rr_type == RecordType::OPT && !name_labels.is_root() {
            return Err("edns resource record label must be the root label (.)".into());
        }

        // CLASS           two octets containing one of the RR CLASS codes.
        //
        // accepted and discarded; for OPT this carries the payload size
        let class_value: u16 = decoder.read_u16()?;

        // TTL             a 32 bit unsigned integer that specifies the time
        //                 interval that the resource record may be cached;
        //                 for OPT this carries the extended RCODE and flags
        let ttl: u32 = decoder.read_u32()?;

        // RDLENGTH        an unsigned 16 bit integer that specifies the length in
        //                 octets of the RDATA field.
        let rd_length: u16 = decoder.read_u16()?;
        if rd_length as usize > decoder.len() {
            return Err(DnsErrorKind::Msg(format!(
                "rdata length too large for remaining bytes, need: {} remain: {}",
                rd_length,
                decoder.len()
            ))
            .into());
        }

        // RDATA           a variable length string of octets that describes the
        //                 resource.
        let rdata = RData::read(decoder, rr_type, rd_length)?;

        Ok(Self {
            name_labels,
            rr_type,
            class_value,
            ttl,
            rdata,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{name} {ttl} IN {typ} {rdata}",
            name = self.name_labels,
            ttl = self.ttl,
            typ = self.rr_type,
            rdata = self.rdata,
        )
    }
}
