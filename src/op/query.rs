// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Query struct for looking up resource records

use std::fmt;
use std::fmt::{Display, Formatter};

use crate::error::*;
use crate::rr::domain::Name;
use crate::rr::record_type::RecordType;
use crate::rr::CLASS_IN;
use crate::serialize::binary::*;

/// Query struct for looking up resource records, basically a resource record without RDATA.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1.2. Question section format
///
/// The question section is used to carry the "question" in most queries,
/// i.e., the parameters that define what is being asked.  The section
/// contains QDCOUNT (usually 1) entries, each of the following format:
///
///                                     1  1  1  1  1  1
///       0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                                               |
///     /                     QNAME                     /
///     /                                               /
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QTYPE                     |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///     |                     QCLASS                    |
///     +--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+--+
///
/// ```
///
/// The class is always IN; whatever class a response carries is consumed and
/// discarded on decode.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Query {
    name: Name,
    query_type: RecordType,
}

impl Default for Query {
    /// Return a default query with an empty name and A for the query_type
    fn default() -> Self {
        Self {
            name: Name::new(),
            query_type: RecordType::A,
        }
    }
}

impl Query {
    /// Return a default query with an empty name and A for the query_type
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new query from name and type
    #[allow(clippy::self_named_constructors)]
    pub fn query(name: Name, query_type: RecordType) -> Self {
        Self { name, query_type }
    }

    /// replaces name with the new name
    pub fn set_name(&mut self, name: Name) -> &mut Self {
        self.name = name;
        self
    }

    /// Specify the RecordType being queried
    pub fn set_query_type(&mut self, query_type: RecordType) -> &mut Self {
        self.query_type = query_type;
        self
    }

    /// ```text
    /// QNAME           a domain name represented as a sequence of labels, where
    ///                 each label consists of a length octet followed by that
    ///                 number of octets.
    /// ```
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// ```text
    /// QTYPE           a two octet code which specifies the type of the query.
    /// ```
    pub fn query_type(&self) -> RecordType {
        self.query_type
    }
}

impl BinEncodable for Query {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        self.name.emit(encoder)?;
        self.query_type.emit(encoder)?;
        encoder.emit_u16(CLASS_IN)?;

        Ok(())
    }
}

impl BinDecodable for Query {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        let name = Name::read(decoder)?;
        let query_type = RecordType::read(decoder)?;

        // QCLASS is accepted and discarded
        let _query_class = decoder.read_u16()?;

        Ok(Self { name, query_type })
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "name: {} type: {} class: IN",
            self.name, self.query_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_read_and_emit() {
        let expect = Query::query(
            Name::from_str("WWW.example.com.").unwrap(),
            RecordType::AAAA,
        );

        let mut byte_vec: Vec<u8> = Vec::with_capacity(512);
        {
            let mut encoder = BinEncoder::new(&mut byte_vec);
            expect.emit(&mut encoder).unwrap();
        }

        let mut decoder = BinDecoder::new(&byte_vec);
        let got = Query::read(&mut decoder).unwrap();
        assert_eq!(got, expect);
    }

    #[test]
    fn test_foreign_class_discarded() {
        let mut byte_vec: Vec<u8> = Vec::new();
        {
            let mut encoder = BinEncoder::new(&mut byte_vec);
            Query::query(Name::from_str("a.b.").unwrap(), RecordType::A)
                .emit(&mut encoder)
                .unwrap();
        }

        // flip the class to CH; the query must still decode
        let class_offset = byte_vec.len() - 2;
        byte_vec[class_offset] = 0;
        byte_vec[class_offset + 1] = 3;

        let mut decoder = BinDecoder::new(&byte_vec);
        let got = Query::read(&mut decoder).unwrap();
        assert_eq!(got.query_type(), RecordType::A);
    }
}
