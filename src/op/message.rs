// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Basic protocol message for DNS

use std::fmt;
use std::mem;

use crate::error::*;
use crate::rr::{Record, RecordType};
use crate::serialize::binary::{BinDecodable, BinDecoder, BinEncodable, BinEncoder};

use super::{Edns, Header, MessageType, OpCode, Query, ResponseCode};

/// The basic request and response datastructure, used for all DNS protocols.
///
/// [RFC 1035, DOMAIN NAMES - IMPLEMENTATION AND SPECIFICATION, November 1987](https://tools.ietf.org/html/rfc1035)
///
/// ```text
/// 4.1. Format
///
/// All communications inside of the domain protocol are carried in a single
/// format called a message.  The top level format of message is divided
/// into 5 sections (some of which are empty in certain cases) shown below:
///
///     +--------------------------+
///     |        Header            |
///     +--------------------------+
///     |        Question          | the question for the name server
///     +--------------------------+
///     |        Answer            | RRs answering the question
///     +--------------------------+
///     |        Authority         | RRs pointing toward an authority
///     +--------------------------+
///     |        Additional        | RRs holding additional information
///     +--------------------------+
///
/// The header section is always present.  The header includes fields that
/// specify which of the remaining sections are present, and also specify
/// whether the message is a query or a response, a standard query or some
/// other opcode, etc.
/// ```
///
/// The section counts in the header are derived from the section lengths on
/// encode, and drive the decoding of a received message. An OPT pseudo-record
/// found in the additional section is lifted into the [`Edns`] field.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Message {
    header: Header,
    queries: Vec<Query>,
    answers: Vec<Record>,
    name_servers: Vec<Record>,
    additionals: Vec<Record>,
    edns: Option<Edns>,
}

impl Message {
    /// Returns a new "empty" Message
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a standard query message for the name and type.
    ///
    /// QR is query, OPCODE is standard, RD is set; every other flag is clear
    ///  unless `authentic_data` asks for the AD bit. A single question, all
    ///  other sections empty, and no EDNS OPT appended.
    pub fn query_message(id: u16, query: Query, authentic_data: bool) -> Self {
        let mut message = Self::new();
        message
            .set_id(id)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true)
            .set_authentic_data(authentic_data)
            .add_query(query);
        message
    }

    /// see `Header::set_id`
    pub fn set_id(&mut self, id: u16) -> &mut Self {
        self.header.set_id(id);
        self
    }

    /// see `Header::set_message_type`
    pub fn set_message_type(&mut self, message_type: MessageType) -> &mut Self {
        self.header.set_message_type(message_type);
        self
    }

    /// see `Header::set_op_code`
    pub fn set_op_code(&mut self, op_code: OpCode) -> &mut Self {
        self.header.set_op_code(op_code);
        self
    }

    /// see `Header::set_authoritative`
    pub fn set_authoritative(&mut self, authoritative: bool) -> &mut Self {
        self.header.set_authoritative(authoritative);
        self
    }

    /// see `Header::set_truncated`
    pub fn set_truncated(&mut self, truncated: bool) -> &mut Self {
        self.header.set_truncated(truncated);
        self
    }

    /// see `Header::set_recursion_desired`
    pub fn set_recursion_desired(&mut self, recursion_desired: bool) -> &mut Self {
        self.header.set_recursion_desired(recursion_desired);
        self
    }

    /// see `Header::set_recursion_available`
    pub fn set_recursion_available(&mut self, recursion_available: bool) -> &mut Self {
        self.header.set_recursion_available(recursion_available);
        self
    }

    /// see `Header::set_authentic_data`
    pub fn set_authentic_data(&mut self, authentic_data: bool) -> &mut Self {
        self.header.set_authentic_data(authentic_data);
        self
    }

    /// see `Header::set_checking_disabled`
    pub fn set_checking_disabled(&mut self, checking_disabled: bool) -> &mut Self {
        self.header.set_checking_disabled(checking_disabled);
        self
    }

    /// see `Header::set_response_code`
    pub fn set_response_code(&mut self, response_code: ResponseCode) -> &mut Self {
        self.header.set_response_code(response_code);
        self
    }

    /// Add a query to the Message, either the query response from the server, or the request Query.
    pub fn add_query(&mut self, query: Query) -> &mut Self {
        self.queries.push(query);
        self
    }

    /// Add an answer to the Message
    pub fn add_answer(&mut self, record: Record) -> &mut Self {
        self.answers.push(record);
        self
    }

    /// Add a name server record to the Message
    pub fn add_name_server(&mut self, record: Record) -> &mut Self {
        self.name_servers.push(record);
        self
    }

    /// Add an additional Record to the message
    pub fn add_additional(&mut self, record: Record) -> &mut Self {
        self.additionals.push(record);
        self
    }

    /// Add the EDNS section to the Message
    pub fn set_edns(&mut self, edns: Edns) -> &mut Self {
        self.edns = Some(edns);
        self
    }

    /// see `Header::id()`
    pub fn id(&self) -> u16 {
        self.header.id()
    }

    /// see `Header::message_type()`
    pub fn message_type(&self) -> MessageType {
        self.header.message_type()
    }

    /// see `Header::op_code()`
    pub fn op_code(&self) -> OpCode {
        self.header.op_code()
    }

    /// see `Header::authoritative()`
    pub fn authoritative(&self) -> bool {
        self.header.authoritative()
    }

    /// see `Header::truncated()`
    pub fn truncated(&self) -> bool {
        self.header.truncated()
    }

    /// see `Header::recursion_desired()`
    pub fn recursion_desired(&self) -> bool {
        self.header.recursion_desired()
    }

    /// see `Header::recursion_available()`
    pub fn recursion_available(&self) -> bool {
        self.header.recursion_available()
    }

    /// see `Header::authentic_data()`
    pub fn authentic_data(&self) -> bool {
        self.header.authentic_data()
    }

    /// see `Header::checking_disabled()`
    pub fn checking_disabled(&self) -> bool {
        self.header.checking_disabled()
    }

    /// The header of the message
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// # Return value
    ///
    /// The `ResponseCode`, if this is an EDNS message then this will join the
    ///  extended code from the OPT record to create the full 12 bit code.
    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from(
            self.edns.as_ref().map_or(0, Edns::rcode_high),
            self.header.response_code().low(),
        )
    }

    /// ```text
    /// Question        Carries the query name and other query parameters.
    /// ```
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// ```text
    /// Answer          Carries RRs which directly answer the query.
    /// ```
    pub fn answers(&self) -> &[Record] {
        &self.answers
    }

    /// Removes all the answers from the Message
    pub fn take_answers(&mut self) -> Vec<Record> {
        mem::take(&mut self.answers)
    }

    /// ```text
    /// Authority       Carries RRs which describe other authoritative servers.
    ///                 May optionally carry the SOA RR for the authoritative
    ///                 data in the answer section.
    /// ```
    pub fn name_servers(&self) -> &[Record] {
        &self.name_servers
    }

    /// Removes all the authority records from the Message
    pub fn take_name_servers(&mut self) -> Vec<Record> {
        mem::take(&mut self.name_servers)
    }

    /// ```text
    /// Additional      Carries RRs which may be helpful in using the RRs in the
    ///                 other sections.
    /// ```
    pub fn additionals(&self) -> &[Record] {
        &self.additionals
    }

    /// [RFC 6891, EDNS(0) Extensions, April 2013](https://tools.ietf.org/html/rfc6891#section-6.1.1)
    ///
    /// # Return value
    ///
    /// Returns the EDNS record if it was found in the additional section.
    pub fn edns(&self) -> Option<&Edns> {
        self.edns.as_ref()
    }

    /// If edns is_none, this will create a new default Edns.
    pub fn edns_mut(&mut self) -> &mut Edns {
        self.edns.get_or_insert_with(Edns::new)
    }

    /// this is necessary to match the counts in the header from the record sections
    ///  this happens implicitly on emit, so no need to call before to_vec
    #[cfg(test)]
    pub fn update_counts(&mut self) -> &mut Self {
        self.header = self.update_header_counts();
        self
    }

    fn update_header_counts(&self) -> Header {
        assert!(self.queries.len() <= u16::MAX as usize);
        assert!(self.answers.len() <= u16::MAX as usize);
        assert!(self.name_servers.len() <= u16::MAX as usize);
        assert!(self.additionals.len() < u16::MAX as usize);

        let mut additional_count = self.additionals.len();

        if self.edns.is_some() {
            additional_count += 1
        }

        let mut header = self.header;
        header
            .set_query_count(self.queries.len() as u16)
            .set_answer_count(self.answers.len() as u16)
            .set_name_server_count(self.name_servers.len() as u16)
            .set_additional_count(additional_count as u16);
        header
    }

    fn read_records(
        decoder: &mut BinDecoder<'_>,
        count: usize,
        is_additional: bool,
    ) -> DnsResult<(Vec<Record>, Option<Edns>)> {
        let mut records: Vec<Record> = Vec::with_capacity(count);
        let mut edns: Option<Edns> = None;

        for _ in 0..count {
            let record = Record::read(decoder)?;

            if is_additional && record.record_type() == RecordType::OPT {
                if edns.is_some() {
                    return Err("more than one edns record present".into());
                }
                edns = Some((&record).into());
            } else {
                records.push(record);
            }
        }

        Ok((records, edns))
    }

    fn emit_records(encoder: &mut BinEncoder<'_>, records: &[Record]) -> DnsResult<()> {
        for r in records {
            r.emit(encoder)?;
        }
        Ok(())
    }

    /// Decodes a message from the buffer.
    pub fn from_vec(buffer: &[u8]) -> DnsResult<Self> {
        Self::from_bytes(buffer)
    }

    /// Encodes the Message into a buffer
    pub fn to_vec(&self) -> DnsResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(512);
        {
            let mut encoder = BinEncoder::new(&mut buffer);
            self.emit(&mut encoder)?;
        }

        Ok(buffer)
    }
}

impl BinDecodable for Message {
    fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Self> {
        let header = Header::read(decoder)?;

        // get the questions
        let count = header.query_count() as usize;
        let mut queries = Vec::with_capacity(count);
        for _ in 0..count {
            queries.push(Query::read(decoder)?);
        }

        // the counts drive how much of each section is read
        let answer_count = header.answer_count() as usize;
        let name_server_count = header.name_server_count() as usize;
        let additional_count = header.additional_count() as usize;

        let (answers, _) = Self::read_records(decoder, answer_count, false)?;
        let (name_servers, _) = Self::read_records(decoder, name_server_count, false)?;
        let (additionals, edns) = Self::read_records(decoder, additional_count, true)?;

        Ok(Self {
            header,
            queries,
            answers,
            name_servers,
            additionals,
            edns,
        })
    }
}

impl BinEncodable for Message {
    fn emit(&self, encoder: &mut BinEncoder<'_>) -> DnsResult<()> {
        // write the header with the counts from the sections
        self.update_header_counts().emit(encoder)?;

        for q in &self.queries {
            q.emit(encoder)?;
        }

        Self::emit_records(encoder, &self.answers)?;
        Self::emit_records(encoder, &self.name_servers)?;
        Self::emit_records(encoder, &self.additionals)?;

        if let Some(edns) = self.edns() {
            edns.emit(encoder)?;
        }

        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        writeln!(f, "; header: {}", self.header)?;

        for query in &self.queries {
            writeln!(f, "; query: {query}")?;
        }
        for answer in &self.answers {
            writeln!(f, "{answer}")?;
        }
        for name_server in &self.name_servers {
            writeln!(f, "{name_server}")?;
        }
        for additional in &self.additionals {
            writeln!(f, "{additional}")?;
        }
        if let Some(edns) = &self.edns {
            writeln!(f, "; edns: {edns}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::str::FromStr;

    use super::*;
    use crate::rr::rdata::opt::{ClientSubnet, EdnsOption};
    use crate::rr::{Name, RData, RecordType};

    fn test_emit_and_read(message: Message) {
        let byte_vec = message.to_vec().unwrap();

        let got = Message::from_vec(&byte_vec).unwrap();

        assert_eq!(got, message);
    }

    #[test]
    fn test_emit_and_read_header() {
        let mut message = Message::new();
        message
            .set_id(10)
            .set_message_type(MessageType::Response)
            .set_op_code(OpCode::Update)
            .set_authoritative(true)
            .set_truncated(true)
            .set_recursion_desired(true)
            .set_recursion_available(true)
            .set_response_code(ResponseCode::ServFail)
            .update_counts();

        test_emit_and_read(message);
    }

    #[test]
    fn test_emit_and_read_query() {
        let mut message = Message::new();
        message
            .set_id(10)
            .set_message_type(MessageType::Response)
            .set_authentic_data(true)
            .set_checking_disabled(true)
            .set_response_code(ResponseCode::ServFail)
            .add_query(Query::query(
                Name::from_str("www.example.com.").unwrap(),
                RecordType::A,
            ))
            .update_counts();

        test_emit_and_read(message);
    }

    #[test]
    fn test_emit_and_read_records() {
        let mut message = Message::new();
        message
            .set_id(10)
            .set_message_type(MessageType::Response)
            .set_recursion_desired(true)
            .set_recursion_available(true);

        let record = Record::from_rdata(
            Name::from_str("www.example.com.").unwrap(),
            86400,
            RData::A(Ipv4Addr::new(93, 184, 216, 34)),
        );

        message.add_answer(record.clone());
        message.add_name_server(record.clone());
        message.add_additional(record);
        message.update_counts(); // needed for the comparison...

        test_emit_and_read(message);
    }

    #[test]
    fn test_emit_and_read_edns() {
        let mut message = Message::new();
        message.set_id(10).set_message_type(MessageType::Response);

        {
            let edns = message.edns_mut();
            edns.set_max_payload(4096);
            edns.set_dnssec_ok(true);
            edns.options_mut().insert(EdnsOption::Subnet(ClientSubnet::new(
                24,
                0,
                Ipv4Addr::new(192, 0, 2, 0).into(),
            )));
        }
        message.update_counts();

        test_emit_and_read(message);
    }

    #[test]
    fn test_query_message_shape() {
        let query = Query::query(Name::from_str("www.example.com.").unwrap(), RecordType::A);
        let message = Message::query_message(0xCAFE, query.clone(), false);

        let byte_vec = message.to_vec().unwrap();
        let got = Message::from_vec(&byte_vec).unwrap();

        assert_eq!(got.id(), 0xCAFE);
        assert_eq!(got.message_type(), MessageType::Query);
        assert_eq!(got.op_code(), OpCode::Query);
        assert!(got.recursion_desired());
        assert!(!got.authentic_data());
        assert_eq!(got.queries(), &[query]);
        assert_eq!(got.answers().len(), 0);
        assert_eq!(got.name_servers().len(), 0);
        assert_eq!(got.additionals().len(), 0);
        assert!(got.edns().is_none());

        // the AD variant differs in exactly the one bit
        let query = Query::query(Name::from_str("www.example.com.").unwrap(), RecordType::A);
        let message = Message::query_message(0xCAFE, query, true);
        let got = Message::from_vec(&message.to_vec().unwrap()).unwrap();
        assert!(got.authentic_data());
    }

    #[test]
    fn test_legit_message() {
        #[rustfmt::skip]
        let buf: Vec<u8> = vec![
            0x10, 0x00, 0x81, 0x80, // id = 4096, response, op=query, rd, ra, no_error
            0x00, 0x01, 0x00, 0x01, // 1 query, 1 answer,
            0x00, 0x00, 0x00, 0x00, // 0 nameservers, 0 additional records

            0x03, b'w', b'w', b'w', // query -- www.example.com
            0x07, b'e', b'x', b'a', //
            b'm', b'p', b'l', b'e', //
            0x03, b'c', b'o', b'm', //
            0x00,                   // 0 = endname
            0x00, 0x01, 0x00, 0x01, // RecordType = A, Class = IN

            0xC0, 0x0C,             // name pointer to www.example.com
            0x00, 0x01, 0x00, 0x01, // RecordType = A, Class = IN
            0x00, 0x00, 0x00, 0x02, // TTL = 2 seconds
            0x00, 0x04,             // record length = 4 (ipv4 address)
            0x5D, 0xB8, 0xD8, 0x22, // address = 93.184.216.34
        ];

        let message = Message::from_vec(&buf).unwrap();

        assert_eq!(message.id(), 4096);
        assert_eq!(message.response_code(), ResponseCode::NoError);
        assert_eq!(message.answers().len(), 1);
        assert_eq!(
            message.answers()[0].name(),
            &Name::from_str("www.example.com.").unwrap()
        );
        assert_eq!(
            message.answers()[0].data(),
            &RData::A(Ipv4Addr::new(93, 184, 216, 34))
        );

        // re-encode (uncompressed) and decode again
        let buf = message.to_vec().unwrap();
        let reread = Message::from_vec(&buf).unwrap();
        assert_eq!(reread.id(), 4096);
        assert_eq!(reread.answers(), message.answers());
    }

    #[test]
    fn test_second_question_compressed_into_first() {
        #[rustfmt::skip]
        let buf: Vec<u8> = vec![
            0xAB, 0xCD, 0x00, 0x00, // id, query
            0x00, 0x02, 0x00, 0x00, // 2 queries
            0x00, 0x00, 0x00, 0x00,

            0x03, b'w', b'w', b'w', // www.example.com A
            0x07, b'e', b'x', b'a',
            b'm', b'p', b'l', b'e',
            0x03, b'c', b'o', b'm',
            0x00,
            0x00, 0x01, 0x00, 0x01,

            0xC0, 0x0C,             // same name again, as a pointer
            0x00, 0x1C, 0x00, 0x01, // AAAA
        ];

        let mut decoder = BinDecoder::new(&buf);
        let message = Message::read(&mut decoder).unwrap();

        assert_eq!(message.queries().len(), 2);
        assert_eq!(message.queries()[0].name(), message.queries()[1].name());
        assert_eq!(message.queries()[1].query_type(), RecordType::AAAA);
        assert!(decoder.pointer_cache_hits() >= 1);
    }

    #[test]
    fn test_extended_rcode_badvers() {
        let mut message = Message::new();
        message.set_id(1).set_message_type(MessageType::Response);
        message.edns_mut().set_rcode_high(1);
        message.update_counts();

        // low nibble reads NoError on its own, the join reveals BADVERS
        assert_eq!(message.header().response_code(), ResponseCode::NoError);
        assert_eq!(message.response_code(), ResponseCode::BADVERS);

        let bytes = message.to_vec().unwrap();
        let got = Message::from_vec(&bytes).unwrap();
        assert_eq!(got.response_code(), ResponseCode::BADVERS);
    }

    #[test]
    fn test_counts_drive_decoding() {
        // header promises one answer, none present
        let buf: Vec<u8> = vec![
            0x00, 0x01, 0x80, 0x00, // id 1, response
            0x00, 0x00, 0x00, 0x01, // 0 queries, 1 answer
            0x00, 0x00, 0x00, 0x00,
        ];

        assert!(Message::from_vec(&buf).is_err());
    }

    #[test]
    fn test_double_opt_rejected() {
        let mut message = Message::new();
        message.set_id(7).set_message_type(MessageType::Response);
        message.edns_mut().set_max_payload(512);
        message.update_counts();

        let mut bytes = message.to_vec().unwrap();

        // append a second OPT record and bump ARCOUNT by hand
        let opt_bytes: Vec<u8> = vec![0, 0, 41, 2, 0, 0, 0, 0, 0, 0, 0];
        bytes.extend_from_slice(&opt_bytes);
        bytes[11] = 2;

        assert!(Message::from_vec(&bytes).is_err());
    }
}
