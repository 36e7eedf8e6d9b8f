// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! UDP query transactions against the configured nameserver

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::ResolvSeed;
use crate::error::*;
use crate::op::{Message, Query};
use crate::rr::rdata::{MX, SRV, TXT};
use crate::rr::{Name, RData, Record, RecordType};

/// Datagrams beyond this size are truncated by the socket. Large enough for
/// any answer a sane server sends without EDNS size negotiation.
const MAX_RECEIVE_BUF_SIZE: usize = 4096;

/// A stub resolver bound to a single nameserver over one UDP socket.
///
/// The socket lives for exactly one [`with_resolver`] scope and is closed on
/// every exit path. A `Resolver` is **not** safe for concurrent use: every
/// operation takes `&mut self`, so the borrow checker enforces the
/// serialization the socket requires. Hand each thread its own `Resolver`
/// (see [`with_resolvers`]) for parallel resolution.
pub struct Resolver {
    socket: UdpSocket,
    nameserver: SocketAddr,
    timeout: Duration,
    attempts: usize,
}

impl Resolver {
    fn open(seed: &ResolvSeed) -> DnsResult<Self> {
        let bind_addr: SocketAddr = match seed.nameserver() {
            SocketAddr::V4(..) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(..) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let socket = UdpSocket::bind(bind_addr).map_err(DnsErrorKind::from)?;
        socket
            .connect(seed.nameserver())
            .map_err(DnsErrorKind::from)?;
        socket
            .set_read_timeout(Some(seed.timeout()))
            .map_err(DnsErrorKind::from)?;

        Ok(Self {
            socket,
            nameserver: seed.nameserver(),
            timeout: seed.timeout(),
            attempts: seed.attempts(),
        })
    }

    /// The nameserver this resolver queries
    pub fn nameserver(&self) -> SocketAddr {
        self.nameserver
    }

    /// Performs one query transaction and returns the decoded response
    /// message as the server sent it, response code and all.
    pub fn lookup_raw(&mut self, domain: &str, record_type: RecordType) -> DnsResult<Message> {
        self.transaction(domain, record_type, false)
    }

    /// Same as [`Resolver::lookup_raw`], with the AD (authentic data) bit set
    /// in the query. Signatures are not validated by this crate; the answer's
    /// AD bit is the upstream resolver's claim.
    pub fn lookup_raw_ad(&mut self, domain: &str, record_type: RecordType) -> DnsResult<Message> {
        self.transaction(domain, record_type, true)
    }

    /// Looks up the record data of `record_type` for `domain`.
    ///
    /// A non-zero response code maps onto the matching [`DnsErrorKind`];
    /// otherwise the answer section is projected down to the RDATA of the
    /// records whose type equals `record_type`, in wire order. Records are
    /// deliberately not filtered by name.
    pub fn lookup(&mut self, domain: &str, record_type: RecordType) -> DnsResult<Vec<RData>> {
        let message = self.lookup_raw(domain, record_type)?;
        project(message, record_type, Section::Answer)
    }

    /// Same as [`Resolver::lookup`], projecting the authority section
    /// instead of the answers.
    pub fn lookup_auth(&mut self, domain: &str, record_type: RecordType) -> DnsResult<Vec<RData>> {
        let message = self.lookup_raw(domain, record_type)?;
        project(message, record_type, Section::Authority)
    }

    /// Looks up the IPv4 addresses of the domain
    pub fn lookup_a(&mut self, domain: &str) -> DnsResult<Vec<Ipv4Addr>> {
        let rdata = self.lookup(domain, RecordType::A)?;
        Ok(rdata.into_iter().filter_map(|r| r.into_a().ok()).collect())
    }

    /// Looks up the IPv6 addresses of the domain
    pub fn lookup_aaaa(&mut self, domain: &str) -> DnsResult<Vec<Ipv6Addr>> {
        let rdata = self.lookup(domain, RecordType::AAAA)?;
        Ok(rdata
            .into_iter()
            .filter_map(|r| r.into_aaaa().ok())
            .collect())
    }

    /// Looks up the nameservers of the domain
    pub fn lookup_ns(&mut self, domain: &str) -> DnsResult<Vec<Name>> {
        let rdata = self.lookup(domain, RecordType::NS)?;
        Ok(rdata.into_iter().filter_map(|r| r.into_ns().ok()).collect())
    }

    /// Looks up the mail exchangers of the domain
    pub fn lookup_mx(&mut self, domain: &str) -> DnsResult<Vec<MX>> {
        let rdata = self.lookup(domain, RecordType::MX)?;
        Ok(rdata.into_iter().filter_map(|r| r.into_mx().ok()).collect())
    }

    /// Looks up the text records of the domain
    pub fn lookup_txt(&mut self, domain: &str) -> DnsResult<Vec<TXT>> {
        let rdata = self.lookup(domain, RecordType::TXT)?;
        Ok(rdata.into_iter().filter_map(|r| r.into_txt().ok()).collect())
    }

    /// Looks up the service records of the domain
    pub fn lookup_srv(&mut self, domain: &str) -> DnsResult<Vec<SRV>> {
        let rdata = self.lookup(domain, RecordType::SRV)?;
        Ok(rdata.into_iter().filter_map(|r| r.into_srv().ok()).collect())
    }

    /// One full transaction: send the query, await the matching response.
    ///
    /// Per attempt, the state machine is send, then bounded receive, then one
    /// of matched, timeout, or id mismatch. A timeout and a mismatched id
    /// both consume one attempt; a malformed datagram or a socket error ends
    /// the transaction immediately.
    fn transaction(
        &mut self,
        domain: &str,
        record_type: RecordType,
        authentic_data: bool,
    ) -> DnsResult<Message> {
        // reject illegal names before any I/O happens
        let name = check_domain(domain)?;

        let id: u16 = rand::random();
        let query_bytes =
            Message::query_message(id, Query::query(name, record_type), authentic_data).to_vec()?;

        let mut recv_buf = [0_u8; MAX_RECEIVE_BUF_SIZE];
        let mut saw_mismatch = false;

        for attempt in 0..self.attempts {
            debug!(
                "sending query id: {} for {} {} to {} (attempt {}/{})",
                id,
                domain,
                record_type,
                self.nameserver,
                attempt + 1,
                self.attempts
            );
            self.socket.send(&query_bytes).map_err(DnsErrorKind::from)?;

            let len = match self.socket.recv(&mut recv_buf) {
                Ok(len) => len,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                    ) =>
                {
                    debug!("no response within {:?}", self.timeout);
                    continue;
                }
                Err(e) => return Err(DnsErrorKind::from(e).into()),
            };

            // a malformed response is surfaced right away, not retried
            let response = Message::from_vec(&recv_buf[..len])?;

            if response.id() == id {
                debug!("received response id: {}", response.id());
                return Ok(response);
            }

            // on wrong id, attempted poison?
            warn!("expected message id: {} got: {}, dropped", id, response.id());
            saw_mismatch = true;
        }

        if saw_mismatch {
            Err(DnsErrorKind::SequenceNumberMismatch.into())
        } else {
            Err(DnsErrorKind::TimeoutExpired.into())
        }
    }
}

/// Opens a socket to the seed's nameserver and hands the resolver to the
/// closure. The socket is closed when the scope exits, on every path.
pub fn with_resolver<R>(seed: &ResolvSeed, f: impl FnOnce(&mut Resolver) -> R) -> DnsResult<R> {
    let mut resolver = Resolver::open(seed)?;
    Ok(f(&mut resolver))
}

/// Opens one socket per seed and hands all the resolvers to the closure.
///
/// Either all sockets open, or the error of the first failure is returned
/// with every already-opened socket closed. Each `Resolver` is independent;
/// moving them to separate threads (e.g. with `std::thread::scope`) gives
/// parallel resolution without sharing a socket.
pub fn with_resolvers<R>(
    seeds: &[ResolvSeed],
    f: impl FnOnce(&mut [Resolver]) -> R,
) -> DnsResult<R> {
    let mut resolvers = Vec::with_capacity(seeds.len());
    for seed in seeds {
        resolvers.push(Resolver::open(seed)?);
    }

    Ok(f(&mut resolvers))
}

enum Section {
    Answer,
    Authority,
}

/// Maps the response code, then keeps the RDATA of the section's records
/// whose type matches the query, preserving wire order.
fn project(mut message: Message, record_type: RecordType, section: Section) -> DnsResult<Vec<RData>> {
    if let Some(kind) = DnsErrorKind::from_response_code(message.response_code()) {
        return Err(kind.into());
    }

    let records = match section {
        Section::Answer => message.take_answers(),
        Section::Authority => message.take_name_servers(),
    };

    Ok(records
        .into_iter()
        .filter(|record| record.record_type() == record_type)
        .map(Record::into_data)
        .collect())
}

/// The syntactic checks a query name must pass before any I/O:
/// non-empty, dotted, free of `:` and `/`, no longer than 253 octets, and no
/// label longer than 63 octets.
fn check_domain(domain: &str) -> DnsResult<Name> {
    let illegal = |why: &str| {
        DnsError::from(DnsErrorKind::IllegalDomain(format!("{domain:?}: {why}")))
    };

    if domain.is_empty() {
        return Err(illegal("empty"));
    }
    if !domain.contains('.') {
        return Err(illegal("no dot"));
    }
    if domain.contains(':') || domain.contains('/') {
        return Err(illegal("illegal character"));
    }
    if domain.len() > 253 {
        return Err(illegal("longer than 253 octets"));
    }
    if domain.split('.').any(|label| label.len() > 63) {
        return Err(illegal("label longer than 63 octets"));
    }

    Name::parse(domain).map_err(|_| illegal("malformed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_domain_accepts() {
        assert!(check_domain("www.example.com").is_ok());
        assert!(check_domain("www.example.com.").is_ok());
        assert!(check_domain("xn--caf-dma.example").is_ok());
    }

    #[test]
    fn test_check_domain_rejects() {
        let too_long = "x.".repeat(127);
        let long_label = format!("{}.com", "x".repeat(64));
        let cases = [
            "",                   // empty
            "foo",                // no dot
            "example.com/path",   // illegal character
            "fe80::1",            // illegal character (and numeric)
            too_long.as_str(),    // 254 octets in total
            long_label.as_str(),  // label too long
            "a..b",               // empty label
        ];

        for case in cases {
            let err = check_domain(case).unwrap_err();
            assert!(
                matches!(err.kind(), DnsErrorKind::IllegalDomain(..)),
                "{case:?} should be illegal, got {err}"
            );
        }
    }
}
