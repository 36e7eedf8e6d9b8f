// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![warn(missing_docs, clippy::print_stdout)]

//! Stub-DNS is a stub DNS resolver library.
//!
//! It constructs DNS queries, sends them over UDP to a configured recursive
//! resolver, awaits a matching response under a timeout and retry budget, and
//! decodes the response into a structured [`Message`](op::Message). It is a
//! client for applications that want explicit control over the resolver
//! address, timeout, and retries; it is not a caching or recursive server,
//! and recursion is delegated upstream via the RD bit.
//!
//! The pieces:
//!
//! * [`serialize::binary`] - the RFC 1035 wire codec primitives, including
//!   the name decompression pointer cache
//! * [`rr`] - domain names, record types, and the RDATA variants
//! * [`op`] - the message, header, question, and EDNS(0) types
//! * [`client`] - the resolver seed, the scoped socket owner, and the lookup
//!   operations

pub mod client;
mod error;
pub mod op;
pub mod rr;
pub mod serialize;

pub use error::{DnsError, DnsErrorKind, DnsResult};
