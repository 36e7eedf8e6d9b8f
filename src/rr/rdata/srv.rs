// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! service records for identifying the port of well known services

use std::fmt;

use crate::error::*;
use crate::rr::domain::Name;
use crate::serialize::binary::*;

/// [RFC 2782, DNS SRV RR, February 2000](https://tools.ietf.org/html/rfc2782)
///
/// ```text
/// The format of the SRV RR
///
///  _Service._Proto.Name TTL Class SRV Priority Weight Port Target
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct SRV {
    priority: u16,
    weight: u16,
    port: u16,
    target: Name,
}

impl SRV {
    /// Creates a new SRV record data.
    ///
    /// # Arguments
    ///
    /// * `priority` - lower values have a higher priority and clients will attempt connections to those records first.
    /// * `weight` - for servers with the same priority, higher weights will be chosen more often.
    /// * `port` - the socket port number on which the service is listening.
    /// * `target` - like CNAME, the target domain name of the host of the service.
    pub fn new(priority: u16, weight: u16, port: u16, target: Name) -> Self {
        Self {
            priority,
            weight,
            port,
            target,
        }
    }

    /// The priority of this target host
    ///
    /// A client MUST attempt to contact the target host with the
    ///  lowest-numbered priority it can reach.
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// A server selection mechanism, specifying a relative weight for entries
    ///  with the same priority.
    pub fn weight(&self) -> u16 {
        self.weight
    }

    /// The port on this target host of this service.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The domain name of the target host
    pub fn target(&self) -> &Name {
        &self.target
    }
}

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<SRV> {
    Ok(SRV::new(
        decoder.read_u16()?,
        decoder.read_u16()?,
        decoder.read_u16()?,
        Name::read(decoder)?,
    ))
}

/// Write the RData from the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, srv: &SRV) -> DnsResult<()> {
    encoder.emit_u16(srv.priority())?;
    encoder.emit_u16(srv.weight())?;
    encoder.emit_u16(srv.port())?;
    srv.target().emit(encoder)?;
    Ok(())
}

impl fmt::Display for SRV {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{priority} {weight} {port} {target}",
            priority = self.priority,
            weight = self.weight,
            port = self.port,
            target = self.target,
        )
    }
}
