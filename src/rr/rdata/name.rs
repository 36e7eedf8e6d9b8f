// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Record type for all cname like records.
//!
//! A generic struct for all {*}NAME pointer RData records: NS, CNAME, PTR and
//! DNAME carry a single domain name as their payload.

use crate::error::*;
use crate::rr::domain::Name;
use crate::serialize::binary::*;

/// Read the RData from the given Decoder
pub fn read(decoder: &mut BinDecoder<'_>) -> DnsResult<Name> {
    Name::read(decoder)
}

/// Write the RData from the given Encoder
pub fn emit(encoder: &mut BinEncoder<'_>, name: &Name) -> DnsResult<()> {
    name.emit(encoder)
}
