// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The stub client: resolver configuration and the UDP query transaction.
//!
//! ```no_run
//! use stub_dns::client::{with_resolver, ResolvSeed};
//!
//! # fn main() -> stub_dns::DnsResult<()> {
//! let seed = ResolvSeed::system()?;
//! let addresses = with_resolver(&seed, |resolver| {
//!     resolver.lookup_a("www.example.com")
//! })??;
//! println!("{addresses:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod resolver;

pub use self::config::{NameserverSource, ResolvConf, ResolvSeed};
pub use self::resolver::{with_resolver, with_resolvers, Resolver};
