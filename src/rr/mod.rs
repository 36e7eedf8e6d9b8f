// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Resource record related components, e.g. `Name` aka label, `Record`, `RData`, ...

pub mod domain;
pub mod rdata;
pub mod record_data;
pub mod record_type;
pub mod resource;

pub use self::domain::Name;
pub use self::record_data::RData;
pub use self::record_type::RecordType;
pub use self::resource::Record;

/// The only class this crate speaks; CH and HS are not supported.
///
/// The class field is emitted as IN on every query and record, and any class
/// on a received message is consumed without being surfaced.
pub(crate) const CLASS_IN: u16 = 1;
