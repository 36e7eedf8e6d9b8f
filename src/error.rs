// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Error types for the crate

#![deny(missing_docs)]

use std::sync::Arc;
use std::{fmt, io};

use enum_as_inner::EnumAsInner;
use thiserror::Error;

use crate::op::ResponseCode;

/// An alias for results returned by functions of this crate
pub type DnsResult<T> = ::std::result::Result<T, DnsError>;

/// The error kind for errors that get returned in the crate
#[derive(Clone, Debug, EnumAsInner, Error)]
#[non_exhaustive]
pub enum DnsErrorKind {
    /// Character data length exceeded the limit
    #[error("char data length exceeds {max}: {len}")]
    CharacterDataTooLong {
        /// Specified maximum
        max: usize,
        /// Actual length
        len: usize,
    },

    /// A domain name was too long
    #[error("name label data exceed 255: {0}")]
    DomainNameTooLong(usize),

    /// Label bytes exceeded the limit of 63
    #[error("label bytes exceed 63: {0}")]
    LabelBytesTooLong(usize),

    /// An unrecognized label code was found
    #[error("unrecognized label code: {0:b}")]
    UnrecognizedLabelCode(u8),

    /// A name compression pointer did not point strictly backward
    #[error("label points to data not prior to idx: {idx} ptr: {ptr}")]
    PointerNotPriorToLabel {
        /// index of the label containing this pointer
        idx: usize,
        /// location to which the pointer is directing
        ptr: u16,
    },

    /// A name compression pointer did not target a previously decoded name
    #[error("label pointer does not target a decoded name: {0}")]
    UnknownLabelPointer(u16),

    /// The length of rdata read was not as expected
    #[error("incorrect rdata length read: {read} expected: {len}")]
    IncorrectRDataLengthRead {
        /// The amount of read data
        read: usize,
        /// The expected length of the data
        len: usize,
    },

    /// An error with an arbitrary message, referenced as &'static str
    #[error("{0}")]
    Message(&'static str),

    /// An error with an arbitrary message, stored as String
    #[error("{0}")]
    Msg(String),

    /// A query name was rejected before any I/O was performed
    #[error("illegal domain name: {0}")]
    IllegalDomain(String),

    /// No response arrived within the configured retries and timeout
    #[error("request timed out")]
    TimeoutExpired,

    /// Replies arrived, but none carried the expected transaction id
    #[error("no response carried the expected transaction id")]
    SequenceNumberMismatch,

    /// The server was unable to interpret the query (RCODE 1)
    #[error("server was unable to interpret the query")]
    FormatError,

    /// The server failed to process the query (RCODE 2)
    #[error("server failure")]
    ServerFailure,

    /// The queried domain does not exist (RCODE 3, NXDOMAIN)
    #[error("no such domain")]
    NameError,

    /// The server does not implement the requested kind of query (RCODE 4)
    #[error("query kind not implemented by the server")]
    NotImplemented,

    /// The server refused to perform the operation (RCODE 5)
    #[error("operation refused by the server")]
    OperationRefused,

    /// The server rejected the OPT record (RCODE 16, BADVERS)
    #[error("bad OPT record")]
    BadOptRecord,

    /// The server answered with a response code outside the mapped set
    #[error("unexpected response code: {0}")]
    UnknownResponseCode(u16),

    /// The resolver configuration could not be used
    #[error("invalid resolver configuration: {0}")]
    InvalidResolvConf(String),

    // foreign
    /// An error got returned from IO
    #[error("io error: {0}")]
    Io(Arc<io::Error>),
}

impl DnsErrorKind {
    /// Maps a response code reported by the server onto the error it
    /// signifies, `None` for `NoError`.
    pub fn from_response_code(code: ResponseCode) -> Option<Self> {
        match code {
            ResponseCode::NoError => None,
            ResponseCode::FormErr => Some(Self::FormatError),
            ResponseCode::ServFail => Some(Self::ServerFailure),
            ResponseCode::NXDomain => Some(Self::NameError),
            ResponseCode::NotImp => Some(Self::NotImplemented),
            ResponseCode::Refused => Some(Self::OperationRefused),
            ResponseCode::BADVERS => Some(Self::BadOptRecord),
            other => Some(Self::UnknownResponseCode(u16::from(other))),
        }
    }
}

/// The error type for errors that get returned in the crate
#[derive(Error, Clone, Debug)]
#[non_exhaustive]
pub struct DnsError {
    /// Kind of error that occurred
    pub kind: Box<DnsErrorKind>,
}

impl DnsError {
    /// Get the kind of the error
    #[inline]
    pub fn kind(&self) -> &DnsErrorKind {
        &self.kind
    }

    /// Returns true if the error describes a malformed message, either as
    /// rejected by the decoder or as reported by the server with RCODE 1.
    pub fn is_format_error(&self) -> bool {
        matches!(
            *self.kind,
            DnsErrorKind::CharacterDataTooLong { .. }
                | DnsErrorKind::DomainNameTooLong(..)
                | DnsErrorKind::LabelBytesTooLong(..)
                | DnsErrorKind::UnrecognizedLabelCode(..)
                | DnsErrorKind::PointerNotPriorToLabel { .. }
                | DnsErrorKind::UnknownLabelPointer(..)
                | DnsErrorKind::IncorrectRDataLengthRead { .. }
                | DnsErrorKind::Message(..)
                | DnsErrorKind::Msg(..)
                | DnsErrorKind::FormatError
        )
    }

    /// Returns true if this is a std::io::Error
    #[inline]
    pub fn is_io(&self) -> bool {
        matches!(*self.kind, DnsErrorKind::Io(..))
    }
}

impl fmt::Display for DnsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl<E> From<E> for DnsError
where
    E: Into<DnsErrorKind>,
{
    fn from(error: E) -> Self {
        Self {
            kind: Box::new(error.into()),
        }
    }
}

impl From<&'static str> for DnsErrorKind {
    fn from(msg: &'static str) -> Self {
        Self::Message(msg)
    }
}

impl From<String> for DnsErrorKind {
    fn from(msg: String) -> Self {
        Self::Msg(msg)
    }
}

impl From<io::Error> for DnsErrorKind {
    fn from(e: io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_mapping_is_exhaustive() {
        assert!(DnsErrorKind::from_response_code(ResponseCode::NoError).is_none());

        let mapped = [
            (ResponseCode::FormErr, "server was unable to interpret the query"),
            (ResponseCode::ServFail, "server failure"),
            (ResponseCode::NXDomain, "no such domain"),
            (ResponseCode::NotImp, "query kind not implemented by the server"),
            (ResponseCode::Refused, "operation refused by the server"),
            (ResponseCode::BADVERS, "bad OPT record"),
        ];

        for (code, display) in mapped {
            let kind = DnsErrorKind::from_response_code(code).expect("code must map");
            assert_eq!(kind.to_string(), display);
        }

        // anything outside the table is surfaced with its numeric code
        let kind = DnsErrorKind::from_response_code(ResponseCode::Unknown(11)).unwrap();
        assert_eq!(kind.to_string(), "unexpected response code: 11");
    }

    #[test]
    fn test_format_error_classification() {
        let err = DnsError::from(DnsErrorKind::LabelBytesTooLong(64));
        assert!(err.is_format_error());

        let err = DnsError::from(DnsErrorKind::FormatError);
        assert!(err.is_format_error());

        let err = DnsError::from(DnsErrorKind::TimeoutExpired);
        assert!(!err.is_format_error());
    }
}
