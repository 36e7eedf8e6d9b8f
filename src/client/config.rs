// Copyright 2015-2023 Benjamin Fry <benjaminfry@me.com>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// https://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// https://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Configuration for the upstream nameserver and the query behavior

use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::*;

/// Default port for the nameserver
pub const DEFAULT_PORT: u16 = 53;

/// Default location of the system resolver configuration
pub const DEFAULT_CONFIG_PATH: &str = "/etc/resolv.conf";

/// Default time to wait for a single response datagram
pub const DEFAULT_TIMEOUT: Duration = Duration::from_micros(3_000_000);

/// Default number of attempts, in total, not in addition to the first
pub const DEFAULT_ATTEMPTS: usize = 3;

/// Default receive buffer size hint, see [`ResolvConf::bufsize`]
pub const DEFAULT_BUFSIZE: u16 = 512;

/// Where the address of the upstream nameserver comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameserverSource {
    /// A numeric nameserver address, queried on port 53
    Host(IpAddr),

    /// A numeric nameserver address with an explicit port
    HostPort(IpAddr, u16),

    /// A resolver configuration file in `/etc/resolv.conf` syntax; only the
    /// first `nameserver` directive is honored
    File(PathBuf),
}

impl Default for NameserverSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

/// Configuration for a [`ResolvSeed`][crate::client::ResolvSeed].
///
/// The timeout must be non-zero; it bounds each receive individually, so the
/// worst case wall-clock per query is `attempts * timeout`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvConf {
    /// Where to find the nameserver address
    pub nameserver: NameserverSource,

    /// How long to wait for each response datagram
    pub timeout: Duration,

    /// Total number of send attempts per query
    pub attempts: usize,

    /// Historical receive buffer size hint. Accepted for API compatibility
    /// and ignored; the socket always uses a buffer large enough for any
    /// acceptable UDP payload.
    pub bufsize: u16,
}

impl Default for ResolvConf {
    fn default() -> Self {
        Self {
            nameserver: NameserverSource::default(),
            timeout: DEFAULT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            bufsize: DEFAULT_BUFSIZE,
        }
    }
}

/// A resolved configuration snapshot: the nameserver endpoint plus the query
/// parameters.
///
/// A seed performs no I/O by itself and is cheap to clone; it may be shared
/// and reused across any number of
/// [`with_resolver`][crate::client::with_resolver] scopes, from any thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvSeed {
    nameserver: SocketAddr,
    timeout: Duration,
    attempts: usize,
    bufsize: u16,
}

impl ResolvSeed {
    /// Resolves the configuration into a seed.
    ///
    /// Address resolution is restricted to numeric form; no DNS queries are
    /// performed to find the nameserver itself.
    pub fn from_conf(conf: &ResolvConf) -> DnsResult<Self> {
        let nameserver = match &conf.nameserver {
            NameserverSource::Host(addr) => SocketAddr::new(*addr, DEFAULT_PORT),
            NameserverSource::HostPort(addr, port) => SocketAddr::new(*addr, *port),
            NameserverSource::File(path) => {
                SocketAddr::new(nameserver_from_file(path)?, DEFAULT_PORT)
            }
        };

        Ok(Self {
            nameserver,
            timeout: conf.timeout,
            attempts: conf.attempts,
            bufsize: conf.bufsize,
        })
    }

    /// Shorthand for the default configuration, i.e. the first `nameserver`
    /// of `/etc/resolv.conf` with default timeout and attempts.
    pub fn system() -> DnsResult<Self> {
        Self::from_conf(&ResolvConf::default())
    }

    /// The nameserver this seed will query
    pub fn nameserver(&self) -> SocketAddr {
        self.nameserver
    }

    /// How long each receive waits before the attempt is charged
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Total number of send attempts per query
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// The configured buffer size hint, unused by the socket
    pub fn bufsize(&self) -> u16 {
        self.bufsize
    }
}

/// Extracts the address of the first `nameserver` directive.
///
/// All other directives (`search`, `options`, ...) and comments are ignored.
/// The keyword must be followed by whitespace; the remainder of the line,
/// trimmed, is taken as a numeric address.
fn nameserver_from_file(path: &Path) -> DnsResult<IpAddr> {
    let data = fs::read_to_string(path).map_err(DnsErrorKind::from)?;
    parse_nameserver(&data).ok_or_else(|| {
        DnsErrorKind::InvalidResolvConf(format!(
            "no usable nameserver directive in {}",
            path.display()
        ))
        .into()
    })
}

fn parse_nameserver(data: &str) -> Option<IpAddr> {
    for line in data.lines() {
        let line = line.trim_start();
        let rest = match line.strip_prefix("nameserver") {
            Some(rest) => rest,
            None => continue,
        };
        if !rest.starts_with(char::is_whitespace) {
            continue;
        }

        return IpAddr::from_str(rest.trim()).ok();
    }

    None
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn test_parse_nameserver() {
        let conf = "# a comment\n\
                    search example.com\n\
                    nameserver 192.0.2.53\n\
                    nameserver 198.51.100.53\n\
                    options ndots:2\n";

        // only the first directive is honored
        assert_eq!(
            parse_nameserver(conf),
            Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53)))
        );
    }

    #[test]
    fn test_parse_nameserver_whitespace() {
        assert_eq!(
            parse_nameserver("nameserver\t  192.0.2.53  \n"),
            Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53)))
        );

        assert_eq!(parse_nameserver("nameserver2001:db8::1\n"), None);
        assert_eq!(parse_nameserver("nameserver 2001:db8::1\n"), "2001:db8::1".parse().ok());
    }

    #[test]
    fn test_parse_nameserver_numeric_only() {
        // names are not resolved to find the nameserver itself
        assert_eq!(parse_nameserver("nameserver dns.example.com\n"), None);
        assert_eq!(parse_nameserver("search example.com\n"), None);
    }

    #[test]
    fn test_seed_from_literal_conf() {
        let conf = ResolvConf {
            nameserver: NameserverSource::Host(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53))),
            ..ResolvConf::default()
        };
        let seed = ResolvSeed::from_conf(&conf).unwrap();
        assert_eq!(seed.nameserver().port(), 53);
        assert_eq!(seed.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(seed.attempts(), 3);

        let conf = ResolvConf {
            nameserver: NameserverSource::HostPort(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 53)), 1053),
            ..ResolvConf::default()
        };
        let seed = ResolvSeed::from_conf(&conf).unwrap();
        assert_eq!(seed.nameserver().port(), 1053);
    }

    #[test]
    fn test_seed_from_conf_file() {
        let path = std::env::temp_dir().join(format!(
            "stub-dns-test-resolv-{}.conf",
            std::process::id()
        ));
        fs::write(&path, "options ndots:1\nnameserver 127.0.0.53\n").unwrap();

        let conf = ResolvConf {
            nameserver: NameserverSource::File(path.clone()),
            ..ResolvConf::default()
        };
        let seed = ResolvSeed::from_conf(&conf).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(
            seed.nameserver(),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 53)), 53)
        );
    }

    #[test]
    fn test_seed_from_conf_file_without_directive() {
        let path = std::env::temp_dir().join(format!(
            "stub-dns-test-resolv-empty-{}.conf",
            std::process::id()
        ));
        fs::write(&path, "search example.com\n").unwrap();

        let conf = ResolvConf {
            nameserver: NameserverSource::File(path.clone()),
            ..ResolvConf::default()
        };
        let err = ResolvSeed::from_conf(&conf).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(matches!(err.kind(), DnsErrorKind::InvalidResolvConf(..)));
    }
}
