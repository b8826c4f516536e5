//! Core domain types

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Address of the stream server.
///
/// Persisted in the zero-padded `DDD.DDD.DDD.DDD` form so the digit editor
/// always has exactly twelve digits to walk. Display and network use the
/// trimmed dotted form produced by [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerAddress(Ipv4Addr);

impl ServerAddress {
    /// Address used when no valid config file exists.
    pub const DEFAULT: ServerAddress = ServerAddress(Ipv4Addr::new(10, 0, 0, 74));

    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(Ipv4Addr::new(a, b, c, d))
    }

    pub fn from_octets(octets: [u8; 4]) -> Self {
        Self(Ipv4Addr::from(octets))
    }

    pub fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }

    /// Zero-padded form, e.g. `010.000.000.074`.
    pub fn padded(&self) -> String {
        let [a, b, c, d] = self.octets();
        format!("{:03}.{:03}.{:03}.{:03}", a, b, c, d)
    }
}

impl Default for ServerAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ServerAddress {
    type Err = Error;

    /// Accepts both the padded (`010.000.000.074`) and trimmed (`10.0.0.74`)
    /// forms. Each octet must be 1-3 ASCII digits with a value of at most 255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 4];
        let mut parts = s.trim().split('.');

        for slot in octets.iter_mut() {
            let part = parts.next().ok_or_else(|| Error::invalid_address(s))?;
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_address(s));
            }
            let value: u16 = part.parse().map_err(|_| Error::invalid_address(s))?;
            *slot = u8::try_from(value).map_err(|_| Error::invalid_address(s))?;
        }

        if parts.next().is_some() {
            return Err(Error::invalid_address(s));
        }

        Ok(Self::from_octets(octets))
    }
}

impl TryFrom<String> for ServerAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServerAddress> for String {
    fn from(addr: ServerAddress) -> Self {
        addr.padded()
    }
}

/// A stream advertised by the remote stream directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    /// Name shown in the stream list
    pub name: String,
    /// Path appended to the playback URL
    pub path: String,
}

impl StreamEntry {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Entry whose playback path equals its name (MediaMTX paths).
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
        }
    }
}
