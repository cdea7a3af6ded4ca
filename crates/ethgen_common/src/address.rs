//! Ethernet MAC address literals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 48-bit Ethernet MAC address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Creates a MAC address from its six octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Creates a MAC address from the low 48 bits of an integer.
    ///
    /// Returns `None` if any of the upper 16 bits are set.
    pub fn from_u64(value: u64) -> Option<Self> {
        if value >> 48 != 0 {
            return None;
        }
        let b = value.to_be_bytes();
        Some(Self([b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    /// Returns the six octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Returns the address as an integer (most significant octet first).
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({self})")
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Error type for parsing MAC address strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid MAC address: '{input}'")]
pub struct ParseMacAddressError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for MacAddress {
    type Err = ParseMacAddressError;

    /// Parses `aa:bb:cc:dd:ee:ff` (or `-` separated) notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMacAddressError {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.trim().split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(err());
        }
        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }
        Ok(Self(octets))
    }
}
