//! Checksummed on-chain address value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

static HEX_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x|0X)?[0-9a-fA-F]{40}$").expect("static regex"));

/// A 20-byte account address, always held in EIP-55 checksum form.
///
/// Parsing never rejects an address for bad checksum casing: the raw bytes
/// are decoded and the checksum re-derived. Only non-hex or wrong-length
/// input is rejected.
///
/// # Example
///
/// ```
/// use explorer_gateway::domain::Address;
///
/// let addr = Address::parse("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
/// assert_eq!(addr.as_str(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    raw: alloy_primitives::Address,
    checksummed: String,
}

impl Address {
    /// Parse and checksum an address.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyValue("address"));
        }
        if !HEX_ADDRESS.is_match(trimmed) {
            return Err(ValidationError::InvalidAddress(trimmed.to_string()));
        }

        let hex_part = &trimmed[trimmed.len() - 40..];
        let raw = hex_part
            .parse::<alloy_primitives::Address>()
            .map_err(|_| ValidationError::InvalidAddress(trimmed.to_string()))?;
        let address = Self::from(raw);

        if is_mixed_case(hex_part) && &address.checksummed[2..] != hex_part {
            tracing::debug!(
                input = %trimmed,
                checksummed = %address,
                "Address checksum mismatch, re-derived from raw bytes"
            );
        }

        Ok(address)
    }

    /// Build an address from its raw 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ValidationError> {
        if bytes.len() != 20 {
            return Err(ValidationError::InvalidAddress(hex::encode(bytes)));
        }
        Ok(Self::from(alloy_primitives::Address::from_slice(bytes)))
    }

    /// The underlying 20-byte address.
    pub fn raw(&self) -> alloy_primitives::Address {
        self.raw
    }

    /// Get the checksummed address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.checksummed
    }

    /// Whether `input` is already in correct EIP-55 form.
    pub fn is_checksummed(input: &str) -> bool {
        match Self::parse(input) {
            Ok(address) => address.checksummed == input.trim(),
            Err(_) => false,
        }
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(raw: alloy_primitives::Address) -> Self {
        Self {
            raw,
            checksummed: raw.to_checksum(None),
        }
    }
}

fn is_mixed_case(hex_part: &str) -> bool {
    hex_part.chars().any(|c| c.is_ascii_uppercase())
        && hex_part.chars().any(|c| c.is_ascii_lowercase())
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.checksummed.serialize(serializer)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed)
    }
}
