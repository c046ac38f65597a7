//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value was empty.
    EmptyValue(&'static str),

    /// The provided on-chain address is not 20 bytes of hex.
    InvalidAddress(String),

    /// The provided value is not one of the accepted literals.
    InvalidValue(String),

    /// The provided base-unit amount is not an unsigned integer.
    InvalidAmount(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue(field) => write!(f, "{} cannot be empty", field),
            Self::InvalidAddress(address) => write!(f, "Invalid address format: {}", address),
            Self::InvalidValue(value) => write!(f, "Invalid value: {}", value),
            Self::InvalidAmount(amount) => write!(f, "Invalid base-unit amount: {}", amount),
        }
    }
}

impl std::error::Error for ValidationError {}
