//! Canonical Solana address syntax.
//!
//! Only the textual shape is checked (base58 alphabet, 32 to 44 characters);
//! no decoding or on-curve check is performed.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use thiserror::Error;

static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("address pattern is a valid regex")
});

/// The input was not a well-formed address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid Solana address")]
pub struct InvalidAddress;

/// A syntactically valid Solana address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SolanaAddress(String);

impl SolanaAddress {
    /// Validate `input` as-is. Callers accepting free text trim first.
    pub fn parse(input: &str) -> Result<Self, InvalidAddress> {
        if is_valid(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(InvalidAddress)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check the textual address shape without allocating.
pub fn is_valid(input: &str) -> bool {
    ADDRESS_PATTERN.is_match(input)
}

impl FromStr for SolanaAddress {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SolanaAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SolanaAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SolanaAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
