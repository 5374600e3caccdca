//! Caller identity type with `agr_` prefix.

use crate::error::IdentityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identity of a caller, always prefixed with `agr_`.
///
/// Derived from an Ed25519 public key via Blake2b checksum + base32 encoding
/// (see `agora_crypto::derive_identity`). Role predicates compare identities
/// by value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// The standard prefix for all identities.
    pub const PREFIX: &'static str = "agr_";

    /// Create a new identity from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `agr_`. Use [`Identity::parse`]
    /// for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "identity must start with agr_");
        Self(s)
    }

    /// Parse an identity received from the wire.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let id = Self(raw.to_string());
        if id.is_valid() {
            Ok(id)
        } else {
            Err(IdentityError::Malformed(raw.to_string()))
        }
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this identity is well-formed (prefix plus a non-empty body).
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
