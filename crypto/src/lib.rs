//! Cryptographic primitives for caller identities.
//!
//! - **Ed25519** public keys, derived deterministically from a 32-byte seed
//! - **Blake2b** for identity checksums
//! - Identity derivation and checksum validation (`agr_` + base32)

pub mod hash;
pub mod identity;
pub mod keys;

pub use hash::blake2b_256;
pub use identity::{decode_identity, derive_identity, validate_identity};
pub use keys::{public_key_from_seed, PublicKey};
