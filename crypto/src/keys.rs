//! Ed25519 public keys.

use ed25519_dalek::SigningKey;

/// A 32-byte Ed25519 public key, the material an [`agora_types::Identity`] is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Public half of the Ed25519 key deterministically derived from `seed`.
///
/// The signing key is dropped before returning; callers that hold their own
/// keys only ever hand the engine an identity.
pub fn public_key_from_seed(seed: &[u8; 32]) -> PublicKey {
    PublicKey(SigningKey::from_bytes(seed).verifying_key().to_bytes())
}
