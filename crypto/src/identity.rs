//! Key-derived caller identities.
//!
//! An identity is `agr_` followed by 60 base32 symbols spelling out 37 bytes:
//! the public key and then the first five bytes of its Blake2b-256 digest.
//! The 296 payload bits leave four zero bits of padding in the last symbol.
//! A wire sender is accepted only if it decodes canonically and its
//! checksum matches.

use crate::hash::blake2b_256;
use crate::keys::PublicKey;
use agora_types::Identity;

const ALPHABET: &[u8; 32] = b"13456789abcdefghijkmnopqrstuwxyz";
const KEY_LEN: usize = 32;
const CHECKSUM_LEN: usize = 5;
const PAYLOAD_LEN: usize = KEY_LEN + CHECKSUM_LEN;
const BODY_LEN: usize = (PAYLOAD_LEN * 8).div_ceil(5);

fn checksum(key: &[u8; KEY_LEN]) -> [u8; CHECKSUM_LEN] {
    let digest = blake2b_256(key);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&digest[..CHECKSUM_LEN]);
    out
}

/// Bit `pos` of `bytes`, most significant first; zero past the end.
fn bit_at(bytes: &[u8], pos: usize) -> u8 {
    bytes.get(pos / 8).map_or(0, |byte| (byte >> (7 - pos % 8)) & 1)
}

fn symbol_value(symbol: u8) -> Option<u8> {
    ALPHABET.iter().position(|&s| s == symbol).map(|v| v as u8)
}

fn encode_body(payload: &[u8; PAYLOAD_LEN]) -> String {
    (0..BODY_LEN)
        .map(|i| {
            let value = (0..5).fold(0u8, |acc, k| (acc << 1) | bit_at(payload, i * 5 + k));
            ALPHABET[value as usize] as char
        })
        .collect()
}

/// Inverse of [`encode_body`]. Rejects unknown symbols, wrong lengths and
/// set padding bits, so every payload has exactly one spelling.
fn decode_body(body: &str) -> Option<[u8; PAYLOAD_LEN]> {
    if body.len() != BODY_LEN {
        return None;
    }
    let mut payload = [0u8; PAYLOAD_LEN];
    for (i, symbol) in body.bytes().enumerate() {
        let value = symbol_value(symbol)?;
        for k in 0..5 {
            let bit = (value >> (4 - k)) & 1;
            let pos = i * 5 + k;
            match payload.get_mut(pos / 8) {
                Some(byte) => *byte |= bit << (7 - pos % 8),
                None if bit == 0 => {}
                None => return None,
            }
        }
    }
    Some(payload)
}

/// The identity of `public_key`.
pub fn derive_identity(public_key: &PublicKey) -> Identity {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[..KEY_LEN].copy_from_slice(public_key.as_bytes());
    payload[KEY_LEN..].copy_from_slice(&checksum(public_key.as_bytes()));
    Identity::new(format!("{}{}", Identity::PREFIX, encode_body(&payload)))
}

/// The public key an identity was derived from, or `None` if the string is
/// malformed or its checksum does not match.
pub fn decode_identity(identity: &str) -> Option<PublicKey> {
    let payload = decode_body(identity.strip_prefix(Identity::PREFIX)?)?;
    let (key_bytes, sum) = payload.split_at(KEY_LEN);
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(key_bytes);
    (checksum(&key)[..] == *sum).then_some(PublicKey(key))
}

pub fn validate_identity(identity: &str) -> bool {
    decode_identity(identity).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::public_key_from_seed;

    #[test]
    fn zero_key_has_a_fixed_spelling() {
        let id = derive_identity(&PublicKey([0u8; 32]));
        assert_eq!(
            id.as_str(),
            "agr_111111111111111111111111111111111111111111111111111amtrffc71"
        );
    }

    #[test]
    fn derived_identities_validate_and_decode() {
        for seed in [3u8, 7, 11] {
            let key = public_key_from_seed(&[seed; 32]);
            let id = derive_identity(&key);
            assert_eq!(id.as_str().len(), Identity::PREFIX.len() + BODY_LEN);
            assert!(validate_identity(id.as_str()));
            assert_eq!(decode_identity(id.as_str()), Some(key));
        }
    }

    #[test]
    fn altered_symbol_fails_checksum() {
        let id = derive_identity(&public_key_from_seed(&[5u8; 32]));
        let mut bad = id.as_str().to_string();
        let swapped = if bad.as_bytes()[10] == b'3' { "4" } else { "3" };
        bad.replace_range(10..11, swapped);
        assert!(!validate_identity(&bad));
    }

    #[test]
    fn set_padding_bits_are_rejected() {
        // '1' encodes zero; '3' sets the lowest padding bit of the last symbol.
        let id = derive_identity(&PublicKey([0u8; 32]));
        let padded = format!("{}3", &id.as_str()[..id.as_str().len() - 1]);
        assert!(!validate_identity(&padded));
    }

    #[test]
    fn short_foreign_and_unknown_symbols_rejected() {
        assert!(!validate_identity("agr_tooshort"));
        assert!(!validate_identity("agr_"));
        assert!(!validate_identity("brst_1234"));
        let id = derive_identity(&PublicKey([0u8; 32]));
        let with_l = id.as_str().replacen('1', "l", 1);
        assert!(!validate_identity(&with_l));
    }
}
