//! Account derivation from public keys.
//!
//! Account format: `pass_` + hex(public_key) + hex(checksum), where the
//! checksum is the first 4 bytes of Blake2b-256(public_key). Total length:
//! 5 (prefix) + 64 + 8 = 77 characters.

use passport_types::{Account, PublicKey};

const PREFIX: &str = Account::PREFIX;
const KEY_HEX_LEN: usize = 64;
const CHECKSUM_LEN: usize = 4;
const ENCODED_LEN: usize = KEY_HEX_LEN + CHECKSUM_LEN * 2;

fn checksum(key: &[u8; 32]) -> [u8; CHECKSUM_LEN] {
    let hash = crate::blake2b_256(key);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hash[..CHECKSUM_LEN]);
    out
}

/// Derive the account controlled by a public key.
pub fn derive_account(public_key: &PublicKey) -> Account {
    let key = public_key.as_bytes();
    Account::new(format!(
        "{PREFIX}{}{}",
        hex::encode(key),
        hex::encode(checksum(key))
    ))
}

/// Extract the public key from a key-derived account.
///
/// Returns `None` for accounts that are not key-derived or whose checksum
/// does not match.
pub fn decode_account(account: &str) -> Option<[u8; 32]> {
    let encoded = account.strip_prefix(PREFIX)?;
    if encoded.len() != ENCODED_LEN {
        return None;
    }
    let (key_hex, checksum_hex) = encoded.split_at(KEY_HEX_LEN);

    let mut key = [0u8; 32];
    hex::decode_to_slice(key_hex, &mut key).ok()?;
    let mut sum = [0u8; CHECKSUM_LEN];
    hex::decode_to_slice(checksum_hex, &mut sum).ok()?;

    (sum == checksum(&key)).then_some(key)
}

/// Whether an account string is key-derived with a valid checksum.
pub fn validate_account(account: &str) -> bool {
    decode_account(account).is_some()
}
