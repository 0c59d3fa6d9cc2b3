//! Ed25519 key generation.

use ed25519_dalek::SigningKey;
use passport_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

/// Generate a new Ed25519 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::generate(&mut OsRng);
    to_keypair(&signing_key)
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> PublicKey {
    PublicKey(SigningKey::from_bytes(&private.0).verifying_key().to_bytes())
}

/// Derive a key pair from a 32-byte seed (deterministic; used by tests and
/// tooling that needs stable accounts).
pub fn keypair_from_seed(seed: &[u8; 32]) -> KeyPair {
    to_keypair(&SigningKey::from_bytes(seed))
}

fn to_keypair(signing_key: &SigningKey) -> KeyPair {
    KeyPair {
        public: PublicKey(signing_key.verifying_key().to_bytes()),
        private: PrivateKey(signing_key.to_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_derivation_is_stable() {
        let a = keypair_from_seed(&[3u8; 32]);
        let b = keypair_from_seed(&[3u8; 32]);
        assert_eq!(a.public, b.public);
        assert_eq!(public_from_private(&a.private), a.public);
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_keypair().public, generate_keypair().public);
    }
}
