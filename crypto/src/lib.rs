//! Cryptographic primitives for the voter passport.
//!
//! - **Ed25519** for signing link and delegation authorizations
//! - **Blake2b** for hashing (domain separators, struct hashes, checksums)
//! - Account derivation with `pass_` prefix and hex encoding
//! - Typed-data authorizations with an explicitly versioned schema

pub mod address;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod typed_data;

pub use address::{decode_account, derive_account, validate_account};
pub use hash::{blake2b_256, blake2b_256_multi};
pub use keys::{generate_keypair, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use typed_data::{
    recover_signer, sign_typed, signing_digest, DelegationAuthorization, LinkAuthorization,
    SignedAuthorization, SigningDomain, TypedData, SCHEMA_VERSION,
};
