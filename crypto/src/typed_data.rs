//! Typed-data authorizations.
//!
//! An account can authorize a link or a delegation off-line by signing a
//! fixed struct. The signed digest is
//! `Blake2b-256(0x19 0x01 || domain_separator || struct_hash)`, where the
//! domain binds the signature to one deployment (name, schema version, chain
//! id) and the struct hash binds it to one message type.
//!
//! The schema is versioned explicitly through [`SCHEMA_VERSION`]: changing a
//! struct layout means bumping the version, which changes every domain
//! separator and invalidates outstanding signatures.

use crate::address::derive_account;
use crate::hash::blake2b_256_multi;
use crate::sign::{sign_message, verify_signature};
use passport_types::{Account, NetworkId, PrivateKey, PublicKey, Signature, Timestamp};
use serde::{Deserialize, Serialize};

/// Current authorization schema version.
pub const SCHEMA_VERSION: u32 = 1;

const DOMAIN_TYPE: &str = "PassportDomain(string name,uint32 version,uint64 chainId)";
const DIGEST_PREFIX: &[u8] = &[0x19, 0x01];

/// The signing domain of one passport deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningDomain {
    pub name: String,
    pub version: u32,
    pub chain_id: u64,
}

impl SigningDomain {
    pub fn new(name: impl Into<String>, network: NetworkId) -> Self {
        Self {
            name: name.into(),
            version: SCHEMA_VERSION,
            chain_id: network.chain_id(),
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        blake2b_256_multi(&[
            &type_hash(DOMAIN_TYPE),
            &length_prefixed(self.name.as_bytes()),
            &self.version.to_le_bytes(),
            &self.chain_id.to_le_bytes(),
        ])
    }
}

/// A message with a fixed, named field layout.
pub trait TypedData {
    /// Canonical type string, e.g. `LinkEntity(account entity,...)`.
    const TYPE: &'static str;

    /// Field values in declaration order.
    fn encode_fields(&self) -> Vec<u8>;

    fn struct_hash(&self) -> [u8; 32] {
        blake2b_256_multi(&[&type_hash(Self::TYPE), &self.encode_fields()])
    }
}

/// Entity consents to being linked to `passport` until `deadline`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkAuthorization {
    pub entity: Account,
    pub passport: Account,
    pub deadline: Timestamp,
}

impl TypedData for LinkAuthorization {
    const TYPE: &'static str = "LinkEntity(account entity,account passport,uint64 deadline)";

    fn encode_fields(&self) -> Vec<u8> {
        let mut out = length_prefixed(self.entity.as_str().as_bytes());
        out.extend(length_prefixed(self.passport.as_str().as_bytes()));
        out.extend(self.deadline.as_secs().to_le_bytes());
        out
    }
}

/// Delegator consents to delegating its personhood to `delegatee` until
/// `deadline`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationAuthorization {
    pub delegator: Account,
    pub delegatee: Account,
    pub deadline: Timestamp,
}

impl TypedData for DelegationAuthorization {
    const TYPE: &'static str =
        "Delegation(account delegator,account delegatee,uint64 deadline)";

    fn encode_fields(&self) -> Vec<u8> {
        let mut out = length_prefixed(self.delegator.as_str().as_bytes());
        out.extend(length_prefixed(self.delegatee.as_str().as_bytes()));
        out.extend(self.deadline.as_secs().to_le_bytes());
        out
    }
}

/// A signature together with the key that produced it.
///
/// Ed25519 has no public-key recovery, so the signer's key travels with the
/// signature; the signer account is derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAuthorization {
    pub signer: PublicKey,
    pub signature: Signature,
}

/// The 32-byte digest that is actually signed.
pub fn signing_digest<T: TypedData>(domain: &SigningDomain, message: &T) -> [u8; 32] {
    blake2b_256_multi(&[DIGEST_PREFIX, &domain.separator(), &message.struct_hash()])
}

/// Sign a typed message.
pub fn sign_typed<T: TypedData>(
    domain: &SigningDomain,
    message: &T,
    private_key: &PrivateKey,
    public_key: &PublicKey,
) -> SignedAuthorization {
    SignedAuthorization {
        signer: public_key.clone(),
        signature: sign_message(&signing_digest(domain, message), private_key),
    }
}

/// Verify a typed signature and return the account that produced it.
///
/// Returns `None` if the signature does not verify. Expiry is not checked
/// here; callers compare the message deadline against their own clock.
pub fn recover_signer<T: TypedData>(
    domain: &SigningDomain,
    message: &T,
    signed: &SignedAuthorization,
) -> Option<Account> {
    let digest = signing_digest(domain, message);
    verify_signature(&digest, &signed.signature, &signed.signer)
        .then(|| derive_account(&signed.signer))
}

fn type_hash(type_string: &str) -> [u8; 32] {
    blake2b_256_multi(&[type_string.as_bytes()])
}

fn length_prefixed(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend((bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}
