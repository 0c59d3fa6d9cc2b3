#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use passport_crypto::{recover_signer, LinkAuthorization, SignedAuthorization, SigningDomain};
use passport_types::{Account, NetworkId, PublicKey, Signature, Timestamp};

#[derive(Debug, Arbitrary)]
struct Input {
    entity: String,
    passport: String,
    deadline: u64,
    signer: [u8; 32],
    signature: [[u8; 32]; 2],
}

// Arbitrary keys and signatures must be rejected or recovered, never panic.
fuzz_target!(|input: Input| {
    let (Ok(entity), Ok(passport)) = (Account::parse(&input.entity), Account::parse(&input.passport))
    else {
        return;
    };
    let domain = SigningDomain::new("VoterPassport", NetworkId::Dev);
    let auth = LinkAuthorization {
        entity,
        passport,
        deadline: Timestamp::new(input.deadline),
    };
    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&input.signature[0]);
    signature[32..].copy_from_slice(&input.signature[1]);
    let signed = SignedAuthorization {
        signer: PublicKey(input.signer),
        signature: Signature(signature),
    };
    let _ = recover_signer(&domain, &auth, &signed);
});
