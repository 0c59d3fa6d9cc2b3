//! Fundamental types for the voter passport.
//!
//! Every other crate in the workspace builds on these: accounts, application
//! ids, rounds, block numbers, key material, security levels and the set of
//! personhood checks an operator can switch on and off.

pub mod account;
pub mod checks;
pub mod error;
pub mod ids;
pub mod keys;
pub mod network;
pub mod security;
pub mod time;

pub use account::Account;
pub use checks::{CheckSet, PersonhoodCheck};
pub use error::TypesError;
pub use ids::{AppId, BlockNumber, Round, TokenId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::NetworkId;
pub use security::SecurityLevel;
pub use time::Timestamp;
