//! The passport relationship graph.
//!
//! Two independent handshake state machines share one guard layer:
//!
//! - **Linking** (`entity -> passport`): an entity's actions and list status
//!   are merged into a passport. A passport holds a bounded number of active
//!   entities.
//! - **Delegation** (`passport -> passport`): a passport hands its personhood
//!   to exactly one other passport.
//!
//! Both go `None -> Pending -> Active -> None`, or straight to `Active` from a
//! signed authorization. The graph is kept acyclic by the guards alone: an
//! entity can never delegate or be delegated to, a delegator or delegatee can
//! never become an entity, and delegation chains are refused.
//!
//! Every transition to or from `Active` is checkpointed so eligibility for an
//! already-started round can be evaluated against the graph as it was at the
//! round's snapshot block.

pub mod delegation;
pub mod error;
pub mod graph;
mod guards;
pub mod linking;
pub mod state;

pub use error::LinkError;
pub use graph::{LinkGraph, DEFAULT_MAX_ENTITIES_PER_PASSPORT};
pub use state::{Delegation, EntityLink, PendingDelegations, PendingLinks, RelationPhase};
