//! Events emitted by committed operations.

use passport_lists::ListKind;
use passport_types::{Account, AppId, BlockNumber, PersonhoodCheck, Round, SecurityLevel};
use serde::{Deserialize, Serialize};

/// Something that changed in the passport state.
///
/// Events are buffered per operation and only reach the service queue when
/// the operation commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassportEvent {
    /// Points were recorded. `points` is zero while the credited account is
    /// blacklisted.
    ActionRegistered {
        account: Account,
        credited_to: Account,
        app: AppId,
        round: Round,
        points: u64,
    },
    LinkRequested {
        entity: Account,
        passport: Account,
    },
    EntityLinked {
        entity: Account,
        passport: Account,
        block: BlockNumber,
    },
    LinkDenied {
        entity: Account,
        passport: Account,
    },
    LinkCancelled {
        entity: Account,
        passport: Account,
    },
    LinkRemoved {
        entity: Account,
        passport: Account,
        block: BlockNumber,
    },
    DelegationRequested {
        delegator: Account,
        delegatee: Account,
    },
    Delegated {
        delegator: Account,
        delegatee: Account,
        block: BlockNumber,
    },
    DelegationDenied {
        delegator: Account,
        delegatee: Account,
    },
    DelegationCancelled {
        delegator: Account,
        delegatee: Account,
    },
    DelegationRevoked {
        delegator: Account,
        delegatee: Account,
        block: BlockNumber,
    },
    Listed {
        account: Account,
        list: ListKind,
    },
    Unlisted {
        account: Account,
        list: ListKind,
    },
    Signaled {
        signaler: Account,
        target: Account,
        app: Option<AppId>,
        reason: Option<String>,
    },
    SignalsReset {
        target: Account,
        cleared: u64,
        reason: String,
    },
    SignalerAssigned {
        signaler: Account,
        app: AppId,
    },
    SignalerRemoved {
        signaler: Account,
        app: AppId,
    },
    SettingChanged(SettingChange),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingChange {
    ThresholdPoPScore(u64),
    DecayRate(u64),
    RoundsForCumulativeScore(u64),
    SecurityMultiplier { level: SecurityLevel, multiplier: u64 },
    AppSecurity { app: AppId, level: SecurityLevel },
    MinimumGalaxyMemberLevel(u64),
    CheckToggled { check: PersonhoodCheck, enabled: bool },
    MaxEntitiesPerPassport(u32),
    WhitelistThreshold(u8),
    BlacklistThreshold(u8),
    SignalingThreshold(u64),
}
