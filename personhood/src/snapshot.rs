//! Versioned state snapshots.

use crate::state::PassportState;
use crate::PersonhoodError;
use serde::{Deserialize, Serialize};

/// Layout version of [`StateSnapshot`]. Bump on any change to the persisted
/// state and add a migration in [`StateSnapshot::decode`].
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub schema_version: u32,
    pub state: PassportState,
}

impl StateSnapshot {
    pub fn new(state: PassportState) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            state,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, PersonhoodError> {
        bincode::serialize(self).map_err(|e| PersonhoodError::Snapshot(e.to_string()))
    }

    /// Decode a snapshot of the current schema version.
    pub fn decode(bytes: &[u8]) -> Result<Self, PersonhoodError> {
        // The version is the leading field, so it can be read on its own.
        let version: u32 =
            bincode::deserialize(bytes).map_err(|e| PersonhoodError::Snapshot(e.to_string()))?;
        if version != SNAPSHOT_SCHEMA_VERSION {
            return Err(PersonhoodError::Snapshot(format!(
                "unsupported schema version {version} (expected {SNAPSHOT_SCHEMA_VERSION})"
            )));
        }
        bincode::deserialize(bytes).map_err(|e| PersonhoodError::Snapshot(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PassportConfig;
    use passport_types::{Account, AppId, BlockNumber, Round};

    fn populated() -> PassportState {
        let mut state =
            PassportState::from_config(&PassportConfig::default(), BlockNumber::GENESIS).unwrap();
        let (entity, passport) = (Account::new("pass_entity"), Account::new("pass_passport"));
        state.link_entity_to_passport(&entity, &passport).unwrap();
        state.accept_entity_link(&passport, &entity, BlockNumber(4)).unwrap();
        state
            .register_aggregated_actions_for_round(&entity, AppId::from_name("app"), Round(1), 250)
            .unwrap();
        state.blacklist(&entity);
        state
    }

    #[test]
    fn snapshot_preserves_state_and_history() {
        let bytes = StateSnapshot::new(populated()).encode().unwrap();
        let restored = StateSnapshot::decode(&bytes).unwrap().state;
        let passport = Account::new("pass_passport");

        assert_eq!(restored.user_round_score(&passport, Round(1)), 250);
        assert!(restored.is_passport_in_timepoint(&passport, BlockNumber(4)));
        assert!(!restored.is_passport_in_timepoint(&passport, BlockNumber(3)));
        assert!(restored.is_passport_blacklisted(&passport));
    }

    #[test]
    fn pending_events_are_not_persisted() {
        let bytes = StateSnapshot::new(populated()).encode().unwrap();
        let mut restored = StateSnapshot::decode(&bytes).unwrap().state;
        assert!(restored.take_events().is_empty());
    }

    #[test]
    fn other_versions_are_rejected() {
        let mut snapshot = StateSnapshot::new(populated());
        snapshot.schema_version = SNAPSHOT_SCHEMA_VERSION + 1;
        let bytes = snapshot.encode().unwrap();
        assert!(matches!(
            StateSnapshot::decode(&bytes),
            Err(PersonhoodError::Snapshot(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(StateSnapshot::decode(&[1, 0, 0, 0, 0xff]).is_err());
        assert!(StateSnapshot::decode(&[]).is_err());
    }
}
