//! The personhood decision.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. the account delegated its personhood away: not a person;
//! 2. blacklist check on and the passport is blacklisted: not a person;
//! 3. whitelist check on and the passport is whitelisted: a person;
//! 4. signaling check on and the passport reached the signal threshold:
//!    not a person;
//! 5. participation check on and the decayed score reaches the threshold:
//!    a person;
//! 6. galaxy-member check on and the selected token's level reaches the
//!    minimum: a person;
//! 7. otherwise not a person.
//!
//! A delegatee is evaluated as its delegator: it votes with the personhood
//! it was handed. Which checks are on is always read live. Thresholds,
//! tiers, delegation and the entity set are read as of the evaluated block.

use crate::collaborators::{MembershipTiers, VotingRounds};
use crate::state::PassportState;
use passport_types::{Account, BlockNumber, PersonhoodCheck};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an account was or was not found to be a person.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonhoodReason {
    Delegated,
    Blacklisted,
    Whitelisted,
    Signaled,
    ScoreAboveThreshold,
    TierAboveMinimum,
    NoCriteriaMet,
}

impl PersonhoodReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegated => "user has delegated their personhood",
            Self::Blacklisted => "user is blacklisted",
            Self::Whitelisted => "user is whitelisted",
            Self::Signaled => "user has been signaled too many times",
            Self::ScoreAboveThreshold => "user's participation score is above the threshold",
            Self::TierAboveMinimum => "user's galaxy member level is above the minimum",
            Self::NoCriteriaMet => "user does not meet the criteria to be considered a person",
        }
    }
}

impl fmt::Display for PersonhoodReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate against current state, or as of a past block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timepoint {
    Now,
    At(BlockNumber),
}

impl PassportState {
    /// Whether `account` is a person right now.
    pub fn is_person(
        &self,
        account: &Account,
        tiers: &dyn MembershipTiers,
        rounds: &dyn VotingRounds,
    ) -> (bool, PersonhoodReason) {
        self.evaluate(account, Timepoint::Now, tiers, rounds)
    }

    /// Whether `account` was a person as of `block`, typically a round's
    /// snapshot block.
    pub fn is_person_at_timepoint(
        &self,
        account: &Account,
        block: BlockNumber,
        tiers: &dyn MembershipTiers,
        rounds: &dyn VotingRounds,
    ) -> (bool, PersonhoodReason) {
        self.evaluate(account, Timepoint::At(block), tiers, rounds)
    }

    fn evaluate(
        &self,
        account: &Account,
        at: Timepoint,
        tiers: &dyn MembershipTiers,
        rounds: &dyn VotingRounds,
    ) -> (bool, PersonhoodReason) {
        let graph = &self.graph;
        let delegates = match at {
            Timepoint::Now => graph.is_delegator(account),
            Timepoint::At(block) => graph.is_delegator_at(account, block),
        };
        if delegates {
            return (false, PersonhoodReason::Delegated);
        }

        let subject = match at {
            Timepoint::Now => graph.delegator_of(account).cloned(),
            Timepoint::At(block) => graph.delegator_at(account, block),
        }
        .unwrap_or_else(|| account.clone());
        let passport = match at {
            Timepoint::Now => graph.resolve_passport(&subject),
            Timepoint::At(block) => graph.resolve_passport_at(&subject, block),
        };
        let checks = self.settings.enabled_checks();

        if checks.contains(PersonhoodCheck::Blacklist) {
            let blacklisted = match at {
                Timepoint::Now => self.lists.is_passport_blacklisted(&passport, graph),
                Timepoint::At(block) => {
                    self.lists.is_passport_blacklisted_at(&passport, block, graph)
                }
            };
            if blacklisted {
                return (false, PersonhoodReason::Blacklisted);
            }
        }

        if checks.contains(PersonhoodCheck::Whitelist) {
            let whitelisted = match at {
                Timepoint::Now => self.lists.is_passport_whitelisted(&passport, graph),
                Timepoint::At(block) => {
                    self.lists.is_passport_whitelisted_at(&passport, block, graph)
                }
            };
            if whitelisted {
                return (true, PersonhoodReason::Whitelisted);
            }
        }

        if checks.contains(PersonhoodCheck::Signaling) && self.lists.is_signaled(&passport) {
            return (false, PersonhoodReason::Signaled);
        }

        if checks.contains(PersonhoodCheck::ParticipationScore) {
            let (round, threshold) = match at {
                Timepoint::Now => (rounds.current_round(), self.settings.threshold_pop_score()),
                Timepoint::At(block) => (
                    rounds.round_at(block),
                    self.settings.threshold_pop_score_at(block),
                ),
            };
            if self.ledger.cumulative_score_with_decay(&passport, round) >= threshold {
                return (true, PersonhoodReason::ScoreAboveThreshold);
            }
        }

        if checks.contains(PersonhoodCheck::GalaxyMember) {
            let (level, minimum) = match at {
                Timepoint::Now => (
                    tiers
                        .selected_token(&passport)
                        .map(|token| tiers.level_of(token)),
                    self.settings.minimum_galaxy_member_level(),
                ),
                Timepoint::At(block) => (
                    tiers
                        .selected_token_at(&passport, block)
                        .map(|token| tiers.level_of_at(token, block)),
                    self.settings.minimum_galaxy_member_level_at(block),
                ),
            };
            if level.is_some_and(|level| level >= minimum) {
                return (true, PersonhoodReason::TierAboveMinimum);
            }
        }

        (false, PersonhoodReason::NoCriteriaMet)
    }
}
