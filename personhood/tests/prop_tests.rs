use proptest::prelude::*;

use passport_personhood::{PassportConfig, PassportState, PersonhoodError, StateSnapshot};
use passport_types::{Account, AppId, BlockNumber, Round};

const ACCOUNTS: usize = 5;

#[derive(Clone, Debug)]
enum Op {
    RequestLink(usize, usize),
    AcceptLink(usize, usize),
    RemoveLink(usize, usize),
    RequestDelegation(usize, usize),
    AcceptDelegation(usize, usize),
    RevokeDelegation(usize),
    Whitelist(usize),
    Blacklist(usize),
    RemoveFromWhitelist(usize),
    Points(usize, u64, u64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let who = 0..ACCOUNTS;
    prop_oneof![
        (who.clone(), who.clone()).prop_map(|(a, b)| Op::RequestLink(a, b)),
        (who.clone(), who.clone()).prop_map(|(a, b)| Op::AcceptLink(a, b)),
        (who.clone(), who.clone()).prop_map(|(a, b)| Op::RemoveLink(a, b)),
        (who.clone(), who.clone()).prop_map(|(a, b)| Op::RequestDelegation(a, b)),
        (who.clone(), who.clone()).prop_map(|(a, b)| Op::AcceptDelegation(a, b)),
        who.clone().prop_map(Op::RevokeDelegation),
        who.clone().prop_map(Op::Whitelist),
        who.clone().prop_map(Op::Blacklist),
        who.clone().prop_map(Op::RemoveFromWhitelist),
        (who, 1u64..4, 0u64..1_000).prop_map(|(a, r, p)| Op::Points(a, r, p)),
    ]
}

fn accounts() -> Vec<Account> {
    (0..ACCOUNTS)
        .map(|i| Account::new(format!("pass_prop{i}")))
        .collect()
}

fn genesis() -> PassportState {
    let config = PassportConfig {
        max_entities_per_passport: 2,
        ..PassportConfig::default()
    };
    PassportState::from_config(&config, BlockNumber::GENESIS).unwrap()
}

/// Apply `op` in place, the way the service applies it to its standby copy.
fn apply(
    next: &mut PassportState,
    op: &Op,
    who: &[Account],
    block: BlockNumber,
) -> Result<u64, PersonhoodError> {
    let app = AppId::from_name("prop");
    let result = match op {
        Op::RequestLink(e, p) => next.link_entity_to_passport(&who[*e], &who[*p]).map(|_| 0),
        Op::AcceptLink(p, e) => next.accept_entity_link(&who[*p], &who[*e], block).map(|_| 0),
        Op::RemoveLink(c, e) => next.remove_entity_link(&who[*c], &who[*e], block).map(|_| 0),
        Op::RequestDelegation(a, b) => next.delegate_passport(&who[*a], &who[*b], block).map(|_| 0),
        Op::AcceptDelegation(b, a) => next.accept_delegation(&who[*b], &who[*a], block).map(|_| 0),
        Op::RevokeDelegation(c) => next.revoke_delegation(&who[*c], block).map(|_| 0),
        Op::Whitelist(a) => {
            next.whitelist(&who[*a]);
            Ok(0)
        }
        Op::Blacklist(a) => {
            next.blacklist(&who[*a]);
            Ok(0)
        }
        Op::RemoveFromWhitelist(a) => {
            next.remove_from_whitelist(&who[*a]);
            Ok(0)
        }
        Op::Points(a, round, points) => {
            next.register_aggregated_actions_for_round(&who[*a], app, Round(*round), *points)
        }
    };
    next.take_events();
    result
}

/// Returns the points credited, if any.
fn commit(state: &mut PassportState, op: &Op, who: &[Account], block: BlockNumber) -> u64 {
    apply(state, op, who, block).unwrap_or(0)
}

proptest! {
    /// No account is ever on both lists.
    #[test]
    fn lists_are_disjoint(ops in prop::collection::vec(arb_op(), 1..60)) {
        let who = accounts();
        let mut state = genesis();
        for (i, op) in ops.iter().enumerate() {
            commit(&mut state, op, &who, BlockNumber(i as u64 + 1));
            for a in &who {
                prop_assert!(!(state.is_whitelisted(a) && state.is_blacklisted(a)));
            }
        }
    }

    /// An active entity never takes part in a delegation, and no passport
    /// exceeds its entity limit.
    #[test]
    fn link_and_delegation_roles_exclusive(ops in prop::collection::vec(arb_op(), 1..80)) {
        let who = accounts();
        let mut state = genesis();
        for (i, op) in ops.iter().enumerate() {
            commit(&mut state, op, &who, BlockNumber(i as u64 + 1));
            for a in &who {
                if state.is_entity(a) {
                    prop_assert!(!state.is_delegator(a));
                    prop_assert!(!state.is_delegatee(a));
                    prop_assert!(!state.is_passport(a));
                }
                if state.is_delegator(a) {
                    prop_assert!(!state.is_delegatee(a));
                }
                prop_assert!(state.get_entities_linked_to_passport(a).len() <= 2);
            }
        }
    }

    /// Reading history at the latest block agrees with the live relation.
    #[test]
    fn history_at_latest_block_matches_live(ops in prop::collection::vec(arb_op(), 1..60)) {
        let who = accounts();
        let mut state = genesis();
        let mut block = BlockNumber::GENESIS;
        for (i, op) in ops.iter().enumerate() {
            block = BlockNumber(i as u64 + 1);
            commit(&mut state, op, &who, block);
        }
        for a in &who {
            prop_assert_eq!(state.is_entity_in_timepoint(a, block), state.is_entity(a));
            prop_assert_eq!(state.is_passport_in_timepoint(a, block), state.is_passport(a));
            prop_assert_eq!(
                state.get_passport_for_entity_at_timepoint(a, block),
                state.get_passport_for_entity(a)
            );
            prop_assert_eq!(state.get_delegatee_in_timepoint(a, block), state.get_delegatee(a));
            prop_assert_eq!(state.get_delegator_in_timepoint(a, block), state.get_delegator(a));
        }
    }

    /// Every credited point lands on exactly one account.
    #[test]
    fn credited_points_are_conserved(ops in prop::collection::vec(arb_op(), 1..60)) {
        let who = accounts();
        let mut state = genesis();
        let mut credited = 0u64;
        for (i, op) in ops.iter().enumerate() {
            credited += commit(&mut state, op, &who, BlockNumber(i as u64 + 1));
        }
        let held: u64 = who.iter().map(|a| state.user_total_score(a)).sum();
        prop_assert_eq!(held, credited);
    }

    /// An operation that fails has written nothing.
    #[test]
    fn rejected_operation_changes_nothing(ops in prop::collection::vec(arb_op(), 1..80)) {
        let who = accounts();
        let mut state = genesis();
        for (i, op) in ops.iter().enumerate() {
            let before = bincode::serialize(&state).unwrap();
            if apply(&mut state, op, &who, BlockNumber(i as u64 + 1)).is_err() {
                prop_assert_eq!(bincode::serialize(&state).unwrap(), before);
            }
        }
    }

    /// Decoding arbitrary bytes as a snapshot never panics.
    #[test]
    fn corrupt_snapshot_rejected(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = StateSnapshot::decode(&data);
    }
}
