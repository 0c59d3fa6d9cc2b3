//! Integration tests driving the passport service end to end:
//! roles → transaction → state → events → evaluation.
//!
//! Collaborators are the in-memory nullables, so block height, time, rounds
//! and tiers are all under the test's control.

use passport_crypto::{
    derive_account, keypair_from_seed, sign_typed, DelegationAuthorization, LinkAuthorization,
};
use passport_links::LinkError;
use passport_nullables::NullEnvironment;
use passport_personhood::{
    PassportConfig, PassportEvent, PassportService, PersonhoodError, PersonhoodReason, Role,
};
use passport_types::{
    Account, AppId, BlockNumber, KeyPair, PersonhoodCheck, Round, SecurityLevel, Timestamp,
    TokenId,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    env: NullEnvironment,
    service: PassportService,
    admin: Account,
}

impl Harness {
    fn new(config: PassportConfig) -> Self {
        let env = NullEnvironment::new();
        env.clock.set_block(1);
        env.clock.set_time(1_000);
        env.rounds.start_round(Round(1), BlockNumber(1));
        let admin = account("admin");
        env.access.grant_all(&admin);
        let service =
            PassportService::new(&config, env.collaborators()).expect("service starts");
        Self {
            env,
            service,
            admin,
        }
    }

    fn plain() -> Self {
        Self::new(PassportConfig::default())
    }

    fn with_checks(checks: &[PersonhoodCheck]) -> Self {
        Self::new(PassportConfig {
            enabled_checks: checks.to_vec(),
            ..PassportConfig::default()
        })
    }

    fn next_block(&self) -> BlockNumber {
        self.env.clock.advance_blocks(1)
    }

    fn points(&self, account: &Account, round: u64, points: u64) {
        self.service
            .register_aggregated_actions_for_round(
                &self.admin,
                account,
                AppId::from_name("app"),
                Round(round),
                points,
            )
            .expect("points recorded");
    }

    fn link(&self, entity: &Account, passport: &Account) {
        self.service
            .link_entity_to_passport(entity, passport)
            .expect("link requested");
        self.service
            .accept_entity_link(passport, entity)
            .expect("link accepted");
    }
}

fn account(name: &str) -> Account {
    Account::new(format!("pass_{name}"))
}

fn keypair(seed: u8) -> (KeyPair, Account) {
    let kp = keypair_from_seed(&[seed; 32]);
    let account = derive_account(&kp.public);
    (kp, account)
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[test]
fn decay_constant_rounds() {
    let h = Harness::plain();
    h.service.set_decay_rate(&h.admin, 20).unwrap();
    let user = account("user");
    for round in 1..=5 {
        h.points(&user, round, 100);
    }
    assert_eq!(h.service.view().get_cumulative_score_with_decay(&user, Round(5)), 336);
}

#[test]
fn decay_rising_rounds() {
    let h = Harness::plain();
    h.service.set_decay_rate(&h.admin, 20).unwrap();
    let user = account("user");
    for (round, points) in (1..=5).zip([100, 100, 200, 200, 400]) {
        h.points(&user, round, points);
    }
    assert_eq!(h.service.view().get_cumulative_score_with_decay(&user, Round(5)), 780);
}

#[test]
fn register_action_uses_current_round_and_app_level() {
    let h = Harness::plain();
    let app = AppId::from_name("dex");
    h.env.apps.register(app, SecurityLevel::Medium);
    h.env.rounds.start_round(Round(3), h.next_block());
    let user = account("user");

    assert_eq!(h.service.register_action(&h.admin, &user, app).unwrap(), 200);
    h.service
        .set_app_security(&h.admin, app, SecurityLevel::High)
        .unwrap();
    assert_eq!(h.service.app_security(&app), SecurityLevel::High);
    assert_eq!(h.service.register_action(&h.admin, &user, app).unwrap(), 400);

    let view = h.service.view();
    assert_eq!(view.user_round_score(&user, Round(3)), 600);
    assert_eq!(view.user_app_total_score(&user, &app), 600);
    assert_eq!(view.user_total_score(&user), 600);
}

#[test]
fn transfer_rule_is_not_retroactive() {
    let h = Harness::plain();
    let (entity, passport) = (account("entity"), account("passport"));
    for round in 1..=5 {
        h.points(&entity, round, 200);
    }
    h.link(&entity, &passport);

    let view = h.service.view();
    assert_eq!(view.get_cumulative_score_with_decay(&passport, Round(5)), 0);
    assert_eq!(view.get_cumulative_score_with_decay(&entity, Round(5)), 1000);

    h.points(&entity, 6, 400);
    let view = h.service.view();
    assert_eq!(view.user_round_score(&passport, Round(6)), 400);
    assert_eq!(view.user_round_score(&entity, Round(6)), 0);
}

#[test]
fn blacklisted_passport_earns_nothing_through_entities() {
    let h = Harness::with_checks(&[PersonhoodCheck::Blacklist]);
    let (entity, passport) = (account("entity"), account("passport"));
    h.link(&entity, &passport);
    h.service.blacklist(&h.admin, &entity).unwrap();
    h.points(&entity, 1, 500);

    assert_eq!(h.service.view().user_total_score(&passport), 0);
    assert_eq!(
        h.service.is_person(&passport),
        (false, PersonhoodReason::Blacklisted)
    );
}

#[test]
fn crediting_follows_the_evaluators_blacklist_view() {
    let h = Harness::with_checks(&[PersonhoodCheck::Blacklist]);
    let (entity, passport) = (account("entity"), account("passport"));
    h.link(&entity, &passport);
    h.service.blacklist(&h.admin, &passport).unwrap();
    h.points(&entity, 1, 500);

    // Only entity listings count once a passport has entities.
    assert_eq!(h.service.view().user_total_score(&passport), 500);
    assert_ne!(h.service.is_person(&passport).1, PersonhoodReason::Blacklisted);
}

// ---------------------------------------------------------------------------
// Linking and delegation
// ---------------------------------------------------------------------------

#[test]
fn capacity_enforced_on_accept() {
    let h = Harness::plain();
    h.service.set_max_entities_per_passport(&h.admin, 2).unwrap();
    let passport = account("passport");
    let entities: Vec<_> = (1..=3).map(|i| account(&format!("e{i}"))).collect();

    for e in &entities {
        h.service.link_entity_to_passport(e, &passport).unwrap();
    }
    h.service.accept_entity_link(&passport, &entities[0]).unwrap();
    h.service.accept_entity_link(&passport, &entities[1]).unwrap();
    h.service.drain_events();

    let err = h
        .service
        .accept_entity_link(&passport, &entities[2])
        .unwrap_err();
    assert!(matches!(
        err,
        PersonhoodError::Link(LinkError::MaxEntitiesPerPassportReached { max: 2, .. })
    ));
    let view = h.service.view();
    assert_eq!(view.get_entities_linked_to_passport(&passport).len(), 2);
    assert_eq!(
        view.get_pending_linkings(&passport).incoming,
        vec![entities[2].clone()]
    );
    assert!(h.service.drain_events().is_empty());
}

#[test]
fn roles_are_exclusive_across_machines() {
    let h = Harness::plain();
    let (entity, passport, other) = (account("entity"), account("passport"), account("other"));
    h.link(&entity, &passport);

    assert!(matches!(
        h.service.delegate_passport(&entity, &other),
        Err(PersonhoodError::Link(LinkError::PassportDelegationFromEntity(_)))
    ));
    h.service.delegate_passport(&passport, &other).unwrap();
    h.service.accept_delegation(&other, &passport).unwrap();

    let view = h.service.view();
    assert!(view.is_passport(&passport));
    assert!(view.is_delegator(&passport));
    assert!(view.is_delegatee(&other));
    assert!(!view.is_entity(&passport));
}

#[test]
fn link_removal_splits_list_counters() {
    let h = Harness::with_checks(&[PersonhoodCheck::Whitelist]);
    let (entity, passport) = (account("entity"), account("passport"));
    h.service.whitelist(&h.admin, &entity).unwrap();
    h.link(&entity, &passport);
    assert!(h.service.view().is_passport_whitelisted(&passport));
    assert_eq!(
        h.service.is_person(&passport),
        (true, PersonhoodReason::Whitelisted)
    );

    h.next_block();
    h.service.remove_entity_link(&passport, &entity).unwrap();
    let view = h.service.view();
    assert!(!view.is_passport_whitelisted(&passport));
    assert!(view.is_whitelisted(&entity));
}

// ---------------------------------------------------------------------------
// Round-snapshot isolation
// ---------------------------------------------------------------------------

#[test]
fn link_after_snapshot_does_not_change_that_round() {
    let h = Harness::with_checks(&[PersonhoodCheck::Blacklist, PersonhoodCheck::Whitelist]);
    let (entity, passport) = (account("entity"), account("passport"));
    h.service.whitelist(&h.admin, &passport).unwrap();
    h.service.blacklist(&h.admin, &entity).unwrap();

    let snapshot = h.next_block();
    assert_eq!(
        h.service.is_person_at_timepoint(&passport, snapshot),
        (true, PersonhoodReason::Whitelisted)
    );

    h.next_block();
    h.link(&entity, &passport);
    assert_eq!(
        h.service.is_person_at_timepoint(&passport, snapshot),
        (true, PersonhoodReason::Whitelisted)
    );

    let next_round = h.next_block();
    assert_eq!(
        h.service.is_person_at_timepoint(&passport, next_round),
        (false, PersonhoodReason::Blacklisted)
    );
    assert!(h.service.view().is_entity_in_timepoint(&entity, next_round));
    assert!(!h.service.view().is_entity_in_timepoint(&entity, snapshot));
}

#[test]
fn delegation_after_snapshot_does_not_change_that_round() {
    let h = Harness::with_checks(&[PersonhoodCheck::ParticipationScore]);
    h.service.set_threshold_pop_score(&h.admin, 100).unwrap();
    let (alice, bob) = (account("alice"), account("bob"));
    h.points(&alice, 1, 100);

    let snapshot = h.next_block();
    h.next_block();
    h.service.delegate_passport(&alice, &bob).unwrap();
    h.service.accept_delegation(&bob, &alice).unwrap();
    let after = h.next_block();

    assert_eq!(
        h.service.is_person_at_timepoint(&alice, snapshot),
        (true, PersonhoodReason::ScoreAboveThreshold)
    );
    assert_eq!(
        h.service.is_person_at_timepoint(&bob, snapshot),
        (false, PersonhoodReason::NoCriteriaMet)
    );
    assert_eq!(
        h.service.is_person_at_timepoint(&alice, after),
        (false, PersonhoodReason::Delegated)
    );
    assert_eq!(
        h.service.is_person_at_timepoint(&bob, after),
        (true, PersonhoodReason::ScoreAboveThreshold)
    );
    assert_eq!(
        h.service.view().get_delegatee_in_timepoint(&alice, after),
        Some(bob.clone())
    );
    assert_eq!(h.service.view().get_delegator_in_timepoint(&bob, snapshot), None);
}

#[test]
fn threshold_change_mid_round_keeps_snapshot_math() {
    let h = Harness::with_checks(&[PersonhoodCheck::ParticipationScore]);
    let user = account("user");
    h.points(&user, 1, 2000);
    let snapshot = h.next_block();

    h.next_block();
    h.service.set_threshold_pop_score(&h.admin, 5000).unwrap();

    assert_eq!(
        h.service.is_person_at_timepoint(&user, snapshot).1,
        PersonhoodReason::ScoreAboveThreshold
    );
    assert_eq!(h.service.is_person(&user).1, PersonhoodReason::NoCriteriaMet);
    assert_eq!(h.service.view().threshold_pop_score_at(snapshot), 2000);
}

#[test]
fn galaxy_tier_is_read_at_the_snapshot() {
    let h = Harness::with_checks(&[PersonhoodCheck::GalaxyMember]);
    let user = account("user");
    let start = h.env.clock.advance_blocks(0);
    h.env.tiers.select_token(&user, Some(TokenId(1)), start);
    h.env.tiers.set_level(TokenId(1), 1, start);

    let snapshot = h.next_block();
    let upgrade = h.next_block();
    h.env.tiers.set_level(TokenId(1), 2, upgrade);

    assert_eq!(
        h.service.is_person_at_timepoint(&user, snapshot).1,
        PersonhoodReason::NoCriteriaMet
    );
    assert_eq!(
        h.service.is_person_at_timepoint(&user, upgrade),
        (true, PersonhoodReason::TierAboveMinimum)
    );
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

#[test]
fn signed_link_and_expiry() {
    let h = Harness::plain();
    let (kp, entity) = keypair(7);
    let passport = account("passport");
    let auth = LinkAuthorization {
        entity: entity.clone(),
        passport: passport.clone(),
        deadline: Timestamp::new(1_100),
    };
    let signed = sign_typed(h.service.signing_domain(), &auth, &kp.private, &kp.public);

    h.env.clock.advance_secs(101);
    assert!(matches!(
        h.service
            .link_entity_to_passport_with_signature(&passport, &auth, &signed),
        Err(PersonhoodError::Link(LinkError::SignatureExpired { .. }))
    ));

    h.env.clock.set_time(1_100);
    h.service
        .link_entity_to_passport_with_signature(&passport, &auth, &signed)
        .unwrap();
    assert_eq!(
        h.service.view().get_passport_for_entity(&entity),
        Some(passport.clone())
    );
}

#[test]
fn signed_delegation_rejects_forgery() {
    let h = Harness::plain();
    let (kp, delegator) = keypair(8);
    let (forger, _) = keypair(9);
    let delegatee = account("delegatee");
    let auth = DelegationAuthorization {
        delegator: delegator.clone(),
        delegatee: delegatee.clone(),
        deadline: Timestamp::new(5_000),
    };
    let domain = h.service.signing_domain().clone();

    let forged = sign_typed(&domain, &auth, &forger.private, &forger.public);
    assert!(matches!(
        h.service.delegate_with_signature(&delegatee, &auth, &forged),
        Err(PersonhoodError::Link(LinkError::InvalidSignature))
    ));

    let signed = sign_typed(&domain, &auth, &kp.private, &kp.public);
    h.service
        .delegate_with_signature(&delegatee, &auth, &signed)
        .unwrap();
    assert_eq!(h.service.view().get_delegator(&delegatee), Some(delegator));
}

// ---------------------------------------------------------------------------
// Lists and signals
// ---------------------------------------------------------------------------

#[test]
fn whitelist_and_blacklist_never_overlap() {
    let h = Harness::plain();
    let user = account("user");
    h.service.whitelist(&h.admin, &user).unwrap();
    h.service.blacklist(&h.admin, &user).unwrap();
    let view = h.service.view();
    assert!(view.is_blacklisted(&user));
    assert!(!view.is_whitelisted(&user));
}

#[test]
fn app_signaler_needs_no_role() {
    let h = Harness::with_checks(&[PersonhoodCheck::Signaling]);
    let (moderator, target, stranger) = (account("mod"), account("target"), account("stranger"));
    let app = AppId::from_name("forum");

    h.service.assign_signaler_to_app(&h.admin, &moderator, app).unwrap();
    h.service
        .signal_user_with_reason(&moderator, &target, "spam")
        .unwrap();
    h.service.signal_user(&moderator, &target).unwrap();
    assert!(matches!(
        h.service.signal_user(&stranger, &target),
        Err(PersonhoodError::MissingRole { role: Role::Signaler, .. })
    ));

    let view = h.service.view();
    assert_eq!(view.signaled_counter(&target), 2);
    assert_eq!(view.app_signals_counter(&app), 2);
    assert_eq!(h.service.is_person(&target), (false, PersonhoodReason::Signaled));

    let cleared = h
        .service
        .reset_user_signals_with_reason(&h.admin, &target, "appeal accepted")
        .unwrap();
    assert_eq!(cleared, 2);
    assert_eq!(h.service.is_person(&target).1, PersonhoodReason::NoCriteriaMet);
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[test]
fn missing_role_is_rejected_before_any_change() {
    let h = Harness::plain();
    let intruder = account("intruder");
    let err = h.service.set_decay_rate(&intruder, 50).unwrap_err();
    assert!(matches!(
        err,
        PersonhoodError::MissingRole { role: Role::ScoreManager, .. }
    ));
    assert_eq!(h.service.view().ledger().params().decay_rate(), 0);
    assert!(h.service.drain_events().is_empty());
}

#[test]
fn failed_operation_leaves_state_and_events_untouched() {
    let h = Harness::plain();
    h.service.set_max_entities_per_passport(&h.admin, 1).unwrap();
    let passport = account("passport");
    h.link(&account("e1"), &passport);
    h.service.link_entity_to_passport(&account("e2"), &passport).unwrap();
    h.service.drain_events();
    let before = h.service.save_snapshot().unwrap();

    assert!(h.service.set_decay_rate(&h.admin, 101).is_err());
    assert!(h.service.accept_entity_link(&account("p"), &account("e")).is_err());
    assert!(h.service.accept_entity_link(&passport, &account("e2")).is_err());
    assert!(h.service.revoke_delegation(&account("nobody")).is_err());

    assert_eq!(h.service.save_snapshot().unwrap(), before);
    assert!(h.service.drain_events().is_empty());

    // Both copies are still in step: the next write sees the rejected ones
    // left nothing behind.
    h.service.remove_entity_link(&passport, &account("e1")).unwrap();
    h.service.accept_entity_link(&passport, &account("e2")).unwrap();
    assert_eq!(
        h.service.view().get_entities_linked_to_passport(&passport),
        vec![account("e2")]
    );
}

#[test]
fn writes_reuse_the_committed_copy_when_no_reader_holds_it() {
    let h = Harness::plain();
    let user = account("user");
    h.points(&user, 1, 10);
    h.points(&user, 1, 10);

    let address = Arc::as_ptr(&h.service.view());
    for _ in 0..10 {
        h.points(&user, 1, 10);
    }
    let after_even = Arc::as_ptr(&h.service.view());
    h.points(&user, 1, 10);
    let after_odd = Arc::as_ptr(&h.service.view());

    // Writes alternate between the same two copies instead of allocating.
    assert_eq!(after_even, address);
    assert_ne!(after_odd, address);
    h.points(&user, 1, 10);
    assert_eq!(Arc::as_ptr(&h.service.view()), address);
    assert_eq!(h.service.view().user_total_score(&user), 140);
}

#[test]
fn held_view_survives_many_writes() {
    let h = Harness::plain();
    let user = account("user");
    h.points(&user, 1, 10);
    let held = h.service.view();
    for _ in 0..5 {
        h.points(&user, 1, 10);
    }
    assert_eq!(held.user_total_score(&user), 10);
    assert_eq!(h.service.view().user_total_score(&user), 60);
}

#[test]
fn write_at_an_older_block_is_rejected() {
    let h = Harness::plain();
    h.env.clock.set_block(10);
    h.service.set_threshold_pop_score(&h.admin, 500).unwrap();
    h.service.drain_events();

    h.env.clock.set_block(9);
    let err = h.service.set_threshold_pop_score(&h.admin, 700).unwrap_err();
    assert!(matches!(err, PersonhoodError::Checkpoint(_)));
    assert!(h.service.whitelist(&h.admin, &account("user")).is_err());
    assert!(h.service.drain_events().is_empty());

    h.env.clock.set_block(10);
    h.service.set_threshold_pop_score(&h.admin, 700).unwrap();
    let view = h.service.view();
    assert_eq!(view.threshold_pop_score_at(BlockNumber(10)), 700);
    assert_eq!(view.latest_block(), BlockNumber(10));
}

#[test]
fn settings_answer_for_blocks_before_the_service_started() {
    let env = NullEnvironment::new();
    env.clock.set_block(100);
    env.rounds.start_round(Round(1), BlockNumber(1));
    let config = PassportConfig {
        enabled_checks: vec![PersonhoodCheck::ParticipationScore],
        ..PassportConfig::default()
    };
    let service = PassportService::new(&config, env.collaborators()).unwrap();

    let view = service.view();
    assert_eq!(view.threshold_pop_score_at(BlockNumber(50)), 2_000);
    assert_eq!(
        service.is_person_at_timepoint(&account("nobody"), BlockNumber(50)),
        (false, PersonhoodReason::NoCriteriaMet)
    );
}

#[test]
fn events_arrive_in_commit_order() {
    let h = Harness::plain();
    let (entity, passport) = (account("entity"), account("passport"));
    h.link(&entity, &passport);
    h.service.whitelist(&h.admin, &entity).unwrap();

    let events = h.service.drain_events();
    assert!(matches!(events[0], PassportEvent::LinkRequested { .. }));
    assert!(matches!(events[1], PassportEvent::EntityLinked { .. }));
    assert!(matches!(events[2], PassportEvent::Listed { .. }));
    assert_eq!(events.len(), 3);
    assert!(h.service.drain_events().is_empty());
}

#[test]
fn readers_keep_their_view() {
    let h = Harness::plain();
    let user = account("user");
    let before = h.service.view();
    h.points(&user, 1, 100);
    assert_eq!(before.user_total_score(&user), 0);
    assert_eq!(h.service.view().user_total_score(&user), 100);
}

#[test]
fn concurrent_writers_are_serialised() {
    let h = Harness::plain();
    std::thread::scope(|scope| {
        for t in 0..4u64 {
            let h = &h;
            scope.spawn(move || {
                for _ in 0..25 {
                    h.points(&account("shared"), 1 + t % 2, 10);
                }
            });
        }
    });
    let view = h.service.view();
    assert_eq!(view.user_total_score(&account("shared")), 1_000);
    assert_eq!(h.service.drain_events().len(), 100);
}

#[test]
fn snapshot_restores_into_new_service() {
    let h = Harness::with_checks(&[PersonhoodCheck::Whitelist]);
    let (entity, passport) = (account("entity"), account("passport"));
    h.link(&entity, &passport);
    h.service.whitelist(&h.admin, &entity).unwrap();
    let bytes = h.service.save_snapshot().unwrap();

    let restored = PassportService::from_snapshot(
        &bytes,
        &PassportConfig::default(),
        h.env.collaborators(),
    )
    .unwrap();
    assert_eq!(
        restored.is_person(&passport),
        (true, PersonhoodReason::Whitelisted)
    );
    assert!(restored.drain_events().is_empty());

    let fresh = Harness::plain();
    fresh.service.load_snapshot(&bytes).unwrap();
    assert!(fresh.service.view().is_entity(&entity));
}
