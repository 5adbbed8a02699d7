use membership_treasury::config::{
    validate_delays, validate_quorum, validate_share, MAX_DELAY_SECONDS,
};
use membership_treasury::errors::*;
use membership_treasury::curve::EntryFeeCurve;
use membership_treasury::distribution::FeeSplit;
use membership_treasury::governance::{
    anchored_end_time, meets_fraction, QuorumChange, EXECUTION_WINDOW_SECONDS,
};
use membership_treasury::treasury::validate_batch;
use membership_treasury::types::{
    GovernanceAction, GovernanceConfig, Proposal, ProposalStatus, VoteChoice,
};
use multiversx_sc::types::{BigUint, ManagedAddress, ManagedBuffer, ManagedVec};
use multiversx_sc_scenario::api::StaticApi;

const DAY: u64 = 24 * 60 * 60;
const CREATED_AT: u64 = 1_700_000_000;

fn config() -> GovernanceConfig {
    GovernanceConfig {
        quorum_bps: 5_000,
        instant_quorum_bps: 8_000,
        voting_period: 7 * DAY,
        pre_quorum_minimum: DAY,
        post_quorum_delay: 2 * DAY,
    }
}

fn proposal(eligible_voters: u64) -> Proposal<StaticApi> {
    Proposal::new(
        1,
        ManagedAddress::from(&[1u8; 32]),
        GovernanceAction::SetJoinPaused { paused: true },
        ManagedBuffer::from("pause joining"),
        CREATED_AT,
        eligible_voters,
        &config(),
    )
}

fn vote_yes(proposal: &mut Proposal<StaticApi>, count: u64) {
    for _ in 0..count {
        proposal.tally(VoteChoice::Absent, VoteChoice::Yes);
    }
}

fn vote_no(proposal: &mut Proposal<StaticApi>, count: u64) {
    for _ in 0..count {
        proposal.tally(VoteChoice::Absent, VoteChoice::No);
    }
}

// ── Thresholds ──

#[test]
fn test_meets_fraction() {
    assert!(meets_fraction(5, 10, 5_000));
    assert!(!meets_fraction(4, 10, 5_000));
    assert!(meets_fraction(1, 3, 3_333));
    assert!(!meets_fraction(0, 0, 1));
    assert!(meets_fraction(u64::MAX, u64::MAX, 10_000));
}

#[test]
fn test_anchored_end_time_takes_later_bound() {
    let config = config();
    // Post-quorum delay ends later than the pre-quorum minimum here.
    assert_eq!(
        anchored_end_time(CREATED_AT, CREATED_AT + 10, &config),
        CREATED_AT + 10 + 2 * DAY
    );
    let late_start = GovernanceConfig {
        pre_quorum_minimum: 5 * DAY,
        ..config
    };
    assert_eq!(
        anchored_end_time(CREATED_AT, CREATED_AT + 10, &late_start),
        CREATED_AT + 5 * DAY
    );
}

// ── Life-cycle ──

#[test]
fn test_new_proposal_uses_voting_period() {
    let proposal = proposal(10);
    assert_eq!(proposal.end_time, CREATED_AT + 7 * DAY);
    assert_eq!(proposal.status(CREATED_AT), ProposalStatus::Created);
    assert_eq!(proposal.accepts_votes(CREATED_AT), Ok(()));
}

#[test]
fn test_quorum_anchors_deadline() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 4);
    assert_eq!(
        proposal.update_thresholds(CREATED_AT + 100, &config()),
        QuorumChange::Unchanged
    );
    assert_eq!(proposal.status(CREATED_AT + 100), ProposalStatus::Voting);

    vote_yes(&mut proposal, 1);
    assert_eq!(
        proposal.update_thresholds(CREATED_AT + 200, &config()),
        QuorumChange::Quorum
    );
    assert_eq!(proposal.quorum_reached_at, CREATED_AT + 200);
    assert_eq!(proposal.end_time, CREATED_AT + 200 + 2 * DAY);
    assert_eq!(proposal.status(CREATED_AT + 200), ProposalStatus::QuorumMet);
}

#[test]
fn test_delay_change_does_not_move_anchored_deadline() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 5);
    proposal.update_thresholds(CREATED_AT + 200, &config());
    let anchored = proposal.end_time;

    let shortened = GovernanceConfig {
        post_quorum_delay: 0,
        pre_quorum_minimum: 0,
        ..config()
    };
    vote_yes(&mut proposal, 1);
    assert_eq!(
        proposal.update_thresholds(CREATED_AT + 300, &shortened),
        QuorumChange::Unchanged
    );
    assert_eq!(proposal.end_time, anchored);
    assert_eq!(
        proposal.check_executable(CREATED_AT + 300),
        Err(ERR_DEADLINE_NOT_REACHED)
    );
}

#[test]
fn test_instant_quorum_pulls_deadline_forward() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 5);
    proposal.update_thresholds(CREATED_AT + 200, &config());

    vote_yes(&mut proposal, 3);
    assert_eq!(
        proposal.update_thresholds(CREATED_AT + 400, &config()),
        QuorumChange::Instant
    );
    assert_eq!(proposal.end_time, CREATED_AT + 400);
    assert_eq!(
        proposal.status(CREATED_AT + 400),
        ProposalStatus::InstantQuorumMet
    );
    assert_eq!(proposal.check_executable(CREATED_AT + 400), Ok(()));
}

#[test]
fn test_single_vote_reaching_both_thresholds() {
    let mut proposal = proposal(1);
    vote_yes(&mut proposal, 1);
    assert_eq!(
        proposal.update_thresholds(CREATED_AT + 50, &config()),
        QuorumChange::Instant
    );
    assert_eq!(proposal.quorum_reached_at, CREATED_AT + 50);
    assert_eq!(proposal.end_time, CREATED_AT + 50);
}

#[test]
fn test_vote_change_moves_tally() {
    let mut proposal = proposal(10);
    proposal.tally(VoteChoice::Absent, VoteChoice::Yes);
    proposal.tally(VoteChoice::Yes, VoteChoice::No);
    assert_eq!(proposal.yes_votes, 0);
    assert_eq!(proposal.no_votes, 1);
}

#[test]
fn test_voting_closes_at_deadline() {
    let proposal = proposal(10);
    let deadline = proposal.end_time;
    assert_eq!(proposal.accepts_votes(deadline - 1), Ok(()));
    assert_eq!(proposal.accepts_votes(deadline), Err(ERR_VOTING_CLOSED));
}

#[test]
fn test_expired_without_quorum() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 2);
    proposal.update_thresholds(CREATED_AT + 10, &config());

    let after = proposal.end_time;
    assert_eq!(proposal.status(after), ProposalStatus::Expired);
    assert!(proposal.status(after).is_prunable());
    assert_eq!(proposal.check_executable(after), Err(ERR_QUORUM_NOT_MET));
}

#[test]
fn test_defeated_when_no_matches_yes() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 5);
    proposal.update_thresholds(CREATED_AT + 10, &config());
    vote_no(&mut proposal, 5);

    let after = proposal.end_time;
    assert_eq!(proposal.status(after), ProposalStatus::Defeated);
    assert!(!proposal.status(after).is_active());
    assert!(proposal.status(after).is_prunable());
    assert_eq!(proposal.check_executable(after), Err(ERR_NOT_APPROVED));
}

#[test]
fn test_executed_and_cancelled_are_terminal() {
    let mut executed = proposal(10);
    vote_yes(&mut executed, 6);
    executed.update_thresholds(CREATED_AT + 10, &config());
    executed.executed = true;
    assert_eq!(executed.status(CREATED_AT + 10), ProposalStatus::Executed);
    assert_eq!(
        executed.check_executable(executed.end_time),
        Err(ERR_ALREADY_EXECUTED)
    );
    assert_eq!(
        executed.accepts_votes(CREATED_AT + 10),
        Err(ERR_ALREADY_EXECUTED)
    );

    let mut cancelled = proposal(10);
    cancelled.cancelled = true;
    assert_eq!(cancelled.status(CREATED_AT), ProposalStatus::Cancelled);
    assert!(!cancelled.status(CREATED_AT).is_active());
    assert_eq!(
        cancelled.accepts_votes(CREATED_AT),
        Err(ERR_PROPOSAL_CANCELLED)
    );
    assert_eq!(
        cancelled.check_executable(cancelled.end_time),
        Err(ERR_PROPOSAL_CANCELLED)
    );
}

#[test]
fn test_unexecuted_pass_lapses_after_window() {
    let mut proposal = proposal(10);
    vote_yes(&mut proposal, 6);
    proposal.update_thresholds(CREATED_AT + 10, &config());

    let last_chance = proposal.end_time + EXECUTION_WINDOW_SECONDS - 1;
    assert_eq!(proposal.status(last_chance), ProposalStatus::QuorumMet);
    assert_eq!(proposal.check_executable(last_chance), Ok(()));

    let lapsed_at = proposal.execution_deadline();
    assert_eq!(proposal.status(lapsed_at), ProposalStatus::Lapsed);
    assert!(!proposal.status(lapsed_at).is_active());
    assert!(proposal.status(lapsed_at).is_prunable());
    assert_eq!(
        proposal.check_executable(lapsed_at),
        Err(ERR_EXECUTION_WINDOW_CLOSED)
    );
    assert_eq!(
        proposal.status(CREATED_AT + 10 * 365 * DAY),
        ProposalStatus::Lapsed
    );
}

// ── Action checks at submission ──

fn current_split() -> FeeSplit {
    FeeSplit {
        burn_bps: 1_000,
        treasury_bps: 5_000,
        member_pool_bps: 3_000,
        protocol_bps: 1_000,
    }
}

#[test]
fn test_parameter_actions_checked_at_submission() {
    let split = current_split();
    let invalid: [(GovernanceAction<StaticApi>, &str); 8] = [
        (
            GovernanceAction::SetFeeSplit {
                burn_bps: 5_000,
                treasury_bps: 5_000,
                member_pool_bps: 0,
            },
            ERR_SPLIT_NOT_FULL,
        ),
        (
            GovernanceAction::SetQuorum {
                quorum_bps: 6_000,
                instant_quorum_bps: 5_000,
            },
            ERR_INSTANT_BELOW_QUORUM,
        ),
        (
            GovernanceAction::SetDelays {
                voting_period: 0,
                pre_quorum_minimum: 0,
                post_quorum_delay: 0,
            },
            ERR_DELAY_OUT_OF_RANGE,
        ),
        (
            GovernanceAction::SetEntryFeeCurve {
                curve: EntryFeeCurve {
                    base_fee: BigUint::from(100u64),
                    rate_denominator: 10_000,
                    segments: ManagedVec::new(),
                },
            },
            ERR_CURVE_EMPTY,
        ),
        (
            GovernanceAction::SetReferralShare { share_bps: 10_001 },
            ERR_SHARE_OUT_OF_RANGE,
        ),
        (
            GovernanceAction::SetBurnSink {
                sink: ManagedAddress::zero(),
            },
            ERR_ZERO_ADDRESS,
        ),
        (
            GovernanceAction::Withdraw {
                asset: multiversx_sc::types::EgldOrEsdtTokenIdentifier::egld(),
                recipient: ManagedAddress::from(&[2u8; 32]),
                amount: BigUint::zero(),
            },
            ERR_ZERO_AMOUNT,
        ),
        (
            GovernanceAction::BatchCall {
                total_value: BigUint::zero(),
                targets: ManagedVec::new(),
                values: ManagedVec::new(),
                payloads: ManagedVec::new(),
            },
            ERR_BATCH_EMPTY,
        ),
    ];
    for (action, err) in invalid.iter() {
        assert_eq!(action.validate(&split), Err(*err));
    }
}

#[test]
fn test_valid_actions_pass_submission_checks() {
    let split = current_split();
    let valid: [GovernanceAction<StaticApi>; 4] = [
        GovernanceAction::SetFeeSplit {
            burn_bps: 0,
            treasury_bps: 6_000,
            member_pool_bps: 3_000,
        },
        GovernanceAction::SetQuorum {
            quorum_bps: 4_000,
            instant_quorum_bps: 9_000,
        },
        GovernanceAction::SetEntryFeeCurve {
            curve: EntryFeeCurve::fixed(BigUint::from(250u64)),
        },
        GovernanceAction::SetJoinPaused { paused: true },
    ];
    for action in valid.iter() {
        assert_eq!(action.validate(&split), Ok(()));
    }
}

// ── Parameter validation ──

#[test]
fn test_quorum_bounds() {
    assert_eq!(validate_quorum(5_000, 8_000), Ok(()));
    assert_eq!(validate_quorum(10_000, 10_000), Ok(()));
    assert_eq!(validate_quorum(0, 8_000), Err(ERR_QUORUM_OUT_OF_RANGE));
    assert_eq!(validate_quorum(5_000, 10_001), Err(ERR_QUORUM_OUT_OF_RANGE));
    assert_eq!(validate_quorum(6_000, 5_000), Err(ERR_INSTANT_BELOW_QUORUM));
}

#[test]
fn test_delay_bounds() {
    assert_eq!(validate_delays(DAY, 0, 0), Ok(()));
    assert_eq!(
        validate_delays(MAX_DELAY_SECONDS, MAX_DELAY_SECONDS, MAX_DELAY_SECONDS),
        Ok(())
    );
    assert_eq!(validate_delays(0, 0, 0), Err(ERR_DELAY_OUT_OF_RANGE));
    assert_eq!(
        validate_delays(DAY, MAX_DELAY_SECONDS + 1, 0),
        Err(ERR_DELAY_OUT_OF_RANGE)
    );
    assert_eq!(
        validate_delays(DAY, 0, MAX_DELAY_SECONDS + 1),
        Err(ERR_DELAY_OUT_OF_RANGE)
    );
    assert_eq!(config().validate(), Ok(()));
}

#[test]
fn test_share_bounds() {
    assert_eq!(validate_share(10_000), Ok(()));
    assert_eq!(validate_share(10_001), Err(ERR_SHARE_OUT_OF_RANGE));
}

// ── Batch calls ──

fn targets(bytes: &[u8]) -> ManagedVec<StaticApi, ManagedAddress<StaticApi>> {
    let mut list = ManagedVec::new();
    for byte in bytes {
        list.push(ManagedAddress::from(&[*byte; 32]));
    }
    list
}

fn values(amounts: &[u64]) -> ManagedVec<StaticApi, BigUint<StaticApi>> {
    let mut list = ManagedVec::new();
    for amount in amounts {
        list.push(BigUint::from(*amount));
    }
    list
}

fn payloads(count: usize) -> ManagedVec<StaticApi, ManagedBuffer<StaticApi>> {
    let mut list = ManagedVec::new();
    for _ in 0..count {
        list.push(ManagedBuffer::new());
    }
    list
}

#[test]
fn test_batch_validation() {
    let total = BigUint::<StaticApi>::from(30u64);
    assert_eq!(
        validate_batch(&total, &targets(&[1, 2]), &values(&[10, 20]), &payloads(2)),
        Ok(())
    );
    assert_eq!(
        validate_batch(&BigUint::zero(), &targets(&[]), &values(&[]), &payloads(0)),
        Err(ERR_BATCH_EMPTY)
    );
    assert_eq!(
        validate_batch(&total, &targets(&[1, 2]), &values(&[30]), &payloads(2)),
        Err(ERR_BATCH_LENGTH_MISMATCH)
    );
    assert_eq!(
        validate_batch(&total, &targets(&[1, 0]), &values(&[10, 20]), &payloads(2)),
        Err(ERR_BATCH_ZERO_TARGET)
    );
    assert_eq!(
        validate_batch(&total, &targets(&[1, 2]), &values(&[10, 21]), &payloads(2)),
        Err(ERR_BATCH_VALUE_MISMATCH)
    );
}
