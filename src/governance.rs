multiversx_sc::imports!();

use crate::config::{validate_delays, validate_quorum, validate_share};
use crate::dispatch::Capability;
use crate::distribution::{FeeSplit, BPS};
use crate::errors::*;
use crate::treasury::validate_batch;
use crate::types::{GovernanceAction, GovernanceConfig, Proposal, ProposalStatus, VoteChoice};

/// How long a passed proposal stays executable after its deadline. Past
/// it the proposal lapses, frees its proposer and becomes prunable.
pub const EXECUTION_WINDOW_SECONDS: u64 = 14 * 24 * 60 * 60;

/// Whether `votes` out of `eligible` reaches `fraction_bps`.
pub fn meets_fraction(votes: u64, eligible: u64, fraction_bps: u64) -> bool {
    eligible > 0 && (votes as u128) * (BPS as u128) >= (fraction_bps as u128) * (eligible as u128)
}

/// Deadline fixed at the moment quorum is reached. Uses the delays in force
/// at that moment; later configuration changes never move it.
pub fn anchored_end_time(created_at: u64, quorum_reached_at: u64, config: &GovernanceConfig) -> u64 {
    core::cmp::max(
        created_at.saturating_add(config.pre_quorum_minimum),
        quorum_reached_at.saturating_add(config.post_quorum_delay),
    )
}

impl<M: ManagedTypeApi> GovernanceAction<M> {
    /// Parameter checks that do not depend on balances. Run at submission;
    /// the mutators check again on dispatch.
    pub fn validate(&self, current_split: &FeeSplit) -> Result<(), &'static str> {
        match self {
            GovernanceAction::Withdraw {
                recipient, amount, ..
            } => {
                if *amount == 0u64 {
                    return Err(ERR_ZERO_AMOUNT);
                }
                non_zero(recipient)
            },
            GovernanceAction::Disband { .. } => Ok(()),
            GovernanceAction::BatchCall {
                total_value,
                targets,
                values,
                payloads,
            } => validate_batch(total_value, targets, values, payloads),
            GovernanceAction::SetFeeSplit {
                burn_bps,
                treasury_bps,
                member_pool_bps,
            } => current_split
                .with_governable_parts(*burn_bps, *treasury_bps, *member_pool_bps)
                .map(|_| ()),
            GovernanceAction::SetQuorum {
                quorum_bps,
                instant_quorum_bps,
            } => validate_quorum(*quorum_bps, *instant_quorum_bps),
            GovernanceAction::SetDelays {
                voting_period,
                pre_quorum_minimum,
                post_quorum_delay,
            } => validate_delays(*voting_period, *pre_quorum_minimum, *post_quorum_delay),
            GovernanceAction::SetBurnSink { sink } => non_zero(sink),
            GovernanceAction::SetEntryFeeCurve { curve } => curve.validate(),
            GovernanceAction::SetReferralShare { share_bps } => validate_share(*share_bps),
            GovernanceAction::SetAdministrator { administrator } => non_zero(administrator),
            GovernanceAction::SetMetadata { .. }
            | GovernanceAction::SetJoinPaused { .. }
            | GovernanceAction::SetMembershipCap { .. }
            | GovernanceAction::SetProposalFee { .. }
            | GovernanceAction::SetDelegatedMode { .. } => Ok(()),
        }
    }
}

fn non_zero<M: ManagedTypeApi>(address: &ManagedAddress<M>) -> Result<(), &'static str> {
    if address.is_zero() {
        return Err(ERR_ZERO_ADDRESS);
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum QuorumChange {
    Unchanged,
    Quorum,
    Instant,
}

impl<M: ManagedTypeApi> Proposal<M> {
    pub fn new(
        id: u64,
        proposer: ManagedAddress<M>,
        action: GovernanceAction<M>,
        description: ManagedBuffer<M>,
        created_at: u64,
        eligible_voters: u64,
        config: &GovernanceConfig,
    ) -> Self {
        Proposal {
            id,
            proposer,
            action,
            description,
            created_at,
            eligible_voters,
            yes_votes: 0,
            no_votes: 0,
            quorum_reached_at: 0,
            instant_quorum_reached_at: 0,
            end_time: created_at.saturating_add(config.voting_period),
            executed: false,
            cancelled: false,
            result_hash: ManagedBuffer::new(),
        }
    }

    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.cancelled {
            return ProposalStatus::Cancelled;
        }
        if self.executed {
            return ProposalStatus::Executed;
        }
        if self.quorum_reached_at == 0 {
            return if now >= self.end_time {
                ProposalStatus::Expired
            } else if self.yes_votes + self.no_votes == 0 {
                ProposalStatus::Created
            } else {
                ProposalStatus::Voting
            };
        }
        if now >= self.end_time && self.yes_votes <= self.no_votes {
            ProposalStatus::Defeated
        } else if now >= self.execution_deadline() {
            ProposalStatus::Lapsed
        } else if self.instant_quorum_reached_at != 0 {
            ProposalStatus::InstantQuorumMet
        } else {
            ProposalStatus::QuorumMet
        }
    }

    pub fn accepts_votes(&self, now: u64) -> Result<(), &'static str> {
        if self.cancelled {
            return Err(ERR_PROPOSAL_CANCELLED);
        }
        if self.executed {
            return Err(ERR_ALREADY_EXECUTED);
        }
        if now >= self.end_time {
            return Err(ERR_VOTING_CLOSED);
        }
        Ok(())
    }

    /// Moves one vote from `previous` to `next`.
    pub fn tally(&mut self, previous: VoteChoice, next: VoteChoice) {
        match previous {
            VoteChoice::Yes => self.yes_votes -= 1,
            VoteChoice::No => self.no_votes -= 1,
            VoteChoice::Absent => {},
        }
        match next {
            VoteChoice::Yes => self.yes_votes += 1,
            VoteChoice::No => self.no_votes += 1,
            VoteChoice::Absent => {},
        }
    }

    /// Stamps quorum and instant quorum the first time yes votes cross them.
    pub fn update_thresholds(&mut self, now: u64, config: &GovernanceConfig) -> QuorumChange {
        let mut change = QuorumChange::Unchanged;
        if self.quorum_reached_at == 0
            && meets_fraction(self.yes_votes, self.eligible_voters, config.quorum_bps)
        {
            self.quorum_reached_at = now;
            self.end_time = anchored_end_time(self.created_at, now, config);
            change = QuorumChange::Quorum;
        }
        if self.quorum_reached_at != 0
            && self.instant_quorum_reached_at == 0
            && meets_fraction(self.yes_votes, self.eligible_voters, config.instant_quorum_bps)
        {
            self.instant_quorum_reached_at = now;
            self.end_time = now;
            change = QuorumChange::Instant;
        }
        change
    }

    pub fn check_executable(&self, now: u64) -> Result<(), &'static str> {
        if self.executed {
            return Err(ERR_ALREADY_EXECUTED);
        }
        if self.cancelled {
            return Err(ERR_PROPOSAL_CANCELLED);
        }
        if self.quorum_reached_at == 0 {
            return Err(ERR_QUORUM_NOT_MET);
        }
        if now < self.end_time {
            return Err(ERR_DEADLINE_NOT_REACHED);
        }
        if self.yes_votes <= self.no_votes {
            return Err(ERR_NOT_APPROVED);
        }
        if now >= self.execution_deadline() {
            return Err(ERR_EXECUTION_WINDOW_CLOSED);
        }
        Ok(())
    }

    pub fn execution_deadline(&self) -> u64 {
        self.end_time.saturating_add(EXECUTION_WINDOW_SECONDS)
    }
}

// ============================================================
// Governance: proposal life-cycle
// ============================================================

#[multiversx_sc::module]
pub trait GovernanceModule:
    crate::membership::ledger::MemberLedgerModule
    + crate::treasury::TreasuryModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: propose
    // Members only, one active proposal each, fee goes to the treasury.
    // ========================================================

    #[payable("*")]
    #[endpoint(propose)]
    fn propose(&self, action: GovernanceAction<Self::Api>, description: ManagedBuffer) -> u64 {
        require!(!self.dispatch_lock().get(), ERR_REENTRANT_CALL);
        let caller = self.blockchain().get_caller();
        self.require_member(&caller);
        require!(
            !self.has_active_proposal(&caller),
            ERR_ACTIVE_PROPOSAL_EXISTS
        );

        let payment = self.call_value().egld_or_single_esdt();
        let fee = self.proposal_fee().get();
        let asset = self.payment_asset().get();
        if fee == 0u64 {
            require!(payment.amount == 0u64, ERR_WRONG_PROPOSAL_FEE);
        } else {
            require!(
                payment.token_identifier == asset && payment.amount == fee,
                ERR_WRONG_PROPOSAL_FEE
            );
        }

        self.require_valid(action.validate(&self.fee_split().get()));

        let proposal_id = self.proposal_count().get() + 1;
        let now = self.now();
        let proposal = Proposal::new(
            proposal_id,
            caller.clone(),
            action,
            description,
            now,
            self.member_count(),
            &self.governance_config().get(),
        );

        self.proposals(proposal_id).set(&proposal);
        self.proposal_count().set(proposal_id);
        self.open_proposals().insert(proposal_id);
        self.active_proposal(&caller).set(proposal_id);
        if fee > 0u64 {
            self.add_to_treasury(&asset, &fee);
        }

        self.proposal_created_event(
            proposal_id,
            &caller,
            proposal.eligible_voters,
            proposal.end_time,
        );
        proposal_id
    }

    // ========================================================
    // ENDPOINT: vote
    // One vote per eligible member, changeable until the deadline.
    // ========================================================

    #[endpoint(vote)]
    fn vote(&self, proposal_id: u64, support: bool) {
        let caller = self.blockchain().get_caller();
        let member = self.require_member(&caller);
        let mut proposal = self.require_proposal(proposal_id);
        let now = self.now();
        self.require_valid(proposal.accepts_votes(now));
        require!(
            member.join_sequence <= proposal.eligible_voters,
            ERR_NOT_ELIGIBLE_VOTER
        );

        let previous = self.vote_of(proposal_id, &caller);
        let next = if support { VoteChoice::Yes } else { VoteChoice::No };
        require!(previous != next, ERR_VOTE_UNCHANGED);

        if previous == VoteChoice::Absent {
            self.voters(proposal_id).push(&caller);
        }
        proposal.tally(previous, next);
        let change = proposal.update_thresholds(now, &self.governance_config().get());
        self.votes(proposal_id, &caller).set(next);
        self.proposals(proposal_id).set(&proposal);

        self.vote_cast_event(
            proposal_id,
            &caller,
            support,
            proposal.yes_votes,
            proposal.no_votes,
        );
        if change != QuorumChange::Unchanged {
            self.quorum_reached_event(
                proposal_id,
                change == QuorumChange::Instant,
                proposal.end_time,
            );
        }
    }

    // ========================================================
    // ENDPOINT: cancelProposal
    // Proposer can withdraw their proposal until quorum is reached.
    // ========================================================

    #[endpoint(cancelProposal)]
    fn cancel_proposal(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_proposal(proposal_id);
        require!(proposal.proposer == caller, ERR_NOT_PROPOSER);
        require!(!proposal.executed, ERR_ALREADY_EXECUTED);
        require!(!proposal.cancelled, ERR_PROPOSAL_CANCELLED);
        require!(proposal.quorum_reached_at == 0, ERR_CANCEL_AFTER_QUORUM);

        proposal.cancelled = true;
        self.proposals(proposal_id).set(&proposal);
        self.close_proposal(proposal_id, &caller);

        self.proposal_cancelled_event(proposal_id, &caller);
    }

    // ========================================================
    // ENDPOINT: pruneExpired
    // Anyone may sweep expired or defeated proposals. Active ones are
    // skipped, never touched.
    // ========================================================

    #[endpoint(pruneExpired)]
    fn prune_expired(&self, max_count: OptionalValue<usize>) -> usize {
        let limit = max_count.into_option().unwrap_or(usize::MAX);
        let now = self.now();

        let mut expired = ManagedVec::<Self::Api, u64>::new();
        for proposal_id in self.open_proposals().iter() {
            if expired.len() >= limit {
                break;
            }
            let proposal = self.proposals(proposal_id).get();
            if proposal.status(now).is_prunable() {
                expired.push(proposal_id);
            }
        }

        for proposal_id in expired.iter() {
            let proposer = self.proposals(proposal_id).get().proposer;
            self.close_proposal(proposal_id, &proposer);
            self.clear_votes(proposal_id);
            self.proposals(proposal_id).clear();
            self.proposal_pruned_event(proposal_id);
        }
        expired.len()
    }

    // ========================================================
    // Execution hand-off to the dispatcher
    // ========================================================

    /// Marks the proposal executed before anything is dispatched, so a
    /// re-entrant call sees it as already spent.
    fn take_for_execution(&self, proposal_id: u64) -> Proposal<Self::Api> {
        let mut proposal = self.require_proposal(proposal_id);
        self.require_valid(proposal.check_executable(self.now()));

        proposal.executed = true;
        self.proposals(proposal_id).set(&proposal);
        self.close_proposal(proposal_id, &proposal.proposer);
        proposal
    }

    fn record_execution(&self, proposal_id: u64, result_hash: &ManagedBuffer) {
        self.proposals(proposal_id)
            .update(|proposal| proposal.result_hash = result_hash.clone());
    }

    fn close_proposal(&self, proposal_id: u64, proposer: &ManagedAddress) {
        self.open_proposals().swap_remove(&proposal_id);
        let slot = self.active_proposal(proposer);
        if slot.get() == proposal_id {
            slot.clear();
        }
    }

    fn clear_votes(&self, proposal_id: u64) {
        let mut voters = self.voters(proposal_id);
        for voter in voters.iter() {
            self.votes(proposal_id, &voter).clear();
        }
        voters.clear();
    }

    // ========================================================
    // Governance mutators
    // ========================================================

    fn set_quorum(&self, _authority: &Capability, quorum_bps: u64, instant_quorum_bps: u64) {
        self.require_valid(validate_quorum(quorum_bps, instant_quorum_bps));
        let mut config = self.governance_config().get();
        let (old_quorum, old_instant) = (config.quorum_bps, config.instant_quorum_bps);
        config.quorum_bps = quorum_bps;
        config.instant_quorum_bps = instant_quorum_bps;
        self.governance_config().set(config);

        self.quorum_updated_event(old_quorum, old_instant, quorum_bps, instant_quorum_bps);
    }

    fn set_delays(
        &self,
        _authority: &Capability,
        voting_period: u64,
        pre_quorum_minimum: u64,
        post_quorum_delay: u64,
    ) {
        self.require_valid(validate_delays(
            voting_period,
            pre_quorum_minimum,
            post_quorum_delay,
        ));
        let old = self.governance_config().get();
        let mut config = old;
        config.voting_period = voting_period;
        config.pre_quorum_minimum = pre_quorum_minimum;
        config.post_quorum_delay = post_quorum_delay;
        self.governance_config().set(config);

        self.delays_updated_event(&old, &config);
    }

    fn set_proposal_fee(&self, _authority: &Capability, fee: BigUint) {
        let old = self.proposal_fee().replace(fee.clone());
        self.proposal_fee_updated_event(&old, &fee);
    }

    // ========================================================
    // Lookups
    // ========================================================

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        let mapper = self.proposals(proposal_id);
        require!(!mapper.is_empty(), ERR_PROPOSAL_NOT_FOUND);
        mapper.get()
    }

    fn has_active_proposal(&self, proposer: &ManagedAddress) -> bool {
        let slot = self.active_proposal(proposer);
        if slot.is_empty() {
            return false;
        }
        let proposals = self.proposals(slot.get());
        !proposals.is_empty() && proposals.get().status(self.now()).is_active()
    }

    fn vote_of(&self, proposal_id: u64, voter: &ManagedAddress) -> VoteChoice {
        let mapper = self.votes(proposal_id, voter);
        if mapper.is_empty() {
            VoteChoice::Absent
        } else {
            mapper.get()
        }
    }

    fn proposal_status(&self, proposal_id: u64) -> ProposalStatus {
        let mapper = self.proposals(proposal_id);
        if mapper.is_empty() {
            require!(
                proposal_id > 0 && proposal_id <= self.proposal_count().get(),
                ERR_PROPOSAL_NOT_FOUND
            );
            return ProposalStatus::Pruned;
        }
        mapper.get().status(self.now())
    }

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("proposalCount")]
    fn proposal_count(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    /// Proposals neither executed, cancelled nor pruned.
    #[storage_mapper("openProposals")]
    fn open_proposals(&self) -> UnorderedSetMapper<u64>;

    #[storage_mapper("activeProposal")]
    fn active_proposal(&self, proposer: &ManagedAddress) -> SingleValueMapper<u64>;

    #[storage_mapper("votes")]
    fn votes(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<VoteChoice>;

    /// Everyone who voted on a proposal, so pruning can clear `votes`.
    #[storage_mapper("voters")]
    fn voters(&self, proposal_id: u64) -> VecMapper<ManagedAddress>;
}
