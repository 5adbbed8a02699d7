multiversx_sc::imports!();

use crate::curve::EntryFeeCurve;
use crate::distribution::FeeSplit;
use crate::types::{GovernanceConfig, JoinReceipt, TreasuryActionKind};

// ============================================================
// EVENTS: one per state change
// ============================================================

#[multiversx_sc::module]
pub trait EventsModule {
    // ── Membership ──

    #[event("memberJoined")]
    fn member_joined_event(
        &self,
        #[indexed] payer: &ManagedAddress,
        #[indexed] recipient: &ManagedAddress,
        #[indexed] join_sequence: u64,
        receipt: &JoinReceipt<Self::Api>,
    );

    #[event("referralRewardPaid")]
    fn referral_reward_paid_event(
        &self,
        #[indexed] referrer: &ManagedAddress,
        #[indexed] recipient: &ManagedAddress,
        amount: &BigUint,
    );

    // ── Treasury ──

    #[event("poolCredited")]
    fn pool_credited_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] amount: &BigUint,
        #[indexed] members: u64,
        reward_per_share: &BigUint,
    );

    #[event("rewardClaimed")]
    fn reward_claimed_event(
        &self,
        #[indexed] member: &ManagedAddress,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
    );

    #[event("treasuryAction")]
    fn treasury_action_event(
        &self,
        #[indexed] kind: TreasuryActionKind,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] recipient: &ManagedAddress,
        amount: &BigUint,
    );

    #[event("assetCleanedUp")]
    fn asset_cleaned_up_event(
        &self,
        #[indexed] asset: &EgldOrEsdtTokenIdentifier,
        #[indexed] generation: u64,
    );

    // ── Governance ──

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] eligible_voters: u64,
        end_time: u64,
    );

    #[event("voteCast")]
    fn vote_cast_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] support: bool,
        #[indexed] yes_votes: u64,
        no_votes: u64,
    );

    #[event("quorumReached")]
    fn quorum_reached_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] instant: bool,
        end_time: u64,
    );

    #[event("proposalExecuted")]
    fn proposal_executed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] success: bool,
        result_hash: &ManagedBuffer,
    );

    #[event("delegatedActionExecuted")]
    fn delegated_action_executed_event(
        &self,
        #[indexed] administrator: &ManagedAddress,
        result_hash: &ManagedBuffer,
    );

    #[event("proposalCancelled")]
    fn proposal_cancelled_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
    );

    #[event("proposalPruned")]
    fn proposal_pruned_event(&self, #[indexed] proposal_id: u64);

    // ── Parameters (old + new) ──

    #[event("metadataUpdated")]
    fn metadata_updated_event(&self, #[indexed] old: &ManagedBuffer, new: &ManagedBuffer);

    #[event("curveUpdated")]
    fn curve_updated_event(
        &self,
        #[indexed] old: &EntryFeeCurve<Self::Api>,
        new: &EntryFeeCurve<Self::Api>,
    );

    #[event("feeSplitUpdated")]
    fn fee_split_updated_event(&self, #[indexed] old: &FeeSplit, new: &FeeSplit);

    #[event("quorumUpdated")]
    fn quorum_updated_event(
        &self,
        #[indexed] old_quorum_bps: u64,
        #[indexed] old_instant_quorum_bps: u64,
        #[indexed] new_quorum_bps: u64,
        new_instant_quorum_bps: u64,
    );

    #[event("delaysUpdated")]
    fn delays_updated_event(&self, #[indexed] old: &GovernanceConfig, new: &GovernanceConfig);

    #[event("burnSinkUpdated")]
    fn burn_sink_updated_event(&self, #[indexed] old: &ManagedAddress, new: &ManagedAddress);

    #[event("joinPausedUpdated")]
    fn join_paused_updated_event(&self, #[indexed] old: bool, new: bool);

    #[event("membershipCapUpdated")]
    fn membership_cap_updated_event(&self, #[indexed] old: u64, new: u64);

    #[event("proposalFeeUpdated")]
    fn proposal_fee_updated_event(&self, #[indexed] old: &BigUint, new: &BigUint);

    #[event("referralShareUpdated")]
    fn referral_share_updated_event(&self, #[indexed] old: u64, new: u64);

    #[event("administratorUpdated")]
    fn administrator_updated_event(&self, #[indexed] old: &ManagedAddress, new: &ManagedAddress);

    #[event("delegatedModeUpdated")]
    fn delegated_mode_updated_event(&self, #[indexed] old: bool, new: bool);
}
