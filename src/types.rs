multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::curve::EntryFeeCurve;
use crate::distribution::FeeSplit;

// ============================================================
// Member: one per address, never deleted
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Member<M: ManagedTypeApi> {
    /// 1-based position in the global join order.
    pub join_sequence: u64,
    pub joined_at: u64,
    pub payer: ManagedAddress<M>,
    pub price_paid: BigUint<M>,
}

// ============================================================
// Proposal Status: derived from the stored record and the clock
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Submitted, no votes yet.
    Created,
    /// At least one vote, quorum not reached.
    Voting,
    /// Quorum stamped; deadline anchored.
    QuorumMet,
    /// Instant quorum stamped; deadline pulled forward to that moment.
    InstantQuorumMet,
    /// Dispatched. Terminal.
    Executed,
    /// Base voting window elapsed without quorum.
    Expired,
    /// Anchored deadline passed with yes <= no; can never execute.
    Defeated,
    /// Passed, but not executed within the execution window.
    Lapsed,
    /// Withdrawn by the proposer before quorum. Terminal.
    Cancelled,
    /// Expired and removed by maintenance. Terminal.
    Pruned,
}

impl ProposalStatus {
    /// Counts against the proposer's single active slot.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ProposalStatus::Created
                | ProposalStatus::Voting
                | ProposalStatus::QuorumMet
                | ProposalStatus::InstantQuorumMet
        )
    }

    pub fn is_prunable(self) -> bool {
        matches!(
            self,
            ProposalStatus::Expired | ProposalStatus::Defeated | ProposalStatus::Lapsed
        )
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum VoteChoice {
    Absent,
    Yes,
    No,
}

// ============================================================
// Governance actions: what a proposal dispatches when executed
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub enum GovernanceAction<M: ManagedTypeApi> {
    Withdraw {
        asset: EgldOrEsdtTokenIdentifier<M>,
        recipient: ManagedAddress<M>,
        amount: BigUint<M>,
    },
    Disband {
        asset: EgldOrEsdtTokenIdentifier<M>,
    },
    /// Each payload is a top-encoded `ExternalCallPayload`.
    BatchCall {
        total_value: BigUint<M>,
        targets: ManagedVec<M, ManagedAddress<M>>,
        values: ManagedVec<M, BigUint<M>>,
        payloads: ManagedVec<M, ManagedBuffer<M>>,
    },
    SetFeeSplit {
        burn_bps: u64,
        treasury_bps: u64,
        member_pool_bps: u64,
    },
    SetQuorum {
        quorum_bps: u64,
        instant_quorum_bps: u64,
    },
    SetDelays {
        voting_period: u64,
        pre_quorum_minimum: u64,
        post_quorum_delay: u64,
    },
    SetBurnSink {
        sink: ManagedAddress<M>,
    },
    SetEntryFeeCurve {
        curve: EntryFeeCurve<M>,
    },
    SetMetadata {
        metadata: ManagedBuffer<M>,
    },
    SetJoinPaused {
        paused: bool,
    },
    SetMembershipCap {
        cap: u64,
    },
    SetProposalFee {
        fee: BigUint<M>,
    },
    SetReferralShare {
        share_bps: u64,
    },
    SetAdministrator {
        administrator: ManagedAddress<M>,
    },
    SetDelegatedMode {
        enabled: bool,
    },
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct ExternalCallPayload<M: ManagedTypeApi> {
    pub endpoint: ManagedBuffer<M>,
    pub arguments: ManagedVec<M, ManagedBuffer<M>>,
}

// ============================================================
// Proposal: the core governance record
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub action: GovernanceAction<M>,
    pub description: ManagedBuffer<M>,
    pub created_at: u64,
    /// Member count at creation. Only members whose join sequence falls
    /// within it may vote.
    pub eligible_voters: u64,
    pub yes_votes: u64,
    pub no_votes: u64,
    /// 0 until quorum is first reached.
    pub quorum_reached_at: u64,
    /// 0 until instant quorum is first reached.
    pub instant_quorum_reached_at: u64,
    pub end_time: u64,
    pub executed: bool,
    pub cancelled: bool,
    /// sha256 of the dispatch result; empty until executed.
    pub result_hash: ManagedBuffer<M>,
}

// ============================================================
// Configuration records
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub struct GovernanceConfig {
    pub quorum_bps: u64,
    pub instant_quorum_bps: u64,
    /// Base voting window; a proposal without quorum expires after it.
    pub voting_period: u64,
    /// Earliest execution after creation once quorum is reached.
    pub pre_quorum_minimum: u64,
    /// Wait between quorum and execution, anchored at quorum time.
    pub post_quorum_delay: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct DeploymentConfig<M: ManagedTypeApi> {
    pub payment_asset: EgldOrEsdtTokenIdentifier<M>,
    pub entry_fee_curve: EntryFeeCurve<M>,
    pub fee_split: FeeSplit,
    pub protocol_recipient: ManagedAddress<M>,
    pub governance: GovernanceConfig,
    pub burn_sink: ManagedAddress<M>,
    pub administrator: ManagedAddress<M>,
    pub delegated_mode: bool,
    /// 0 means uncapped.
    pub membership_cap: u64,
    pub proposal_fee: BigUint<M>,
    /// Share of the member-pool portion paid to a referrer, in bps.
    pub referral_share_bps: u64,
    pub metadata: ManagedBuffer<M>,
}

// ============================================================
// Receipts and read-only summaries
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct JoinReceipt<M: ManagedTypeApi> {
    pub price: BigUint<M>,
    pub burn: BigUint<M>,
    pub treasury: BigUint<M>,
    pub member_pool: BigUint<M>,
    pub protocol: BigUint<M>,
    pub referral: BigUint<M>,
    pub pool_balance: BigUint<M>,
    pub reward_per_share: BigUint<M>,
    pub treasury_balance: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct TreasuryTotals<M: ManagedTypeApi> {
    pub asset: EgldOrEsdtTokenIdentifier<M>,
    /// Spendable balance tracked from joins and proposal fees.
    pub treasury_balance: BigUint<M>,
    /// Held but never accounted, e.g. direct donations.
    pub unaccounted: BigUint<M>,
    pub pool_balance: BigUint<M>,
    pub pool_remainder: BigUint<M>,
    pub reward_per_share: BigUint<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum TreasuryActionKind {
    Withdraw,
    Disband,
    BatchCall,
}
