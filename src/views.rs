multiversx_sc::imports!();

use crate::curve::EntryFeeCurve;
use crate::distribution::{FeeSplit, RewardPool};
use crate::types::{GovernanceConfig, Member, Proposal, ProposalStatus, TreasuryTotals, VoteChoice};

// ============================================================
// VIEWS: read-only surface for the access-control backend
// ============================================================

#[multiversx_sc::module]
pub trait ViewsModule:
    crate::config::ConfigModule
    + crate::events::EventsModule
    + crate::curve::CurveModule
    + crate::membership::ledger::MemberLedgerModule
    + crate::treasury::TreasuryModule
    + crate::governance::GovernanceModule
{
    // ── Membership ──

    #[view(hasAccess)]
    fn has_access(&self, address: &ManagedAddress) -> bool {
        self.is_member(address)
    }

    #[view(getMember)]
    fn get_member(&self, address: &ManagedAddress) -> OptionalValue<Member<Self::Api>> {
        let member = self.members(address);
        if member.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(member.get())
        }
    }

    #[view(getMemberCount)]
    fn get_member_count(&self) -> u64 {
        self.member_count()
    }

    #[view(getMembers)]
    fn get_members(&self, from: u64, count: u64) -> MultiValueEncoded<ManagedAddress> {
        let mut result = MultiValueEncoded::new();
        let total = self.member_count();
        if count == 0 || total == 0 {
            return result;
        }
        let start = if from == 0 { 1u64 } else { from };
        if start > total {
            return result;
        }
        let end = core::cmp::min(start.saturating_add(count - 1), total);
        for sequence in start..=end {
            result.push(self.member_addresses().get(sequence as usize));
        }
        result
    }

    // ── Pricing ──

    #[view(getCurrentPrice)]
    fn get_current_price(&self) -> BigUint {
        self.quote_price(self.member_count())
    }

    #[view(getPriceAt)]
    fn get_price_at(&self, joins_so_far: u64) -> BigUint {
        self.quote_price(joins_so_far)
    }

    #[view(getEntryFeeCurve)]
    fn get_entry_fee_curve(&self) -> EntryFeeCurve<Self::Api> {
        self.entry_fee_curve().get()
    }

    // ── Treasury ──

    #[view(getTreasuryTotals)]
    fn get_treasury_totals(
        &self,
        asset: OptionalValue<EgldOrEsdtTokenIdentifier>,
    ) -> TreasuryTotals<Self::Api> {
        let asset = match asset {
            OptionalValue::Some(asset) => asset,
            OptionalValue::None => self.payment_asset().get(),
        };
        self.treasury_totals(&asset)
    }

    #[view(getClaimable)]
    fn get_claimable(&self, member: &ManagedAddress, asset: &EgldOrEsdtTokenIdentifier) -> BigUint {
        if !self.is_member(member) {
            return BigUint::zero();
        }
        let pool = self.load_pool(asset);
        pool.claimable(&self.load_snapshot(member, asset))
    }

    #[view(getRewardPool)]
    fn get_reward_pool(&self, asset: &EgldOrEsdtTokenIdentifier) -> RewardPool<Self::Api> {
        self.load_pool(asset)
    }

    #[view(getSecondaryAssets)]
    fn get_secondary_assets(&self) -> MultiValueEncoded<EgldOrEsdtTokenIdentifier> {
        let mut result = MultiValueEncoded::new();
        for asset in self.secondary_assets().iter() {
            result.push(asset);
        }
        result
    }

    #[view(getFeeSplit)]
    fn get_fee_split(&self) -> FeeSplit {
        self.fee_split().get()
    }

    // ── Governance ──

    #[view(getGovernanceConfig)]
    fn get_governance_config(&self) -> GovernanceConfig {
        self.governance_config().get()
    }

    #[view(getProposal)]
    fn get_proposal(&self, id: u64) -> OptionalValue<Proposal<Self::Api>> {
        let proposal = self.proposals(id);
        if proposal.is_empty() {
            OptionalValue::None
        } else {
            OptionalValue::Some(proposal.get())
        }
    }

    #[view(getProposalStatus)]
    fn get_proposal_status(&self, id: u64) -> ProposalStatus {
        self.proposal_status(id)
    }

    #[view(getProposals)]
    fn get_proposals(&self, from: u64, count: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        if count == 0 {
            return result;
        }
        let total = self.proposal_count().get();
        if total == 0 {
            return result;
        }
        let start = if from == 0 { 1u64 } else { from };
        if start > total {
            return result;
        }
        let end = core::cmp::min(start.saturating_add(count - 1), total);

        for i in start..=end {
            if !self.proposals(i).is_empty() {
                result.push(self.proposals(i).get());
            }
        }
        result
    }

    #[view(getActiveProposals)]
    fn get_active_proposals(&self) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        let now = self.now();
        for id in self.open_proposals().iter() {
            let proposal = self.proposals(id).get();
            if proposal.status(now).is_active() {
                result.push(proposal);
            }
        }
        result
    }

    #[view(getVote)]
    fn get_vote(&self, proposal_id: u64, voter: &ManagedAddress) -> VoteChoice {
        self.vote_of(proposal_id, voter)
    }

    #[view(getProposalCount)]
    fn get_proposal_count(&self) -> u64 {
        self.proposal_count().get()
    }

    // ── Configuration ──

    #[view(getPaymentAsset)]
    fn get_payment_asset(&self) -> EgldOrEsdtTokenIdentifier {
        self.payment_asset().get()
    }

    #[view(getContractConfig)]
    fn get_contract_config(
        &self,
    ) -> MultiValue6<ManagedAddress, ManagedAddress, ManagedAddress, bool, bool, u64> {
        (
            self.administrator().get(),
            self.burn_sink().get(),
            self.protocol_recipient().get(),
            self.delegated_mode().get(),
            self.join_paused().get(),
            self.membership_cap().get(),
        )
            .into()
    }

    #[view(getProposalFee)]
    fn get_proposal_fee(&self) -> BigUint {
        self.proposal_fee().get()
    }

    #[view(getReferralShare)]
    fn get_referral_share(&self) -> u64 {
        self.referral_share_bps().get()
    }

    #[view(getMetadata)]
    fn get_metadata(&self) -> ManagedBuffer {
        self.metadata().get()
    }
}
