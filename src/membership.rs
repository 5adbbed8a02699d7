multiversx_sc::imports!();

use crate::config::validate_share;
use crate::dispatch::Capability;
use crate::distribution::{bps_of, holdings_conserved};
use crate::errors::*;
use crate::types::JoinReceipt;

// ============================================================
// Member ledger: who is in, and in which order they joined
// ============================================================

pub mod ledger {
    multiversx_sc::imports!();

    use crate::errors::*;
    use crate::types::Member;

    #[multiversx_sc::module]
    pub trait MemberLedgerModule {
        fn is_member(&self, address: &ManagedAddress) -> bool {
            !self.members(address).is_empty()
        }

        /// Everyone who ever joined. Members are never removed, so this is also
        /// the number of reward shares.
        fn member_count(&self) -> u64 {
            self.member_addresses().len() as u64
        }

        fn require_member(&self, address: &ManagedAddress) -> Member<Self::Api> {
            let member = self.members(address);
            require!(!member.is_empty(), ERR_NOT_MEMBER);
            member.get()
        }

        fn record_member(
            &self,
            recipient: &ManagedAddress,
            payer: &ManagedAddress,
            price_paid: &BigUint,
        ) -> u64 {
            self.member_addresses().push(recipient);
            let join_sequence = self.member_count();
            let member = Member {
                join_sequence,
                joined_at: self.blockchain().get_block_timestamp(),
                payer: payer.clone(),
                price_paid: price_paid.clone(),
            };
            self.members(recipient).set(&member);
            join_sequence
        }

        #[storage_mapper("members")]
        fn members(&self, address: &ManagedAddress) -> SingleValueMapper<Member<Self::Api>>;

        /// Index `n` holds the member with join sequence `n`.
        #[storage_mapper("memberAddresses")]
        fn member_addresses(&self) -> VecMapper<ManagedAddress>;
    }
}

pub use ledger::MemberLedgerModule;

// ============================================================
// Membership: priced entry through the curve, split by the treasury
// ============================================================

#[multiversx_sc::module]
pub trait MembershipModule:
    crate::membership::ledger::MemberLedgerModule
    + crate::config::ConfigModule
    + crate::curve::CurveModule
    + crate::treasury::TreasuryModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: join
    // Caller pays the current entry price for `recipient`.
    // ========================================================

    #[payable("*")]
    #[endpoint(join)]
    fn join(
        &self,
        recipient: ManagedAddress,
        referrer: OptionalValue<ManagedAddress>,
        max_price: OptionalValue<BigUint>,
    ) -> u64 {
        require!(!self.dispatch_lock().get(), ERR_REENTRANT_CALL);
        let payer = self.blockchain().get_caller();
        let payment = self.call_value().egld_or_single_esdt();
        let asset = self.payment_asset().get();
        require!(payment.token_identifier == asset, ERR_WRONG_PAYMENT_ASSET);

        // ── Gates ──
        require!(!self.join_paused().get(), ERR_JOIN_PAUSED);
        require!(!recipient.is_zero(), ERR_ZERO_ADDRESS);
        require!(!self.is_member(&recipient), ERR_ALREADY_MEMBER);
        let existing_members = self.member_count();
        let cap = self.membership_cap().get();
        require!(cap == 0 || existing_members < cap, ERR_MEMBERSHIP_CAP_REACHED);

        // ── Price ──
        let price = self.quote_price(existing_members);
        if let OptionalValue::Some(ceiling) = max_price {
            require!(ceiling == 0u64 || price <= ceiling, ERR_PRICE_ABOVE_CEILING);
        }
        require!(payment.amount >= price, ERR_INSUFFICIENT_PAYMENT);

        // ── Books: everything accounted for plus this payment must be held ──
        let observed = self.blockchain().get_sc_balance(&asset, 0);
        require!(
            holdings_conserved(&observed, &self.committed_holdings(&asset), &payment.amount),
            ERR_ASSET_NOT_CONSERVING
        );

        // ── Effects ──
        let referrer = self.eligible_referrer(referrer, &recipient);
        let mut split = self.fee_split().get().apply(&price);
        let referral = match &referrer {
            Some(_) => {
                let share = bps_of(&split.member_pool, self.referral_share_bps().get());
                split.carve_from_pool(&share)
            },
            None => BigUint::zero(),
        };
        if existing_members == 0 {
            split.fold_pool_into_treasury();
        }

        let pool = self.credit_pool(&asset, &split.member_pool, existing_members);
        let treasury_balance = self.add_to_treasury(&asset, &split.treasury);

        let join_sequence = self.record_member(&recipient, &payer, &price);
        self.seed_snapshots(&recipient);

        // ── Interactions ──
        self.send_asset(&self.burn_sink().get(), &asset, &split.burn);
        self.send_asset(&self.protocol_recipient().get(), &asset, &split.protocol);
        if let Some(referrer) = &referrer {
            self.send_asset(referrer, &asset, &referral);
            self.referral_reward_paid_event(referrer, &recipient, &referral);
        }
        let change = &payment.amount - &price;
        self.send_asset(&payer, &asset, &change);

        let receipt = JoinReceipt {
            price,
            burn: split.burn,
            treasury: split.treasury,
            member_pool: split.member_pool,
            protocol: split.protocol,
            referral,
            pool_balance: pool.balance,
            reward_per_share: pool.reward_per_share,
            treasury_balance,
        };
        self.member_joined_event(&payer, &recipient, join_sequence, &receipt);

        join_sequence
    }

    /// A referrer counts only if they are already a member and are not the
    /// one joining.
    fn eligible_referrer(
        &self,
        referrer: OptionalValue<ManagedAddress>,
        recipient: &ManagedAddress,
    ) -> Option<ManagedAddress> {
        match referrer {
            OptionalValue::Some(referrer)
                if &referrer != recipient && self.is_member(&referrer) =>
            {
                Some(referrer)
            },
            _ => None,
        }
    }

    // ========================================================
    // Governance mutators
    // ========================================================

    fn set_join_paused(&self, _authority: &Capability, paused: bool) {
        let old = self.join_paused().replace(paused);
        self.join_paused_updated_event(old, paused);
    }

    fn set_membership_cap(&self, _authority: &Capability, cap: u64) {
        let old = self.membership_cap().replace(cap);
        self.membership_cap_updated_event(old, cap);
    }

    fn set_referral_share(&self, _authority: &Capability, share_bps: u64) {
        self.require_valid(validate_share(share_bps));
        let old = self.referral_share_bps().replace(share_bps);
        self.referral_share_updated_event(old, share_bps);
    }
}
