multiversx_sc::imports!();

use crate::distribution::{FeeSplit, BPS};
use crate::errors::*;
use crate::types::GovernanceConfig;

/// Longest any governance delay or window may be: one year.
pub const MAX_DELAY_SECONDS: u64 = 365 * 24 * 60 * 60;

impl GovernanceConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_quorum(self.quorum_bps, self.instant_quorum_bps)?;
        validate_delays(
            self.voting_period,
            self.pre_quorum_minimum,
            self.post_quorum_delay,
        )
    }
}

pub fn validate_quorum(quorum_bps: u64, instant_quorum_bps: u64) -> Result<(), &'static str> {
    if quorum_bps == 0 || quorum_bps > BPS || instant_quorum_bps > BPS {
        return Err(ERR_QUORUM_OUT_OF_RANGE);
    }
    if instant_quorum_bps < quorum_bps {
        return Err(ERR_INSTANT_BELOW_QUORUM);
    }
    Ok(())
}

pub fn validate_delays(
    voting_period: u64,
    pre_quorum_minimum: u64,
    post_quorum_delay: u64,
) -> Result<(), &'static str> {
    if voting_period == 0
        || voting_period > MAX_DELAY_SECONDS
        || pre_quorum_minimum > MAX_DELAY_SECONDS
        || post_quorum_delay > MAX_DELAY_SECONDS
    {
        return Err(ERR_DELAY_OUT_OF_RANGE);
    }
    Ok(())
}

pub fn validate_share(share_bps: u64) -> Result<(), &'static str> {
    if share_bps > BPS {
        return Err(ERR_SHARE_OUT_OF_RANGE);
    }
    Ok(())
}

// ============================================================
// Shared configuration storage
// ============================================================

#[multiversx_sc::module]
pub trait ConfigModule {
    fn require_valid(&self, result: Result<(), &'static str>) {
        if let Err(err) = result {
            sc_panic!(err);
        }
    }

    fn now(&self) -> u64 {
        self.blockchain().get_block_timestamp()
    }

    // ── Payment asset and fee routing ──

    #[storage_mapper("paymentAsset")]
    fn payment_asset(&self) -> SingleValueMapper<EgldOrEsdtTokenIdentifier>;

    #[storage_mapper("feeSplit")]
    fn fee_split(&self) -> SingleValueMapper<FeeSplit>;

    #[storage_mapper("protocolRecipient")]
    fn protocol_recipient(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("burnSink")]
    fn burn_sink(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("referralShareBps")]
    fn referral_share_bps(&self) -> SingleValueMapper<u64>;

    // ── Membership gates ──

    #[storage_mapper("joinPaused")]
    fn join_paused(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("membershipCap")]
    fn membership_cap(&self) -> SingleValueMapper<u64>;

    // ── Governance ──

    #[storage_mapper("governanceConfig")]
    fn governance_config(&self) -> SingleValueMapper<GovernanceConfig>;

    #[storage_mapper("proposalFee")]
    fn proposal_fee(&self) -> SingleValueMapper<BigUint>;

    // ── Authority ──

    #[storage_mapper("administrator")]
    fn administrator(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("delegatedMode")]
    fn delegated_mode(&self) -> SingleValueMapper<bool>;

    /// Set while a dispatch is running; fee-collecting entry points refuse
    /// to start until it clears.
    #[storage_mapper("dispatchLock")]
    fn dispatch_lock(&self) -> SingleValueMapper<bool>;

    #[storage_mapper("metadata")]
    fn metadata(&self) -> SingleValueMapper<ManagedBuffer>;
}
