#![no_std]

multiversx_sc::imports!();

pub mod config;
pub mod curve;
pub mod dispatch;
pub mod distribution;
pub mod errors;
pub mod events;
pub mod governance;
pub mod membership;
pub mod treasury;
pub mod types;
pub mod views;

use config::validate_share;
use errors::ERR_ZERO_ADDRESS;
use types::DeploymentConfig;

// ============================================================
// Contract
// A member-governed treasury: priced entry, per-share rewards,
// and a proposal engine that is the only route to its mutators.
// ============================================================

#[multiversx_sc::contract]
pub trait MembershipTreasury:
    config::ConfigModule
    + events::EventsModule
    + curve::CurveModule
    + membership::ledger::MemberLedgerModule
    + membership::MembershipModule
    + treasury::TreasuryModule
    + governance::GovernanceModule
    + dispatch::DispatchModule
    + views::ViewsModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(&self, config: DeploymentConfig<Self::Api>) {
        self.require_valid(config.fee_split.validate());
        self.require_valid(config.governance.validate());
        self.require_valid(validate_share(config.referral_share_bps));
        require!(!config.burn_sink.is_zero(), ERR_ZERO_ADDRESS);
        require!(!config.administrator.is_zero(), ERR_ZERO_ADDRESS);
        require!(
            config.fee_split.protocol_bps == 0 || !config.protocol_recipient.is_zero(),
            ERR_ZERO_ADDRESS
        );

        self.init_curve(config.entry_fee_curve);
        self.payment_asset().set(&config.payment_asset);
        self.fee_split().set(config.fee_split);
        self.protocol_recipient().set(&config.protocol_recipient);
        self.governance_config().set(config.governance);
        self.burn_sink().set(&config.burn_sink);
        self.administrator().set(&config.administrator);
        self.delegated_mode().set(config.delegated_mode);
        self.membership_cap().set(config.membership_cap);
        self.proposal_fee().set(&config.proposal_fee);
        self.referral_share_bps().set(config.referral_share_bps);
        self.metadata().set(&config.metadata);
        self.join_paused().set(false);
        self.proposal_count().set(0u64);
    }

    #[upgrade]
    fn upgrade(&self) {}
}
