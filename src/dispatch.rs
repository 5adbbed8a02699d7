multiversx_sc::imports!();

use crate::errors::*;
use crate::types::GovernanceAction;

// ============================================================
// Capability: proof that a mutator call passed the gate
// ============================================================

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Authority {
    /// A proposal that passed its vote and deadline.
    Governance { proposal_id: u64 },
    /// The administrator, acting while delegated mode is on.
    Administrator,
}

/// Handed to every privileged mutator. Only the two `authorize_*`
/// functions below can produce one.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Capability {
    authority: Authority,
}

impl Capability {
    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_governance(&self) -> bool {
        matches!(self.authority, Authority::Governance { .. })
    }

    /// The administrator may not replace itself or re-enable its own
    /// delegated mode; those take a vote.
    pub fn permits<M: ManagedTypeApi>(&self, action: &GovernanceAction<M>) -> bool {
        match action {
            GovernanceAction::SetAdministrator { .. } => self.is_governance(),
            GovernanceAction::SetDelegatedMode { enabled } => !*enabled || self.is_governance(),
            _ => true,
        }
    }
}

/// Gate for executing a passed proposal.
pub fn authorize_proposal(
    delegated_mode: bool,
    proposal_id: u64,
) -> Result<Capability, &'static str> {
    if delegated_mode {
        return Err(ERR_DELEGATED_MODE_ACTIVE);
    }
    Ok(Capability {
        authority: Authority::Governance { proposal_id },
    })
}

/// Gate for the administrator's direct path.
pub fn authorize_administrator<M: ManagedTypeApi>(
    caller: &ManagedAddress<M>,
    administrator: &ManagedAddress<M>,
    delegated_mode: bool,
) -> Result<Capability, &'static str> {
    if caller != administrator {
        return Err(ERR_NOT_ADMINISTRATOR);
    }
    if !delegated_mode {
        return Err(ERR_DELEGATED_MODE_OFF);
    }
    Ok(Capability {
        authority: Authority::Administrator,
    })
}

// ============================================================
// Dispatcher: routes every action to the component that owns it
// ============================================================

#[multiversx_sc::module]
pub trait DispatchModule:
    crate::config::ConfigModule
    + crate::events::EventsModule
    + crate::curve::CurveModule
    + crate::membership::ledger::MemberLedgerModule
    + crate::membership::MembershipModule
    + crate::treasury::TreasuryModule
    + crate::governance::GovernanceModule
{
    // ========================================================
    // ENDPOINT: executeProposal
    // After the anchored deadline, with yes > no.
    // ========================================================

    #[endpoint(executeProposal)]
    fn execute_proposal(&self, proposal_id: u64) -> ManagedBuffer {
        let caller = self.blockchain().get_caller();
        self.require_member(&caller);
        require!(!self.dispatch_lock().get(), ERR_REENTRANT_CALL);
        let capability = match authorize_proposal(self.delegated_mode().get(), proposal_id) {
            Ok(capability) => capability,
            Err(err) => sc_panic!(err),
        };

        let proposal = self.take_for_execution(proposal_id);
        let result_hash = self.guarded_dispatch(&capability, proposal.action);
        self.record_execution(proposal_id, &result_hash);

        self.proposal_executed_event(proposal_id, true, &result_hash);
        result_hash
    }

    // ========================================================
    // ENDPOINT: adminExecute
    // Delegated-authority path through the same gate.
    // ========================================================

    #[endpoint(adminExecute)]
    fn admin_execute(&self, action: GovernanceAction<Self::Api>) -> ManagedBuffer {
        require!(!self.dispatch_lock().get(), ERR_REENTRANT_CALL);
        let caller = self.blockchain().get_caller();
        let capability = match authorize_administrator(
            &caller,
            &self.administrator().get(),
            self.delegated_mode().get(),
        ) {
            Ok(capability) => capability,
            Err(err) => sc_panic!(err),
        };

        let result_hash = self.guarded_dispatch(&capability, action);
        self.delegated_action_executed_event(&caller, &result_hash);
        result_hash
    }

    /// Holds the dispatch lock for the duration of the call and returns the
    /// sha256 of whatever the action produced.
    fn guarded_dispatch(
        &self,
        capability: &Capability,
        action: GovernanceAction<Self::Api>,
    ) -> ManagedBuffer {
        self.dispatch_lock().set(true);
        let result = self.dispatch(capability, action);
        self.dispatch_lock().clear();
        self.crypto().sha256(&result).as_managed_buffer().clone()
    }

    fn dispatch(
        &self,
        capability: &Capability,
        action: GovernanceAction<Self::Api>,
    ) -> ManagedBuffer {
        require!(capability.permits(&action), ERR_GOVERNANCE_ONLY);

        match action {
            // ── Treasury ──
            GovernanceAction::Withdraw {
                asset,
                recipient,
                amount,
            } => {
                self.withdraw(capability, &asset, &recipient, &amount);
                ManagedBuffer::new()
            },
            GovernanceAction::Disband { asset } => {
                let reward_per_share = self.disband(capability, &asset);
                reward_per_share.to_bytes_be_buffer()
            },
            GovernanceAction::BatchCall {
                total_value,
                targets,
                values,
                payloads,
            } => self.batch_external_call(capability, &total_value, &targets, &values, &payloads),
            GovernanceAction::SetFeeSplit {
                burn_bps,
                treasury_bps,
                member_pool_bps,
            } => {
                self.set_fee_split(capability, burn_bps, treasury_bps, member_pool_bps);
                ManagedBuffer::new()
            },
            GovernanceAction::SetBurnSink { sink } => {
                self.set_burn_sink(capability, &sink);
                ManagedBuffer::new()
            },

            // ── Curve ──
            GovernanceAction::SetEntryFeeCurve { curve } => {
                self.replace_curve(capability, curve);
                ManagedBuffer::new()
            },

            // ── Membership ──
            GovernanceAction::SetJoinPaused { paused } => {
                self.set_join_paused(capability, paused);
                ManagedBuffer::new()
            },
            GovernanceAction::SetMembershipCap { cap } => {
                self.set_membership_cap(capability, cap);
                ManagedBuffer::new()
            },
            GovernanceAction::SetReferralShare { share_bps } => {
                self.set_referral_share(capability, share_bps);
                ManagedBuffer::new()
            },

            // ── Governance ──
            GovernanceAction::SetQuorum {
                quorum_bps,
                instant_quorum_bps,
            } => {
                self.set_quorum(capability, quorum_bps, instant_quorum_bps);
                ManagedBuffer::new()
            },
            GovernanceAction::SetDelays {
                voting_period,
                pre_quorum_minimum,
                post_quorum_delay,
            } => {
                self.set_delays(
                    capability,
                    voting_period,
                    pre_quorum_minimum,
                    post_quorum_delay,
                );
                ManagedBuffer::new()
            },
            GovernanceAction::SetProposalFee { fee } => {
                self.set_proposal_fee(capability, fee);
                ManagedBuffer::new()
            },

            // ── Authority and metadata ──
            GovernanceAction::SetMetadata { metadata } => {
                self.set_metadata(capability, metadata);
                ManagedBuffer::new()
            },
            GovernanceAction::SetAdministrator { administrator } => {
                self.set_administrator(capability, &administrator);
                ManagedBuffer::new()
            },
            GovernanceAction::SetDelegatedMode { enabled } => {
                self.set_delegated_mode(capability, enabled);
                ManagedBuffer::new()
            },
        }
    }

    fn set_metadata(&self, _authority: &Capability, metadata: ManagedBuffer) {
        let old = self.metadata().replace(metadata.clone());
        self.metadata_updated_event(&old, &metadata);
    }

    fn set_administrator(&self, _authority: &Capability, administrator: &ManagedAddress) {
        require!(!administrator.is_zero(), ERR_ZERO_ADDRESS);
        let old = self.administrator().replace(administrator.clone());
        self.administrator_updated_event(&old, administrator);
    }

    fn set_delegated_mode(&self, _authority: &Capability, enabled: bool) {
        let old = self.delegated_mode().replace(enabled);
        self.delegated_mode_updated_event(old, enabled);
    }
}
