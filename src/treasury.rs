multiversx_sc::imports!();

use crate::dispatch::Capability;
use crate::distribution::{RewardPool, RewardSnapshot};
use crate::errors::*;
use crate::types::{ExternalCallPayload, TreasuryActionKind, TreasuryTotals};

/// Most secondary (donated) assets tracked at once.
pub const MAX_SECONDARY_ASSETS: usize = 256;

/// Structural checks on a batch of external calls. Runs at proposal time
/// and again right before dispatch.
pub fn validate_batch<M: ManagedTypeApi>(
    total_value: &BigUint<M>,
    targets: &ManagedVec<M, ManagedAddress<M>>,
    values: &ManagedVec<M, BigUint<M>>,
    payloads: &ManagedVec<M, ManagedBuffer<M>>,
) -> Result<(), &'static str> {
    if targets.is_empty() {
        return Err(ERR_BATCH_EMPTY);
    }
    if targets.len() != values.len() || targets.len() != payloads.len() {
        return Err(ERR_BATCH_LENGTH_MISMATCH);
    }
    if targets.iter().any(|target| target.is_zero()) {
        return Err(ERR_BATCH_ZERO_TARGET);
    }
    let mut sum = BigUint::zero();
    for value in values.iter() {
        sum += &*value;
    }
    if &sum != total_value {
        return Err(ERR_BATCH_VALUE_MISMATCH);
    }
    Ok(())
}

// ============================================================
// Treasury & distribution
// ============================================================

#[multiversx_sc::module]
pub trait TreasuryModule:
    crate::membership::ledger::MemberLedgerModule
    + crate::config::ConfigModule
    + crate::events::EventsModule
{
    // ========================================================
    // ENDPOINT: claim
    // Pays the caller everything accrued since their last snapshot.
    // ========================================================

    #[endpoint(claim)]
    fn claim(&self, asset: EgldOrEsdtTokenIdentifier) -> BigUint {
        require!(!self.dispatch_lock().get(), ERR_REENTRANT_CALL);
        let caller = self.blockchain().get_caller();
        self.require_member(&caller);

        let mut pool = self.load_pool(&asset);
        let snapshot = self.load_snapshot(&caller, &asset);
        let amount = pool.claimable(&snapshot);
        require!(amount > 0u64, ERR_NOTHING_TO_CLAIM);
        self.require_valid(pool.debit(&amount));

        self.reward_snapshot(&caller, &asset).set(pool.snapshot());
        self.reward_pool(&asset).set(&pool);

        self.send_asset(&caller, &asset, &amount);
        self.reward_claimed_event(&caller, &asset, &amount);
        amount
    }

    // ========================================================
    // ENDPOINT: cleanupAsset
    // Frees the registry slot of a fully drained secondary asset.
    // ========================================================

    #[endpoint(cleanupAsset)]
    fn cleanup_asset(&self, asset: EgldOrEsdtTokenIdentifier) {
        require!(asset != self.payment_asset().get(), ERR_PRIMARY_ASSET);
        require!(
            self.secondary_assets().contains(&asset),
            ERR_ASSET_NOT_REGISTERED
        );
        let mut pool = self.load_pool(&asset);
        require!(pool.is_drained(), ERR_POOL_NOT_DRAINED);

        pool.retire();
        self.reward_pool(&asset).set(&pool);
        self.secondary_assets().swap_remove(&asset);
        self.asset_cleaned_up_event(&asset, pool.generation);
    }

    // ========================================================
    // Distribution
    // ========================================================

    /// Credits `amount` to the asset's pool over `members` shares.
    fn credit_pool(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
        amount: &BigUint,
        members: u64,
    ) -> RewardPool<Self::Api> {
        let mut pool = self.load_pool(asset);
        if *amount == 0u64 {
            return pool;
        }
        pool.credit(amount, members);
        self.reward_pool(asset).set(&pool);
        self.pool_credited_event(asset, amount, members, &pool.reward_per_share);
        pool
    }

    fn add_to_treasury(&self, asset: &EgldOrEsdtTokenIdentifier, amount: &BigUint) -> BigUint {
        self.treasury_balance(asset).update(|balance| {
            *balance += amount;
            balance.clone()
        })
    }

    /// A new member starts level with every tracked counter.
    fn seed_snapshots(&self, member: &ManagedAddress) {
        let primary = self.payment_asset().get();
        let pool = self.load_pool(&primary);
        self.reward_snapshot(member, &primary).set(pool.snapshot());
        for asset in self.secondary_assets().iter() {
            let pool = self.load_pool(&asset);
            self.reward_snapshot(member, &asset).set(pool.snapshot());
        }
    }

    /// What this contract already owes, per its own books.
    fn committed_holdings(&self, asset: &EgldOrEsdtTokenIdentifier) -> BigUint {
        let pool = self.load_pool(asset);
        self.treasury_balance(asset).get() + pool.balance
    }

    /// Held minus what is committed to members: the spendable part,
    /// donations included.
    fn available_treasury(&self, asset: &EgldOrEsdtTokenIdentifier) -> BigUint {
        let held = self.blockchain().get_sc_balance(asset, 0);
        let pool = self.load_pool(asset);
        if held > pool.balance {
            held - pool.balance
        } else {
            BigUint::zero()
        }
    }

    fn debit_treasury(&self, asset: &EgldOrEsdtTokenIdentifier, amount: &BigUint) {
        require!(
            *amount <= self.available_treasury(asset),
            ERR_INSUFFICIENT_TREASURY
        );
        // Spending beyond the tracked balance draws on donations.
        self.treasury_balance(asset).update(|balance| {
            if *balance > *amount {
                *balance -= amount;
            } else {
                *balance = BigUint::zero();
            }
        });
    }

    fn register_secondary_asset(&self, asset: &EgldOrEsdtTokenIdentifier) {
        if *asset == self.payment_asset().get() || self.secondary_assets().contains(asset) {
            return;
        }
        require!(
            self.secondary_assets().len() < MAX_SECONDARY_ASSETS,
            ERR_REGISTRY_FULL
        );
        self.secondary_assets().insert(asset.clone());
    }

    // ========================================================
    // Governance mutators
    // ========================================================

    /// Moves every unclaimed unit of `asset` the treasury holds, donations
    /// included, into the member pool.
    fn disband(&self, _authority: &Capability, asset: &EgldOrEsdtTokenIdentifier) -> BigUint {
        let amount = self.available_treasury(asset);
        require!(amount > 0u64, ERR_NOTHING_TO_DISBAND);

        self.register_secondary_asset(asset);
        self.treasury_balance(asset).clear();
        let pool = self.credit_pool(asset, &amount, self.member_count());

        self.treasury_action_event(
            TreasuryActionKind::Disband,
            asset,
            &self.blockchain().get_sc_address(),
            &amount,
        );
        pool.reward_per_share
    }

    fn withdraw(
        &self,
        _authority: &Capability,
        asset: &EgldOrEsdtTokenIdentifier,
        recipient: &ManagedAddress,
        amount: &BigUint,
    ) {
        require!(*amount > 0u64, ERR_ZERO_AMOUNT);
        require!(!recipient.is_zero(), ERR_ZERO_ADDRESS);
        self.debit_treasury(asset, amount);

        self.send_asset(recipient, asset, amount);
        self.treasury_action_event(TreasuryActionKind::Withdraw, asset, recipient, amount);
    }

    /// Runs every call in order with treasury EGLD attached. Any failing
    /// call aborts the whole transaction with that call's error.
    fn batch_external_call(
        &self,
        _authority: &Capability,
        total_value: &BigUint,
        targets: &ManagedVec<ManagedAddress>,
        values: &ManagedVec<BigUint>,
        payloads: &ManagedVec<ManagedBuffer>,
    ) -> ManagedBuffer {
        self.require_valid(validate_batch(total_value, targets, values, payloads));
        let egld = EgldOrEsdtTokenIdentifier::egld();
        if *total_value > 0u64 {
            self.debit_treasury(&egld, total_value);
        }

        let mut output = ManagedBuffer::new();
        for index in 0..targets.len() {
            let target = targets.get(index);
            let value = values.get(index);
            let payload = payloads.get(index);
            let call = match ExternalCallPayload::<Self::Api>::top_decode(payload.clone_value()) {
                Ok(call) => call,
                Err(_) => sc_panic!(ERR_MALFORMED_PAYLOAD),
            };

            let mut tx = self
                .tx()
                .to(&*target)
                .egld(&*value)
                .raw_call(call.endpoint);
            for argument in call.arguments.iter() {
                tx = tx.argument(&*argument);
            }
            let returned = tx.returns(ReturnsRawResult).sync_call();
            for data in returned.iter() {
                output.append(&data);
            }

            self.treasury_action_event(TreasuryActionKind::BatchCall, &egld, &target, &value);
        }
        output
    }

    fn set_fee_split(
        &self,
        _authority: &Capability,
        burn_bps: u64,
        treasury_bps: u64,
        member_pool_bps: u64,
    ) {
        let old = self.fee_split().get();
        let new = match old.with_governable_parts(burn_bps, treasury_bps, member_pool_bps) {
            Ok(split) => split,
            Err(err) => sc_panic!(err),
        };
        self.fee_split().set(new);
        self.fee_split_updated_event(&old, &new);
    }

    fn set_burn_sink(&self, _authority: &Capability, sink: &ManagedAddress) {
        require!(!sink.is_zero(), ERR_ZERO_ADDRESS);
        let old = self.burn_sink().replace(sink.clone());
        self.burn_sink_updated_event(&old, sink);
    }

    // ========================================================
    // Transfers
    // ========================================================

    fn send_asset(&self, to: &ManagedAddress, asset: &EgldOrEsdtTokenIdentifier, amount: &BigUint) {
        if *amount > 0u64 {
            self.send().direct(to, asset, 0, amount);
        }
    }

    // ========================================================
    // Storage access
    // ========================================================

    fn load_pool(&self, asset: &EgldOrEsdtTokenIdentifier) -> RewardPool<Self::Api> {
        let mapper = self.reward_pool(asset);
        if mapper.is_empty() {
            RewardPool::default()
        } else {
            mapper.get()
        }
    }

    fn load_snapshot(
        &self,
        member: &ManagedAddress,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> RewardSnapshot<Self::Api> {
        let mapper = self.reward_snapshot(member, asset);
        if mapper.is_empty() {
            RewardSnapshot {
                generation: 0,
                value: BigUint::zero(),
            }
        } else {
            mapper.get()
        }
    }

    fn treasury_totals(&self, asset: &EgldOrEsdtTokenIdentifier) -> TreasuryTotals<Self::Api> {
        let pool = self.load_pool(asset);
        let treasury_balance = self.treasury_balance(asset).get();
        let held = self.blockchain().get_sc_balance(asset, 0);
        let committed = &treasury_balance + &pool.balance;
        let unaccounted = if held > committed {
            held - committed
        } else {
            BigUint::zero()
        };
        TreasuryTotals {
            asset: asset.clone(),
            treasury_balance,
            unaccounted,
            pool_balance: pool.balance,
            pool_remainder: pool.remainder,
            reward_per_share: pool.reward_per_share,
        }
    }

    #[storage_mapper("treasuryBalance")]
    fn treasury_balance(&self, asset: &EgldOrEsdtTokenIdentifier) -> SingleValueMapper<BigUint>;

    #[storage_mapper("rewardPool")]
    fn reward_pool(
        &self,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<RewardPool<Self::Api>>;

    #[storage_mapper("rewardSnapshot")]
    fn reward_snapshot(
        &self,
        member: &ManagedAddress,
        asset: &EgldOrEsdtTokenIdentifier,
    ) -> SingleValueMapper<RewardSnapshot<Self::Api>>;

    /// Dense registry of donated assets; removal swaps the last entry into
    /// the freed slot.
    #[storage_mapper("secondaryAssets")]
    fn secondary_assets(&self) -> UnorderedSetMapper<EgldOrEsdtTokenIdentifier>;
}
