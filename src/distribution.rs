multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::errors::*;

/// Basis points denominator
pub const BPS: u64 = 10_000;

// ============================================================
// Fee split
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub struct FeeSplit {
    pub burn_bps: u64,
    pub treasury_bps: u64,
    pub member_pool_bps: u64,
    /// Fixed at creation; governance can move the other three only.
    pub protocol_bps: u64,
}

impl FeeSplit {
    pub fn validate(&self) -> Result<(), &'static str> {
        let total = [self.burn_bps, self.treasury_bps, self.member_pool_bps, self.protocol_bps]
            .iter()
            .try_fold(0u64, |acc, part| acc.checked_add(*part));
        match total {
            Some(BPS) => Ok(()),
            _ => Err(ERR_SPLIT_NOT_FULL),
        }
    }

    /// The member-governable change: protocol share carried over unchanged.
    pub fn with_governable_parts(
        &self,
        burn_bps: u64,
        treasury_bps: u64,
        member_pool_bps: u64,
    ) -> Result<FeeSplit, &'static str> {
        let next = FeeSplit {
            burn_bps,
            treasury_bps,
            member_pool_bps,
            protocol_bps: self.protocol_bps,
        };
        next.validate()?;
        Ok(next)
    }

    /// Splits `amount` by basis points. The treasury takes whatever the
    /// other three shares leave, so rounding dust never disappears.
    pub fn apply<M: ManagedTypeApi>(&self, amount: &BigUint<M>) -> SplitOutcome<M> {
        let burn = bps_of(amount, self.burn_bps);
        let member_pool = bps_of(amount, self.member_pool_bps);
        let protocol = bps_of(amount, self.protocol_bps);
        let allocated = &(&burn + &member_pool) + &protocol;
        let treasury = if amount > &allocated {
            amount - &allocated
        } else {
            BigUint::zero()
        };
        SplitOutcome {
            burn,
            treasury,
            member_pool,
            protocol,
        }
    }
}

pub fn bps_of<M: ManagedTypeApi>(amount: &BigUint<M>, bps: u64) -> BigUint<M> {
    amount * &BigUint::from(bps) / &BigUint::from(BPS)
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct SplitOutcome<M: ManagedTypeApi> {
    pub burn: BigUint<M>,
    pub treasury: BigUint<M>,
    pub member_pool: BigUint<M>,
    pub protocol: BigUint<M>,
}

impl<M: ManagedTypeApi> SplitOutcome<M> {
    /// Moves `amount` out of the member-pool share, capped at what is there.
    pub fn carve_from_pool(&mut self, amount: &BigUint<M>) -> BigUint<M> {
        let carved = if amount > &self.member_pool {
            self.member_pool.clone()
        } else {
            amount.clone()
        };
        self.member_pool -= &carved;
        carved
    }

    /// With nobody to reward, the member-pool share stays in the treasury.
    pub fn fold_pool_into_treasury(&mut self) {
        let pool = core::mem::replace(&mut self.member_pool, BigUint::zero());
        self.treasury += &pool;
    }
}

// ============================================================
// Cumulative reward-per-share pool
// ============================================================

/// One pool per tracked asset. Every member holds exactly one share.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct RewardPool<M: ManagedTypeApi> {
    /// Credited to the pool and not yet claimed. Includes `remainder`.
    pub balance: BigUint<M>,
    /// Monotonic within a generation.
    pub reward_per_share: BigUint<M>,
    /// Undistributed fraction carried into the next credit.
    pub remainder: BigUint<M>,
    /// Bumped every time a drained secondary pool is retired, so snapshots
    /// taken against an older counter read as zero.
    pub generation: u64,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct RewardSnapshot<M: ManagedTypeApi> {
    pub generation: u64,
    pub value: BigUint<M>,
}

impl<M: ManagedTypeApi> Default for RewardPool<M> {
    fn default() -> Self {
        RewardPool {
            balance: BigUint::zero(),
            reward_per_share: BigUint::zero(),
            remainder: BigUint::zero(),
            generation: 0,
        }
    }
}

impl<M: ManagedTypeApi> RewardPool<M> {
    /// Adds `amount` to the pool and spreads it, together with the carried
    /// remainder, over `members` shares. Returns the per-share increase.
    pub fn credit(&mut self, amount: &BigUint<M>, members: u64) -> BigUint<M> {
        self.balance += amount;
        if members == 0 {
            self.remainder += amount;
            return BigUint::zero();
        }

        let distributable = amount + &self.remainder;
        let shares = BigUint::from(members);
        let per_share = &distributable / &shares;
        self.remainder = &distributable % &shares;
        self.reward_per_share += &per_share;
        per_share
    }

    pub fn snapshot(&self) -> RewardSnapshot<M> {
        RewardSnapshot {
            generation: self.generation,
            value: self.reward_per_share.clone(),
        }
    }

    pub fn claimable(&self, snapshot: &RewardSnapshot<M>) -> BigUint<M> {
        if snapshot.generation != self.generation {
            return self.reward_per_share.clone();
        }
        if snapshot.value >= self.reward_per_share {
            return BigUint::zero();
        }
        &self.reward_per_share - &snapshot.value
    }

    pub fn debit(&mut self, amount: &BigUint<M>) -> Result<(), &'static str> {
        if amount > &self.balance {
            return Err(ERR_CLAIM_EXCEEDS_POOL);
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn is_drained(&self) -> bool {
        self.balance == 0u64 && self.remainder == 0u64
    }

    /// Resets the counter of a drained pool for a later re-registration.
    pub fn retire(&mut self) {
        self.reward_per_share = BigUint::zero();
        self.generation += 1;
    }
}

/// Balance conservation check: the contract must hold at least everything
/// it already accounts for plus the payment it was just credited.
///
/// The VM credits exactly the transferred amount, so on this chain the
/// check guards the consistency of the contract's own books. It does not
/// detect a fee-on-transfer asset.
pub fn holdings_conserved<M: ManagedTypeApi>(
    observed: &BigUint<M>,
    committed: &BigUint<M>,
    declared: &BigUint<M>,
) -> bool {
    observed >= &(committed + declared)
}
