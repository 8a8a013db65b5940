// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reward attribution and stake totals across pools.

use std::collections::BTreeMap;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::{
    partition_by_pool, reconstruct_principal, AccountAddress, ActivitySourceObj,
    BalanceSourceObj, PartitionedActivities, PrincipalState, QueryError, StakingError,
};

/// Stake of a delegator in a pool as currently reported by the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStakeSnapshot {
    /// Actively staked balance, including compounded rewards.
    pub active: u64,
    /// Balance that can be withdrawn.
    pub inactive: u64,
    /// Balance unlocked in the current lockup cycle.
    pub pending_inactive: u64,
    /// Whether the pending inactive balance can already be withdrawn.
    pub can_withdraw_pending_inactive: bool,
}

/// Stake of a delegator in a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStake {
    /// The pool address
    pub pool_address: AccountAddress,
    /// Number of events replayed for this pool
    pub event_count: usize,
    /// Principal reconstructed from the event history
    pub principal: PrincipalState,
    /// Live balance, if one was fetched
    pub live: Option<LiveStakeSnapshot>,
    /// Rewards accrued on the active principal
    pub active_rewards: u64,
    /// Rewards attributed to the pending inactive principal
    pub pending_inactive_rewards: u64,
}

impl PoolStake {
    /// Attribute rewards for a pool.
    ///
    /// Active rewards are the live active balance above principal, floored at zero. Pending
    /// inactive rewards are the absolute difference between the live and reconstructed pending
    /// inactive amounts. Without a live snapshot no rewards are attributed.
    pub fn new(
        pool_address: AccountAddress,
        event_count: usize,
        principal: PrincipalState,
        live: Option<LiveStakeSnapshot>,
    ) -> Self {
        let (active_rewards, pending_inactive_rewards) = match &live {
            Some(live) => (
                live.active.saturating_sub(principal.active),
                live.pending_inactive.abs_diff(principal.pending_inactive),
            ),
            None => (0, 0),
        };
        Self { pool_address, event_count, principal, live, active_rewards, pending_inactive_rewards }
    }

    pub fn rewards(&self) -> u128 {
        u128::from(self.active_rewards) + u128::from(self.pending_inactive_rewards)
    }

    /// Principal plus rewards, in octas.
    pub fn total(&self) -> u128 {
        self.principal.total() + self.rewards()
    }
}

/// Stake of a delegator across every pool it has interacted with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingSummary {
    pub delegator_address: AccountAddress,
    /// Per-pool stakes, ordered by pool address
    pub pools: Vec<PoolStake>,
    /// Sum of all pool totals, in octas
    pub total: u128,
    /// Whether live balances were consulted
    pub includes_rewards: bool,
}

impl StakingSummary {
    pub fn total_principal(&self) -> u128 {
        self.pools.iter().map(|pool| pool.principal.total()).sum()
    }

    pub fn total_rewards(&self) -> u128 {
        self.pools.iter().map(PoolStake::rewards).sum()
    }
}

/// Computes delegator stake from an event source and, optionally, a live balance source.
///
/// Without a balance source only principal is reported.
#[derive(Clone)]
pub struct StakeCalculator {
    activities: ActivitySourceObj,
    balances: Option<BalanceSourceObj>,
}

impl StakeCalculator {
    /// Create a calculator that reports principal only.
    pub fn new(activities: ActivitySourceObj) -> Self {
        Self { activities, balances: None }
    }

    /// Consult `balances` for live stake so that rewards are included.
    pub fn with_balance_source(self, balances: BalanceSourceObj) -> Self {
        Self { balances: Some(balances), ..self }
    }

    pub fn includes_rewards(&self) -> bool {
        self.balances.is_some()
    }

    /// Fetch the delegator's stake events grouped by pool.
    pub async fn partitioned_activities(
        &self,
        delegator: &AccountAddress,
    ) -> Result<PartitionedActivities, QueryError> {
        let events = self.activities.fetch_delegated_staking_activities(delegator).await?;
        tracing::info!("Fetched {} staking events for {}", events.len(), delegator);
        Ok(partition_by_pool(events))
    }

    /// Reconstruct the delegator's principal in every pool it has events for.
    pub async fn principals(
        &self,
        delegator: &AccountAddress,
    ) -> Result<BTreeMap<AccountAddress, PrincipalState>, QueryError> {
        let partitioned = self.partitioned_activities(delegator).await?;
        Ok(partitioned
            .iter()
            .map(|(pool, events)| (*pool, reconstruct_principal(events)))
            .collect())
    }

    /// Compute the per-pool breakdown of the delegator's stake.
    ///
    /// Live balances for all pools are fetched concurrently; the first failure aborts the whole
    /// computation.
    pub async fn staking_summary(
        &self,
        delegator: &AccountAddress,
    ) -> Result<StakingSummary, StakingError> {
        let partitioned = self.partitioned_activities(delegator).await?;

        let principals: Vec<(AccountAddress, usize, PrincipalState)> = partitioned
            .iter()
            .map(|(pool, events)| {
                let principal = reconstruct_principal(events);
                tracing::debug!(
                    "Pool {}: {} events, active principal {}, pending inactive principal {}",
                    pool,
                    events.len(),
                    principal.active,
                    principal.pending_inactive
                );
                (*pool, events.len(), principal)
            })
            .collect();

        let live: Vec<Option<LiveStakeSnapshot>> = match &self.balances {
            Some(balances) => {
                tracing::debug!("Fetching live stake for {} pools", principals.len());
                let futures = principals.iter().map(|(pool, _, _)| async move {
                    balances.fetch_stake(delegator, pool).await.map(Some)
                });
                try_join_all(futures).await?
            }
            None => vec![None; principals.len()],
        };

        let pools: Vec<PoolStake> = principals
            .into_iter()
            .zip(live)
            .map(|((pool, event_count, principal), live)| {
                PoolStake::new(pool, event_count, principal, live)
            })
            .collect();
        let total: u128 = pools.iter().map(PoolStake::total).sum();

        tracing::info!(
            "Total staked for {} across {} pools: {} octas",
            delegator,
            pools.len(),
            total
        );

        Ok(StakingSummary {
            delegator_address: *delegator,
            pools,
            total,
            includes_rewards: self.includes_rewards(),
        })
    }

    /// Total stake of the delegator across all pools, in octas.
    pub async fn total_staked(&self, delegator: &AccountAddress) -> Result<u128, StakingError> {
        Ok(self.staking_summary(delegator).await?.total)
    }
}
