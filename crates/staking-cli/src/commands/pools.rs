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

use anyhow::Context;
use clap::Args;
use delegated_staking::AccountAddress;

use crate::{config::GlobalConfig, format::format_apt};

/// Command to show a delegator's stake in each pool.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Pools {
    /// Delegator address.
    pub delegator: AccountAddress,
    /// Report principal only, without reading live balances.
    #[clap(long)]
    pub principal_only: bool,
}

impl Pools {
    /// Run the [Pools] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let calculator = global_config.stake_calculator(self.principal_only)?;
        let summary = calculator
            .staking_summary(&self.delegator)
            .await
            .with_context(|| format!("failed to compute stake of {}", self.delegator))?;

        if summary.pools.is_empty() {
            tracing::info!("No staking activity found for {}", self.delegator);
        }

        for pool in &summary.pools {
            tracing::info!(
                "Pool {}: active principal {} APT, pending inactive principal {} APT",
                pool.pool_address,
                format_apt(pool.principal.active.into()),
                format_apt(pool.principal.pending_inactive.into())
            );
            if let Some(live) = &pool.live {
                tracing::info!(
                    "  live active {} APT, inactive {} APT, pending inactive {} APT{}",
                    format_apt(live.active.into()),
                    format_apt(live.inactive.into()),
                    format_apt(live.pending_inactive.into()),
                    if live.can_withdraw_pending_inactive { " (withdrawable)" } else { "" }
                );
                tracing::info!(
                    "  rewards {} APT (active {} APT, pending inactive {} APT)",
                    format_apt(pool.rewards()),
                    format_apt(pool.active_rewards.into()),
                    format_apt(pool.pending_inactive_rewards.into())
                );
            }
            tracing::info!("  total {} APT", format_apt(pool.total()));
        }

        tracing::info!("Total principal: {} APT", format_apt(summary.total_principal()));
        if summary.includes_rewards {
            tracing::info!("Total rewards: {} APT", format_apt(summary.total_rewards()));
        }
        tracing::info!("Total staked: {} APT", format_apt(summary.total));
        Ok(())
    }
}
