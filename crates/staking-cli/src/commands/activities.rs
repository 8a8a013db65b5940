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
use delegated_staking::{reconstruct_principal, AccountAddress};

use crate::{config::GlobalConfig, format::format_apt};

/// Command to list a delegator's staking activity per pool.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct Activities {
    /// Delegator address.
    pub delegator: AccountAddress,
    /// Also print every event.
    #[clap(long)]
    pub verbose: bool,
}

impl Activities {
    /// Run the [Activities] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        // Activity listing never needs live balances.
        let calculator = global_config.stake_calculator(true)?;
        let partitioned = calculator
            .partitioned_activities(&self.delegator)
            .await
            .with_context(|| format!("failed to fetch staking activity of {}", self.delegator))?;

        if partitioned.is_empty() {
            tracing::info!("No staking activity found for {}", self.delegator);
        }

        for (pool, events) in &partitioned {
            let unrecognized = events.iter().filter(|e| !e.kind.is_known()).count();
            let principal = reconstruct_principal(events);
            tracing::info!(
                "Pool {}: {} events ({} unrecognized), active principal {} APT, pending inactive principal {} APT",
                pool,
                events.len(),
                unrecognized,
                format_apt(principal.active.into()),
                format_apt(principal.pending_inactive.into())
            );

            if self.verbose {
                let mut ordered: Vec<_> = events.iter().collect();
                ordered.sort_by_key(|e| e.ordering_key());
                for event in ordered {
                    tracing::info!(
                        "  version {} #{}: {:?} {} APT",
                        event.transaction_version,
                        event.event_index,
                        event.kind,
                        format_apt(event.amount.into())
                    );
                }
            }
        }
        Ok(())
    }
}
