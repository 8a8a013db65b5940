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

/// Command to get the total stake of a delegator.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct TotalStaked {
    /// Delegator address.
    pub delegator: AccountAddress,
    /// Report principal only, without reading live balances.
    #[clap(long)]
    pub principal_only: bool,
}

impl TotalStaked {
    /// Run the [TotalStaked] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let calculator = global_config.stake_calculator(self.principal_only)?;
        let total = calculator
            .total_staked(&self.delegator)
            .await
            .with_context(|| format!("failed to compute total stake of {}", self.delegator))?;

        let note = if self.principal_only { " (principal only)" } else { "" };
        tracing::info!("Total staked: {} APT{}", format_apt(total), note);
        Ok(())
    }
}
