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

//! Commands of the CLI.

mod activities;
mod pools;
mod total_staked;

pub use activities::Activities;
pub use pools::Pools;
pub use total_staked::TotalStaked;

use clap::Subcommand;

use crate::config::GlobalConfig;

/// Stake queries for a delegator.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Total stake (principal plus rewards) across all pools.
    TotalStaked(TotalStaked),
    /// Per-pool breakdown of principal and rewards.
    Pools(Pools),
    /// Staking event history per pool and the principal it reconstructs to.
    Activities(Activities),
}

impl Command {
    /// Run the command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        match self {
            Self::TotalStaked(cmd) => cmd.run(global_config).await,
            Self::Pools(cmd) => cmd.run(global_config).await,
            Self::Activities(cmd) => cmd.run(global_config).await,
        }
    }
}
