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

//! Common configuration options for commands in the CLI.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use delegated_staking::{Endpoints, FullnodeClient, IndexerClient, StakeCalculator};
use tracing::level_filters::LevelFilter;

/// Common configuration options for all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalConfig {
    #[clap(flatten, next_help_heading = "Network")]
    pub endpoints: Endpoints,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, env = "LOG_LEVEL", global = true, default_value = "info")]
    pub log_level: LevelFilter,

    /// Whether to log in JSON format.
    #[clap(long, env = "LOG_JSON", global = true, default_value_t = false)]
    pub log_json: bool,
}

impl GlobalConfig {
    /// Build a client for the configured indexer.
    pub fn indexer_client(&self) -> Result<IndexerClient> {
        let url = self.endpoints.indexer_url().context("Invalid indexer URL")?;
        tracing::debug!("Using indexer at {}", url);
        let http = self.endpoints.client.http_client().context("Failed to build HTTP client")?;
        Ok(IndexerClient::new(http, url))
    }

    /// Build a client for the configured full node.
    pub fn fullnode_client(&self) -> Result<FullnodeClient> {
        let url = self.endpoints.fullnode_url().context("Invalid full node URL")?;
        tracing::debug!("Using full node at {}", url);
        let http = self.endpoints.client.http_client().context("Failed to build HTTP client")?;
        Ok(FullnodeClient::new(http, url))
    }

    /// Build a [StakeCalculator]. Live balances are consulted unless `principal_only` is set.
    pub fn stake_calculator(&self, principal_only: bool) -> Result<StakeCalculator> {
        let calculator = StakeCalculator::new(Arc::new(self.indexer_client()?));
        if principal_only {
            return Ok(calculator);
        }
        Ok(calculator.with_balance_source(Arc::new(self.fullnode_client()?)))
    }
}
