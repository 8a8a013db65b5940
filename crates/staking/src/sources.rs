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

//! Sources of stake events and live balances.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{AccountAddress, LiveStakeSnapshot, StakeEvent};

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("indexer request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("indexer returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("indexer returned errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("indexer response did not contain any data")]
    MissingData,

    #[error("malformed staking activity: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("view function {function} rejected with HTTP {status}: {message}")]
    Rejected { function: String, status: u16, message: String },

    #[error("unexpected output from view function {function}: {detail}")]
    Decode { function: String, detail: String },
}

/// Failure while computing a delegator's stake. Upstream errors are passed through untouched.
#[derive(Error, Debug)]
pub enum StakingError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Provides the staking event history of a delegator.
#[async_trait]
pub trait ActivitySource {
    /// Fetch every stake event the delegator emitted, across all pools.
    ///
    /// Returns an empty list for an address that never staked.
    async fn fetch_delegated_staking_activities(
        &self,
        delegator: &AccountAddress,
    ) -> Result<Vec<StakeEvent>, QueryError>;
}

/// Provides the current on-chain stake of a delegator in a pool.
#[async_trait]
pub trait BalanceSource {
    async fn fetch_stake(
        &self,
        delegator: &AccountAddress,
        pool: &AccountAddress,
    ) -> Result<LiveStakeSnapshot, ViewError>;
}

pub type ActivitySourceObj = Arc<dyn ActivitySource + Send + Sync>;
pub type BalanceSourceObj = Arc<dyn BalanceSource + Send + Sync>;
