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

//! Stake accounting for delegation pool stakers.
//!
//! A delegator's stake in a pool is reconstructed by replaying its staking events in transaction
//! order, then reconciled against the live balance reported by the chain to attribute rewards.

// Declare modules
pub mod address;
pub mod events;
pub mod fullnode;
pub mod indexer;
pub mod network;
pub mod partition;
pub mod principal;
pub mod rewards;
pub mod sources;

// Re-export commonly used types
pub use address::{AccountAddress, AddressParseError};

pub use events::{StakeEvent, StakeEventKind};

pub use fullnode::FullnodeClient;

pub use indexer::{DelegatedStakingActivity, IndexerClient};

pub use network::{ClientOptions, ConfigError, Endpoints, Network};

pub use partition::{partition_by_pool, PartitionedActivities};

pub use principal::{reconstruct_principal, PrincipalState};

pub use rewards::{LiveStakeSnapshot, PoolStake, StakeCalculator, StakingSummary};

pub use sources::{
    ActivitySource, ActivitySourceObj, BalanceSource, BalanceSourceObj, QueryError, StakingError,
    ViewError,
};

/// Number of octas in one APT.
pub const OCTAS_PER_APT: u64 = 100_000_000;
