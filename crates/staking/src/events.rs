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

//! Delegation pool stake events.

use serde::{Deserialize, Serialize};

use crate::AccountAddress;

/// The stake movements a delegator can make on a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeEventKind {
    AddStake,
    UnlockStake,
    ReactivateStake,
    WithdrawStake,
    /// Any event type not listed above. Carries no stake movement.
    Unknown,
}

impl StakeEventKind {
    /// Parse the kind from a fully-qualified event type such as
    /// `0x1::delegation_pool::AddStakeEvent`.
    ///
    /// The third `::` component names the event. Both the handle-event names (`AddStakeEvent`)
    /// and the module-event names (`AddStake`) are recognised.
    pub fn from_event_type(event_type: &str) -> Self {
        let Some(name) = event_type.split("::").nth(2) else {
            return Self::Unknown;
        };
        // Strip generic arguments, if any.
        let name = name.split('<').next().unwrap_or(name).trim();
        match name.strip_suffix("Event").unwrap_or(name) {
            "AddStake" => Self::AddStake,
            "UnlockStake" => Self::UnlockStake,
            "ReactivateStake" => Self::ReactivateStake,
            "WithdrawStake" => Self::WithdrawStake,
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One delegator action on a pool, as recorded on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEvent {
    /// The account that staked.
    pub delegator_address: AccountAddress,
    /// The pool the stake moved in.
    pub pool_address: AccountAddress,
    pub kind: StakeEventKind,
    /// Amount in octas.
    pub amount: u64,
    /// Version of the transaction that emitted the event. Orders events across transactions.
    pub transaction_version: u64,
    /// Position of the event within its transaction.
    pub event_index: u64,
}

impl StakeEvent {
    /// Key that orders events chronologically.
    pub fn ordering_key(&self) -> (u64, u64) {
        (self.transaction_version, self.event_index)
    }
}
