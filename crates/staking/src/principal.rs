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

//! Principal reconstruction from a pool's stake event history.

use serde::{Deserialize, Serialize};

use crate::{StakeEvent, StakeEventKind};

/// Principal held in a single pool, excluding rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalState {
    /// Principal that is actively staked, in octas.
    pub active: u64,
    /// Principal that has been unlocked but not yet withdrawn, in octas.
    pub pending_inactive: u64,
}

impl PrincipalState {
    /// Apply a single stake movement.
    ///
    /// Both buckets saturate at zero, so a movement that would drive a bucket negative leaves it
    /// at zero. Each bucket is touched at most once per movement, which makes this identical to
    /// clamping after the full movement.
    pub fn apply(self, kind: StakeEventKind, amount: u64) -> Self {
        let Self { active, pending_inactive } = self;
        match kind {
            StakeEventKind::AddStake => {
                Self { active: active.saturating_add(amount), pending_inactive }
            }
            StakeEventKind::UnlockStake => Self {
                active: active.saturating_sub(amount),
                pending_inactive: pending_inactive.saturating_add(amount),
            },
            StakeEventKind::ReactivateStake => Self {
                active: active.saturating_add(amount),
                pending_inactive: pending_inactive.saturating_sub(amount),
            },
            StakeEventKind::WithdrawStake => {
                Self { active, pending_inactive: pending_inactive.saturating_sub(amount) }
            }
            StakeEventKind::Unknown => self,
        }
    }

    /// Sum of both buckets.
    pub fn total(&self) -> u128 {
        u128::from(self.active) + u128::from(self.pending_inactive)
    }
}

/// Replay a pool's events in transaction order and return the resulting principal.
///
/// The events may be given in any order; they are replayed by `(transaction_version,
/// event_index)`. The caller's slice is left untouched.
pub fn reconstruct_principal(events: &[StakeEvent]) -> PrincipalState {
    let mut ordered: Vec<&StakeEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.ordering_key());

    ordered.into_iter().fold(PrincipalState::default(), |state, event| {
        if !event.kind.is_known() {
            tracing::warn!(
                "Skipping unrecognized event in pool {} at version {}",
                event.pool_address,
                event.transaction_version
            );
        }
        state.apply(event.kind, event.amount)
    })
}
