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

//! Grouping of stake events by pool.

use std::collections::BTreeMap;

use crate::{AccountAddress, StakeEvent};

/// Stake events grouped by pool address.
pub type PartitionedActivities = BTreeMap<AccountAddress, Vec<StakeEvent>>;

/// Group events by the pool they target.
///
/// Every event lands in exactly one group and groups keep the input order. Pools without events
/// never appear in the result.
pub fn partition_by_pool(events: impl IntoIterator<Item = StakeEvent>) -> PartitionedActivities {
    let mut partitioned = PartitionedActivities::new();
    for event in events {
        partitioned.entry(event.pool_address).or_default().push(event);
    }
    partitioned
}
