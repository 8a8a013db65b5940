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

//! Integration tests for the staking CLI commands.

use assert_cmd::Command;
use delegated_staking_test_utils::{MockActivity, MockStake, StakingMockServer};
use predicates::str::contains;

const DELEGATOR: &str = "0xd1";
const POOL_A: &str = "0xa1";
const POOL_B: &str = "0xb2";
const APT: u64 = 100_000_000;

fn cli(server: &StakingMockServer) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("delegated-staking")?;
    cmd.env("INDEXER_URL", server.indexer_url())
        .env("FULLNODE_URL", server.fullnode_url())
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "delegated_staking=debug,info");
    Ok(cmd)
}

/// 100 APT added, 30 unlocked, 10 reactivated in pool A; 50 APT added in pool B.
async fn seeded_server() -> StakingMockServer {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "AddStakeEvent", 100 * APT, 1));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "UnlockStakeEvent", 30 * APT, 2));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "ReactivateStakeEvent", 10 * APT, 3));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "AddStakeEvent", 50 * APT, 4));
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_total_staked_with_rewards() -> anyhow::Result<()> {
    let server = seeded_server().await;
    // Principal A: active 80, pending inactive 20. Principal B: active 50.
    server.set_stake(
        POOL_A,
        DELEGATOR,
        MockStake { active: 85 * APT, inactive: 0, pending_inactive: 21 * APT, ..Default::default() },
    );
    server.set_stake(
        POOL_B,
        DELEGATOR,
        MockStake { active: 50 * APT + APT / 2, ..Default::default() },
    );

    // 150 principal + 5 + 1 + 0.5 rewards
    cli(&server)?
        .args(["total-staked", DELEGATOR])
        .assert()
        .success()
        .stdout(contains("Total staked: 156.5 APT"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_total_staked_principal_only() -> anyhow::Result<()> {
    let server = seeded_server().await;

    cli(&server)?
        .args(["total-staked", DELEGATOR, "--principal-only"])
        .assert()
        .success()
        .stdout(contains("Total staked: 150 APT (principal only)"));

    assert_eq!(server.view_call_count().await, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_total_staked_without_history() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;

    cli(&server)?
        .args(["total-staked", "0xfeed"])
        .assert()
        .success()
        .stdout(contains("Total staked: 0 APT"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pools_breakdown() -> anyhow::Result<()> {
    let server = seeded_server().await;
    server.set_stake(
        POOL_A,
        DELEGATOR,
        MockStake {
            active: 90 * APT,
            inactive: 0,
            pending_inactive: 20 * APT,
            can_withdraw_pending_inactive: true,
        },
    );
    server.set_stake(POOL_B, DELEGATOR, MockStake { active: 50 * APT, ..Default::default() });

    cli(&server)?
        .args(["pools", DELEGATOR])
        .assert()
        .success()
        .stdout(contains(format!("Pool 0x{:0>64}", "a1")))
        .stdout(contains("active principal 80 APT, pending inactive principal 20 APT"))
        .stdout(contains("(withdrawable)"))
        .stdout(contains("rewards 10 APT"))
        .stdout(contains("Total rewards: 10 APT"))
        .stdout(contains("Total staked: 160 APT"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pools_fails_when_balance_unavailable() -> anyhow::Result<()> {
    let server = seeded_server().await;
    // Only pool A has a live balance; the lookup for pool B is rejected.
    server.set_stake(POOL_A, DELEGATOR, MockStake { active: 80 * APT, ..Default::default() });

    cli(&server)?
        .args(["pools", DELEGATOR])
        .assert()
        .failure()
        .stderr(contains("EDELEGATION_POOL_DOES_NOT_EXIST"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_activities_lists_pools() -> anyhow::Result<()> {
    let server = seeded_server().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "DistributeRewardsEvent", 7, 5));

    cli(&server)?
        .args(["activities", DELEGATOR, "--verbose"])
        .assert()
        .success()
        .stdout(contains("3 events (0 unrecognized)"))
        .stdout(contains("2 events (1 unrecognized), active principal 50 APT"))
        .stdout(contains("version 2 #0: UnlockStake 30 APT"));

    assert_eq!(server.view_call_count().await, 0);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_indexer_errors_are_reported() -> anyhow::Result<()> {
    let server = seeded_server().await;
    server.fail_graphql("rate limit exceeded");

    cli(&server)?
        .args(["total-staked", DELEGATOR])
        .assert()
        .failure()
        .stderr(contains("rate limit exceeded"));

    Ok(())
}

#[test]
fn test_rejects_invalid_address() -> anyhow::Result<()> {
    Command::cargo_bin("delegated-staking")?
        .args(["total-staked", "0xnothex"])
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(contains("invalid value"));

    Ok(())
}
