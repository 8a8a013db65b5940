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

//! Integration tests for the indexer and full node clients against a mock server.

use std::sync::Arc;

use delegated_staking::{
    AccountAddress, ActivitySource, BalanceSource, FullnodeClient, IndexerClient,
    LiveStakeSnapshot, PrincipalState, QueryError, StakeCalculator, StakeEventKind, StakingError,
    ViewError,
};
use delegated_staking_test_utils::{MockActivity, MockStake, StakingMockServer};
use url::Url;

const DELEGATOR: &str = "0xf9a2fc9aa77432569caa5b9014e7abf688bf9ab53feeb6691020fd051248916b";
const POOL_A: &str = "0xa1";
const POOL_B: &str = "0xb2";

fn address(s: &str) -> AccountAddress {
    s.parse().expect("valid address")
}

fn clients(server: &StakingMockServer) -> (IndexerClient, FullnodeClient) {
    let http = reqwest::Client::new();
    let indexer = IndexerClient::new(http.clone(), Url::parse(&server.indexer_url()).unwrap());
    let fullnode = FullnodeClient::new(http, Url::parse(&server.fullnode_url()).unwrap());
    (indexer, fullnode)
}

#[tokio::test]
async fn test_indexer_fetches_and_parses_activities() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "AddStakeEvent", 100, 1));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "DistributeCommissionEvent", 7, 2));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "UnlockStake", 30, 3));

    let (indexer, _) = clients(&server);
    let events = indexer.fetch_delegated_staking_activities(&address(DELEGATOR)).await?;

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].kind, StakeEventKind::AddStake);
    assert_eq!(events[0].pool_address, address(POOL_A));
    assert_eq!(events[1].kind, StakeEventKind::Unknown);
    assert_eq!(events[2].kind, StakeEventKind::UnlockStake);
    assert_eq!(events[2].delegator_address, address(DELEGATOR));
    Ok(())
}

#[tokio::test]
async fn test_indexer_normalizes_short_delegator_address() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new("0x00000abc", POOL_A, "AddStakeEvent", 1, 1));

    let (indexer, _) = clients(&server);
    let events = indexer.fetch_delegated_staking_activities(&address("0xabc")).await?;
    assert_eq!(events.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_indexer_empty_history() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    let (indexer, _) = clients(&server);
    assert!(indexer.fetch_delegated_staking_activities(&address(DELEGATOR)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_indexer_graphql_errors() {
    let server = StakingMockServer::new().await;
    server.fail_graphql("field 'delegated_staking_activities' not found");

    let (indexer, _) = clients(&server);
    let err = indexer.fetch_delegated_staking_activities(&address(DELEGATOR)).await.unwrap_err();
    match err {
        QueryError::GraphQl(messages) => {
            assert_eq!(messages, vec!["field 'delegated_staking_activities' not found"])
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_indexer_unreachable() {
    // Nothing listens on port 9 (discard) locally.
    let url = Url::parse("http://127.0.0.1:9/v1/graphql").unwrap();
    let indexer = IndexerClient::new(reqwest::Client::new(), url);
    let err = indexer.fetch_delegated_staking_activities(&address(DELEGATOR)).await.unwrap_err();
    assert!(matches!(err, QueryError::Transport(_)));
}

#[tokio::test]
async fn test_fullnode_fetches_stake() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    server.set_stake(
        POOL_A,
        DELEGATOR,
        MockStake {
            active: 75,
            inactive: 3,
            pending_inactive: 30,
            can_withdraw_pending_inactive: true,
        },
    );

    let (_, fullnode) = clients(&server);
    let snapshot = fullnode.fetch_stake(&address(DELEGATOR), &address(POOL_A)).await?;
    assert_eq!(
        snapshot,
        LiveStakeSnapshot {
            active: 75,
            inactive: 3,
            pending_inactive: 30,
            can_withdraw_pending_inactive: true
        }
    );
    assert_eq!(server.view_call_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn test_fullnode_missing_pool_is_rejected() {
    let server = StakingMockServer::new().await;
    let (_, fullnode) = clients(&server);

    let err = fullnode.fetch_stake(&address(DELEGATOR), &address(POOL_B)).await.unwrap_err();
    match err {
        ViewError::Rejected { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "EDELEGATION_POOL_DOES_NOT_EXIST");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_end_to_end_total_with_rewards() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "AddStakeEvent", 100, 1));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "UnlockStakeEvent", 40, 2));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "ReactivateStakeEvent", 10, 3));
    server.set_stake(
        POOL_A,
        DELEGATOR,
        MockStake { active: 75, pending_inactive: 30, ..Default::default() },
    );
    // A pool the delegator never staked in is never queried.
    server.set_stake(POOL_B, DELEGATOR, MockStake { active: 1_000, ..Default::default() });

    let (indexer, fullnode) = clients(&server);
    let calculator =
        StakeCalculator::new(Arc::new(indexer)).with_balance_source(Arc::new(fullnode));

    let summary = calculator.staking_summary(&address(DELEGATOR)).await?;
    assert_eq!(summary.pools.len(), 1);
    assert_eq!(summary.pools[0].principal, PrincipalState { active: 70, pending_inactive: 30 });
    assert_eq!(summary.pools[0].active_rewards, 5);
    assert_eq!(summary.total, 105);
    assert_eq!(server.view_call_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_principal_only() -> anyhow::Result<()> {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "AddStakeEvent", 100, 1));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "AddStakeEvent", 50, 2));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "WithdrawStakeEvent", 80, 3));

    let (indexer, _) = clients(&server);
    let calculator = StakeCalculator::new(Arc::new(indexer));

    assert_eq!(calculator.total_staked(&address(DELEGATOR)).await?, 150);
    assert_eq!(server.view_call_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_failed_balance_aborts() {
    let server = StakingMockServer::new().await;
    server.add_activity(MockActivity::new(DELEGATOR, POOL_A, "AddStakeEvent", 100, 1));
    server.add_activity(MockActivity::new(DELEGATOR, POOL_B, "AddStakeEvent", 100, 2));
    server.set_stake(POOL_A, DELEGATOR, MockStake { active: 100, ..Default::default() });

    let (indexer, fullnode) = clients(&server);
    let calculator =
        StakeCalculator::new(Arc::new(indexer)).with_balance_source(Arc::new(fullnode));

    let err = calculator.total_staked(&address(DELEGATOR)).await.unwrap_err();
    assert!(matches!(err, StakingError::View(ViewError::Rejected { .. })));
}
