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

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

const GRAPHQL_PATH: &str = "/v1/graphql";
const VIEW_PATH: &str = "/v1/view";

/// A staking activity row, in the shape the indexer returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockActivity {
    pub amount: u64,
    pub delegator_address: String,
    pub event_index: u64,
    pub event_type: String,
    pub pool_address: String,
    pub transaction_version: u64,
}

impl MockActivity {
    /// Create an activity for a `0x1::delegation_pool` event, e.g. `AddStakeEvent`.
    pub fn new(
        delegator: &str,
        pool: &str,
        event_name: &str,
        amount: u64,
        transaction_version: u64,
    ) -> Self {
        Self {
            amount,
            delegator_address: canonical(delegator),
            event_index: 0,
            event_type: format!("0x1::delegation_pool::{event_name}"),
            pool_address: canonical(pool),
            transaction_version,
        }
    }
}

/// Live stake of a delegator in a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStake {
    pub active: u64,
    pub inactive: u64,
    pub pending_inactive: u64,
    pub can_withdraw_pending_inactive: bool,
}

#[derive(Debug, Deserialize)]
struct GraphQlRequest {
    #[serde(default)]
    variables: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ViewRequest {
    function: String,
    arguments: Vec<String>,
}

#[derive(Default)]
struct MockState {
    activities: Vec<MockActivity>,
    /// (pool, delegator) -> stake
    stakes: HashMap<(String, String), MockStake>,
    graphql_errors: Vec<String>,
}

/// Mock server for the indexer and full node APIs.
pub struct StakingMockServer {
    server: MockServer,
    state: Arc<Mutex<MockState>>,
}

impl StakingMockServer {
    /// Create a new mock server with both APIs mounted.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let state = Arc::new(Mutex::new(MockState::default()));

        let mock_server = Self { server, state };

        mock_server.setup_mocks().await;
        mock_server
    }

    /// GraphQL endpoint of the mock indexer.
    pub fn indexer_url(&self) -> String {
        format!("{}{GRAPHQL_PATH}", self.server.uri())
    }

    /// REST base URL of the mock full node.
    pub fn fullnode_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    pub fn add_activity(&self, activity: MockActivity) {
        self.state.lock().unwrap().activities.push(activity);
    }

    pub fn set_stake(&self, pool: &str, delegator: &str, stake: MockStake) {
        self.state.lock().unwrap().stakes.insert((canonical(pool), canonical(delegator)), stake);
    }

    /// Make every subsequent GraphQL query fail with `message`.
    pub fn fail_graphql(&self, message: &str) {
        self.state.lock().unwrap().graphql_errors.push(message.to_string());
    }

    /// Number of view function calls received so far.
    pub async fn view_call_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|req| req.url.path() == VIEW_PATH)
            .count()
    }

    async fn setup_mocks(&self) {
        self.setup_graphql_endpoint().await;
        self.setup_view_endpoint().await;
    }

    /// Setup the POST /v1/graphql endpoint
    async fn setup_graphql_endpoint(&self) {
        let state = self.state.clone();

        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .respond_with(move |req: &Request| {
                let Ok(request) = req.body_json::<GraphQlRequest>() else {
                    return ResponseTemplate::new(400).set_body_string("invalid GraphQL request");
                };
                let state = state.lock().unwrap();
                if !state.graphql_errors.is_empty() {
                    let errors: Vec<Value> =
                        state.graphql_errors.iter().map(|m| json!({ "message": m })).collect();
                    return ResponseTemplate::new(200).set_body_json(json!({ "errors": errors }));
                }

                let delegator = request
                    .variables
                    .get("delegatorAddress")
                    .and_then(Value::as_str)
                    .map(canonical)
                    .unwrap_or_default();
                let mut rows: Vec<MockActivity> = state
                    .activities
                    .iter()
                    .filter(|a| a.delegator_address == delegator)
                    .cloned()
                    .collect();
                rows.sort_by_key(|a| a.transaction_version);
                tracing::debug!("Serving {} activities for {}", rows.len(), delegator);

                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "delegated_staking_activities": rows } }))
            })
            .mount(&self.server)
            .await;
    }

    /// Setup the POST /v1/view endpoint
    async fn setup_view_endpoint(&self) {
        let state = self.state.clone();

        Mock::given(method("POST"))
            .and(path(VIEW_PATH))
            .respond_with(move |req: &Request| {
                let Ok(request) = req.body_json::<ViewRequest>() else {
                    return node_error(400, "invalid view request");
                };
                let state = state.lock().unwrap();
                let args: Vec<String> = request.arguments.iter().map(|a| canonical(a)).collect();

                match (request.function.as_str(), args.as_slice()) {
                    ("0x1::delegation_pool::get_stake", [pool, delegator]) => {
                        match state.stakes.get(&(pool.clone(), delegator.clone())) {
                            Some(stake) => ResponseTemplate::new(200).set_body_json(json!([
                                stake.active.to_string(),
                                stake.inactive.to_string(),
                                stake.pending_inactive.to_string(),
                            ])),
                            None => node_error(400, "EDELEGATION_POOL_DOES_NOT_EXIST"),
                        }
                    }
                    ("0x1::delegation_pool::can_withdraw_pending_inactive", [pool]) => {
                        match state.stakes.iter().find(|((p, _), _)| p == pool) {
                            Some((_, stake)) => ResponseTemplate::new(200)
                                .set_body_json(json!([stake.can_withdraw_pending_inactive])),
                            None => node_error(400, "EDELEGATION_POOL_DOES_NOT_EXIST"),
                        }
                    }
                    (function, _) => node_error(404, &format!("function {function} not found")),
                }
            })
            .mount(&self.server)
            .await;
    }
}

fn node_error(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(json!({ "message": message, "error_code": "invalid_input" }))
}

/// Long-form lowercase address, so lookups ignore `0x1` vs `0x000...1`.
fn canonical(address: &str) -> String {
    let digits = address.trim().trim_start_matches("0x").to_lowercase();
    format!("0x{digits:0>64}")
}
