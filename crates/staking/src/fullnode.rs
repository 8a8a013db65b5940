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

//! Full node client for reading delegation pool balances through view functions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{AccountAddress, BalanceSource, LiveStakeSnapshot, ViewError};

/// Returns `(active, inactive, pending_inactive)` for `(pool, delegator)`.
pub const GET_STAKE_FUNCTION: &str = "0x1::delegation_pool::get_stake";
/// Returns whether the pending inactive stake of `pool` can be withdrawn.
pub const CAN_WITHDRAW_PENDING_INACTIVE_FUNCTION: &str =
    "0x1::delegation_pool::can_withdraw_pending_inactive";

#[derive(Debug, Serialize)]
struct ViewRequest<'a> {
    function: &'a str,
    type_arguments: Vec<String>,
    arguments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NodeError {
    message: String,
}

/// Client for the full node REST API.
#[derive(Clone, Debug)]
pub struct FullnodeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl FullnodeClient {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    fn view_url(&self) -> String {
        format!("{}/view", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Call a view function and return its raw output values.
    pub async fn view(
        &self,
        function: &str,
        arguments: Vec<String>,
    ) -> Result<Vec<Value>, ViewError> {
        let request = ViewRequest { function, type_arguments: Vec::new(), arguments };
        tracing::debug!("Calling {} with {:?}", function, request.arguments);

        let response = self.http.post(self.view_url()).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message =
                serde_json::from_str::<NodeError>(&body).map(|e| e.message).unwrap_or(body);
            return Err(ViewError::Rejected {
                function: function.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Read `(active, inactive, pending_inactive)` for the delegator in the pool.
    pub async fn get_stake(
        &self,
        delegator: &AccountAddress,
        pool: &AccountAddress,
    ) -> Result<(u64, u64, u64), ViewError> {
        let arguments = vec![pool.to_canonical_string(), delegator.to_canonical_string()];
        let values = self.view(GET_STAKE_FUNCTION, arguments).await?;
        match values.as_slice() {
            [active, inactive, pending_inactive] => Ok((
                decode_u64(GET_STAKE_FUNCTION, active)?,
                decode_u64(GET_STAKE_FUNCTION, inactive)?,
                decode_u64(GET_STAKE_FUNCTION, pending_inactive)?,
            )),
            _ => Err(decode_error(
                GET_STAKE_FUNCTION,
                format!("expected 3 values, got {values:?}"),
            )),
        }
    }

    pub async fn can_withdraw_pending_inactive(
        &self,
        pool: &AccountAddress,
    ) -> Result<bool, ViewError> {
        let function = CAN_WITHDRAW_PENDING_INACTIVE_FUNCTION;
        let values = self.view(function, vec![pool.to_canonical_string()]).await?;
        match values.as_slice() {
            [Value::Bool(can_withdraw)] => Ok(*can_withdraw),
            _ => Err(decode_error(function, format!("expected a single bool, got {values:?}"))),
        }
    }
}

#[async_trait]
impl BalanceSource for FullnodeClient {
    async fn fetch_stake(
        &self,
        delegator: &AccountAddress,
        pool: &AccountAddress,
    ) -> Result<LiveStakeSnapshot, ViewError> {
        let (stake, can_withdraw_pending_inactive) = tokio::try_join!(
            self.get_stake(delegator, pool),
            self.can_withdraw_pending_inactive(pool)
        )?;
        let (active, inactive, pending_inactive) = stake;
        Ok(LiveStakeSnapshot { active, inactive, pending_inactive, can_withdraw_pending_inactive })
    }
}

/// u64 outputs are encoded as decimal strings.
fn decode_u64(function: &str, value: &Value) -> Result<u64, ViewError> {
    let parsed = match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| decode_error(function, format!("{value} is not a u64")))
}

fn decode_error(function: &str, detail: String) -> ViewError {
    ViewError::Decode { function: function.to_string(), detail }
}
