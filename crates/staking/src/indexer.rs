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

//! GraphQL indexer client for delegated staking activities.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use url::Url;

use crate::{AccountAddress, ActivitySource, QueryError, StakeEvent, StakeEventKind};

/// Query for every staking activity of a delegator, oldest first.
pub const DELEGATED_STAKING_ACTIVITIES_QUERY: &str = r#"query getDelegatedStakingActivities($delegatorAddress: String) {
  delegated_staking_activities(
    where: { delegator_address: { _eq: $delegatorAddress } }
    order_by: { transaction_version: asc }
  ) {
    amount
    delegator_address
    event_index
    event_type
    pool_address
    transaction_version
  }
}"#;

/// A row of the `delegated_staking_activities` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatedStakingActivity {
    #[serde(deserialize_with = "de_u64")]
    pub amount: u64,
    pub delegator_address: String,
    #[serde(deserialize_with = "de_u64")]
    pub event_index: u64,
    pub event_type: String,
    pub pool_address: String,
    #[serde(deserialize_with = "de_u64")]
    pub transaction_version: u64,
}

impl TryFrom<DelegatedStakingActivity> for StakeEvent {
    type Error = QueryError;

    fn try_from(activity: DelegatedStakingActivity) -> Result<Self, Self::Error> {
        let parse_address = |field: &str, value: &str| -> Result<AccountAddress, QueryError> {
            value.parse().map_err(|e| {
                QueryError::Malformed(format!(
                    "{field} at version {}: {e}",
                    activity.transaction_version
                ))
            })
        };

        Ok(StakeEvent {
            delegator_address: parse_address("delegator_address", &activity.delegator_address)?,
            pool_address: parse_address("pool_address", &activity.pool_address)?,
            kind: StakeEventKind::from_event_type(&activity.event_type),
            amount: activity.amount,
            transaction_version: activity.transaction_version,
            event_index: activity.event_index,
        })
    }
}

/// Numeric columns arrive either as JSON numbers or as decimal strings.
fn de_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ActivitiesData {
    delegated_staking_activities: Vec<DelegatedStakingActivity>,
}

/// Client for the GraphQL indexer API.
#[derive(Clone, Debug)]
pub struct IndexerClient {
    http: reqwest::Client,
    url: Url,
}

impl IndexerClient {
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the raw activity rows for a delegator.
    pub async fn delegated_staking_activities(
        &self,
        delegator: &AccountAddress,
    ) -> Result<Vec<DelegatedStakingActivity>, QueryError> {
        let body = json!({
            "query": DELEGATED_STAKING_ACTIVITIES_QUERY,
            "variables": { "delegatorAddress": delegator.to_canonical_string() },
        });

        tracing::debug!("Querying staking activities for {} from {}", delegator, self.url);
        let response = self.http.post(self.url.clone()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status { status: status.as_u16(), body });
        }

        let response: GraphQlResponse<ActivitiesData> = response.json().await?;
        if !response.errors.is_empty() {
            return Err(QueryError::GraphQl(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        let data = response.data.ok_or(QueryError::MissingData)?;
        Ok(data.delegated_staking_activities)
    }
}

#[async_trait]
impl ActivitySource for IndexerClient {
    async fn fetch_delegated_staking_activities(
        &self,
        delegator: &AccountAddress,
    ) -> Result<Vec<StakeEvent>, QueryError> {
        self.delegated_staking_activities(delegator)
            .await?
            .into_iter()
            .map(StakeEvent::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_with_numbers() {
        let activity: DelegatedStakingActivity = serde_json::from_value(json!({
            "amount": 1_000_000_000u64,
            "delegator_address": "0xabc",
            "event_index": 2,
            "event_type": "0x1::delegation_pool::AddStakeEvent",
            "pool_address": "0x1234",
            "transaction_version": 123_456_789u64,
        }))
        .unwrap();

        let event = StakeEvent::try_from(activity).unwrap();
        assert_eq!(event.kind, StakeEventKind::AddStake);
        assert_eq!(event.amount, 1_000_000_000);
        assert_eq!(event.transaction_version, 123_456_789);
        assert_eq!(event.event_index, 2);
        assert_eq!(event.pool_address, "0x1234".parse().unwrap());
    }

    #[test]
    fn test_activity_with_numeric_strings() {
        let activity: DelegatedStakingActivity = serde_json::from_value(json!({
            "amount": "2500",
            "delegator_address": "0xabc",
            "event_index": "0",
            "event_type": "0x1::delegation_pool::UnlockStakeEvent",
            "pool_address": "0x1234",
            "transaction_version": "18446744073709551615",
        }))
        .unwrap();
        assert_eq!(activity.amount, 2500);
        assert_eq!(activity.transaction_version, u64::MAX);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let result: Result<DelegatedStakingActivity, _> = serde_json::from_value(json!({
            "amount": -5,
            "delegator_address": "0xabc",
            "event_index": 0,
            "event_type": "0x1::delegation_pool::AddStakeEvent",
            "pool_address": "0x1234",
            "transaction_version": 1,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_event_type_is_not_an_error() {
        let activity = DelegatedStakingActivity {
            amount: 5,
            delegator_address: "0xabc".to_string(),
            event_index: 0,
            event_type: "0x1::delegation_pool::DistributeCommissionEvent".to_string(),
            pool_address: "0x1234".to_string(),
            transaction_version: 1,
        };
        assert_eq!(StakeEvent::try_from(activity).unwrap().kind, StakeEventKind::Unknown);
    }

    #[test]
    fn test_bad_address_is_malformed() {
        let activity = DelegatedStakingActivity {
            amount: 5,
            delegator_address: "0xabc".to_string(),
            event_index: 0,
            event_type: "0x1::delegation_pool::AddStakeEvent".to_string(),
            pool_address: "not-an-address".to_string(),
            transaction_version: 77,
        };
        let err = StakeEvent::try_from(activity).unwrap_err();
        assert!(matches!(err, QueryError::Malformed(ref msg) if msg.contains("pool_address at version 77")));
    }
}
