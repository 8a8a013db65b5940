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

//! Network endpoints and HTTP client options.

use std::{num::ParseIntError, time::Duration};

use clap::{Args, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION};
use thiserror::Error;
use url::Url;

/// A named network with well-known API endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Devnet,
    /// A local testnet started with default ports.
    Local,
}

impl Network {
    /// Default GraphQL endpoint of the indexer.
    pub const fn indexer_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet.aptoslabs.com/v1/graphql",
            Self::Testnet => "https://api.testnet.aptoslabs.com/v1/graphql",
            Self::Devnet => "https://api.devnet.aptoslabs.com/v1/graphql",
            Self::Local => "http://127.0.0.1:8090/v1/graphql",
        }
    }

    /// Default REST endpoint of a full node.
    pub const fn fullnode_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.mainnet.aptoslabs.com/v1",
            Self::Testnet => "https://api.testnet.aptoslabs.com/v1",
            Self::Devnet => "https://api.devnet.aptoslabs.com/v1",
            Self::Local => "http://127.0.0.1:8080/v1",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl { url: String, source: url::ParseError },

    #[error("API key is not a valid header value")]
    InvalidApiKey(#[from] InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Which indexer and full node to talk to.
#[derive(Args, Clone, Debug, Default)]
pub struct Endpoints {
    /// Network to query.
    #[clap(long, env = "APTOS_NETWORK", global = true, value_enum, default_value_t)]
    pub network: Network,

    /// GraphQL indexer URL. Overrides the network default.
    #[clap(long, env = "INDEXER_URL", global = true)]
    pub indexer_url: Option<Url>,

    /// Full node REST API URL. Overrides the network default.
    #[clap(long, env = "FULLNODE_URL", global = true)]
    pub fullnode_url: Option<Url>,

    #[clap(flatten)]
    pub client: ClientOptions,
}

impl Endpoints {
    /// Create endpoints for a named network.
    pub fn new(network: Network) -> Self {
        Self { network, ..Default::default() }
    }

    pub fn indexer_url(&self) -> Result<Url, ConfigError> {
        match &self.indexer_url {
            Some(url) => Ok(url.clone()),
            None => parse_url(self.network.indexer_url()),
        }
    }

    pub fn fullnode_url(&self) -> Result<Url, ConfigError> {
        match &self.fullnode_url {
            Some(url) => Ok(url.clone()),
            None => parse_url(self.network.fullnode_url()),
        }
    }
}

fn parse_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::InvalidUrl { url: url.to_string(), source })
}

/// Options applied to every HTTP request.
#[derive(Args, Clone, Debug, Default)]
pub struct ClientOptions {
    /// API key, sent as a bearer token.
    #[clap(long, env = "APTOS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds.
    #[clap(long = "timeout", env = "REQUEST_TIMEOUT", global = true, value_parser = |arg: &str| -> Result<Duration, ParseIntError> {Ok(Duration::from_secs(arg.parse()?))})]
    pub timeout: Option<Duration>,
}

impl ClientOptions {
    /// Build a [reqwest::Client] configured with these options.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
