//! Player lookup against the player service proxy.

use crate::client::{ClientError, HttpClient};
use async_trait::async_trait;
use common::PlayerDetails;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Default proxy endpoint for the player service.
pub const DEFAULT_PROXY_URL: &str = "https://ajax.tanktrouble-proxy.workers.dev/online";

/// RPC method that returns a player's details.
pub const PLAYER_DETAILS_METHOD: &str = "tanktrouble.getPlayerDetails";

/// Lookup errors.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Result of a successful lookup round trip.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupResponse {
    Found(Box<PlayerDetails>),
    NotFound,
}

/// Source of player details.
#[async_trait]
pub trait PlayerLookup: Send + Sync {
    async fn lookup(&self, player_id: &str) -> Result<LookupResponse, LookupError>;
}

/// RPC request body.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: [&'a str; 1],
}

/// RPC response envelope: `{"result": {"result": bool, "data": {...}}}`.
#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: RpcResult,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    result: bool,
    #[serde(default)]
    data: Option<PlayerDetails>,
}

impl TryFrom<RpcEnvelope> for LookupResponse {
    type Error = LookupError;

    fn try_from(envelope: RpcEnvelope) -> Result<Self, Self::Error> {
        match (envelope.result.result, envelope.result.data) {
            (true, Some(details)) => Ok(LookupResponse::Found(Box::new(details))),
            (true, None) => Err(LookupError::Malformed("found without data".to_string())),
            (false, _) => Ok(LookupResponse::NotFound),
        }
    }
}

/// Parse a raw proxy response body. Bodies that are not the expected JSON
/// envelope are malformed.
pub fn parse_response(body: &[u8]) -> Result<LookupResponse, LookupError> {
    let envelope: RpcEnvelope =
        serde_json::from_slice(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    LookupResponse::try_from(envelope)
}

/// Lookup over HTTP through the player service proxy.
#[derive(Debug, Clone)]
pub struct ProxyPlayerLookup {
    client: Arc<HttpClient>,
    endpoint: Url,
}

impl ProxyPlayerLookup {
    pub fn new(client: Arc<HttpClient>, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl PlayerLookup for ProxyPlayerLookup {
    async fn lookup(&self, player_id: &str) -> Result<LookupResponse, LookupError> {
        let request = RpcRequest {
            method: PLAYER_DETAILS_METHOD,
            params: [player_id],
        };

        debug!(player = player_id, endpoint = %self.endpoint, "looking up player");
        let body = self.client.post_json(&self.endpoint, &request).await?;
        parse_response(&body)
    }
}

/// In-memory lookup. Unknown players are not found; players marked as
/// failing produce a transport error.
#[derive(Debug, Default)]
pub struct StaticPlayerLookup {
    players: RwLock<HashMap<String, PlayerDetails>>,
    failing: RwLock<HashSet<String>>,
    latencies: RwLock<HashMap<String, Duration>>,
    calls: RwLock<Vec<String>>,
}

impl StaticPlayerLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, player_id: impl Into<String>, details: PlayerDetails) {
        self.players.write().insert(player_id.into(), details);
    }

    /// Make lookups of `player_id` fail with a connection error.
    pub fn fail(&self, player_id: impl Into<String>) {
        self.failing.write().insert(player_id.into());
    }

    /// Delay lookups of `player_id`.
    pub fn set_latency(&self, player_id: impl Into<String>, latency: Duration) {
        self.latencies.write().insert(player_id.into(), latency);
    }

    /// Player ids looked up so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }
}

#[async_trait]
impl PlayerLookup for StaticPlayerLookup {
    async fn lookup(&self, player_id: &str) -> Result<LookupResponse, LookupError> {
        self.calls.write().push(player_id.to_string());

        let latency = self.latencies.read().get(player_id).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.read().contains(player_id) {
            return Err(ClientError::Connection(format!("player {player_id} unreachable")).into());
        }

        let details = self.players.read().get(player_id).cloned();
        Ok(details.map_or(LookupResponse::NotFound, |d| LookupResponse::Found(Box::new(d))))
    }
}
