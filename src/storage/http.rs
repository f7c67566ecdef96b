//! HTTP transport adapter for EngramDB
//!
//! Same normalized contract as the gRPC adapter over the JSON REST
//! surface: `GET /health`, `POST /v1/nodes`, `POST /v1/search`,
//! `DELETE /v1/nodes/{id}`, `POST /auth/login`.

use crate::error::{EngramError, Result};
use crate::storage::transport::{
    hit_from_metadata, stamp_stored_text, Transport, DEFAULT_USER_ID,
};
use crate::types::{HealthStatus, InsertAck, JsonMap, NodeRecord, SearchHit, SearchQuery, TransportKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// HTTP adapter speaking the EngramDB REST contract
pub struct HttpTransport {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
    connected: bool,
}

#[derive(Debug, Serialize)]
struct InsertBody<'a> {
    id: i64,
    text: &'a str,
    metadata: &'a JsonMap,
    user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    embedding: &'a [f32],
}

#[derive(Debug, Deserialize)]
struct InsertReply {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    node_id: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    user_id: i64,
    k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Value>,
    query_embedding: &'a [f32],
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    results: Vec<SearchReplyHit>,
}

#[derive(Debug, Deserialize)]
struct SearchReplyHit {
    id: i64,
    similarity: f32,
    #[serde(default)]
    metadata: JsonMap,
}

#[derive(Debug, Deserialize)]
struct DeleteReply {
    #[serde(default = "default_true")]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    token: String,
}

fn default_true() -> bool {
    true
}

impl HttpTransport {
    pub fn new(
        host: impl AsRef<str>,
        port: u16,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(EngramError::Http)?;

        Ok(Self {
            base_url: format!("http://{}:{}", host.as_ref(), port),
            token,
            http,
            connected: false,
        })
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(EngramError::NotConnected(
                "storage HTTP transport".to_string(),
            ))
        }
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }

    async fn connect(&mut self) -> Result<()> {
        match self.health().await {
            Ok(health) => {
                debug!(status = %health.status, version = %health.version, "storage HTTP transport connected");
                self.connected = true;
                Ok(())
            }
            Err(err) => {
                self.connected = false;
                Err(match err {
                    EngramError::Timeout(_) | EngramError::Connection(_) => err,
                    other => EngramError::Connection(other.to_string()),
                })
            }
        }
    }

    async fn disconnect(&mut self) {
        self.connected = false;
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .with_auth(self.http.get(format!("{}/health", self.base_url)))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn insert(&self, record: &NodeRecord) -> Result<InsertAck> {
        let id = record.id.to_i64()?;
        self.ensure_connected()?;

        let metadata = stamp_stored_text(&record.text, &record.metadata);
        let body = InsertBody {
            id,
            text: &record.text,
            metadata: &metadata,
            user_id: record.user_id.unwrap_or(DEFAULT_USER_ID),
            session_id: record.session_id.as_deref(),
            embedding: record.embedding.as_deref().unwrap_or_default(),
        };

        let reply: InsertReply = self
            .with_auth(self.http.post(format!("{}/v1/nodes", self.base_url)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(InsertAck {
            success: reply.success,
            node_id: reply.node_id,
            message: reply.message,
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        self.ensure_connected()?;

        let body = SearchBody {
            query: &query.query,
            user_id: query.user_id.unwrap_or(DEFAULT_USER_ID),
            k: query.k,
            session_id: query.session_id.as_deref(),
            filter: query.filter.as_ref(),
            query_embedding: query.embedding.as_deref().unwrap_or_default(),
        };

        let reply: SearchReply = self
            .with_auth(self.http.post(format!("{}/v1/search", self.base_url)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(reply
            .results
            .into_iter()
            .map(|hit| hit_from_metadata(hit.id, hit.similarity, hit.metadata))
            .collect())
    }

    async fn delete(&self, node_id: i64, session_id: Option<&str>) -> Result<bool> {
        self.ensure_connected()?;

        let mut request = self
            .with_auth(self.http.delete(format!("{}/v1/nodes/{}", self.base_url, node_id)));
        if let Some(session_id) = session_id {
            request = request.query(&[("session_id", session_id)]);
        }

        let reply: DeleteReply = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(reply.success)
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<String> {
        let reply: LoginReply = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        self.token = Some(reply.token.clone());
        Ok(reply.token)
    }
}
