//! gRPC transport adapter for EngramDB

use crate::error::{EngramError, Result};
use crate::proto::storage as pb;
use crate::proto::storage::engram_db_client::EngramDbClient;
use crate::storage::transport::{
    hit_from_metadata, stamp_stored_text, Transport, DEFAULT_USER_ID,
};
use crate::types::{HealthStatus, InsertAck, JsonMap, NodeRecord, SearchHit, SearchQuery, TransportKind};
use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use tracing::{debug, warn};

/// Maximum gRPC message size in either direction (50 MiB)
const MAX_MESSAGE_BYTES: usize = 50 * 1024 * 1024;

/// gRPC adapter speaking the EngramDb service contract
pub struct GrpcTransport {
    host: String,
    port: u16,
    token: Option<String>,
    timeout: Option<Duration>,
    client: Option<EngramDbClient<Channel>>,
}

impl GrpcTransport {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        token: Option<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            token,
            timeout,
            client: None,
        }
    }

    fn client(&self) -> Result<EngramDbClient<Channel>> {
        self.client
            .clone()
            .ok_or_else(|| EngramError::NotConnected("storage gRPC transport".to_string()))
    }

    /// Attach bearer auth metadata when a token is set
    fn authorize<T>(&self, request: &mut Request<T>) -> Result<()> {
        if let Some(token) = &self.token {
            let value = format!("Bearer {}", token).parse().map_err(|_| {
                EngramError::InvalidArgument("token is not valid header ASCII".to_string())
            })?;
            request.metadata_mut().insert("authorization", value);
        }
        Ok(())
    }

    fn request<T>(&self, message: T) -> Result<Request<T>> {
        let mut request = Request::new(message);
        self.authorize(&mut request)?;
        Ok(request)
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::Grpc
    }

    async fn connect(&mut self) -> Result<()> {
        let mut endpoint = Endpoint::from_shared(format!("http://{}:{}", self.host, self.port))?;
        if let Some(timeout) = self.timeout {
            endpoint = endpoint.timeout(timeout).connect_timeout(timeout);
        }

        let channel = endpoint.connect_lazy();
        self.client = Some(
            EngramDbClient::new(channel)
                .max_decoding_message_size(MAX_MESSAGE_BYTES)
                .max_encoding_message_size(MAX_MESSAGE_BYTES),
        );

        // The lazy channel accepts anything; only a health round trip
        // proves the peer is actually there.
        match self.health().await {
            Ok(health) => {
                debug!(status = %health.status, version = %health.version, "storage gRPC transport connected");
                Ok(())
            }
            Err(err) => {
                self.client = None;
                Err(match err {
                    EngramError::Timeout(_) | EngramError::Connection(_) => err,
                    other => EngramError::Connection(other.to_string()),
                })
            }
        }
    }

    async fn disconnect(&mut self) {
        self.client = None;
    }

    async fn health(&self) -> Result<HealthStatus> {
        let mut client = self.client()?;
        let response = client.health(self.request(pb::HealthRequest {})?).await?;
        let res = response.into_inner();
        Ok(HealthStatus {
            status: res.status,
            version: res.version,
        })
    }

    async fn insert(&self, record: &NodeRecord) -> Result<InsertAck> {
        let id = record.id.to_i64()?;
        let mut client = self.client()?;

        let metadata = stamp_stored_text(&record.text, &record.metadata);
        let request = self.request(pb::InsertRequest {
            id,
            text: record.text.clone(),
            metadata: serde_json::to_vec(&metadata)?,
            user_id: record.user_id.unwrap_or(DEFAULT_USER_ID),
            session_id: record.session_id.clone(),
            embedding: record.embedding.clone().unwrap_or_default(),
        })?;

        let res = client.insert(request).await?.into_inner();
        Ok(InsertAck {
            success: res.success,
            node_id: res.node_id,
            message: res.message,
        })
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let mut client = self.client()?;

        let filter = match &query.filter {
            Some(filter) => serde_json::to_string(filter)?,
            None => String::new(),
        };
        let request = self.request(pb::SearchRequest {
            query_text: query.query.clone(),
            user_id: query.user_id.unwrap_or(DEFAULT_USER_ID),
            k: query.k,
            session_id: query.session_id.clone(),
            filter,
            query_embedding: query.embedding.clone().unwrap_or_default(),
        })?;

        let res = client.search(request).await?.into_inner();
        let hits = res
            .results
            .into_iter()
            .map(|result| {
                // A single undecodable metadata blob must not sink the
                // whole result set; that hit just comes back bare.
                let metadata: JsonMap = match serde_json::from_slice(&result.metadata) {
                    Ok(map) => map,
                    Err(err) => {
                        warn!(id = result.id, %err, "undecodable search result metadata");
                        JsonMap::new()
                    }
                };
                hit_from_metadata(result.id, result.similarity, metadata)
            })
            .collect();
        Ok(hits)
    }

    async fn delete(&self, node_id: i64, session_id: Option<&str>) -> Result<bool> {
        let mut client = self.client()?;
        let request = self.request(pb::DeleteNodeRequest {
            node_id,
            session_id: session_id.map(str::to_string),
        })?;
        let res = client.delete_node(request).await?.into_inner();
        Ok(res.success)
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<String> {
        let mut client = self.client()?;
        let request = self.request(pb::LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let res = client.login(request).await?.into_inner();
        self.token = Some(res.token.clone());
        Ok(res.token)
    }
}
