//! Storage client for EngramDB
//!
//! Owns transport selection: an explicit preference pins one adapter,
//! `auto` probes gRPC first and falls back to HTTP. Once selected, the
//! transport stays fixed for the life of the client; per-call failures
//! never switch transports silently.

pub mod grpc;
pub mod http;
pub mod transport;

use crate::error::{EngramError, Result};
use crate::types::{
    BatchReport, HealthStatus, InsertAck, NodeKey, NodeRecord, SearchHit, SearchQuery,
    TransportKind, TransportPreference,
};
use grpc::GrpcTransport;
use http::HttpTransport;
use std::time::Duration;
use tracing::{info, warn};
use transport::Transport;

/// Connection settings for [`StorageClient`]
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub host: String,
    pub preference: TransportPreference,
    pub grpc_port: u16,
    pub http_port: u16,
    pub token: Option<String>,
    /// Per-call deadline applied where the transport supports it
    pub timeout: Option<Duration>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            preference: TransportPreference::Auto,
            grpc_port: 50051,
            http_port: 3000,
            token: None,
            timeout: None,
        }
    }
}

/// Client for EngramDB, the persistent semantic node store
///
/// All operations besides `connect` fail fast with
/// [`EngramError::NotConnected`] until a connect succeeds. A single
/// instance is not meant for concurrent mutation; see the crate docs.
pub struct StorageClient {
    options: StorageOptions,
    transport: Option<Box<dyn Transport>>,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("options", &self.options)
            .field("connected", &self.transport.is_some())
            .finish()
    }
}

impl StorageClient {
    pub fn new(options: StorageOptions) -> Self {
        Self {
            options,
            transport: None,
        }
    }

    /// Connect according to the configured transport preference
    ///
    /// In `auto` mode the gRPC adapter is probed first; if it fails for
    /// any reason the HTTP adapter is attempted. When both fail the
    /// gRPC error propagates, since gRPC is the primary path.
    pub async fn connect(&mut self) -> Result<()> {
        match self.options.preference {
            TransportPreference::Grpc => {
                let mut transport = self.grpc_transport();
                transport.connect().await?;
                self.transport = Some(Box::new(transport));
            }
            TransportPreference::Http => {
                let mut transport = self.http_transport()?;
                transport.connect().await?;
                self.transport = Some(Box::new(transport));
            }
            TransportPreference::Auto => {
                let mut grpc = self.grpc_transport();
                match grpc.connect().await {
                    Ok(()) => {
                        self.transport = Some(Box::new(grpc));
                    }
                    Err(grpc_err) => {
                        warn!(%grpc_err, "gRPC connect failed, falling back to HTTP");
                        match self.try_http_fallback().await {
                            Ok(transport) => {
                                info!("storage connected over HTTP fallback");
                                self.transport = Some(transport);
                            }
                            Err(http_err) => {
                                warn!(%http_err, "HTTP fallback failed");
                                return Err(grpc_err);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn try_http_fallback(&self) -> Result<Box<dyn Transport>> {
        let mut http = self.http_transport()?;
        http.connect().await?;
        Ok(Box::new(http))
    }

    fn grpc_transport(&self) -> GrpcTransport {
        GrpcTransport::new(
            self.options.host.clone(),
            self.options.grpc_port,
            self.options.token.clone(),
            self.options.timeout,
        )
    }

    fn http_transport(&self) -> Result<HttpTransport> {
        HttpTransport::new(
            &self.options.host,
            self.options.http_port,
            self.options.token.clone(),
            self.options.timeout,
        )
    }

    pub async fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.disconnect().await;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// The transport selected by the last successful connect
    pub fn transport_kind(&self) -> Option<TransportKind> {
        self.transport.as_ref().map(|t| t.kind())
    }

    fn transport(&self) -> Result<&dyn Transport> {
        self.transport
            .as_deref()
            .ok_or_else(|| EngramError::NotConnected("storage client".to_string()))
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.transport()?.health().await
    }

    pub async fn insert(&self, record: NodeRecord) -> Result<InsertAck> {
        self.transport()?.insert(&record).await
    }

    /// Insert each item independently, aggregating per-item failures
    ///
    /// A failing item is recorded by stringified cause and never stops
    /// the batch; the call itself only fails when not connected. The
    /// returned counts satisfy `total_inserted + failed == items.len()`.
    pub async fn batch_insert(
        &self,
        items: Vec<NodeRecord>,
        user_id: Option<i64>,
    ) -> Result<BatchReport> {
        let transport = self.transport()?;

        let mut total_inserted = 0;
        let mut errors = Vec::new();
        for mut record in items {
            record.user_id = record.user_id.or(user_id);
            match transport.insert(&record).await {
                Ok(_) => total_inserted += 1,
                Err(err) => {
                    warn!(id = %record.id, %err, "batch insert item failed");
                    errors.push(err.to_string());
                }
            }
        }

        Ok(BatchReport {
            total_inserted,
            failed: errors.len(),
            errors,
        })
    }

    pub async fn search(&self, query: SearchQuery) -> Result<Vec<SearchHit>> {
        self.transport()?.search(&query).await
    }

    pub async fn delete(
        &self,
        id: impl Into<NodeKey>,
        session_id: Option<&str>,
    ) -> Result<bool> {
        let node_id = id.into().to_i64()?;
        self.transport()?.delete(node_id, session_id).await
    }

    /// Authenticate and adopt the returned token for subsequent calls
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String> {
        let transport = self
            .transport
            .as_deref_mut()
            .ok_or_else(|| EngramError::NotConnected("storage client".to_string()))?;
        let token = transport.login(username, password).await?;
        self.options.token = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_fail_fast_before_connect() {
        let client = StorageClient::new(StorageOptions::default());
        assert!(!client.is_connected());

        let err = client.health().await.unwrap_err();
        assert!(matches!(err, EngramError::NotConnected(_)));

        let err = client
            .search(SearchQuery::new("anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngramError::NotConnected(_)));

        let err = client.delete(1i64, None).await.unwrap_err();
        assert!(matches!(err, EngramError::NotConnected(_)));
    }

    #[tokio::test]
    async fn test_delete_rejects_non_numeric_id_before_transport_lookup() {
        let client = StorageClient::new(StorageOptions::default());
        let err = client.delete("abc", None).await.unwrap_err();
        assert!(matches!(err, EngramError::InvalidArgument(_)));
    }
}
