//! Transport seam for the EngramDB storage client
//!
//! Both wire protocols implement the same capability interface so the
//! facade can select one at connect time and treat it uniformly after.

use crate::error::Result;
use crate::types::{HealthStatus, InsertAck, JsonMap, NodeRecord, SearchHit, SearchQuery, TransportKind};
use async_trait::async_trait;
use serde_json::Value;

/// User id applied when a record or query does not name one
pub const DEFAULT_USER_ID: i64 = 1;

/// Metadata key under which node text is mirrored for later retrieval
pub const STORED_TEXT_KEY: &str = "stored_text";

/// Capability interface implemented by the gRPC and HTTP adapters
///
/// `connect` performs a real health round trip before declaring success;
/// accepting a socket is not enough. `login` updates the adapter's
/// stored token so subsequent calls use it automatically.
#[async_trait]
pub trait Transport: Send + Sync {
    fn kind(&self) -> TransportKind;

    async fn connect(&mut self) -> Result<()>;

    async fn disconnect(&mut self);

    async fn health(&self) -> Result<HealthStatus>;

    async fn insert(&self, record: &NodeRecord) -> Result<InsertAck>;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;

    async fn delete(&self, node_id: i64, session_id: Option<&str>) -> Result<bool>;

    async fn login(&mut self, username: &str, password: &str) -> Result<String>;
}

/// Mirror the node text into metadata under [`STORED_TEXT_KEY`]
///
/// Applied identically by both adapters before transmission; an existing
/// `stored_text` entry is left untouched.
pub(crate) fn stamp_stored_text(text: &str, metadata: &JsonMap) -> JsonMap {
    let mut meta = metadata.clone();
    if !text.is_empty() && !meta.contains_key(STORED_TEXT_KEY) {
        meta.insert(STORED_TEXT_KEY.to_string(), Value::String(text.to_string()));
    }
    meta
}

/// Build a normalized search hit from decoded metadata
pub(crate) fn hit_from_metadata(id: i64, similarity: f32, metadata: JsonMap) -> SearchHit {
    let data = metadata.get(STORED_TEXT_KEY).cloned();
    SearchHit {
        id,
        similarity,
        metadata,
        data,
    }
}
