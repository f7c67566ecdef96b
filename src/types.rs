//! Core data types for the Engram client SDK
//!
//! This module defines the public data model shared by the storage and
//! state clients: node records and search results on the storage side,
//! variables, goals, traces, actions and decision cycles on the state
//! side. Loosely-typed payloads are `serde_json::Value` here and JSON
//! text on the wire.

use crate::error::{EngramError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// JSON object used for node metadata and search filters
pub type JsonMap = serde_json::Map<String, Value>;

/// Node identifier accepted by write operations
///
/// The wire format is a 64-bit integer; numeric strings are coerced at
/// the call boundary, before any network traffic. Non-numeric strings
/// fail with [`EngramError::InvalidArgument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Int(i64),
    Text(String),
}

impl NodeKey {
    /// Resolve the key to its wire representation
    pub fn to_i64(&self) -> Result<i64> {
        match self {
            NodeKey::Int(v) => Ok(*v),
            NodeKey::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                EngramError::InvalidArgument(format!("invalid 64-bit identifier: {:?}", s))
            }),
        }
    }
}

impl From<i64> for NodeKey {
    fn from(v: i64) -> Self {
        NodeKey::Int(v)
    }
}

impl From<&str> for NodeKey {
    fn from(s: &str) -> Self {
        NodeKey::Text(s.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(s: String) -> Self {
        NodeKey::Text(s)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Int(v) => write!(f, "{}", v),
            NodeKey::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A node to write into EngramDB
///
/// `metadata` is an open mapping of JSON values. If `text` is non-empty
/// and metadata carries no `stored_text` key, the transport injects the
/// text under that key before transmission so search results can
/// recover the original text from metadata alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: NodeKey,
    pub text: String,
    #[serde(default)]
    pub metadata: JsonMap,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
}

impl NodeRecord {
    /// Create a record with the given id and text and no extras
    pub fn new(id: impl Into<NodeKey>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: JsonMap::new(),
            user_id: None,
            session_id: None,
            embedding: None,
        }
    }
}

/// Parameters for a similarity search against EngramDB
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    pub query: String,
    pub user_id: Option<i64>,
    pub k: u32,
    pub session_id: Option<String>,
    /// Optional JSON filter object, serialized verbatim onto the wire
    pub filter: Option<Value>,
    pub embedding: Option<Vec<f32>>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            user_id: None,
            k: 10,
            session_id: None,
            filter: None,
            embedding: None,
        }
    }
}

/// One search result from EngramDB
///
/// `data` is derived client-side: the value stored under the metadata
/// key `stored_text` if present. When metadata fails to decode the hit
/// is still returned with empty metadata and no `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i64,
    /// Higher is more similar; no fixed range is guaranteed
    pub similarity: f32,
    pub metadata: JsonMap,
    pub data: Option<Value>,
}

/// Storage service health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Acknowledgement of a single node insert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertAck {
    pub success: bool,
    pub node_id: i64,
    pub message: String,
}

/// Aggregated outcome of a batch insert
///
/// Always satisfies `total_inserted + failed == item count`; the order
/// of `errors` is unspecified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total_inserted: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Which wire protocol a storage transport speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Grpc,
    Http,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Grpc => write!(f, "grpc"),
            TransportKind::Http => write!(f, "http"),
        }
    }
}

/// Transport selection policy for the storage client
///
/// `Auto` probes gRPC first and falls back to HTTP; once a transport is
/// selected it stays fixed for the life of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportPreference {
    #[default]
    Auto,
    Grpc,
    Http,
}

/// Provenance tag of a structured variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableSource {
    System,
    Reasoning,
    Retrieval,
    Perception,
    Explicit,
}

impl VariableSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableSource::System => "system",
            VariableSource::Reasoning => "reasoning",
            VariableSource::Retrieval => "retrieval",
            VariableSource::Perception => "perception",
            VariableSource::Explicit => "explicit",
        }
    }

    /// Decode a wire value, tolerating unknown tags
    pub(crate) fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or(VariableSource::Explicit)
    }
}

impl FromStr for VariableSource {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "system" => Ok(VariableSource::System),
            "reasoning" => Ok(VariableSource::Reasoning),
            "retrieval" => Ok(VariableSource::Retrieval),
            "perception" => Ok(VariableSource::Perception),
            "explicit" => Ok(VariableSource::Explicit),
            _ => Err(EngramError::InvalidArgument(format!(
                "unknown variable source: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for VariableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured variable in working memory, scoped to a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
    pub source: VariableSource,
}

/// Priority of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
            GoalPriority::Critical => "critical",
        }
    }

    pub(crate) fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for GoalPriority {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(GoalPriority::Low),
            "medium" => Ok(GoalPriority::Medium),
            "high" => Ok(GoalPriority::High),
            "critical" => Ok(GoalPriority::Critical),
            _ => Err(EngramError::InvalidArgument(format!(
                "unknown goal priority: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Suspended,
    Achieved,
    Abandoned,
    Failed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Suspended => "suspended",
            GoalStatus::Achieved => "achieved",
            GoalStatus::Abandoned => "abandoned",
            GoalStatus::Failed => "failed",
        }
    }

    pub(crate) fn from_wire(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for GoalStatus {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "suspended" => Ok(GoalStatus::Suspended),
            "achieved" => Ok(GoalStatus::Achieved),
            "abandoned" => Ok(GoalStatus::Abandoned),
            "failed" => Ok(GoalStatus::Failed),
            _ => Err(EngramError::InvalidArgument(format!(
                "unknown goal status: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A goal on the agent's goal stack
///
/// `parent_id` expresses a tree relationship, not ownership: deleting a
/// parent does not cascade to children in this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub description: String,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A long-term memory trace (Echoes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub input: String,
    pub outcome: String,
    pub action: String,
    pub agent_id: String,
    pub embedding: Vec<f32>,
}

/// Optional fields for [`commit`](crate::state::StateClient::commit)
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    pub action: String,
    pub agent_id: String,
    pub embedding: Option<Vec<f32>>,
}

/// Kind of action an agent submits for execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Reason,
    Retrieve,
    Learn,
    Ground,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Reason => "reason",
            ActionType::Retrieve => "retrieve",
            ActionType::Learn => "learn",
            ActionType::Ground => "ground",
        }
    }
}

impl FromStr for ActionType {
    type Err = EngramError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reason" => Ok(ActionType::Reason),
            "retrieve" => Ok(ActionType::Retrieve),
            "learn" => Ok(ActionType::Learn),
            "ground" => Ok(ActionType::Ground),
            _ => Err(EngramError::InvalidArgument(format!(
                "unknown action type: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of submitting an action for execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action_id: String,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub duration_ms: i64,
}

/// One entry in the per-run action log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub action_id: String,
    pub action_type: String,
    pub action: Option<Value>,
    pub success: bool,
    pub result: Option<Value>,
    pub cycle_number: u64,
    pub timestamp: DateTime<Utc>,
}

/// A scored action candidate for a decision cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCandidate {
    #[serde(default)]
    pub action_type: String,
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
}

/// One decision cycle as reported by the Cortex service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub cycle_number: u64,
    pub candidates: Vec<ActionCandidate>,
    pub selected_action: Option<ActionCandidate>,
    pub action_result: Option<ActionOutcome>,
    pub planning_time_ms: i64,
    pub execution_time_ms: i64,
    pub timestamp: DateTime<Utc>,
}

/// A named concept with its JSON schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub schema: Value,
}
