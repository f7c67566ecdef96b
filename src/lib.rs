//! Engram - client SDK for semantic storage and agent cognition
//!
//! This crate is the Rust client for the Engram platform:
//! - **EngramDB**: a persistent semantic node store, reachable over
//!   gRPC or an HTTP fallback chosen automatically at connect time
//! - **Cortex**: an agent cognition service covering short-term memory
//!   (Flux), long-term memory (Echoes), structured variables, goals,
//!   concepts, actions and decision cycles
//! - A tool dispatch router that maps agent tool calls by name onto
//!   typed Cortex operations, with static catalogs for the Anthropic,
//!   OpenAI and Google tool-definition conventions
//!
//! # Architecture
//!
//! - **Types**: the public data model (`NodeRecord`, `SearchHit`,
//!   `Variable`, `Goal`, `CycleReport`, ...)
//! - **Storage**: transport adapters plus the selecting facade
//! - **State**: the typed Cortex client
//! - **Tools**: name-based dispatch and the vendor catalogs
//! - **Client**: one handle composing both services from config and
//!   environment
//!
//! Every public operation is an awaitable round trip to a remote peer;
//! the SDK spawns no background tasks and keeps no queues. Setters such
//! as `StateClient::set_run_id` are not synchronized against in-flight
//! calls on the same instance — mutate a client from one thread at a
//! time.
//!
//! # Example
//!
//! ```ignore
//! use engram_sdk::{Client, ClientOptions, NodeRecord, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> engram_sdk::Result<()> {
//!     let mut client = Client::new(ClientOptions::default());
//!     client.connect().await?;
//!
//!     let storage = client.storage()?;
//!     storage.insert(NodeRecord::new(1i64, "PostgreSQL chosen for user data")).await?;
//!     let hits = storage.search(SearchQuery::new("database decisions")).await?;
//!
//!     let state = client.state()?;
//!     state.focus("reviewing storage layout").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod proto;
pub mod state;
pub mod storage;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use client::{Client, ClientOptions};
pub use config::EngramConfig;
pub use error::{EngramError, Result};
pub use state::StateClient;
pub use storage::{StorageClient, StorageOptions};
pub use types::{
    ActionCandidate, ActionLogEntry, ActionOutcome, ActionType, BatchReport, CommitOptions,
    Concept, CycleReport, Goal, GoalPriority, GoalStatus, HealthStatus, InsertAck, JsonMap,
    NodeKey, NodeRecord, SearchHit, SearchQuery, Trace, TransportKind, TransportPreference,
    Variable, VariableSource,
};
