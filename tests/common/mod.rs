//! Shared test infrastructure: in-process mock Engram services
//!
//! The gRPC mocks implement the generated server traits over ephemeral
//! loopback listeners; the HTTP mock serves the storage REST contract
//! with axum. State is shared with the test through `Arc` so assertions
//! can inspect exactly what went over the wire.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use engram_sdk::proto::state as state_pb;
use engram_sdk::proto::state::cortex_server::{Cortex, CortexServer};
use engram_sdk::proto::storage as storage_pb;
use engram_sdk::proto::storage::engram_db_server::{EngramDb, EngramDbServer};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

// === gRPC storage mock ===

#[derive(Default)]
pub struct StorageServerState {
    /// Metadata bytes exactly as transmitted, keyed by node id
    pub nodes: Mutex<HashMap<i64, Vec<u8>>>,
    /// Node ids whose insert fails with an internal error
    pub fail_inserts: Mutex<HashSet<i64>>,
    /// Authorization metadata seen on the most recent call
    pub last_auth: Mutex<Option<String>>,
}

impl StorageServerState {
    fn note_auth<T>(&self, request: &Request<T>) {
        let auth = request
            .metadata()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_auth.lock().unwrap() = auth;
    }
}

pub struct MockStorage {
    state: Arc<StorageServerState>,
}

#[tonic::async_trait]
impl EngramDb for MockStorage {
    async fn health(
        &self,
        request: Request<storage_pb::HealthRequest>,
    ) -> Result<Response<storage_pb::HealthResponse>, Status> {
        self.state.note_auth(&request);
        Ok(Response::new(storage_pb::HealthResponse {
            status: "ok".to_string(),
            version: "0.9.1-test".to_string(),
        }))
    }

    async fn insert(
        &self,
        request: Request<storage_pb::InsertRequest>,
    ) -> Result<Response<storage_pb::InsertResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();

        if self.state.fail_inserts.lock().unwrap().contains(&req.id) {
            return Err(Status::internal("simulated insert failure"));
        }

        self.state.nodes.lock().unwrap().insert(req.id, req.metadata);
        Ok(Response::new(storage_pb::InsertResponse {
            success: true,
            node_id: req.id,
            message: "inserted".to_string(),
        }))
    }

    async fn search(
        &self,
        request: Request<storage_pb::SearchRequest>,
    ) -> Result<Response<storage_pb::SearchResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();

        let nodes = self.state.nodes.lock().unwrap();
        let mut ids: Vec<_> = nodes.keys().copied().collect();
        ids.sort_unstable();

        let results = ids
            .into_iter()
            .take(req.k as usize)
            .enumerate()
            .map(|(rank, id)| storage_pb::SearchResult {
                id,
                similarity: 0.9 - rank as f32 * 0.1,
                metadata: nodes[&id].clone(),
            })
            .collect();
        Ok(Response::new(storage_pb::SearchResponse { results }))
    }

    async fn delete_node(
        &self,
        request: Request<storage_pb::DeleteNodeRequest>,
    ) -> Result<Response<storage_pb::DeleteNodeResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let removed = self.state.nodes.lock().unwrap().remove(&req.node_id).is_some();
        Ok(Response::new(storage_pb::DeleteNodeResponse {
            success: removed,
        }))
    }

    async fn login(
        &self,
        request: Request<storage_pb::LoginRequest>,
    ) -> Result<Response<storage_pb::LoginResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        Ok(Response::new(storage_pb::LoginResponse {
            token: format!("token-{}", req.username),
        }))
    }
}

/// Serve the storage mock on an ephemeral loopback port
pub async fn spawn_storage_grpc() -> (u16, Arc<StorageServerState>) {
    let state = Arc::new(StorageServerState::default());
    let service = MockStorage {
        state: state.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(EngramDbServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (port, state)
}

/// A loopback port with nothing listening on it
pub async fn unused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

// === HTTP storage mock ===

#[derive(Default)]
pub struct HttpServerState {
    /// Metadata objects exactly as received, keyed by node id
    pub nodes: Mutex<HashMap<i64, Value>>,
    pub fail_inserts: Mutex<HashSet<i64>>,
    pub last_auth: Mutex<Option<String>>,
    /// session_id query parameter seen by the latest delete
    pub last_delete_session: Mutex<Option<String>>,
}

impl HttpServerState {
    fn note_auth(&self, headers: &HeaderMap) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_auth.lock().unwrap() = auth;
    }
}

async fn http_health(
    State(state): State<Arc<HttpServerState>>,
    headers: HeaderMap,
) -> Json<Value> {
    state.note_auth(&headers);
    Json(json!({"status": "ok", "version": "http-test"}))
}

async fn http_insert(
    State(state): State<Arc<HttpServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.note_auth(&headers);
    let id = body["id"].as_i64().unwrap_or_default();

    if state.fail_inserts.lock().unwrap().contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "simulated insert failure"})),
        );
    }

    state
        .nodes
        .lock()
        .unwrap()
        .insert(id, body["metadata"].clone());
    (
        StatusCode::OK,
        Json(json!({"success": true, "node_id": id, "message": "stored"})),
    )
}

async fn http_search(
    State(state): State<Arc<HttpServerState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.note_auth(&headers);
    let k = body["k"].as_u64().unwrap_or(10) as usize;

    let nodes = state.nodes.lock().unwrap();
    let mut ids: Vec<_> = nodes.keys().copied().collect();
    ids.sort_unstable();

    let results: Vec<Value> = ids
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(rank, id)| {
            json!({
                "id": id,
                "similarity": 0.9 - rank as f64 * 0.1,
                "metadata": nodes[&id],
            })
        })
        .collect();
    Json(json!({ "results": results }))
}

async fn http_delete(
    State(state): State<Arc<HttpServerState>>,
    Path(id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    state.note_auth(&headers);
    *state.last_delete_session.lock().unwrap() = params.get("session_id").cloned();
    let removed = state.nodes.lock().unwrap().remove(&id).is_some();
    Json(json!({ "success": removed }))
}

async fn http_login(Json(body): Json<Value>) -> Json<Value> {
    let username = body["username"].as_str().unwrap_or_default();
    Json(json!({ "token": format!("token-{}", username) }))
}

/// Serve the HTTP storage mock on an ephemeral loopback port
pub async fn spawn_storage_http() -> (u16, Arc<HttpServerState>) {
    let state = Arc::new(HttpServerState::default());

    let app = Router::new()
        .route("/health", get(http_health))
        .route("/v1/nodes", post(http_insert))
        .route("/v1/search", post(http_search))
        .route("/v1/nodes/:id", delete(http_delete))
        .route("/auth/login", post(http_login))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (port, state)
}

// === gRPC Cortex mock ===

#[derive(Default)]
pub struct CortexServerState {
    /// run id -> variable name -> (value_json, source)
    pub variables: Mutex<HashMap<String, HashMap<String, (String, String)>>>,
    /// run id -> short-term items
    pub flux: Mutex<HashMap<String, Vec<String>>>,
    /// every committed trace, in order
    pub traces: Mutex<Vec<state_pb::Trace>>,
    /// goal id -> goal
    pub goals: Mutex<HashMap<String, state_pb::Goal>>,
    pub goal_seq: Mutex<u64>,
    /// concept name -> schema json
    pub concepts: Mutex<HashMap<String, String>>,
    /// run id -> action log entries
    pub actions: Mutex<HashMap<String, Vec<state_pb::ActionLogEntry>>>,
    /// run id -> decision cycles
    pub cycles: Mutex<HashMap<String, Vec<state_pb::CycleRecord>>>,
    pub last_auth: Mutex<Option<String>>,
}

impl CortexServerState {
    fn note_auth<T>(&self, request: &Request<T>) {
        let auth = request
            .metadata()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_auth.lock().unwrap() = auth;
    }
}

pub struct MockCortex {
    state: Arc<CortexServerState>,
}

#[tonic::async_trait]
impl Cortex for MockCortex {
    async fn focus(
        &self,
        request: Request<state_pb::FocusRequest>,
    ) -> Result<Response<state_pb::FocusResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let mut flux = self.state.flux.lock().unwrap();
        let items = flux.entry(req.run_id).or_default();
        items.push(req.content);
        Ok(Response::new(state_pb::FocusResponse {
            id: format!("flux-{}", items.len()),
        }))
    }

    async fn drift(
        &self,
        request: Request<state_pb::DriftRequest>,
    ) -> Result<Response<state_pb::DriftResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let items = self
            .state
            .flux
            .lock()
            .unwrap()
            .get(&req.run_id)
            .cloned()
            .unwrap_or_default();
        Ok(Response::new(state_pb::DriftResponse { items }))
    }

    async fn commit(
        &self,
        request: Request<state_pb::Trace>,
    ) -> Result<Response<state_pb::CommitResponse>, Status> {
        self.state.note_auth(&request);
        self.state.traces.lock().unwrap().push(request.into_inner());
        Ok(Response::new(state_pb::CommitResponse { success: true }))
    }

    async fn reminisce(
        &self,
        request: Request<state_pb::RecallRequest>,
    ) -> Result<Response<state_pb::RecallResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let traces = self
            .state
            .traces
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.run_id == req.run_id)
            .filter(|t| req.query_text.is_empty() || t.input.contains(&req.query_text))
            .take(req.limit as usize)
            .cloned()
            .collect();
        Ok(Response::new(state_pb::RecallResponse { traces }))
    }

    async fn set_variable(
        &self,
        request: Request<state_pb::SetVariableRequest>,
    ) -> Result<Response<state_pb::SetVariableResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        self.state
            .variables
            .lock()
            .unwrap()
            .entry(req.run_id)
            .or_default()
            .insert(req.name, (req.value_json, req.source));
        Ok(Response::new(state_pb::SetVariableResponse { success: true }))
    }

    async fn get_variable(
        &self,
        request: Request<state_pb::GetVariableRequest>,
    ) -> Result<Response<state_pb::Variable>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let variables = self.state.variables.lock().unwrap();
        let (value_json, source) = variables
            .get(&req.run_id)
            .and_then(|vars| vars.get(&req.name))
            .cloned()
            .ok_or_else(|| Status::not_found(format!("variable {} not found", req.name)))?;
        Ok(Response::new(state_pb::Variable {
            name: req.name,
            value_json,
            source,
        }))
    }

    async fn list_variables(
        &self,
        request: Request<state_pb::ListVariablesRequest>,
    ) -> Result<Response<state_pb::ListVariablesResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let variables = self.state.variables.lock().unwrap();
        let mut listed: Vec<_> = variables
            .get(&req.run_id)
            .map(|vars| {
                vars.iter()
                    .map(|(name, (value_json, source))| state_pb::Variable {
                        name: name.clone(),
                        value_json: value_json.clone(),
                        source: source.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Response::new(state_pb::ListVariablesResponse {
            variables: listed,
        }))
    }

    async fn delete_variable(
        &self,
        request: Request<state_pb::DeleteVariableRequest>,
    ) -> Result<Response<state_pb::DeleteVariableResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let removed = self
            .state
            .variables
            .lock()
            .unwrap()
            .get_mut(&req.run_id)
            .and_then(|vars| vars.remove(&req.name))
            .is_some();
        Ok(Response::new(state_pb::DeleteVariableResponse {
            success: removed,
        }))
    }

    async fn trigger(
        &self,
        request: Request<state_pb::ReflexRequest>,
    ) -> Result<Response<state_pb::ReflexResponse>, Status> {
        self.state.note_auth(&request);
        Ok(Response::new(state_pb::ReflexResponse { result: 1 }))
    }

    async fn define_concept(
        &self,
        request: Request<state_pb::DefineConceptRequest>,
    ) -> Result<Response<state_pb::DefineConceptResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        self.state
            .concepts
            .lock()
            .unwrap()
            .insert(req.name, req.schema_json);
        Ok(Response::new(state_pb::DefineConceptResponse {
            success: true,
        }))
    }

    async fn list_concepts(
        &self,
        request: Request<state_pb::ListConceptsRequest>,
    ) -> Result<Response<state_pb::ListConceptsResponse>, Status> {
        self.state.note_auth(&request);
        let concepts = self.state.concepts.lock().unwrap();
        let mut listed: Vec<_> = concepts
            .iter()
            .map(|(name, schema_json)| state_pb::Concept {
                name: name.clone(),
                schema_json: schema_json.clone(),
            })
            .collect();
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Response::new(state_pb::ListConceptsResponse {
            concepts: listed,
        }))
    }

    async fn add_goal(
        &self,
        request: Request<state_pb::AddGoalRequest>,
    ) -> Result<Response<state_pb::Goal>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();

        let mut seq = self.state.goal_seq.lock().unwrap();
        *seq += 1;
        let goal = state_pb::Goal {
            id: format!("goal-{}", *seq),
            description: req.description,
            priority: req.priority,
            status: "active".to_string(),
            parent_id: req.parent_id,
            created_at: 1_700_000_000_000 + *seq as i64,
        };
        self.state
            .goals
            .lock()
            .unwrap()
            .insert(goal.id.clone(), goal.clone());
        Ok(Response::new(goal))
    }

    async fn update_goal(
        &self,
        request: Request<state_pb::UpdateGoalRequest>,
    ) -> Result<Response<state_pb::UpdateGoalResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let mut goals = self.state.goals.lock().unwrap();
        let success = match goals.get_mut(&req.goal_id) {
            Some(goal) => {
                goal.status = req.status;
                true
            }
            None => false,
        };
        Ok(Response::new(state_pb::UpdateGoalResponse { success }))
    }

    async fn list_goals(
        &self,
        request: Request<state_pb::ListGoalsRequest>,
    ) -> Result<Response<state_pb::ListGoalsResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let goals = self.state.goals.lock().unwrap();
        let mut listed: Vec<_> = goals
            .values()
            .filter(|g| req.status_filter.is_empty() || g.status == req.status_filter)
            .cloned()
            .collect();
        listed.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Response::new(state_pb::ListGoalsResponse { goals: listed }))
    }

    async fn submit_action(
        &self,
        request: Request<state_pb::ActionRequest>,
    ) -> Result<Response<state_pb::ActionResult>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();

        let mut actions = self.state.actions.lock().unwrap();
        let entries = actions.entry(req.run_id).or_default();
        let action_id = format!("act-{}", entries.len() + 1);
        entries.push(state_pb::ActionLogEntry {
            action_id: action_id.clone(),
            action_type: req.action_type,
            action_json: req.action_json,
            success: true,
            result_json: "{\"ok\":true}".to_string(),
            cycle_number: 0,
            timestamp: 1_700_000_000_000,
        });

        Ok(Response::new(state_pb::ActionResult {
            action_id,
            success: true,
            result_json: "{\"ok\":true}".to_string(),
            error: String::new(),
            duration_ms: 7,
        }))
    }

    async fn get_action_log(
        &self,
        request: Request<state_pb::ActionLogRequest>,
    ) -> Result<Response<state_pb::ActionLogResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let actions = self.state.actions.lock().unwrap();
        let entries = actions
            .get(&req.run_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| {
                        req.action_type_filter.is_empty()
                            || e.action_type == req.action_type_filter
                    })
                    .take(req.limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(Response::new(state_pb::ActionLogResponse { entries }))
    }

    async fn run_cycle(
        &self,
        request: Request<state_pb::RunCycleRequest>,
    ) -> Result<Response<state_pb::CycleRecord>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();

        let selected = req
            .candidates
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            .cloned();

        let mut cycles = self.state.cycles.lock().unwrap();
        let run_cycles = cycles.entry(req.run_id).or_default();
        let record = state_pb::CycleRecord {
            cycle_number: run_cycles.len() as u64 + 1,
            candidates: req.candidates,
            selected_action: selected,
            action_result: None,
            planning_time_ms: 5,
            execution_time_ms: 9,
            timestamp: 1_700_000_000_000,
        };
        run_cycles.push(record.clone());
        Ok(Response::new(record))
    }

    async fn get_cycle_history(
        &self,
        request: Request<state_pb::CycleHistoryRequest>,
    ) -> Result<Response<state_pb::CycleHistoryResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        let cycles = self
            .state
            .cycles
            .lock()
            .unwrap()
            .get(&req.run_id)
            .map(|cycles| cycles.iter().take(req.limit as usize).cloned().collect())
            .unwrap_or_default();
        Ok(Response::new(state_pb::CycleHistoryResponse { cycles }))
    }

    async fn delete_run(
        &self,
        request: Request<state_pb::RunRequest>,
    ) -> Result<Response<state_pb::DeleteRunResponse>, Status> {
        self.state.note_auth(&request);
        let req = request.into_inner();
        self.state.variables.lock().unwrap().remove(&req.run_id);
        self.state.flux.lock().unwrap().remove(&req.run_id);
        self.state.actions.lock().unwrap().remove(&req.run_id);
        self.state.cycles.lock().unwrap().remove(&req.run_id);
        self.state
            .traces
            .lock()
            .unwrap()
            .retain(|t| t.run_id != req.run_id);
        Ok(Response::new(state_pb::DeleteRunResponse { success: true }))
    }
}

/// Serve the Cortex mock on an ephemeral loopback port
pub async fn spawn_cortex() -> (u16, Arc<CortexServerState>) {
    let state = Arc::new(CortexServerState::default());
    let service = MockCortex {
        state: state.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(CortexServer::new(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (port, state)
}

/// Unique run id so tests sharing a mock never collide
pub fn test_run_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4())
}
