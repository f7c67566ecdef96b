//! Typed client for the Cortex agent cognition service

use crate::error::{EngramError, Result};
use crate::proto::state as pb;
use crate::proto::state::cortex_client::CortexClient;
use crate::state::convert::{
    action_result_from_proto, candidate_to_proto, concept_from_proto, cycle_from_proto,
    goal_from_proto, log_entry_from_proto, trace_from_proto, variable_from_proto,
};
use crate::types::{
    ActionCandidate, ActionLogEntry, ActionOutcome, ActionType, CommitOptions, Concept,
    CycleReport, Goal, GoalPriority, GoalStatus, Trace, Variable, VariableSource,
};
use serde_json::Value;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};
use tonic::Request;
use tracing::debug;

/// Client for Cortex: short-term memory (Flux), long-term memory
/// (Echoes), structured variables, goals, concepts, actions and
/// decision cycles.
///
/// Every call carries the client's run id; the server partitions all
/// state by it. The channel is lazy — the first RPC performs the actual
/// connection. The run id is mutable only through [`set_run_id`] and is
/// not synchronized against in-flight calls; a single instance is meant
/// for single-threaded mutation (see the crate docs).
///
/// [`set_run_id`]: StateClient::set_run_id
#[derive(Debug)]
pub struct StateClient {
    client: CortexClient<Channel>,
    auth: Option<MetadataValue<Ascii>>,
    run_id: String,
}

fn endpoint_uri(address: &str) -> String {
    if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    }
}

impl StateClient {
    /// Create a client for the Cortex service at `address`
    ///
    /// The token, when given, is attached verbatim as `authorization`
    /// metadata on every call.
    pub fn new(address: &str, token: Option<&str>, run_id: impl Into<String>) -> Result<Self> {
        let endpoint = Endpoint::from_shared(endpoint_uri(address))?;
        let channel = endpoint.connect_lazy();

        let auth = token
            .map(|t| {
                t.parse::<MetadataValue<Ascii>>().map_err(|_| {
                    EngramError::InvalidArgument("token is not valid header ASCII".to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            client: CortexClient::new(channel),
            auth,
            run_id: run_id.into(),
        })
    }

    /// The run id attached to every call
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Switch this client to a different run session
    pub fn set_run_id(&mut self, run_id: impl Into<String>) {
        self.run_id = run_id.into();
    }

    fn request<T>(&self, message: T) -> Request<T> {
        let mut request = Request::new(message);
        if let Some(auth) = &self.auth {
            request.metadata_mut().insert("authorization", auth.clone());
        }
        request
    }

    // === Flux (short-term working memory) ===

    /// Store one item in short-term working memory
    pub async fn focus(&self, content: &str) -> Result<String> {
        let mut client = self.client.clone();
        let res = client
            .focus(self.request(pb::FocusRequest {
                content: content.to_string(),
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        Ok(res.id)
    }

    /// Read all current short-term working-memory items
    pub async fn drift(&self) -> Result<Vec<String>> {
        let mut client = self.client.clone();
        let res = client
            .drift(self.request(pb::DriftRequest {
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        Ok(res.items)
    }

    // === Echoes (long-term memory) ===

    /// Store a long-term memory trace
    pub async fn commit(
        &self,
        input: &str,
        outcome: &str,
        options: CommitOptions,
    ) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .commit(self.request(pb::Trace {
                input: input.to_string(),
                outcome: outcome.to_string(),
                action: options.action,
                agent_id: options.agent_id,
                embedding: options.embedding.unwrap_or_default(),
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }

    /// Recall relevant traces from long-term memory
    pub async fn reminisce(
        &self,
        query: &str,
        limit: u32,
        filter: Option<&str>,
    ) -> Result<Vec<Trace>> {
        let mut client = self.client.clone();
        let res = client
            .reminisce(self.request(pb::RecallRequest {
                query_text: query.to_string(),
                limit,
                filter: filter.unwrap_or_default().to_string(),
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        Ok(res.traces.into_iter().map(trace_from_proto).collect())
    }

    // === Structured variables ===

    /// Set (or overwrite) a structured variable in working memory
    pub async fn set_variable(
        &self,
        name: &str,
        value: &Value,
        source: VariableSource,
    ) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .set_variable(self.request(pb::SetVariableRequest {
                run_id: self.run_id.clone(),
                name: name.to_string(),
                value_json: serde_json::to_string(value)?,
                source: source.as_str().to_string(),
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }

    pub async fn get_variable(&self, name: &str) -> Result<Variable> {
        let mut client = self.client.clone();
        let res = client
            .get_variable(self.request(pb::GetVariableRequest {
                run_id: self.run_id.clone(),
                name: name.to_string(),
            }))
            .await?
            .into_inner();
        variable_from_proto(res)
    }

    pub async fn list_variables(&self) -> Result<Vec<Variable>> {
        let mut client = self.client.clone();
        let res = client
            .list_variables(self.request(pb::ListVariablesRequest {
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        res.variables.into_iter().map(variable_from_proto).collect()
    }

    pub async fn delete_variable(&self, name: &str) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .delete_variable(self.request(pb::DeleteVariableRequest {
                run_id: self.run_id.clone(),
                name: name.to_string(),
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }

    // === Skills ===

    /// Trigger a registered skill or procedure by name
    pub async fn trigger(&self, skill_name: &str) -> Result<i32> {
        let mut client = self.client.clone();
        let res = client
            .trigger(self.request(pb::ReflexRequest {
                skill_name: skill_name.to_string(),
            }))
            .await?
            .into_inner();
        Ok(res.result)
    }

    // === Concepts ===

    /// Define a concept with a JSON schema
    pub async fn define_concept(&self, name: &str, schema: &Value) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .define_concept(self.request(pb::DefineConceptRequest {
                run_id: self.run_id.clone(),
                name: name.to_string(),
                schema_json: serde_json::to_string(schema)?,
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }

    pub async fn list_concepts(&self) -> Result<Vec<Concept>> {
        let mut client = self.client.clone();
        let res = client
            .list_concepts(self.request(pb::ListConceptsRequest {
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        res.concepts.into_iter().map(concept_from_proto).collect()
    }

    // === Goals ===

    /// Add a goal to the agent's goal stack
    pub async fn add_goal(
        &self,
        description: &str,
        priority: GoalPriority,
        parent_id: Option<&str>,
    ) -> Result<Goal> {
        let mut client = self.client.clone();
        let res = client
            .add_goal(self.request(pb::AddGoalRequest {
                run_id: self.run_id.clone(),
                description: description.to_string(),
                priority: priority.as_str().to_string(),
                parent_id: parent_id.unwrap_or_default().to_string(),
            }))
            .await?
            .into_inner();
        Ok(goal_from_proto(res))
    }

    pub async fn update_goal(&self, goal_id: &str, status: GoalStatus) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .update_goal(self.request(pb::UpdateGoalRequest {
                run_id: self.run_id.clone(),
                goal_id: goal_id.to_string(),
                status: status.as_str().to_string(),
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }

    /// List goals, optionally filtered by status
    pub async fn list_goals(&self, status_filter: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let mut client = self.client.clone();
        let res = client
            .list_goals(self.request(pb::ListGoalsRequest {
                run_id: self.run_id.clone(),
                status_filter: status_filter.map(|s| s.as_str().to_string()).unwrap_or_default(),
            }))
            .await?
            .into_inner();
        Ok(res.goals.into_iter().map(goal_from_proto).collect())
    }

    // === Actions and decision cycles ===

    /// Submit an action for execution and logging
    pub async fn submit_action(
        &self,
        agent_id: &str,
        action_type: ActionType,
        details: &Value,
    ) -> Result<ActionOutcome> {
        let mut client = self.client.clone();
        let res = client
            .submit_action(self.request(pb::ActionRequest {
                run_id: self.run_id.clone(),
                agent_id: agent_id.to_string(),
                action_type: action_type.as_str().to_string(),
                action_json: serde_json::to_string(details)?,
            }))
            .await?
            .into_inner();
        action_result_from_proto(res)
    }

    /// Fetch the action log for the current run
    pub async fn get_action_log(
        &self,
        limit: u32,
        action_type_filter: Option<&str>,
    ) -> Result<Vec<ActionLogEntry>> {
        let mut client = self.client.clone();
        let res = client
            .get_action_log(self.request(pb::ActionLogRequest {
                run_id: self.run_id.clone(),
                limit,
                action_type_filter: action_type_filter.unwrap_or_default().to_string(),
            }))
            .await?
            .into_inner();
        res.entries.into_iter().map(log_entry_from_proto).collect()
    }

    /// Run one decision cycle
    ///
    /// When `candidates` is empty an empty sequence is sent and the
    /// server generates its own candidates; this client makes no
    /// default-candidate decisions.
    pub async fn run_cycle(
        &self,
        agent_id: &str,
        candidates: &[ActionCandidate],
    ) -> Result<CycleReport> {
        let proto_candidates = candidates
            .iter()
            .map(candidate_to_proto)
            .collect::<Result<Vec<_>>>()?;
        debug!(agent_id, candidates = proto_candidates.len(), "running decision cycle");

        let mut client = self.client.clone();
        let res = client
            .run_cycle(self.request(pb::RunCycleRequest {
                run_id: self.run_id.clone(),
                agent_id: agent_id.to_string(),
                candidates: proto_candidates,
            }))
            .await?
            .into_inner();
        cycle_from_proto(res)
    }

    pub async fn get_cycle_history(&self, limit: u32) -> Result<Vec<CycleReport>> {
        let mut client = self.client.clone();
        let res = client
            .get_cycle_history(self.request(pb::CycleHistoryRequest {
                run_id: self.run_id.clone(),
                limit,
            }))
            .await?
            .into_inner();
        res.cycles.into_iter().map(cycle_from_proto).collect()
    }

    // === Run lifecycle ===

    /// Delete all state scoped to the current run
    pub async fn delete_run(&self) -> Result<bool> {
        let mut client = self.client.clone();
        let res = client
            .delete_run(self.request(pb::RunRequest {
                run_id: self.run_id.clone(),
            }))
            .await?
            .into_inner();
        Ok(res.success)
    }
}
