//! Name-based tool dispatch for agent tool calls
//!
//! Maps a tool name plus a loosely-typed argument bag onto one
//! [`StateClient`] operation. The name set is closed: anything outside
//! it fails with [`EngramError::UnknownTool`] before any client call.
//! Each handler validates its own required arguments and applies the
//! same defaults the client operations document.

use crate::error::{EngramError, Result};
use crate::state::StateClient;
use crate::types::{ActionCandidate, CommitOptions, GoalPriority, GoalStatus, VariableSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// Every name the router recognizes
///
/// The vendor catalogs in [`crate::tools::catalog`] must stay in
/// lockstep with this set; a catalog entry missing here is a defect.
pub const TOOL_NAMES: &[&str] = &[
    "focus",
    "recall",
    "remember",
    "setVariable",
    "getVariable",
    "listVariables",
    "deleteVariable",
    "addGoal",
    "updateGoal",
    "listGoals",
    "submitAction",
    "getActionLog",
    "drift",
    "defineConcept",
    "listConcepts",
    "runCycle",
    "getCycleHistory",
    "trigger",
];

/// Outcome recorded when `remember` is invoked with bare content
const REMEMBER_DEFAULT_OUTCOME: &str = "Stored in long-term memory";

/// Default recall depth when a tool call does not specify one
const RECALL_DEFAULT_LIMIT: u32 = 5;
const ACTION_LOG_DEFAULT_LIMIT: u32 = 100;
const CYCLE_HISTORY_DEFAULT_LIMIT: u32 = 10;

/// Execute a tool call against the state client
///
/// Calls are independent and stateless apart from the client's run id;
/// concurrent calls against the same client may interleave freely — the
/// server, not this router, is the authority on ordering.
pub async fn execute(name: &str, args: &Value, state: &StateClient) -> Result<Value> {
    debug!(tool = name, "dispatching tool call");

    match name {
        "focus" => focus(args, state).await,
        "recall" => recall(args, state).await,
        "remember" => remember(args, state).await,
        "setVariable" => set_variable(args, state).await,
        "getVariable" => get_variable(args, state).await,
        "listVariables" => list_variables(state).await,
        "deleteVariable" => delete_variable(args, state).await,
        "addGoal" => add_goal(args, state).await,
        "updateGoal" => update_goal(args, state).await,
        "listGoals" => list_goals(args, state).await,
        "submitAction" => submit_action(args, state).await,
        "getActionLog" => get_action_log(args, state).await,
        "drift" => drift(state).await,
        "defineConcept" => define_concept(args, state).await,
        "listConcepts" => list_concepts(state).await,
        "runCycle" => run_cycle(args, state).await,
        "getCycleHistory" => get_cycle_history(args, state).await,
        "trigger" => trigger(args, state).await,
        _ => Err(EngramError::UnknownTool(name.to_string())),
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T> {
    serde_json::from_value(args.clone())
        .map_err(|err| EngramError::InvalidArgument(format!("{}: {}", tool, err)))
}

async fn focus(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct FocusArgs {
        content: String,
    }

    let args: FocusArgs = parse_args("focus", args)?;
    let id = state.focus(&args.content).await?;
    Ok(json!(id))
}

async fn recall(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct RecallArgs {
        query: String,
    }

    let args: RecallArgs = parse_args("recall", args)?;
    let traces = state
        .reminisce(&args.query, RECALL_DEFAULT_LIMIT, None)
        .await?;
    Ok(serde_json::to_value(traces)?)
}

/// Polymorphic over argument shape: bare `content` is the convenience
/// path with a fixed placeholder outcome; otherwise explicit
/// `input`/`outcome`/`action` fields are expected. Both paths reach the
/// same commit operation.
async fn remember(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct RememberArgs {
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        input: Option<String>,
        #[serde(default)]
        outcome: Option<String>,
        #[serde(default)]
        action: Option<String>,
    }

    let args: RememberArgs = parse_args("remember", args)?;
    let success = match args.content {
        Some(content) => {
            state
                .commit(
                    &content,
                    REMEMBER_DEFAULT_OUTCOME,
                    CommitOptions {
                        action: "remember".to_string(),
                        ..Default::default()
                    },
                )
                .await?
        }
        None => {
            state
                .commit(
                    args.input.as_deref().unwrap_or_default(),
                    args.outcome.as_deref().unwrap_or_default(),
                    CommitOptions {
                        action: args.action.unwrap_or_default(),
                        ..Default::default()
                    },
                )
                .await?
        }
    };
    Ok(json!(success))
}

async fn set_variable(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct SetVariableArgs {
        name: String,
        value: Value,
        #[serde(default)]
        source: Option<String>,
    }

    let args: SetVariableArgs = parse_args("setVariable", args)?;
    let source = match args.source.as_deref() {
        Some(source) => source.parse()?,
        None => VariableSource::Explicit,
    };
    let success = state.set_variable(&args.name, &args.value, source).await?;
    Ok(json!(success))
}

async fn get_variable(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct GetVariableArgs {
        name: String,
    }

    let args: GetVariableArgs = parse_args("getVariable", args)?;
    let variable = state.get_variable(&args.name).await?;
    Ok(serde_json::to_value(variable)?)
}

async fn list_variables(state: &StateClient) -> Result<Value> {
    let variables = state.list_variables().await?;
    Ok(serde_json::to_value(variables)?)
}

async fn delete_variable(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct DeleteVariableArgs {
        name: String,
    }

    let args: DeleteVariableArgs = parse_args("deleteVariable", args)?;
    let success = state.delete_variable(&args.name).await?;
    Ok(json!(success))
}

async fn add_goal(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct AddGoalArgs {
        description: String,
        #[serde(default)]
        priority: Option<String>,
        #[serde(default)]
        parent_id: Option<String>,
    }

    let args: AddGoalArgs = parse_args("addGoal", args)?;
    let priority = match args.priority.as_deref() {
        Some(priority) => priority.parse()?,
        None => GoalPriority::Medium,
    };
    let goal = state
        .add_goal(&args.description, priority, args.parent_id.as_deref())
        .await?;
    Ok(serde_json::to_value(goal)?)
}

async fn update_goal(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct UpdateGoalArgs {
        goal_id: String,
        status: String,
    }

    let args: UpdateGoalArgs = parse_args("updateGoal", args)?;
    let status: GoalStatus = args.status.parse()?;
    let success = state.update_goal(&args.goal_id, status).await?;
    Ok(json!(success))
}

async fn list_goals(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ListGoalsArgs {
        #[serde(default)]
        status_filter: Option<String>,
    }

    let args: ListGoalsArgs = parse_args("listGoals", args)?;
    let filter = args
        .status_filter
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<GoalStatus>)
        .transpose()?;
    let goals = state.list_goals(filter).await?;
    Ok(serde_json::to_value(goals)?)
}

async fn submit_action(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SubmitActionArgs {
        agent_id: String,
        action_type: String,
        action_details: Value,
    }

    let args: SubmitActionArgs = parse_args("submitAction", args)?;
    let action_type = args.action_type.parse()?;
    let outcome = state
        .submit_action(&args.agent_id, action_type, &args.action_details)
        .await?;
    Ok(serde_json::to_value(outcome)?)
}

async fn get_action_log(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct GetActionLogArgs {
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        action_type_filter: Option<String>,
    }

    let args: GetActionLogArgs = parse_args("getActionLog", args)?;
    let entries = state
        .get_action_log(
            args.limit.unwrap_or(ACTION_LOG_DEFAULT_LIMIT),
            args.action_type_filter.as_deref(),
        )
        .await?;
    Ok(serde_json::to_value(entries)?)
}

async fn drift(state: &StateClient) -> Result<Value> {
    let items = state.drift().await?;
    Ok(json!(items))
}

async fn define_concept(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct DefineConceptArgs {
        name: String,
        schema: Value,
    }

    let args: DefineConceptArgs = parse_args("defineConcept", args)?;
    let success = state.define_concept(&args.name, &args.schema).await?;
    Ok(json!(success))
}

async fn list_concepts(state: &StateClient) -> Result<Value> {
    let concepts = state.list_concepts().await?;
    Ok(serde_json::to_value(concepts)?)
}

async fn run_cycle(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RunCycleArgs {
        agent_id: String,
        #[serde(default)]
        candidates: Option<Vec<ActionCandidate>>,
    }

    let args: RunCycleArgs = parse_args("runCycle", args)?;
    let report = state
        .run_cycle(&args.agent_id, &args.candidates.unwrap_or_default())
        .await?;
    Ok(serde_json::to_value(report)?)
}

async fn get_cycle_history(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    struct GetCycleHistoryArgs {
        #[serde(default)]
        limit: Option<u32>,
    }

    let args: GetCycleHistoryArgs = parse_args("getCycleHistory", args)?;
    let cycles = state
        .get_cycle_history(args.limit.unwrap_or(CYCLE_HISTORY_DEFAULT_LIMIT))
        .await?;
    Ok(serde_json::to_value(cycles)?)
}

async fn trigger(args: &Value, state: &StateClient) -> Result<Value> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TriggerArgs {
        skill_name: String,
    }

    let args: TriggerArgs = parse_args("trigger", args)?;
    let result = state.trigger(&args.skill_name).await?;
    Ok(json!(result))
}
