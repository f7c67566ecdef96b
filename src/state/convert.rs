//! Type conversions between Cortex wire messages and public types

use crate::error::Result;
use crate::proto::state as pb;
use crate::types::{
    ActionCandidate, ActionLogEntry, ActionOutcome, Concept, CycleReport, Goal, GoalPriority,
    GoalStatus, Trace, Variable, VariableSource,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Decode a wire field that optionally carries JSON
///
/// An empty string means "absent" and resolves to `None`; only
/// malformed-but-present JSON is an error.
pub(crate) fn decode_optional_json(raw: &str) -> Result<Option<Value>> {
    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(raw)?))
}

/// Encode an optional JSON value; absent becomes the empty object
pub(crate) fn encode_action_json(action: Option<&Value>) -> Result<String> {
    match action {
        Some(value) => Ok(serde_json::to_string(value)?),
        None => Ok("{}".to_string()),
    }
}

pub(crate) fn timestamp_from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
}

fn optional_string(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub(crate) fn variable_from_proto(v: pb::Variable) -> Result<Variable> {
    Ok(Variable {
        name: v.name,
        value: serde_json::from_str(&v.value_json)?,
        source: VariableSource::from_wire(&v.source),
    })
}

pub(crate) fn goal_from_proto(g: pb::Goal) -> Goal {
    Goal {
        id: g.id,
        description: g.description,
        priority: GoalPriority::from_wire(&g.priority),
        status: GoalStatus::from_wire(&g.status),
        parent_id: optional_string(g.parent_id),
        created_at: timestamp_from_millis(g.created_at),
    }
}

pub(crate) fn trace_from_proto(t: pb::Trace) -> Trace {
    Trace {
        input: t.input,
        outcome: t.outcome,
        action: t.action,
        agent_id: t.agent_id,
        embedding: t.embedding,
    }
}

pub(crate) fn concept_from_proto(c: pb::Concept) -> Result<Concept> {
    Ok(Concept {
        name: c.name,
        schema: serde_json::from_str(&c.schema_json)?,
    })
}

pub(crate) fn candidate_from_proto(c: pb::ActionCandidate) -> Result<ActionCandidate> {
    Ok(ActionCandidate {
        action_type: c.action_type,
        action: decode_optional_json(&c.action_json)?,
        score: c.score,
        rationale: c.rationale,
    })
}

pub(crate) fn candidate_to_proto(c: &ActionCandidate) -> Result<pb::ActionCandidate> {
    Ok(pb::ActionCandidate {
        action_type: c.action_type.clone(),
        action_json: encode_action_json(c.action.as_ref())?,
        score: c.score,
        rationale: c.rationale.clone(),
    })
}

pub(crate) fn action_result_from_proto(r: pb::ActionResult) -> Result<ActionOutcome> {
    Ok(ActionOutcome {
        action_id: r.action_id,
        success: r.success,
        result: decode_optional_json(&r.result_json)?,
        error: optional_string(r.error),
        duration_ms: r.duration_ms,
    })
}

pub(crate) fn log_entry_from_proto(e: pb::ActionLogEntry) -> Result<ActionLogEntry> {
    Ok(ActionLogEntry {
        action_id: e.action_id,
        action_type: e.action_type,
        action: decode_optional_json(&e.action_json)?,
        success: e.success,
        result: decode_optional_json(&e.result_json)?,
        cycle_number: e.cycle_number,
        timestamp: timestamp_from_millis(e.timestamp),
    })
}

pub(crate) fn cycle_from_proto(c: pb::CycleRecord) -> Result<CycleReport> {
    // Servers that predate proto3 optional semantics send present-but-empty
    // submessages; treat those as absent the same as a missing field.
    let selected_action = c
        .selected_action
        .filter(|sa| !sa.action_type.is_empty())
        .map(candidate_from_proto)
        .transpose()?;
    let action_result = c
        .action_result
        .filter(|ar| !ar.action_id.is_empty())
        .map(action_result_from_proto)
        .transpose()?;

    Ok(CycleReport {
        cycle_number: c.cycle_number,
        candidates: c
            .candidates
            .into_iter()
            .map(candidate_from_proto)
            .collect::<Result<Vec<_>>>()?,
        selected_action,
        action_result,
        planning_time_ms: c.planning_time_ms,
        execution_time_ms: c.execution_time_ms,
        timestamp: timestamp_from_millis(c.timestamp),
    })
}
