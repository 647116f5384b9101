//! Prioritize request/response payloads.
//!
//! Request: `{ "tasks": [ {task_id, completed, complexity, deadline, dependencies}, ... ] }`

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskrank_core::{RankError, RankedTask, RawTask, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizeResponse {
    pub tasks: Vec<RankedTask>,
}

/// Parse a request body into raw task records.
///
/// Shape problems (not JSON, no `tasks`, a field of the wrong type) are
/// [`RankError::InvalidInput`]; missing fields are left for feature extraction.
pub fn parse_prioritize_request(body: &str) -> Result<Vec<RawTask>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| RankError::invalid(format!("request is not valid JSON: {e}")))?;

    let tasks = match value.get("tasks") {
        None | Some(Value::Null) => return Err(RankError::invalid("No tasks provided")),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(RankError::invalid("'tasks' must be an array")),
    };

    tasks
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            RawTask::deserialize(item)
                .map_err(|e| RankError::invalid(format!("task #{idx}: {e}")))
        })
        .collect()
}
