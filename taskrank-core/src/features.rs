//! Raw task records -> validated feature table.
//!
//! The batch is all-or-nothing: the first record with a missing field or an
//! unparseable deadline rejects the request with [`RankError::InvalidInput`].

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::debug;

use crate::error::{RankError, Result};
use crate::graph::DependencyGraph;
use crate::task::{RawTask, TaskFeatures, status_encoded};
use crate::time::{days_left, parse_deadline};

/// Split a dependency field into ids.
///
/// Non-string values (absent, null, numbers, arrays) yield no dependencies.
/// Empty tokens are dropped, so `""` and `"T1,,T2"` count 0 and 2 entries.
/// Tokens are not trimmed.
pub fn normalize_dependencies(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Validate `tasks` and derive features relative to `now`. Output order
/// matches input order.
pub fn extract_features(tasks: &[RawTask], now: NaiveDateTime) -> Result<Vec<TaskFeatures>> {
    let mut out = Vec::with_capacity(tasks.len());

    for (idx, raw) in tasks.iter().enumerate() {
        let task_id = raw
            .task_id
            .clone()
            .ok_or_else(|| RankError::invalid(format!("task #{idx}: missing task_id")))?;
        let completed = raw
            .completed
            .ok_or_else(|| RankError::invalid(format!("task {task_id}: missing completed")))?;
        let complexity = raw
            .complexity
            .ok_or_else(|| RankError::invalid(format!("task {task_id}: missing complexity")))?;
        let deadline_raw = raw
            .deadline
            .as_deref()
            .ok_or_else(|| RankError::invalid(format!("task {task_id}: missing deadline")))?;
        let deadline = parse_deadline(deadline_raw).ok_or_else(|| {
            RankError::invalid(format!(
                "Invalid deadline format: task {task_id} has deadline '{deadline_raw}'"
            ))
        })?;

        let dependencies = normalize_dependencies(raw.dependencies.as_ref());

        out.push(TaskFeatures {
            task_id,
            completed,
            complexity,
            deadline,
            days_left: days_left(deadline, now),
            status_encoded: status_encoded(completed),
            dependency_count: dependencies.len(),
            dependencies,
            dependency_level: 0,
        });
    }

    let graph = DependencyGraph::build(
        out.iter()
            .map(|t| (t.task_id.as_str(), t.dependencies.as_slice())),
    );
    let levels: Vec<usize> = out
        .iter()
        .map(|t| graph.dependency_level(&t.task_id))
        .collect();
    for (t, level) in out.iter_mut().zip(levels) {
        t.dependency_level = level;
    }

    debug!(
        tasks = out.len(),
        edges = graph.edge_count(),
        "extracted task features"
    );
    Ok(out)
}
