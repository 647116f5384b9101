//! Task records as they arrive in a prioritize request, and their derived features.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One task as submitted. Every field is optional here so that absence is
/// reported by validation rather than by the deserializer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub complexity: Option<i64>,
    #[serde(default)]
    pub deadline: Option<String>,
    /// Comma-separated ids. Anything that isn't a string means "no dependencies".
    #[serde(default)]
    pub dependencies: Option<Value>,
}

impl RawTask {
    pub fn new(task_id: impl Into<String>, completed: bool, complexity: i64, deadline: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            completed: Some(completed),
            complexity: Some(complexity),
            deadline: Some(deadline.into()),
            dependencies: None,
        }
    }

    pub fn with_dependencies(mut self, deps: impl Into<String>) -> Self {
        self.dependencies = Some(Value::String(deps.into()));
        self
    }
}

/// Validated task plus model features.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFeatures {
    pub task_id: String,
    pub completed: bool,
    pub complexity: i64,
    pub deadline: NaiveDateTime,
    pub dependencies: Vec<String>,

    /// Whole days until the deadline, clamped at 0.
    pub days_left: i64,
    /// 0 = completed, 1 = open.
    pub status_encoded: u8,
    /// Tasks this one depends on.
    pub dependency_count: usize,
    /// Tasks in the same batch that depend on this one.
    pub dependency_level: usize,
}

impl TaskFeatures {
    /// Priority model input, in [`crate::scoring::PRIORITY_FEATURES`] order.
    pub fn model_input(&self) -> [f64; 5] {
        [
            self.complexity as f64,
            self.days_left as f64,
            self.dependency_count as f64,
            f64::from(self.status_encoded),
            self.dependency_level as f64,
        ]
    }
}

pub fn status_encoded(completed: bool) -> u8 {
    if completed { 0 } else { 1 }
}
