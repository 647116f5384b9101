//! Member -> Project -> Task history, as held by the member store.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
}

impl Member {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Store keys encode `.` as `,`; fall back to the decoded key.
    pub fn display_email(&self, key: &str) -> String {
        match &self.email {
            Some(email) => email.clone(),
            None => key.replace(',', "."),
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &MemberTask> {
        self.projects.values().flat_map(|p| p.tasks.values())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tasks: BTreeMap<String, MemberTask>,
}

/// Store data is hand-edited, so field types are read leniently: a badly
/// typed value never rejects the document. Date problems surface later as
/// per-task skips in [`crate::stats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberTask {
    /// Completed when truthy (`true`, non-zero, non-empty).
    #[serde(default, deserialize_with = "truthy")]
    pub status: bool,
    #[serde(
        default = "default_complexity",
        alias = "complextivity",
        deserialize_with = "lenient_complexity"
    )]
    pub complexity: i64,
    #[serde(default, deserialize_with = "date_text")]
    pub created_date: Option<String>,
    #[serde(default, deserialize_with = "date_text")]
    pub completed_date: Option<String>,
    #[serde(default, deserialize_with = "date_text")]
    pub due_date: Option<String>,
}

fn default_complexity() -> i64 {
    1
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}

/// Integers, integral floats and numeric strings; anything else is the default.
fn lenient_complexity<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let level = match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|x| x.fract() == 0.0).map(|x| x as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(level.unwrap_or_else(default_complexity))
}

/// Non-string dates keep their JSON text so they fail date parsing per task.
fn date_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

impl Default for MemberTask {
    fn default() -> Self {
        Self {
            status: false,
            complexity: default_complexity(),
            created_date: None,
            completed_date: None,
            due_date: None,
        }
    }
}

impl MemberTask {
    pub fn completed(created: &str, completed: &str, due: &str) -> Self {
        Self {
            status: true,
            created_date: Some(created.to_string()),
            completed_date: Some(completed.to_string()),
            due_date: Some(due.to_string()),
            ..Self::default()
        }
    }

    pub fn with_complexity(mut self, complexity: i64) -> Self {
        self.complexity = complexity;
        self
    }
}
