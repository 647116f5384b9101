//! Member store documents.
//!
//! Two shapes are read: a full database export with the tree under a
//! `members` root, and the bare member map a REST read of `/members` returns.
//! A `null` tree (no members yet) is an empty map.

use std::collections::BTreeMap;

use serde::Deserialize;
use taskrank_core::{Member, RankError, Result};

#[derive(Debug, Deserialize)]
struct Export {
    #[serde(default)]
    members: Option<BTreeMap<String, Member>>,
}

pub fn parse_members_map(body: &str) -> Result<BTreeMap<String, Member>> {
    let members: Option<BTreeMap<String, Member>> = serde_json::from_str(body)
        .map_err(|e| RankError::upstream(format!("malformed members document: {e}")))?;
    Ok(members.unwrap_or_default())
}

pub fn parse_members_export(body: &str) -> Result<BTreeMap<String, Member>> {
    let export: Export = serde_json::from_str(body)
        .map_err(|e| RankError::upstream(format!("malformed members export: {e}")))?;
    Ok(export.members.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::aggregate_member;

    const EXPORT: &str = r#"{
        "members": {
            "ana@team,io": {
                "name": "Ana",
                "projects": {
                    "web": { "tasks": {
                        "a": { "status": true, "complextivity": 4,
                               "created_date": "2025-01-01", "completed_date": "2025-01-04", "due_date": "2025-01-05" }
                    }}
                }
            },
            "bo@team,io": { "name": "Bo", "email": "bo@team.io" }
        },
        "settings": { "ignored": true }
    }"#;

    #[test]
    fn reads_export_root() {
        let members = parse_members_export(EXPORT).unwrap();
        assert_eq!(members.len(), 2);
        let ana = &members["ana@team,io"];
        assert_eq!(ana.tasks().count(), 1);
        assert_eq!(ana.tasks().next().unwrap().complexity, 4);
        assert_eq!(members["bo@team,io"].email.as_deref(), Some("bo@team.io"));
    }

    #[test]
    fn null_trees_are_empty() {
        assert!(parse_members_map("null").unwrap().is_empty());
        assert!(parse_members_export("{}").unwrap().is_empty());
        assert!(parse_members_export(r#"{"members": null}"#).unwrap().is_empty());
    }

    #[test]
    fn one_badly_typed_task_does_not_reject_the_store() {
        let members = parse_members_map(
            r#"{
            "ana@team,io": { "name": "Ana", "projects": { "web": { "tasks": {
                "a": { "status": true, "created_date": 20250101,
                       "completed_date": "2025-01-04", "due_date": "2025-01-05" },
                "b": { "status": 1, "complexity": "4", "created_date": "2025-01-01",
                       "completed_date": "2025-01-03", "due_date": "2025-01-05" }
            }}}}
        }"#,
        )
        .unwrap();

        let stats = aggregate_member("ana@team,io", &members["ana@team,io"]);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.complexity_4, 1);
        assert_eq!(stats.skipped_records, 1);
        assert_eq!(stats.avg_completion_time, 2.0);
        assert_eq!(stats.on_time_rate, 0.5);
    }

    #[test]
    fn malformed_document_is_upstream_failure() {
        let err = parse_members_map(r#"{"x": {"projects": 5}}"#).unwrap_err();
        assert!(matches!(err, RankError::UpstreamUnavailable(_)));
        assert_eq!(err.status_code(), 500);
    }
}
