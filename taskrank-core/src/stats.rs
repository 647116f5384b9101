//! Per-member performance statistics.
//!
//! Only completed tasks count. A completed task whose dates are missing or
//! unparseable still counts toward `total_tasks` and the complexity buckets,
//! but is left out of the completion-time mean and the on-time numerator.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::member::{Member, MemberTask};
use crate::time::parse_record_date;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemberStats {
    pub total_tasks: u32,
    pub complexity_4: u32,
    pub complexity_3: u32,
    /// Mean of completed - created, in days.
    pub avg_completion_time: f64,
    pub on_time_rate: f64,
    /// Completed tasks excluded from the date statistics.
    pub skipped_records: u32,
}

impl MemberStats {
    /// Leaderboard model input, in [`crate::scoring::LEADERBOARD_FEATURES`] order.
    pub fn model_input(&self) -> [f64; 5] {
        [
            f64::from(self.total_tasks),
            f64::from(self.complexity_4),
            f64::from(self.complexity_3),
            self.avg_completion_time,
            self.on_time_rate,
        ]
    }
}

/// Why a completed task was left out of the date statistics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("unparseable {field} '{value}'")]
    Unparseable { field: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TaskDates {
    created: NaiveDate,
    completed: NaiveDate,
    due: NaiveDate,
}

fn parse_field(field: &'static str, raw: Option<&str>) -> Result<NaiveDate, SkipReason> {
    let raw = raw.ok_or(SkipReason::Missing(field))?;
    parse_record_date(raw).map_err(|_| SkipReason::Unparseable {
        field,
        value: raw.to_string(),
    })
}

fn task_dates(task: &MemberTask) -> Result<TaskDates, SkipReason> {
    Ok(TaskDates {
        created: parse_field("created_date", task.created_date.as_deref())?,
        completed: parse_field("completed_date", task.completed_date.as_deref())?,
        due: parse_field("due_date", task.due_date.as_deref())?,
    })
}

/// Aggregate one member's history. `key` is only used for diagnostics.
pub fn aggregate_member(key: &str, member: &Member) -> MemberStats {
    let mut stats = MemberStats::default();
    let mut completion_days: Vec<i64> = Vec::new();
    let mut on_time = 0u32;

    for task in member.tasks().filter(|t| t.status) {
        stats.total_tasks += 1;
        match task.complexity {
            4 => stats.complexity_4 += 1,
            3 => stats.complexity_3 += 1,
            _ => {}
        }

        let dates = match task_dates(task) {
            Ok(d) => d,
            Err(reason) => {
                warn!(member = key, %reason, "skipping task in member stats");
                stats.skipped_records += 1;
                continue;
            }
        };

        completion_days.push((dates.completed - dates.created).num_days());
        if dates.completed <= dates.due {
            on_time += 1;
        }
    }

    if !completion_days.is_empty() {
        stats.avg_completion_time =
            completion_days.iter().sum::<i64>() as f64 / completion_days.len() as f64;
    }
    if stats.total_tasks > 0 {
        stats.on_time_rate = f64::from(on_time) / f64::from(stats.total_tasks);
    }
    stats
}

/// Aggregate many members in parallel; output order matches input order.
pub fn aggregate_all(members: &[(&str, &Member)]) -> Vec<MemberStats> {
    members
        .par_iter()
        .map(|(key, member)| aggregate_member(key, member))
        .collect()
}
