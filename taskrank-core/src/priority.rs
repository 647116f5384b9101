//! Priority ordering of a task batch.
//!
//! Ordering (all descending, single stable sort):
//! - status_encoded (open tasks first)
//! - predicted_priority
//! - dependency_level
//!
//! Tasks equal on all three keys keep their input order.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::features::extract_features;
use crate::scoring::{Scorer, finite_score};
use crate::task::{RawTask, TaskFeatures};
use crate::time::format_date;

/// Score forced onto completed tasks, below any score a model produces in practice.
pub const COMPLETED_SENTINEL: f64 = -9999.0;

/// One row of the prioritize response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTask {
    pub task_id: String,
    pub completed: bool,
    pub complexity: i64,
    /// `YYYY-MM-DD`.
    pub deadline: String,
    /// Ids joined with `", "`, empty when there are none.
    pub dependencies: String,
    pub days_left: i64,
    pub status_encoded: u8,
    pub dependency_count: usize,
    pub dependency_level: usize,
    pub predicted_priority: f64,
}

impl RankedTask {
    fn from_features(f: TaskFeatures, predicted_priority: f64) -> Self {
        Self {
            deadline: format_date(f.deadline),
            dependencies: f.dependencies.join(", "),
            task_id: f.task_id,
            completed: f.completed,
            complexity: f.complexity,
            days_left: f.days_left,
            status_encoded: f.status_encoded,
            dependency_count: f.dependency_count,
            dependency_level: f.dependency_level,
            predicted_priority,
        }
    }
}

fn priority_order(a: &RankedTask, b: &RankedTask) -> Ordering {
    b.status_encoded
        .cmp(&a.status_encoded)
        .then_with(|| b.predicted_priority.total_cmp(&a.predicted_priority))
        .then_with(|| b.dependency_level.cmp(&a.dependency_level))
}

/// Stable in-place sort by the priority keys.
pub fn sort_by_priority(tasks: &mut [RankedTask]) {
    tasks.sort_by(priority_order);
}

#[derive(Debug, Clone)]
pub struct PriorityRanker<S: Scorer> {
    scorer: S,
}

impl<S: Scorer> PriorityRanker<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Extract features from raw records and rank them.
    pub fn prioritize(&self, tasks: &[RawTask], now: NaiveDateTime) -> Result<Vec<RankedTask>> {
        let features = extract_features(tasks, now)?;
        self.rank(features)
    }

    /// Score every task, pin completed tasks to [`COMPLETED_SENTINEL`], and sort.
    ///
    /// The scorer sees completed tasks too; a failure on any row fails the batch.
    pub fn rank(&self, features: Vec<TaskFeatures>) -> Result<Vec<RankedTask>> {
        let mut ranked = Vec::with_capacity(features.len());
        for f in features {
            let mut score = finite_score(&self.scorer, &f.model_input())?;
            if f.completed {
                score = COMPLETED_SENTINEL;
            }
            ranked.push(RankedTask::from_features(f, score));
        }

        sort_by_priority(&mut ranked);
        debug!(tasks = ranked.len(), "ranked tasks by priority");
        Ok(ranked)
    }
}
