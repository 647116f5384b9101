//! Leaderboard scoring and competition ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::member::Member;
use crate::scoring::{Scorer, finite_score};
use crate::stats::{MemberStats, aggregate_all};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub email: String,
    pub score: f64,
    pub total_tasks: u32,
    pub on_time_rate: f64,
    pub complexity_4: u32,
    pub complexity_3: u32,
    pub rank: usize,
}

/// Two decimal places, halves to even (0.125 -> 0.12). Never returns `-0.0`.
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse::<f64>().unwrap_or(x) + 0.0
}

/// Competition ranking over entries already sorted by descending score:
/// scores [90, 90, 80] rank [1, 1, 3].
pub fn assign_competition_ranks(entries: &mut [LeaderboardEntry]) {
    let mut current_rank = 0;
    let mut prev_score: Option<f64> = None;

    for (idx, e) in entries.iter_mut().enumerate() {
        if prev_score != Some(e.score) {
            current_rank = idx + 1;
            prev_score = Some(e.score);
        }
        e.rank = current_rank;
    }
}

#[derive(Debug, Clone)]
pub struct LeaderboardRanker<S: Scorer> {
    scorer: S,
}

impl<S: Scorer> LeaderboardRanker<S> {
    pub fn new(scorer: S) -> Self {
        Self { scorer }
    }

    /// Members with no completed tasks score 0.0 without consulting the scorer.
    pub fn score(&self, stats: &MemberStats) -> Result<f64> {
        if stats.total_tasks == 0 {
            return Ok(0.0);
        }
        Ok(finite_score(&self.scorer, &stats.model_input())?)
    }

    /// Aggregate, score, sort and rank every member of the store.
    pub fn rank(&self, members: &BTreeMap<String, Member>) -> Result<Vec<LeaderboardEntry>> {
        let rows: Vec<(&str, &Member)> = members.iter().map(|(k, m)| (k.as_str(), m)).collect();
        let stats = aggregate_all(&rows);

        let mut entries = Vec::with_capacity(rows.len());
        for ((key, member), s) in rows.into_iter().zip(stats) {
            entries.push(LeaderboardEntry {
                name: member.display_name().to_string(),
                email: member.display_email(key),
                score: round2(self.score(&s)?),
                total_tasks: s.total_tasks,
                on_time_rate: round2(s.on_time_rate),
                complexity_4: s.complexity_4,
                complexity_3: s.complexity_3,
                rank: 0,
            });
        }

        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        assign_competition_ranks(&mut entries);
        debug!(members = entries.len(), "ranked leaderboard");
        Ok(entries)
    }
}
