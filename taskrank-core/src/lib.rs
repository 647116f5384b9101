//! taskrank-core: feature extraction, priority ordering and leaderboard ranking
//! for team task data.

pub mod error;
pub mod features;
pub mod graph;
pub mod leaderboard;
pub mod member;
pub mod priority;
pub mod scoring;
pub mod stats;
pub mod task;
pub mod time;

pub use error::{ErrorPayload, RankError, Result};
pub use features::{extract_features, normalize_dependencies};
pub use graph::DependencyGraph;
pub use leaderboard::{LeaderboardEntry, LeaderboardRanker, assign_competition_ranks, round2};
pub use member::{Member, MemberTask, Project};
pub use priority::{COMPLETED_SENTINEL, PriorityRanker, RankedTask, sort_by_priority};
pub use scoring::{LEADERBOARD_FEATURES, LinearModel, PRIORITY_FEATURES, Scorer, ScoringError};
pub use stats::{MemberStats, SkipReason, aggregate_all, aggregate_member};
pub use task::{RawTask, TaskFeatures};
