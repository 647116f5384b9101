//! Scorer capability: an opaque model invoked with a fixed-shape feature vector.
//!
//! Rankers only depend on [`Scorer`]. Closures `Fn(&[f64]) -> f64` implement it,
//! and [`LinearModel`] is a config-loadable implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column order of the priority model input.
pub const PRIORITY_FEATURES: [&str; 5] = [
    "complexity",
    "days_left",
    "dependency_count",
    "status_encoded",
    "dependency_level",
];

/// Column order of the leaderboard model input.
pub const LEADERBOARD_FEATURES: [&str; 5] = [
    "total_tasks",
    "complexity_4",
    "complexity_3",
    "avg_completion_time",
    "on_time_rate",
];

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("feature shape mismatch: expected {expected} values, got {got}")]
    Shape { expected: usize, got: usize },

    #[error("model produced a non-finite score ({0})")]
    NonFinite(f64),

    #[error("{0}")]
    Model(String),
}

pub trait Scorer: Send + Sync {
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError>;
}

impl<F> Scorer for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError> {
        Ok(self(features))
    }
}

/// Score and reject NaN / infinity, which would poison the ordering.
/// `-0.0` is folded into `0.0` so equal scores compare equal.
pub(crate) fn finite_score<S: Scorer + ?Sized>(
    scorer: &S,
    features: &[f64],
) -> Result<f64, ScoringError> {
    let s = scorer.score(features)?;
    if s.is_finite() {
        Ok(s + 0.0)
    } else {
        Err(ScoringError::NonFinite(s))
    }
}

/// `intercept + Σ weights[i] * features[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }
}

impl Scorer for LinearModel {
    fn score(&self, features: &[f64]) -> Result<f64, ScoringError> {
        if features.len() != self.weights.len() {
            return Err(ScoringError::Shape {
                expected: self.weights.len(),
                got: features.len(),
            });
        }
        Ok(self.intercept
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>())
    }
}
