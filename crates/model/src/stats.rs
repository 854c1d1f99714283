use crate::Completion;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Aggregate view over every completion of a quiz.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_completions: usize,
    /// Arithmetic mean of all scores. Zero when nobody has played yet.
    pub average_score: f64,
    /// Every completion in storage order.
    pub completions: Vec<Completion>,
}

impl From<Vec<Completion>> for Stats {
    fn from(completions: Vec<Completion>) -> Self {
        let total_completions = completions.len();
        let average_score = if total_completions == 0 {
            0.0
        } else {
            let sum: u64 = completions.iter().map(|c| u64::from(c.score)).sum();
            sum as f64 / total_completions as f64
        };
        Self { total_completions, average_score, completions }
    }
}
