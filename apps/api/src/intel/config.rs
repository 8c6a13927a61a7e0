use serde::{Deserialize, Serialize};

/// Weights of the signal composite score. Constant, never configurable per call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub relevance: f64,
    pub urgency: f64,
    pub wedge_potential: f64,
}

pub const COMPOSITE_WEIGHTS: CompositeWeights = CompositeWeights {
    relevance: 0.4,
    urgency: 0.3,
    wedge_potential: 0.3,
};

/// Immutable tunables shared by the scorer, detector and generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Added to the relevance of LinkedIn-sourced signals, clamped to 1.0.
    pub linkedin_boost: f64,
    /// Signals below this (boosted) relevance are dropped. Inclusive bound.
    pub min_relevance: f64,
    /// Posts the wedge detector looks back over.
    pub wedge_post_lookback: usize,
    /// Posts the playbook generator reads for LinkedIn context.
    pub playbook_post_limit: usize,
    /// Scored signals folded into a playbook.
    pub playbook_top_signals: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            linkedin_boost: 0.3,
            min_relevance: 0.5,
            wedge_post_lookback: 20,
            playbook_post_limit: 10,
            playbook_top_signals: 5,
        }
    }
}
