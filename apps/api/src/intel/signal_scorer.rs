//! Signal Scorer: read-time boost, composite scoring and ranking of stored signals.
//!
//! Algorithm:
//! 1. LinkedIn content/profile-change/activity signals get `linkedin_boost` added to
//!    relevance, clamped to 1.0
//! 2. composite = 0.4·relevance + 0.3·urgency + 0.3·wedge_potential (boosted relevance)
//! 3. Drop signals whose relevance is below `min_relevance` (inclusive bound)
//! 4. Sort descending by composite; ties go to the most recently detected signal
//!
//! Stored signals are never touched. The boosted view exists only in the output.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::intel::config::{PipelineConfig, COMPOSITE_WEIGHTS};
use crate::models::signal::Signal;
use crate::store::{SignalStore, StoreResult};

/// A signal as seen by the ranking: relevance is the boosted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSignal {
    #[serde(flatten)]
    pub signal: Signal,
    pub original_relevance: f64,
    pub boosted: bool,
    pub composite_score: f64,
}

pub fn composite_score(relevance: f64, urgency: f64, wedge_potential: f64) -> f64 {
    COMPOSITE_WEIGHTS.relevance * relevance
        + COMPOSITE_WEIGHTS.urgency * urgency
        + COMPOSITE_WEIGHTS.wedge_potential * wedge_potential
}

/// Applies the boost and composite score to one signal.
pub fn score_signal(signal: Signal, config: &PipelineConfig) -> ScoredSignal {
    let original_relevance = signal.relevance_score;
    let boosted = signal.source_type.is_boosted();
    let relevance = if boosted {
        (original_relevance + config.linkedin_boost).min(1.0)
    } else {
        original_relevance
    };
    let composite_score = composite_score(relevance, signal.urgency_score, signal.wedge_potential);

    ScoredSignal {
        signal: Signal {
            relevance_score: relevance,
            ..signal
        },
        original_relevance,
        boosted,
        composite_score,
    }
}

/// Scores, filters and ranks a batch of signals.
pub fn prioritize(signals: Vec<Signal>, config: &PipelineConfig) -> Vec<ScoredSignal> {
    let mut scored: Vec<ScoredSignal> = signals
        .into_iter()
        .map(|s| score_signal(s, config))
        .filter(|s| s.signal.relevance_score >= config.min_relevance)
        .collect();

    scored.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.signal.detected_at.cmp(&a.signal.detected_at))
    });
    scored
}

/// Store-backed scorer. Cheap to clone.
#[derive(Clone)]
pub struct SignalScorer {
    signals: Arc<dyn SignalStore>,
    config: PipelineConfig,
}

impl SignalScorer {
    pub fn new(signals: Arc<dyn SignalStore>, config: PipelineConfig) -> Self {
        Self { signals, config }
    }

    pub async fn score_and_prioritize(&self, contact_id: Uuid) -> StoreResult<Vec<ScoredSignal>> {
        let signals = self.signals.list(contact_id).await?;
        let total = signals.len();
        let ranked = prioritize(signals, &self.config);
        debug!(
            "Scored {} signals for contact {} ({} above threshold)",
            total,
            contact_id,
            ranked.len()
        );
        Ok(ranked)
    }

    pub async fn get_top_signals(
        &self,
        contact_id: Uuid,
        n: usize,
    ) -> StoreResult<Vec<ScoredSignal>> {
        let mut ranked = self.score_and_prioritize(contact_id).await?;
        ranked.truncate(n);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::signal::{SignalCategory, SourceType};
    use crate::store::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use serde_json::Value;

    fn make_signal(source_type: SourceType, relevance: f64, urgency: f64, wedge: f64) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            source_type,
            category: SignalCategory::ThoughtLeadership,
            relevance_score: relevance,
            urgency_score: urgency,
            wedge_potential: wedge,
            description: "signal".to_string(),
            raw_data: Value::Null,
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn test_boost_clamps_to_one() {
        let config = PipelineConfig::default();
        let scored = score_signal(make_signal(SourceType::LinkedinContent, 0.9, 0.5, 0.5), &config);
        assert_eq!(scored.signal.relevance_score, 1.0);
        assert!(scored.boosted);
        assert_eq!(scored.original_relevance, 0.9);
    }

    #[test]
    fn test_non_linkedin_source_not_boosted() {
        let config = PipelineConfig::default();
        let scored = score_signal(make_signal(SourceType::GithubActivity, 0.6, 0.5, 0.5), &config);
        assert_eq!(scored.signal.relevance_score, 0.6);
        assert!(!scored.boosted);
    }

    #[test]
    fn test_linkedin_profile_source_not_boosted() {
        let config = PipelineConfig::default();
        let scored = score_signal(make_signal(SourceType::LinkedinProfile, 0.6, 0.5, 0.5), &config);
        assert!(!scored.boosted);
    }

    #[test]
    fn test_composite_uses_boosted_relevance() {
        let config = PipelineConfig::default();
        let scored = score_signal(
            make_signal(SourceType::LinkedinActivity, 0.5, 0.6, 0.2),
            &config,
        );
        // 0.4*0.8 + 0.3*0.6 + 0.3*0.2 = 0.32 + 0.18 + 0.06 = 0.56
        assert!((scored.composite_score - 0.56).abs() < 1e-9, "got {}", scored.composite_score);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let config = PipelineConfig::default();
        let below = make_signal(SourceType::CompanyHiring, 0.49, 0.9, 0.9);
        let at = make_signal(SourceType::CompanyHiring, 0.50, 0.1, 0.1);
        let below_id = below.id;
        let at_id = at.id;

        let ranked = prioritize(vec![below, at], &config);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].signal.id, at_id);
        assert!(ranked.iter().all(|s| s.signal.id != below_id));
    }

    #[test]
    fn test_boost_can_lift_signal_over_threshold() {
        let config = PipelineConfig::default();
        let ranked = prioritize(
            vec![make_signal(SourceType::LinkedinProfileChange, 0.2, 0.1, 0.1)],
            &config,
        );
        assert_eq!(ranked.len(), 1, "0.2 + 0.3 boost reaches the 0.5 threshold");
    }

    #[test]
    fn test_sorted_descending_by_composite() {
        let config = PipelineConfig::default();
        // composite with relevance=urgency=wedge=x is exactly x
        let ranked = prioritize(
            vec![
                make_signal(SourceType::CompanyHiring, 0.9, 0.9, 0.9),
                make_signal(SourceType::CompanyHiring, 1.0, 0.0, 0.0),
                make_signal(SourceType::CompanyHiring, 0.6, 0.6, 0.6),
            ],
            &PipelineConfig {
                min_relevance: 0.0,
                ..config
            },
        );
        let composites: Vec<f64> = ranked.iter().map(|s| s.composite_score).collect();
        assert!((composites[0] - 0.9).abs() < 1e-9);
        assert!((composites[1] - 0.6).abs() < 1e-9);
        assert!((composites[2] - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_ties_prefer_most_recent() {
        let config = PipelineConfig::default();
        let mut older = make_signal(SourceType::CompanyHiring, 0.7, 0.7, 0.7);
        older.detected_at = Utc::now() - Duration::days(3);
        let newer = make_signal(SourceType::CompanyHiring, 0.7, 0.7, 0.7);
        let newer_id = newer.id;

        let ranked = prioritize(vec![older, newer], &config);
        assert_eq!(ranked[0].signal.id, newer_id);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(prioritize(vec![], &PipelineConfig::default()).is_empty());
    }

    #[tokio::test]
    async fn test_scoring_is_idempotent_and_does_not_mutate_store() {
        let store = Arc::new(MemoryStore::new());
        let contact_id = Uuid::new_v4();
        for (source, relevance) in [
            (SourceType::LinkedinContent, 0.8),
            (SourceType::CompanyHiring, 0.6),
            (SourceType::GithubActivity, 0.7),
        ] {
            let mut signal = make_signal(source, relevance, 0.5, 0.5);
            signal.contact_id = contact_id;
            store.put_signal(signal).await;
        }

        let scorer = SignalScorer::new(store.clone(), PipelineConfig::default());
        let first = scorer.score_and_prioritize(contact_id).await.unwrap();
        let second = scorer.score_and_prioritize(contact_id).await.unwrap();
        assert_eq!(first, second);

        let stored = store.list(contact_id).await.unwrap();
        let linkedin = stored
            .iter()
            .find(|s| s.source_type == SourceType::LinkedinContent)
            .unwrap();
        assert_eq!(linkedin.relevance_score, 0.8, "stored relevance must stay unboosted");
    }

    #[tokio::test]
    async fn test_get_top_signals_truncates() {
        let store = Arc::new(MemoryStore::new());
        let contact_id = Uuid::new_v4();
        for i in 0..4 {
            let mut signal = make_signal(SourceType::CompanyHiring, 0.6 + i as f64 * 0.1, 0.5, 0.5);
            signal.contact_id = contact_id;
            store.put_signal(signal).await;
        }
        let scorer = SignalScorer::new(store, PipelineConfig::default());
        let top = scorer.get_top_signals(contact_id, 2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert!(top[0].composite_score >= top[1].composite_score);
    }

    #[tokio::test]
    async fn test_zero_signals_is_not_an_error() {
        let scorer = SignalScorer::new(Arc::new(MemoryStore::new()), PipelineConfig::default());
        assert!(scorer.score_and_prioritize(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
