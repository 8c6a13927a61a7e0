//! Wedge Detector: fetches per-source data for a contact and runs every wedge rule.
//!
//! Flow: concurrent reads (profile, recent posts, signals, GitHub) → rules → sort by score.
//! No caching: every call reads the current stored state.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::intel::config::PipelineConfig;
use crate::intel::wedge::WedgeDetection;
use crate::intel::wedge_rules::{self, WedgeContext};
use crate::store::{Stores, StoreResult};

#[derive(Clone)]
pub struct WedgeDetector {
    stores: Stores,
    config: PipelineConfig,
}

impl WedgeDetector {
    pub fn new(stores: Stores, config: PipelineConfig) -> Self {
        Self { stores, config }
    }

    pub async fn detect_wedges(&self, contact_id: Uuid) -> StoreResult<WedgeDetection> {
        self.detect_wedges_at(contact_id, Utc::now()).await
    }

    /// Same as `detect_wedges` with an explicit clock for recency calculations.
    pub async fn detect_wedges_at(
        &self,
        contact_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<WedgeDetection> {
        let (profile, posts, signals, github) = tokio::try_join!(
            self.stores.profiles.get_profile(contact_id),
            self.stores
                .profiles
                .get_recent_posts(contact_id, self.config.wedge_post_lookback),
            self.stores.signals.list(contact_id),
            self.stores.enrichment.get_github_activity(contact_id),
        )?;

        let ctx = WedgeContext {
            profile: profile.as_ref(),
            posts: &posts,
            signals: &signals,
            github: github.as_ref(),
            now,
        };
        let detection = detect(&ctx);

        match &detection.primary_wedge {
            Some(primary) => info!(
                "Detected {} wedges for contact {} (primary: {} at {:.2})",
                detection.wedge_count, contact_id, primary.wedge_type, primary.score
            ),
            None => info!("No wedges detected for contact {contact_id}"),
        }
        Ok(detection)
    }
}

/// Runs all rules over an already-assembled context and ranks the result.
pub fn detect(ctx: &WedgeContext<'_>) -> WedgeDetection {
    let candidates = wedge_rules::run_all(ctx);
    debug!(
        "Wedge rules emitted {} candidates from {} posts and {} signals",
        candidates.len(),
        ctx.posts.len(),
        ctx.signals.len()
    );
    WedgeDetection::from_candidates(candidates)
}
