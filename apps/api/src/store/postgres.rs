use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::playbook::{Playbook, PlaybookRow};
use crate::models::prospect::{Contact, GithubActivity, LinkedinProfile, Post, SpeakingEngagement};
use crate::models::signal::{Signal, SignalRow};
use crate::store::{
    ContactStore, EnrichmentStore, PlaybookStore, ProfileStore, SignalStore, StoreResult,
};

/// PostgreSQL-backed implementation of every storage contract.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgStore {
    async fn get_contact(&self, contact_id: Uuid) -> StoreResult<Option<Contact>> {
        Ok(
            sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
                .bind(contact_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl SignalStore for PgStore {
    async fn insert(&self, signal: Signal) -> StoreResult<Signal> {
        sqlx::query(
            r#"
            INSERT INTO signals
                (id, contact_id, source_type, category, relevance_score, urgency_score,
                 wedge_potential, description, raw_data, detected_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(signal.id)
        .bind(signal.contact_id)
        .bind(signal.source_type.as_str())
        .bind(signal.category.as_str())
        .bind(signal.relevance_score)
        .bind(signal.urgency_score)
        .bind(signal.wedge_potential)
        .bind(&signal.description)
        .bind(&signal.raw_data)
        .bind(signal.detected_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Inserted {} signal {} for contact {}",
            signal.source_type, signal.id, signal.contact_id
        );
        Ok(signal)
    }

    async fn list(&self, contact_id: Uuid) -> StoreResult<Vec<Signal>> {
        let rows = sqlx::query_as::<_, SignalRow>(
            "SELECT * FROM signals WHERE contact_id = $1 ORDER BY detected_at DESC",
        )
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Signal::try_from).collect()
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, contact_id: Uuid) -> StoreResult<Option<LinkedinProfile>> {
        Ok(sqlx::query_as::<_, LinkedinProfile>(
            "SELECT * FROM linkedin_profiles WHERE contact_id = $1",
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn get_recent_posts(&self, contact_id: Uuid, limit: usize) -> StoreResult<Vec<Post>> {
        Ok(sqlx::query_as::<_, Post>(
            "SELECT * FROM linkedin_posts WHERE contact_id = $1 ORDER BY posted_at DESC LIMIT $2",
        )
        .bind(contact_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert_post(&self, post: Post) -> StoreResult<Post> {
        sqlx::query(
            r#"
            INSERT INTO linkedin_posts
                (id, contact_id, post_url, content, posted_at, engagement_count, topics,
                 key_themes, sentiment_score, mentions_pain_points, mentions_buying_signals)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(post.id)
        .bind(post.contact_id)
        .bind(&post.post_url)
        .bind(&post.content)
        .bind(post.posted_at)
        .bind(post.engagement_count)
        .bind(&post.topics)
        .bind(&post.key_themes)
        .bind(post.sentiment_score)
        .bind(post.mentions_pain_points)
        .bind(post.mentions_buying_signals)
        .execute(&self.pool)
        .await?;

        Ok(post)
    }
}

#[async_trait]
impl EnrichmentStore for PgStore {
    async fn get_github_activity(&self, contact_id: Uuid) -> StoreResult<Option<GithubActivity>> {
        Ok(sqlx::query_as::<_, GithubActivity>(
            "SELECT * FROM github_activity WHERE contact_id = $1",
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_speaking_engagements(
        &self,
        contact_id: Uuid,
    ) -> StoreResult<Vec<SpeakingEngagement>> {
        Ok(sqlx::query_as::<_, SpeakingEngagement>(
            r#"
            SELECT * FROM speaking_engagements
            WHERE contact_id = $1
            ORDER BY event_date DESC NULLS LAST
            "#,
        )
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

#[async_trait]
impl PlaybookStore for PgStore {
    async fn save(&self, playbook: Playbook) -> StoreResult<Playbook> {
        sqlx::query(
            r#"
            INSERT INTO playbooks
                (id, contact_id, primary_wedge, primary_wedge_type, wedge_score,
                 supporting_evidence, personalization_hooks, timing_rationale,
                 recommended_channels, sample_outreach, competitive_context,
                 conversation_starters, linkedin_context, research_snapshot, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(playbook.id)
        .bind(playbook.contact_id)
        .bind(&playbook.primary_wedge)
        .bind(&playbook.primary_wedge_type)
        .bind(playbook.wedge_score)
        .bind(&playbook.supporting_evidence)
        .bind(&playbook.personalization_hooks)
        .bind(&playbook.timing_rationale)
        .bind(Json(&playbook.recommended_channels))
        .bind(&playbook.sample_outreach)
        .bind(&playbook.competitive_context)
        .bind(&playbook.conversation_starters)
        .bind(Json(&playbook.linkedin_context))
        .bind(&playbook.research_snapshot)
        .bind(playbook.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            "Saved playbook {} for contact {}",
            playbook.id, playbook.contact_id
        );
        Ok(playbook)
    }

    async fn get_latest(&self, contact_id: Uuid) -> StoreResult<Option<Playbook>> {
        let row = sqlx::query_as::<_, PlaybookRow>(
            "SELECT * FROM playbooks WHERE contact_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(contact_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Playbook::from))
    }
}
