//! Storage contracts consumed by the intelligence pipeline.
//!
//! The pipeline only sees these traits. `PgStore` backs them in production;
//! tests swap in `MemoryStore`. `Stores` bundles one `Arc<dyn …>` per contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::playbook::Playbook;
use crate::models::prospect::{Contact, GithubActivity, LinkedinProfile, Post, SpeakingEngagement};
use crate::models::signal::Signal;

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("stored value could not be decoded: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn get_contact(&self, contact_id: Uuid) -> StoreResult<Option<Contact>>;
}

#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn insert(&self, signal: Signal) -> StoreResult<Signal>;
    /// All signals for the contact. Callers must not rely on the order.
    async fn list(&self, contact_id: Uuid) -> StoreResult<Vec<Signal>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, contact_id: Uuid) -> StoreResult<Option<LinkedinProfile>>;
    /// Most recent first.
    async fn get_recent_posts(&self, contact_id: Uuid, limit: usize) -> StoreResult<Vec<Post>>;
    async fn insert_post(&self, post: Post) -> StoreResult<Post>;
}

#[async_trait]
pub trait EnrichmentStore: Send + Sync {
    async fn get_github_activity(&self, contact_id: Uuid) -> StoreResult<Option<GithubActivity>>;
    /// Most recent first.
    async fn list_speaking_engagements(
        &self,
        contact_id: Uuid,
    ) -> StoreResult<Vec<SpeakingEngagement>>;
}

#[async_trait]
pub trait PlaybookStore: Send + Sync {
    /// Append-only. Never updates an existing playbook.
    async fn save(&self, playbook: Playbook) -> StoreResult<Playbook>;
    async fn get_latest(&self, contact_id: Uuid) -> StoreResult<Option<Playbook>>;
}

/// One handle per storage contract.
#[derive(Clone)]
pub struct Stores {
    pub contacts: Arc<dyn ContactStore>,
    pub signals: Arc<dyn SignalStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub enrichment: Arc<dyn EnrichmentStore>,
    pub playbooks: Arc<dyn PlaybookStore>,
}

impl Stores {
    /// Backs every contract with the same implementation.
    pub fn uniform<S>(store: Arc<S>) -> Self
    where
        S: ContactStore + SignalStore + ProfileStore + EnrichmentStore + PlaybookStore + 'static,
    {
        Stores {
            contacts: store.clone(),
            signals: store.clone(),
            profiles: store.clone(),
            enrichment: store.clone(),
            playbooks: store,
        }
    }
}
