//! In-memory store for tests. Preserves insertion order on every list.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::playbook::Playbook;
use crate::models::prospect::{Contact, GithubActivity, LinkedinProfile, Post, SpeakingEngagement};
use crate::models::signal::Signal;
use crate::store::{
    ContactStore, EnrichmentStore, PlaybookStore, ProfileStore, SignalStore, StoreError,
    StoreResult,
};

#[derive(Default)]
pub struct MemoryStore {
    contacts: RwLock<HashMap<Uuid, Contact>>,
    profiles: RwLock<HashMap<Uuid, LinkedinProfile>>,
    posts: RwLock<Vec<Post>>,
    signals: RwLock<Vec<Signal>>,
    github: RwLock<HashMap<Uuid, GithubActivity>>,
    speaking: RwLock<Vec<SpeakingEngagement>>,
    playbooks: RwLock<Vec<Playbook>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent call fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn put_contact(&self, contact: Contact) {
        self.contacts.write().await.insert(contact.id, contact);
    }

    pub async fn put_profile(&self, profile: LinkedinProfile) {
        self.profiles.write().await.insert(profile.contact_id, profile);
    }

    pub async fn put_post(&self, post: Post) {
        self.posts.write().await.push(post);
    }

    pub async fn put_signal(&self, signal: Signal) {
        self.signals.write().await.push(signal);
    }

    pub async fn put_github(&self, activity: GithubActivity) {
        self.github.write().await.insert(activity.contact_id, activity);
    }

    pub async fn put_speaking(&self, engagement: SpeakingEngagement) {
        self.speaking.write().await.push(engagement);
    }

    pub async fn playbook_count(&self, contact_id: Uuid) -> usize {
        self.playbooks
            .read()
            .await
            .iter()
            .filter(|p| p.contact_id == contact_id)
            .count()
    }

    fn check(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn get_contact(&self, contact_id: Uuid) -> StoreResult<Option<Contact>> {
        self.check()?;
        Ok(self.contacts.read().await.get(&contact_id).cloned())
    }
}

#[async_trait]
impl SignalStore for MemoryStore {
    async fn insert(&self, signal: Signal) -> StoreResult<Signal> {
        self.check()?;
        self.signals.write().await.push(signal.clone());
        Ok(signal)
    }

    async fn list(&self, contact_id: Uuid) -> StoreResult<Vec<Signal>> {
        self.check()?;
        Ok(self
            .signals
            .read()
            .await
            .iter()
            .filter(|s| s.contact_id == contact_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, contact_id: Uuid) -> StoreResult<Option<LinkedinProfile>> {
        self.check()?;
        Ok(self.profiles.read().await.get(&contact_id).cloned())
    }

    async fn get_recent_posts(&self, contact_id: Uuid, limit: usize) -> StoreResult<Vec<Post>> {
        self.check()?;
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .iter()
            .filter(|p| p.contact_id == contact_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.posted_at.cmp(&a.posted_at));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn insert_post(&self, post: Post) -> StoreResult<Post> {
        self.check()?;
        self.posts.write().await.push(post.clone());
        Ok(post)
    }
}

#[async_trait]
impl EnrichmentStore for MemoryStore {
    async fn get_github_activity(&self, contact_id: Uuid) -> StoreResult<Option<GithubActivity>> {
        self.check()?;
        Ok(self.github.read().await.get(&contact_id).cloned())
    }

    async fn list_speaking_engagements(
        &self,
        contact_id: Uuid,
    ) -> StoreResult<Vec<SpeakingEngagement>> {
        self.check()?;
        let mut engagements: Vec<SpeakingEngagement> = self
            .speaking
            .read()
            .await
            .iter()
            .filter(|e| e.contact_id == contact_id)
            .cloned()
            .collect();
        engagements.sort_by(|a, b| b.event_date.cmp(&a.event_date));
        Ok(engagements)
    }
}

#[async_trait]
impl PlaybookStore for MemoryStore {
    async fn save(&self, playbook: Playbook) -> StoreResult<Playbook> {
        self.check()?;
        self.playbooks.write().await.push(playbook.clone());
        Ok(playbook)
    }

    async fn get_latest(&self, contact_id: Uuid) -> StoreResult<Option<Playbook>> {
        self.check()?;
        Ok(self
            .playbooks
            .read()
            .await
            .iter()
            .filter(|p| p.contact_id == contact_id)
            .max_by_key(|p| p.created_at)
            .cloned())
    }
}
