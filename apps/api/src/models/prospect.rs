use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub linkedin_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinkedinProfile {
    pub contact_id: Uuid,
    pub headline: Option<String>,
    pub current_title: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub connection_count: i64,
    pub follower_count: i64,
    pub influence_score: f64,
    /// Months in the current role. Absent when the collector could not determine it.
    pub tenure_months: Option<i32>,
    pub previous_companies: Vec<String>,
    /// Posts in the collector's lookback window, when reported.
    pub post_count: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub post_url: Option<String>,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub engagement_count: i64,
    pub topics: Vec<String>,
    pub key_themes: Vec<String>,
    pub sentiment_score: f64,
    pub mentions_pain_points: bool,
    pub mentions_buying_signals: bool,
}

/// Request body for storing a scraped post. Analysis fields are derived server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub post_url: Option<String>,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    #[serde(default)]
    pub engagement_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GithubActivity {
    pub contact_id: Uuid,
    pub username: String,
    /// 0.0 to 1.0
    pub activity_score: f64,
    /// Most used first.
    pub top_languages: Vec<String>,
    pub public_repos: i32,
    pub recent_commits: i32,
}

impl GithubActivity {
    pub fn top_language(&self) -> Option<&str> {
        self.top_languages.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpeakingEngagement {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub event_name: String,
    pub topic: Option<String>,
    pub event_date: Option<NaiveDate>,
}
