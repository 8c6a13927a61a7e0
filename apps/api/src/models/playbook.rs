use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// LinkedIn presence summary folded into every playbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedinContext {
    pub influence_score: Option<f64>,
    pub connection_count: Option<i64>,
    pub follower_count: Option<i64>,
    pub post_count: usize,
    pub posting_frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_post: Option<TriggerPost>,
}

/// The post behind a LinkedIn-origin primary wedge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerPost {
    pub post_id: Uuid,
    pub post_url: Option<String>,
    pub engagement_count: i64,
    pub engagement_level: String,
    pub days_since_post: Option<i64>,
    pub tenure_phase: Option<String>,
}

/// The synthesized outreach recommendation. Append-only; the newest row wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub primary_wedge: String,
    pub primary_wedge_type: String,
    pub wedge_score: f64,
    pub supporting_evidence: Vec<String>,
    pub personalization_hooks: Vec<String>,
    pub timing_rationale: String,
    /// channel → confidence in [0, 1]
    pub recommended_channels: BTreeMap<String, f64>,
    pub sample_outreach: String,
    pub competitive_context: String,
    pub conversation_starters: Vec<String>,
    pub linkedin_context: LinkedinContext,
    pub research_snapshot: Value,
    pub created_at: DateTime<Utc>,
}

impl Playbook {
    /// Highest-confidence channel. Ties resolve to the alphabetically first name.
    pub fn best_channel(&self) -> Option<(&str, f64)> {
        self.recommended_channels
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (name, &score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((name.as_str(), score)),
            })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PlaybookRow {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub primary_wedge: String,
    pub primary_wedge_type: String,
    pub wedge_score: f64,
    pub supporting_evidence: Vec<String>,
    pub personalization_hooks: Vec<String>,
    pub timing_rationale: String,
    pub recommended_channels: Json<BTreeMap<String, f64>>,
    pub sample_outreach: String,
    pub competitive_context: String,
    pub conversation_starters: Vec<String>,
    pub linkedin_context: Json<LinkedinContext>,
    pub research_snapshot: Value,
    pub created_at: DateTime<Utc>,
}

impl From<PlaybookRow> for Playbook {
    fn from(row: PlaybookRow) -> Self {
        Playbook {
            id: row.id,
            contact_id: row.contact_id,
            primary_wedge: row.primary_wedge,
            primary_wedge_type: row.primary_wedge_type,
            wedge_score: row.wedge_score,
            supporting_evidence: row.supporting_evidence,
            personalization_hooks: row.personalization_hooks,
            timing_rationale: row.timing_rationale,
            recommended_channels: row.recommended_channels.0,
            sample_outreach: row.sample_outreach,
            competitive_context: row.competitive_context,
            conversation_starters: row.conversation_starters,
            linkedin_context: row.linkedin_context.0,
            research_snapshot: row.research_snapshot,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_playbook(channels: &[(&str, f64)]) -> Playbook {
        Playbook {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            primary_wedge: "Posted about forecasting challenges".to_string(),
            primary_wedge_type: "linkedin_pain_point".to_string(),
            wedge_score: 1.1,
            supporting_evidence: vec![],
            personalization_hooks: vec![],
            timing_rationale: String::new(),
            recommended_channels: channels
                .iter()
                .map(|(name, score)| (name.to_string(), *score))
                .collect(),
            sample_outreach: String::new(),
            competitive_context: String::new(),
            conversation_starters: vec![],
            linkedin_context: LinkedinContext {
                influence_score: None,
                connection_count: None,
                follower_count: None,
                post_count: 0,
                posting_frequency: "low".to_string(),
                trigger_post: None,
            },
            research_snapshot: Value::Null,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_best_channel_picks_highest() {
        let playbook = make_playbook(&[("email", 0.8), ("linkedin_dm", 0.95), ("phone", 0.3)]);
        assert_eq!(playbook.best_channel(), Some(("linkedin_dm", 0.95)));
    }

    #[test]
    fn test_best_channel_tie_is_alphabetical() {
        let playbook = make_playbook(&[("linkedin_dm", 0.8), ("email", 0.8)]);
        assert_eq!(playbook.best_channel().map(|(name, _)| name), Some("email"));
    }

    #[test]
    fn test_best_channel_empty() {
        assert!(make_playbook(&[]).best_channel().is_none());
    }

    #[test]
    fn test_trigger_post_omitted_when_absent() {
        let value = serde_json::to_value(make_playbook(&[]).linkedin_context).unwrap();
        assert!(value.get("trigger_post").is_none());
    }
}
