use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::StoreError;

/// Which collector produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    LinkedinProfile,
    LinkedinContent,
    LinkedinProfileChange,
    LinkedinActivity,
    GithubActivity,
    SpeakingEngagement,
    CompanyHiring,
    CompanyInitiatives,
    CompanyTechStack,
}

impl SourceType {
    pub const ALL: [SourceType; 9] = [
        SourceType::LinkedinProfile,
        SourceType::LinkedinContent,
        SourceType::LinkedinProfileChange,
        SourceType::LinkedinActivity,
        SourceType::GithubActivity,
        SourceType::SpeakingEngagement,
        SourceType::CompanyHiring,
        SourceType::CompanyInitiatives,
        SourceType::CompanyTechStack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::LinkedinProfile => "linkedin_profile",
            SourceType::LinkedinContent => "linkedin_content",
            SourceType::LinkedinProfileChange => "linkedin_profile_change",
            SourceType::LinkedinActivity => "linkedin_activity",
            SourceType::GithubActivity => "github_activity",
            SourceType::SpeakingEngagement => "speaking_engagement",
            SourceType::CompanyHiring => "company_hiring",
            SourceType::CompanyInitiatives => "company_initiatives",
            SourceType::CompanyTechStack => "company_tech_stack",
        }
    }

    /// LinkedIn sources whose relevance receives the scorer boost.
    pub fn is_boosted(&self) -> bool {
        matches!(
            self,
            SourceType::LinkedinContent
                | SourceType::LinkedinProfileChange
                | SourceType::LinkedinActivity
        )
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown signal source type '{s}'"))
    }
}

/// The go-to-market meaning of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    ThoughtLeadership,
    TimingTrigger,
    BuyingSignal,
    Technical,
    Competitive,
}

impl SignalCategory {
    pub const ALL: [SignalCategory; 5] = [
        SignalCategory::ThoughtLeadership,
        SignalCategory::TimingTrigger,
        SignalCategory::BuyingSignal,
        SignalCategory::Technical,
        SignalCategory::Competitive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalCategory::ThoughtLeadership => "thought_leadership",
            SignalCategory::TimingTrigger => "timing_trigger",
            SignalCategory::BuyingSignal => "buying_signal",
            SignalCategory::Technical => "technical",
            SignalCategory::Competitive => "competitive",
        }
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown signal category '{s}'"))
    }
}

/// An atomic scored observation about a contact. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub source_type: SourceType,
    pub category: SignalCategory,
    pub relevance_score: f64,
    pub urgency_score: f64,
    pub wedge_potential: f64,
    pub description: String,
    pub raw_data: Value,
    pub detected_at: DateTime<Utc>,
}

/// Database row for `signals`. Tags are stored as text and parsed on read.
#[derive(Debug, Clone, FromRow)]
pub struct SignalRow {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub source_type: String,
    pub category: String,
    pub relevance_score: f64,
    pub urgency_score: f64,
    pub wedge_potential: f64,
    pub description: String,
    pub raw_data: Value,
    pub detected_at: DateTime<Utc>,
}

impl TryFrom<SignalRow> for Signal {
    type Error = StoreError;

    fn try_from(row: SignalRow) -> Result<Self, Self::Error> {
        Ok(Signal {
            id: row.id,
            contact_id: row.contact_id,
            source_type: row.source_type.parse().map_err(StoreError::Decode)?,
            category: row.category.parse().map_err(StoreError::Decode)?,
            relevance_score: row.relevance_score,
            urgency_score: row.urgency_score,
            wedge_potential: row.wedge_potential,
            description: row.description,
            raw_data: row.raw_data,
            detected_at: row.detected_at,
        })
    }
}

/// Request body for recording a new signal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSignal {
    pub source_type: SourceType,
    pub category: SignalCategory,
    pub relevance_score: f64,
    pub urgency_score: f64,
    pub wedge_potential: f64,
    pub description: String,
    #[serde(default)]
    pub raw_data: Option<Value>,
}

impl NewSignal {
    /// All three scores must lie in [0, 1]; the description must be non-empty.
    pub fn validate(&self) -> Result<(), String> {
        let scores = [
            ("relevance_score", self.relevance_score),
            ("urgency_score", self.urgency_score),
            ("wedge_potential", self.wedge_potential),
        ];
        for (name, value) in scores {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be within [0, 1], got {value}"));
            }
        }
        if self.description.trim().is_empty() {
            return Err("description cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn into_signal(self, contact_id: Uuid) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            contact_id,
            source_type: self.source_type,
            category: self.category,
            relevance_score: self.relevance_score,
            urgency_score: self.urgency_score,
            wedge_potential: self.wedge_potential,
            description: self.description,
            raw_data: self.raw_data.unwrap_or(Value::Null),
            detected_at: Utc::now(),
        }
    }
}
