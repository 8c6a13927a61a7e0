use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix shared by every wedge type derived from LinkedIn posts.
pub const LINKEDIN_WEDGE_PREFIX: &str = "linkedin_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WedgeType {
    LinkedinPainPoint,
    LinkedinBuyingSignal,
    JobChangeRecent,
    JobChangeOptimal,
    LinkedinHighEngagement,
    LinkedinActivePoster,
    TechnicalIntegration,
    CompanyInitiative,
}

/// Template family a wedge type renders outreach with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WedgeFamily {
    PainPoint,
    BuyingSignal,
    JobChange,
    ThoughtLeadership,
    ActivePoster,
    Technical,
    General,
}

impl WedgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WedgeType::LinkedinPainPoint => "linkedin_pain_point",
            WedgeType::LinkedinBuyingSignal => "linkedin_buying_signal",
            WedgeType::JobChangeRecent => "job_change_recent",
            WedgeType::JobChangeOptimal => "job_change_optimal",
            WedgeType::LinkedinHighEngagement => "linkedin_high_engagement",
            WedgeType::LinkedinActivePoster => "linkedin_active_poster",
            WedgeType::TechnicalIntegration => "technical_integration",
            WedgeType::CompanyInitiative => "company_initiative",
        }
    }

    pub fn is_linkedin_origin(&self) -> bool {
        self.as_str().starts_with(LINKEDIN_WEDGE_PREFIX)
    }

    pub fn family(&self) -> WedgeFamily {
        match self {
            WedgeType::LinkedinPainPoint => WedgeFamily::PainPoint,
            WedgeType::LinkedinBuyingSignal => WedgeFamily::BuyingSignal,
            WedgeType::JobChangeRecent | WedgeType::JobChangeOptimal => WedgeFamily::JobChange,
            WedgeType::LinkedinHighEngagement => WedgeFamily::ThoughtLeadership,
            WedgeType::LinkedinActivePoster => WedgeFamily::ActivePoster,
            WedgeType::TechnicalIntegration => WedgeFamily::Technical,
            WedgeType::CompanyInitiative => WedgeFamily::General,
        }
    }
}

impl fmt::Display for WedgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evidence behind a wedge. Each rule fills only the fields it knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WedgeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_post: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_engagement: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buying_intent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_months: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub top_topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_post_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_id: Option<Uuid>,
}

/// A candidate conversation opener. Computed fresh per request, never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedge {
    #[serde(rename = "type")]
    pub wedge_type: WedgeType,
    /// Unbounded above 1.0: recency bonuses stack on top of base scores.
    pub score: f64,
    pub description: String,
    pub details: WedgeDetails,
    pub opening_hook: String,
    pub timing_rationale: String,
    pub conversation_starters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WedgeDetection {
    pub wedges: Vec<Wedge>,
    pub primary_wedge: Option<Wedge>,
    pub wedge_count: usize,
}

impl WedgeDetection {
    /// Orders wedges by score, highest first. Equal scores keep emission order.
    pub fn from_candidates(mut wedges: Vec<Wedge>) -> Self {
        wedges.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        WedgeDetection {
            primary_wedge: wedges.first().cloned(),
            wedge_count: wedges.len(),
            wedges,
        }
    }
}
