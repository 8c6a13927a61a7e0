//! Playbook Generator: merges the top wedge, scored signals and contact context
//! into one outreach recommendation.
//!
//! Flow: concurrent reads (contact, profile, posts, GitHub, speaking, all signals,
//!       top signals, wedge detection) → assemble → append to the playbook store → return.
//!
//! A contact with no detectable wedge is a normal outcome and surfaces as
//! `AppError::InsufficientIntelligence`, never as a partial playbook.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::intel::config::PipelineConfig;
use crate::intel::signal_scorer::{ScoredSignal, SignalScorer};
use crate::intel::templates::{render_outreach, template_for, OutreachVars};
use crate::intel::wedge::{Wedge, WedgeDetection};
use crate::intel::wedge_detector::WedgeDetector;
use crate::intel::wedge_rules::average_engagement;
use crate::models::playbook::{LinkedinContext, Playbook, TriggerPost};
use crate::models::prospect::{Contact, GithubActivity, LinkedinProfile, Post, SpeakingEngagement};
use crate::models::signal::{Signal, SourceType};

/// Signals with urgency above this are called out in the timing rationale.
const HIGH_URGENCY_THRESHOLD: f64 = 0.8;
const GITHUB_ACTIVE_THRESHOLD: f64 = 0.6;
/// Wedges ranked 2nd through 4th back up the primary one.
const SUPPORTING_WEDGES: usize = 3;
const NO_COMPETITIVE_CONTEXT: &str = "No competitive intelligence available";

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PlaybookGenerator {
    stores: crate::store::Stores,
    config: PipelineConfig,
    scorer: SignalScorer,
    detector: WedgeDetector,
}

/// Response body for a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratePlaybookResponse {
    pub success: bool,
    pub playbook: Playbook,
}

impl PlaybookGenerator {
    pub fn new(stores: crate::store::Stores, config: PipelineConfig) -> Self {
        Self {
            scorer: SignalScorer::new(stores.signals.clone(), config.clone()),
            detector: WedgeDetector::new(stores.clone(), config.clone()),
            stores,
            config,
        }
    }

    pub async fn generate_playbook(&self, contact_id: Uuid) -> Result<Playbook, AppError> {
        self.generate_playbook_at(contact_id, Utc::now()).await
    }

    /// Same as `generate_playbook` with an explicit clock.
    ///
    /// Steps:
    /// 1. Read every input concurrently; any read failure aborts the whole call
    /// 2. Missing contact → NotFound
    /// 3. No primary wedge → InsufficientIntelligence
    /// 4. Assemble and append the playbook
    pub async fn generate_playbook_at(
        &self,
        contact_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Playbook, AppError> {
        let (contact, profile, posts, github, speaking, signals, top_signals, detection) =
            tokio::try_join!(
                self.stores.contacts.get_contact(contact_id),
                self.stores.profiles.get_profile(contact_id),
                self.stores
                    .profiles
                    .get_recent_posts(contact_id, self.config.playbook_post_limit),
                self.stores.enrichment.get_github_activity(contact_id),
                self.stores.enrichment.list_speaking_engagements(contact_id),
                self.stores.signals.list(contact_id),
                self.scorer
                    .get_top_signals(contact_id, self.config.playbook_top_signals),
                self.detector.detect_wedges_at(contact_id, now),
            )?;

        let contact =
            contact.ok_or_else(|| AppError::NotFound(format!("Contact {contact_id} not found")))?;

        let Some(primary) = detection.primary_wedge.as_ref() else {
            info!("Insufficient intelligence for contact {contact_id}: no wedge detected");
            return Err(AppError::InsufficientIntelligence(format!(
                "No conversation wedge could be detected for contact {contact_id}"
            )));
        };

        let inputs = PlaybookInputs {
            contact: &contact,
            profile: profile.as_ref(),
            posts: &posts,
            github: github.as_ref(),
            speaking: &speaking,
            signals: &signals,
            top_signals: &top_signals,
            detection: &detection,
            primary,
        };
        let playbook = assemble_playbook(&inputs, now);
        let saved = self.stores.playbooks.save(playbook).await?;

        info!(
            "Generated playbook {} for contact {}: {} wedge at {:.2}, lead with {}",
            saved.id,
            contact_id,
            saved.primary_wedge_type,
            saved.wedge_score,
            saved.best_channel().map(|(name, _)| name).unwrap_or("email")
        );
        Ok(saved)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Assembly
// ────────────────────────────────────────────────────────────────────────────

/// Everything read for one generation pass.
pub struct PlaybookInputs<'a> {
    pub contact: &'a Contact,
    pub profile: Option<&'a LinkedinProfile>,
    pub posts: &'a [Post],
    pub github: Option<&'a GithubActivity>,
    pub speaking: &'a [SpeakingEngagement],
    /// Every stored signal, unfiltered. Urgency and tech-stack lookups read these.
    pub signals: &'a [Signal],
    /// Ranked and thresholded; only these back the supporting evidence.
    pub top_signals: &'a [ScoredSignal],
    pub detection: &'a WedgeDetection,
    pub primary: &'a Wedge,
}

impl PlaybookInputs<'_> {
    /// Collector-reported post count when known, else the number of posts read.
    fn post_count(&self) -> usize {
        self.profile
            .and_then(|p| p.post_count)
            .and_then(|c| usize::try_from(c).ok())
            .unwrap_or(self.posts.len())
    }

    fn tenure_months(&self) -> Option<i32> {
        self.profile.and_then(|p| p.tenure_months)
    }
}

pub fn assemble_playbook(inputs: &PlaybookInputs<'_>, now: DateTime<Utc>) -> Playbook {
    let primary = inputs.primary;
    Playbook {
        id: Uuid::new_v4(),
        contact_id: inputs.contact.id,
        primary_wedge: primary.description.clone(),
        primary_wedge_type: primary.wedge_type.to_string(),
        wedge_score: primary.score,
        supporting_evidence: supporting_evidence(inputs.top_signals, &inputs.detection.wedges),
        personalization_hooks: personalization_hooks(
            inputs.contact,
            inputs.profile,
            inputs.github,
            inputs.speaking,
        ),
        timing_rationale: timing_rationale(primary, inputs.tenure_months(), inputs.signals),
        recommended_channels: recommend_channels(inputs.post_count(), inputs.github),
        sample_outreach: sample_outreach(inputs),
        competitive_context: competitive_context(inputs.signals),
        conversation_starters: primary.conversation_starters.clone(),
        linkedin_context: linkedin_context(inputs),
        research_snapshot: research_snapshot(inputs, now),
        created_at: now,
    }
}

pub fn posting_frequency_label(post_count: usize) -> &'static str {
    match post_count {
        n if n >= 15 => "very high",
        n if n >= 10 => "high",
        n if n >= 5 => "medium",
        _ => "low",
    }
}

pub fn engagement_level_label(engagement: i64, average: f64) -> &'static str {
    let engagement = engagement as f64;
    if engagement >= 2.0 * average {
        "very high"
    } else if engagement >= 1.5 * average {
        "high"
    } else if engagement >= 0.8 * average {
        "medium"
    } else {
        "low"
    }
}

pub fn tenure_phase_label(months: i32) -> &'static str {
    match months {
        m if m < 3 => "onboarding",
        m if m < 6 => "evaluation",
        m if m < 12 => "optimization",
        m if m < 24 => "established",
        _ => "entrenched",
    }
}

fn linkedin_context(inputs: &PlaybookInputs<'_>) -> LinkedinContext {
    let post_count = inputs.post_count();
    let primary = inputs.primary;

    let trigger_post = match primary.details.post_id {
        Some(post_id) if primary.wedge_type.is_linkedin_origin() => {
            let engagement = primary
                .details
                .engagement_count
                .or_else(|| {
                    inputs
                        .posts
                        .iter()
                        .find(|p| p.id == post_id)
                        .map(|p| p.engagement_count)
                })
                .unwrap_or(0);
            Some(TriggerPost {
                post_id,
                post_url: primary.details.post_url.clone(),
                engagement_count: engagement,
                engagement_level: engagement_level_label(
                    engagement,
                    average_engagement(inputs.posts),
                )
                .to_string(),
                days_since_post: primary.details.days_since_post,
                tenure_phase: inputs
                    .tenure_months()
                    .map(|m| tenure_phase_label(m).to_string()),
            })
        }
        _ => None,
    };

    LinkedinContext {
        influence_score: inputs.profile.map(|p| p.influence_score),
        connection_count: inputs.profile.map(|p| p.connection_count),
        follower_count: inputs.profile.map(|p| p.follower_count),
        post_count,
        posting_frequency: posting_frequency_label(post_count).to_string(),
        trigger_post,
    }
}

/// Top signals with their (boosted) relevance, then the runner-up wedges.
pub fn supporting_evidence(top_signals: &[ScoredSignal], wedges: &[Wedge]) -> Vec<String> {
    let signals = top_signals.iter().map(|s| {
        format!(
            "{} (relevance: {}%)",
            s.signal.description,
            (s.signal.relevance_score * 100.0).round() as i64
        )
    });
    let runners_up = wedges
        .iter()
        .skip(1)
        .take(SUPPORTING_WEDGES)
        .map(|w| format!("{} ({})", w.description, w.wedge_type));
    signals.chain(runners_up).collect()
}

/// At most one hook per source, in a fixed order. Absent fields contribute nothing.
pub fn personalization_hooks(
    contact: &Contact,
    profile: Option<&LinkedinProfile>,
    github: Option<&GithubActivity>,
    speaking: &[SpeakingEngagement],
) -> Vec<String> {
    let mut hooks = Vec::new();

    if let Some(previous) = profile.and_then(|p| p.previous_companies.first()) {
        hooks.push(format!("Previously worked at {previous}"));
    }
    if let Some(location) = profile.and_then(|p| p.location.as_deref()) {
        hooks.push(format!("Based in {location}"));
    }
    if let Some(github) = github {
        if let Some(language) = github.top_language() {
            hooks.push(format!(
                "Writes {language} on GitHub (@{})",
                github.username
            ));
        }
    }
    if let Some(talk) = speaking.first() {
        if let Some(topic) = talk.topic.as_deref() {
            hooks.push(format!("Recently spoke about {topic} at {}", talk.event_name));
        }
    }

    let title = contact
        .title
        .as_deref()
        .or_else(|| profile.and_then(|p| p.current_title.as_deref()));
    let company = contact
        .company
        .as_deref()
        .or_else(|| profile.and_then(|p| p.current_company.as_deref()));
    match (title, company) {
        (Some(title), Some(company)) => hooks.push(format!("{title} at {company}")),
        (Some(title), None) => hooks.push(title.to_string()),
        (None, Some(company)) => hooks.push(format!("Works at {company}")),
        (None, None) => {}
    }

    hooks
}

pub fn timing_rationale(
    primary: &Wedge,
    tenure_months: Option<i32>,
    signals: &[Signal],
) -> String {
    let mut parts = vec![primary.timing_rationale.clone()];

    match tenure_months {
        Some(t) if t < 6 => parts.push(format!(
            "New in role ({t} months) - likely reassessing tools and vendors"
        )),
        Some(t) if t <= 12 => parts.push(format!(
            "{t} months in role - settled enough to push for change"
        )),
        _ => {}
    }

    let urgent = signals
        .iter()
        .filter(|s| s.urgency_score > HIGH_URGENCY_THRESHOLD)
        .count();
    match urgent {
        0 => {}
        1 => parts.push("1 high-urgency signal detected".to_string()),
        n => parts.push(format!("{n} high-urgency signals detected")),
    }

    parts.join(". ")
}

/// Channel confidences. Assignments apply in sequence; later ones overwrite earlier ones.
pub fn recommend_channels(
    post_count: usize,
    github: Option<&GithubActivity>,
) -> BTreeMap<String, f64> {
    let mut channels = BTreeMap::from([
        ("linkedin_dm".to_string(), 0.5),
        ("email".to_string(), 0.7),
        ("phone".to_string(), 0.3),
    ]);

    if post_count >= 5 {
        channels.insert("linkedin_dm".to_string(), 0.95);
        channels.insert("email".to_string(), 0.6);
    }
    // Overrides the demotion above regardless of post count. Kept as-is until
    // channel weighting is revisited.
    channels.insert("email".to_string(), 0.8);

    if github.is_some_and(|g| g.activity_score > GITHUB_ACTIVE_THRESHOLD) {
        channels.insert("phone".to_string(), 0.2);
        channels.insert("email".to_string(), 0.9);
    }

    channels
}

fn sample_outreach(inputs: &PlaybookInputs<'_>) -> String {
    let primary = inputs.primary;
    let details = &primary.details;
    let contact = inputs.contact;
    let profile = inputs.profile;

    let first_name = if contact.first_name.trim().is_empty() {
        "there".to_string()
    } else {
        contact.first_name.clone()
    };
    let company = contact
        .company
        .clone()
        .or_else(|| profile.and_then(|p| p.current_company.clone()))
        .unwrap_or_else(|| "yours".to_string());
    let title = contact
        .title
        .clone()
        .or_else(|| profile.and_then(|p| p.current_title.clone()))
        .unwrap_or_else(|| "leadership".to_string());

    let vars = OutreachVars {
        first_name,
        company,
        title,
        theme: details
            .theme
            .clone()
            .unwrap_or_else(|| "your priorities".to_string()),
        engagement: details
            .engagement_count
            .map(|e| e.to_string())
            .unwrap_or_else(|| "so many".to_string()),
        intent: details
            .buying_intent
            .clone()
            .unwrap_or_else(|| "solutions".to_string()),
        tenure_months: details
            .tenure_months
            .or_else(|| inputs.tenure_months())
            .map(|m| m.to_string())
            .unwrap_or_else(|| "A few".to_string()),
        language: details
            .github_language
            .clone()
            .or_else(|| inputs.github.and_then(|g| g.top_language().map(str::to_string)))
            .unwrap_or_else(|| "open-source".to_string()),
        topics: if details.top_topics.is_empty() {
            "a range of topics".to_string()
        } else {
            details.top_topics.join(", ")
        },
        post_count: details
            .post_count
            .unwrap_or(inputs.posts.len())
            .to_string(),
        wedge: primary.description.clone(),
    };

    render_outreach(template_for(primary.wedge_type.family()), &vars)
}

/// Renders the most recently detected tech-stack signal, whatever its relevance.
/// Falls back to its description when the payload carries no `technologies` list.
pub fn competitive_context(signals: &[Signal]) -> String {
    let Some(stack) = signals
        .iter()
        .filter(|s| s.source_type == SourceType::CompanyTechStack)
        .max_by_key(|s| s.detected_at)
    else {
        return NO_COMPETITIVE_CONTEXT.to_string();
    };

    let technologies: Vec<&str> = stack
        .raw_data
        .get("technologies")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if technologies.is_empty() {
        format!("Current tech stack: {}", stack.description)
    } else {
        format!("Current tech stack: {}", technologies.join(", "))
    }
}

fn research_snapshot(inputs: &PlaybookInputs<'_>, now: DateTime<Utc>) -> Value {
    let posts: Vec<Value> = inputs
        .posts
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "posted_at": p.posted_at,
                "engagement_count": p.engagement_count,
                "topics": p.topics,
                "mentions_pain_points": p.mentions_pain_points,
                "mentions_buying_signals": p.mentions_buying_signals,
            })
        })
        .collect();

    json!({
        "generated_at": now,
        "contact": inputs.contact,
        "profile": inputs.profile,
        "posts": posts,
        "github_activity": inputs.github,
        "speaking_engagements": inputs.speaking,
        "top_signals": inputs.top_signals,
        "wedges": inputs.detection.wedges,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
