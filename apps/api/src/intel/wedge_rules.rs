//! The six wedge detection rules. Each is a pure function of already-fetched data.
//!
//! Missing inputs short-circuit the affected rule only: no posts, no profile tenure or
//! no GitHub activity simply means that rule emits nothing.

use chrono::{DateTime, Utc};

use crate::intel::analysis::{buying_intent, most_frequent_topics};
use crate::intel::wedge::{Wedge, WedgeDetails, WedgeType};
use crate::models::prospect::{GithubActivity, LinkedinProfile, Post};
use crate::models::signal::{Signal, SignalCategory, SourceType};

const PAIN_POINT_BASE_SCORE: f64 = 0.95;
const BUYING_SIGNAL_SCORE: f64 = 0.98;
const JOB_CHANGE_RECENT_SCORE: f64 = 0.90;
const JOB_CHANGE_OPTIMAL_SCORE: f64 = 0.85;
const HIGH_ENGAGEMENT_SCORE: f64 = 0.85;
const ACTIVE_POSTER_SCORE: f64 = 0.75;
const TECHNICAL_SCORE: f64 = 0.80;
const COMPANY_INITIATIVE_SCORE: f64 = 0.70;

/// Engagement above this multiple of the average marks a standout post.
const HIGH_ENGAGEMENT_MULTIPLIER: f64 = 2.0;
const ACTIVE_POSTER_MIN_POSTS: usize = 10;
const GITHUB_ACTIVE_THRESHOLD: f64 = 0.6;
const TECHNICAL_TOPICS: &[&str] = &["api", "integration", "technical", "developer", "automation"];

/// Everything the rules look at, fetched once by the detector.
#[derive(Debug, Clone, Copy)]
pub struct WedgeContext<'a> {
    pub profile: Option<&'a LinkedinProfile>,
    /// Most recent first.
    pub posts: &'a [Post],
    pub signals: &'a [Signal],
    pub github: Option<&'a GithubActivity>,
    pub now: DateTime<Utc>,
}

impl WedgeContext<'_> {
    fn days_since(&self, post: &Post) -> i64 {
        (self.now - post.posted_at).num_days().max(0)
    }

    /// Mean engagement across the fetched posts; 0.0 with no posts.
    pub fn average_engagement(&self) -> f64 {
        average_engagement(self.posts)
    }
}

pub fn average_engagement(posts: &[Post]) -> f64 {
    if posts.is_empty() {
        return 0.0;
    }
    posts.iter().map(|p| p.engagement_count as f64).sum::<f64>() / posts.len() as f64
}

/// Fresher pain is worth more: +0.15 under a week, +0.10 under two, else +0.05.
pub fn recency_bonus(days_since_post: i64) -> f64 {
    if days_since_post < 7 {
        0.15
    } else if days_since_post < 14 {
        0.10
    } else {
        0.05
    }
}

/// Stands in for the theme of a post with no detected topics.
const UNTHEMED_POST: &str = "team workflow";

fn post_theme(post: &Post) -> &str {
    post.key_themes
        .first()
        .or_else(|| post.topics.first())
        .map(String::as_str)
        .unwrap_or(UNTHEMED_POST)
}

/// Rule 1: one wedge per post that mentions a pain point.
pub fn pain_point_wedges(ctx: &WedgeContext<'_>) -> Vec<Wedge> {
    ctx.posts
        .iter()
        .filter(|p| p.mentions_pain_points)
        .map(|post| {
            let days = ctx.days_since(post);
            let theme = post_theme(post);
            let engagement = post.engagement_count;
            Wedge {
                wedge_type: WedgeType::LinkedinPainPoint,
                score: PAIN_POINT_BASE_SCORE + recency_bonus(days),
                description: format!("Posted about {theme} challenges on LinkedIn"),
                details: WedgeDetails {
                    post_id: Some(post.id),
                    post_url: post.post_url.clone(),
                    days_since_post: Some(days),
                    engagement_count: Some(engagement),
                    theme: Some(theme.to_string()),
                    ..WedgeDetails::default()
                },
                opening_hook: format!(
                    "Saw your recent post about {theme} - the challenges you described are ones we hear a lot."
                ),
                timing_rationale: format!(
                    "Posted {days} days ago with {engagement} engagements - the pain is top of mind"
                ),
                conversation_starters: vec![
                    format!(
                        "Your post on {theme} drew {engagement} reactions - what has been the hardest part so far?"
                    ),
                    format!("How is your team tackling {theme} today?"),
                    format!("What have you already tried to fix {theme}?"),
                ],
            }
        })
        .collect()
}

/// Rule 2: one wedge per post that signals active buying.
pub fn buying_signal_wedges(ctx: &WedgeContext<'_>) -> Vec<Wedge> {
    ctx.posts
        .iter()
        .filter(|p| p.mentions_buying_signals)
        .map(|post| {
            let days = ctx.days_since(post);
            let intent = buying_intent(&post.content);
            Wedge {
                wedge_type: WedgeType::LinkedinBuyingSignal,
                score: BUYING_SIGNAL_SCORE,
                description: format!("Publicly asked for {intent} on LinkedIn"),
                details: WedgeDetails {
                    post_id: Some(post.id),
                    post_url: post.post_url.clone(),
                    days_since_post: Some(days),
                    engagement_count: Some(post.engagement_count),
                    buying_intent: Some(intent.to_string()),
                    theme: post.key_themes.first().cloned(),
                    ..WedgeDetails::default()
                },
                opening_hook: format!(
                    "Noticed you're looking for {intent} - happy to share what similar teams ended up choosing."
                ),
                timing_rationale: format!(
                    "Asked publicly {days} days ago - actively in an evaluation window"
                ),
                conversation_starters: vec![
                    format!("What prompted the search for {intent}?"),
                    "Which options are already on your shortlist?".to_string(),
                    "What would make a new tool a clear win for your team?".to_string(),
                ],
            }
        })
        .collect()
}

/// Rule 3: new-in-role timing. At most one wedge.
pub fn job_change_wedge(ctx: &WedgeContext<'_>) -> Option<Wedge> {
    let profile = ctx.profile?;
    let tenure = profile.tenure_months?;
    let role = profile
        .current_title
        .as_deref()
        .map(|t| format!("as {t}"))
        .unwrap_or_else(|| "in a new role".to_string());

    let details = WedgeDetails {
        tenure_months: Some(tenure),
        ..WedgeDetails::default()
    };

    if tenure < 6 {
        Some(Wedge {
            wedge_type: WedgeType::JobChangeRecent,
            score: JOB_CHANGE_RECENT_SCORE,
            description: format!("Started {role} {tenure} months ago"),
            details,
            opening_hook: format!(
                "Congrats on the new role - {tenure} months in is usually when the tooling review starts."
            ),
            timing_rationale: format!(
                "{tenure} months into the role - evaluation phase, actively assessing tools and processes"
            ),
            conversation_starters: vec![
                "What's on your 90-day plan?".to_string(),
                "What did you inherit that you'd change first?".to_string(),
            ],
        })
    } else if tenure <= 12 {
        Some(Wedge {
            wedge_type: WedgeType::JobChangeOptimal,
            score: JOB_CHANGE_OPTIMAL_SCORE,
            description: format!("{tenure} months {role} - settled in and ready to drive change"),
            details,
            opening_hook: format!(
                "At {tenure} months in, you've probably found the gaps worth fixing this year."
            ),
            timing_rationale: format!(
                "{tenure} months into the role - past the honeymoon phase with the credibility to make changes"
            ),
            conversation_starters: vec![
                "What's the biggest gap you've found since joining?".to_string(),
                "Which initiatives are you prioritizing for next quarter?".to_string(),
            ],
        })
    } else {
        None
    }
}

/// Rule 4: standout engagement and sustained posting. Zero, one or two wedges.
pub fn thought_leadership_wedges(ctx: &WedgeContext<'_>) -> Vec<Wedge> {
    let mut wedges = Vec::new();
    if ctx.posts.is_empty() {
        return wedges;
    }
    let average = ctx.average_engagement();

    if let Some(post) = ctx
        .posts
        .iter()
        .find(|p| p.engagement_count as f64 > HIGH_ENGAGEMENT_MULTIPLIER * average)
    {
        let theme = post_theme(post);
        let engagement = post.engagement_count;
        wedges.push(Wedge {
            wedge_type: WedgeType::LinkedinHighEngagement,
            score: HIGH_ENGAGEMENT_SCORE,
            description: format!("High-engagement post about {theme}"),
            details: WedgeDetails {
                post_id: Some(post.id),
                post_url: post.post_url.clone(),
                days_since_post: Some(ctx.days_since(post)),
                engagement_count: Some(engagement),
                average_engagement: Some(average),
                theme: Some(theme.to_string()),
                ..WedgeDetails::default()
            },
            opening_hook: format!(
                "Your post on {theme} clearly struck a nerve - {engagement} engagements is a lot."
            ),
            timing_rationale: format!(
                "Post reached {engagement} engagements against an average of {average:.0} - the audience is listening"
            ),
            conversation_starters: vec![
                format!("What reaction to your {theme} post surprised you most?"),
                format!("Are you planning a follow-up on {theme}?"),
            ],
        });
    }

    if ctx.posts.len() >= ACTIVE_POSTER_MIN_POSTS {
        let topics = most_frequent_topics(ctx.posts, 3);
        let topic_list = if topics.is_empty() {
            "a range of topics".to_string()
        } else {
            topics.join(", ")
        };
        wedges.push(Wedge {
            wedge_type: WedgeType::LinkedinActivePoster,
            score: ACTIVE_POSTER_SCORE,
            description: format!("Active LinkedIn voice on {topic_list}"),
            details: WedgeDetails {
                post_count: Some(ctx.posts.len()),
                top_topics: topics,
                ..WedgeDetails::default()
            },
            opening_hook: format!(
                "I've been following your posts on {topic_list} - always a useful read."
            ),
            timing_rationale: format!(
                "{} recent posts, mostly about {topic_list} - highly reachable on LinkedIn",
                ctx.posts.len()
            ),
            conversation_starters: vec![
                format!("What's driving your focus on {topic_list} lately?"),
                "Which of your recent posts sparked the best conversation?".to_string(),
            ],
        });
    }

    wedges
}

fn is_technical_post(post: &Post) -> bool {
    post.topics
        .iter()
        .any(|t| TECHNICAL_TOPICS.contains(&t.to_lowercase().as_str()))
}

/// Rule 5: technical posting backed by real GitHub activity.
pub fn technical_wedge(ctx: &WedgeContext<'_>) -> Option<Wedge> {
    let github = ctx.github?;
    if github.activity_score <= GITHUB_ACTIVE_THRESHOLD {
        return None;
    }
    let technical_posts = ctx.posts.iter().filter(|p| is_technical_post(p)).count();
    if technical_posts == 0 {
        return None;
    }
    let language = github.top_language().unwrap_or("code").to_string();

    Some(Wedge {
        wedge_type: WedgeType::TechnicalIntegration,
        score: TECHNICAL_SCORE,
        description: format!(
            "Technical buyer: active {language} developer with {technical_posts} technical posts"
        ),
        details: WedgeDetails {
            github_language: Some(language.clone()),
            technical_post_count: Some(technical_posts),
            ..WedgeDetails::default()
        },
        opening_hook: format!(
            "Saw your {language} work on GitHub alongside your posts on integrations - figured you'd want the technical version."
        ),
        timing_rationale: format!(
            "Hands-on with {language} and posting about technical topics - evaluates tools directly"
        ),
        conversation_starters: vec![
            "How are you handling integrations across your stack today?".to_string(),
            format!("Is most of your tooling built in {language}?"),
        ],
    })
}

/// Rule 6: the first company hiring/initiative timing trigger.
pub fn company_initiative_wedge(ctx: &WedgeContext<'_>) -> Option<Wedge> {
    let signal = ctx.signals.iter().find(|s| {
        s.category == SignalCategory::TimingTrigger
            && matches!(
                s.source_type,
                SourceType::CompanyHiring | SourceType::CompanyInitiatives
            )
    })?;

    Some(Wedge {
        wedge_type: WedgeType::CompanyInitiative,
        score: COMPANY_INITIATIVE_SCORE,
        description: signal.description.clone(),
        details: WedgeDetails {
            signal_id: Some(signal.id),
            ..WedgeDetails::default()
        },
        opening_hook: format!(
            "Noticed the recent news at your company: {}.",
            signal.description
        ),
        timing_rationale: "Company initiative underway - new budget and priorities in motion"
            .to_string(),
        conversation_starters: vec![
            "How is the initiative changing your team's priorities?".to_string(),
            "What does success look like for this push?".to_string(),
        ],
    })
}

/// Runs every rule and concatenates their wedges in rule order.
pub fn run_all(ctx: &WedgeContext<'_>) -> Vec<Wedge> {
    let mut wedges = pain_point_wedges(ctx);
    wedges.extend(buying_signal_wedges(ctx));
    wedges.extend(job_change_wedge(ctx));
    wedges.extend(thought_leadership_wedges(ctx));
    wedges.extend(technical_wedge(ctx));
    wedges.extend(company_initiative_wedge(ctx));
    wedges
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::Value;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_post(days_ago: i64, engagement: i64) -> Post {
        Post {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            post_url: None,
            content: String::new(),
            posted_at: now() - Duration::days(days_ago),
            engagement_count: engagement,
            topics: vec![],
            key_themes: vec![],
            sentiment_score: 0.0,
            mentions_pain_points: false,
            mentions_buying_signals: false,
        }
    }

    fn make_profile(tenure_months: Option<i32>) -> LinkedinProfile {
        LinkedinProfile {
            contact_id: Uuid::new_v4(),
            headline: None,
            current_title: Some("VP Sales".to_string()),
            current_company: Some("Acme".to_string()),
            location: None,
            connection_count: 500,
            follower_count: 1200,
            influence_score: 0.6,
            tenure_months,
            previous_companies: vec![],
            post_count: None,
            updated_at: now(),
        }
    }

    fn make_github(activity_score: f64) -> GithubActivity {
        GithubActivity {
            contact_id: Uuid::new_v4(),
            username: "octo".to_string(),
            activity_score,
            top_languages: vec!["Rust".to_string(), "Python".to_string()],
            public_repos: 12,
            recent_commits: 40,
        }
    }

    fn make_signal(source_type: SourceType, category: SignalCategory, description: &str) -> Signal {
        Signal {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            source_type,
            category,
            relevance_score: 0.7,
            urgency_score: 0.7,
            wedge_potential: 0.7,
            description: description.to_string(),
            raw_data: Value::Null,
            detected_at: now(),
        }
    }

    fn ctx<'a>(
        profile: Option<&'a LinkedinProfile>,
        posts: &'a [Post],
        signals: &'a [Signal],
        github: Option<&'a GithubActivity>,
    ) -> WedgeContext<'a> {
        WedgeContext {
            profile,
            posts,
            signals,
            github,
            now: now(),
        }
    }

    fn pain_post(days_ago: i64) -> Post {
        Post {
            mentions_pain_points: true,
            key_themes: vec!["forecasting".to_string()],
            ..make_post(days_ago, 45)
        }
    }

    #[test]
    fn test_pain_point_recency_bonus_tiers() {
        for (days, expected) in [(3, 1.10), (10, 1.05), (30, 1.00)] {
            let posts = vec![pain_post(days)];
            let wedges = pain_point_wedges(&ctx(None, &posts, &[], None));
            assert_eq!(wedges.len(), 1);
            assert!(
                (wedges[0].score - expected).abs() < 1e-9,
                "{days} days ago: expected {expected}, got {}",
                wedges[0].score
            );
        }
    }

    #[test]
    fn test_recency_bonus_boundaries() {
        assert_eq!(recency_bonus(6), 0.15);
        assert_eq!(recency_bonus(7), 0.10);
        assert_eq!(recency_bonus(13), 0.10);
        assert_eq!(recency_bonus(14), 0.05);
    }

    #[test]
    fn test_pain_point_rationale_and_starters() {
        let posts = vec![pain_post(2)];
        let wedge = pain_point_wedges(&ctx(None, &posts, &[], None)).remove(0);
        assert!(wedge.timing_rationale.contains("2 days ago"));
        assert!(wedge.timing_rationale.contains("45 engagements"));
        assert!(wedge.conversation_starters[0].contains("forecasting"));
        assert!(wedge.conversation_starters[0].contains("45"));
        assert_eq!(wedge.details.post_id, Some(posts[0].id));
    }

    #[test]
    fn test_unthemed_pain_post_reads_naturally() {
        let posts = vec![Post {
            mentions_pain_points: true,
            ..make_post(2, 20)
        }];
        let wedge = pain_point_wedges(&ctx(None, &posts, &[], None)).remove(0);
        assert_eq!(wedge.description, "Posted about team workflow challenges on LinkedIn");
        assert_eq!(wedge.details.theme.as_deref(), Some("team workflow"));
        assert!(wedge
            .conversation_starters
            .iter()
            .all(|s| !s.contains(" this ") && !s.contains(" this?")));
    }

    #[test]
    fn test_one_pain_wedge_per_flagged_post() {
        let posts = vec![pain_post(1), make_post(2, 10), pain_post(20)];
        assert_eq!(pain_point_wedges(&ctx(None, &posts, &[], None)).len(), 2);
    }

    #[test]
    fn test_buying_signal_fixed_score_and_intent() {
        let posts = vec![Post {
            mentions_buying_signals: true,
            content: "Can anyone recommend a forecasting tool?".to_string(),
            ..make_post(40, 12)
        }];
        let wedge = buying_signal_wedges(&ctx(None, &posts, &[], None)).remove(0);
        assert_eq!(wedge.score, 0.98);
        assert!(wedge.opening_hook.contains("recommendations"));
        assert_eq!(wedge.details.buying_intent.as_deref(), Some("recommendations"));
    }

    #[test]
    fn test_job_change_bands() {
        let recent = make_profile(Some(4));
        let optimal_low = make_profile(Some(6));
        let optimal_high = make_profile(Some(12));
        let settled = make_profile(Some(13));

        let w = job_change_wedge(&ctx(Some(&recent), &[], &[], None)).unwrap();
        assert_eq!(w.wedge_type, WedgeType::JobChangeRecent);
        assert_eq!(w.score, 0.90);

        let w = job_change_wedge(&ctx(Some(&optimal_low), &[], &[], None)).unwrap();
        assert_eq!(w.wedge_type, WedgeType::JobChangeOptimal);
        assert_eq!(w.score, 0.85);

        let w = job_change_wedge(&ctx(Some(&optimal_high), &[], &[], None)).unwrap();
        assert_eq!(w.wedge_type, WedgeType::JobChangeOptimal);

        assert!(job_change_wedge(&ctx(Some(&settled), &[], &[], None)).is_none());
    }

    #[test]
    fn test_job_change_absent_profile_or_tenure() {
        assert!(job_change_wedge(&ctx(None, &[], &[], None)).is_none());
        let profile = make_profile(None);
        assert!(job_change_wedge(&ctx(Some(&profile), &[], &[], None)).is_none());
    }

    #[test]
    fn test_high_engagement_requires_more_than_double_average() {
        // average = (100 + 10 + 10 + 12) / 4 = 33 → threshold 66
        let posts = vec![make_post(1, 100), make_post(2, 10), make_post(3, 10), make_post(4, 12)];
        let wedges = thought_leadership_wedges(&ctx(None, &posts, &[], None));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].wedge_type, WedgeType::LinkedinHighEngagement);
        assert_eq!(wedges[0].score, 0.85);
        assert!(wedges[0].timing_rationale.contains("100"));
        assert!(wedges[0].timing_rationale.contains("average of 33"));

        let flat = vec![make_post(1, 10), make_post(2, 10)];
        assert!(thought_leadership_wedges(&ctx(None, &flat, &[], None)).is_empty());
    }

    #[test]
    fn test_active_poster_fires_at_ten_posts() {
        let posts: Vec<Post> = (0..10)
            .map(|i| Post {
                topics: vec!["sales".to_string(), "AI".to_string()],
                ..make_post(i, 10)
            })
            .collect();
        let wedges = thought_leadership_wedges(&ctx(None, &posts, &[], None));
        assert_eq!(wedges.len(), 1);
        assert_eq!(wedges[0].wedge_type, WedgeType::LinkedinActivePoster);
        assert_eq!(wedges[0].score, 0.75);
        assert_eq!(wedges[0].details.top_topics, vec!["sales", "AI"]);

        assert!(thought_leadership_wedges(&ctx(None, &posts[..9], &[], None)).is_empty());
    }

    #[test]
    fn test_both_thought_leadership_wedges_can_fire() {
        let mut posts: Vec<Post> = (0..10).map(|i| make_post(i, 5)).collect();
        posts[3].engagement_count = 500;
        let wedges = thought_leadership_wedges(&ctx(None, &posts, &[], None));
        assert_eq!(wedges.len(), 2);
    }

    #[test]
    fn test_technical_wedge_needs_posts_and_active_github() {
        let posts = vec![
            Post {
                topics: vec!["API".to_string()],
                ..make_post(1, 10)
            },
            Post {
                topics: vec!["automation".to_string()],
                ..make_post(2, 10)
            },
            make_post(3, 10),
        ];
        let active = make_github(0.8);
        let idle = make_github(0.6);

        let wedge = technical_wedge(&ctx(None, &posts, &[], Some(&active))).unwrap();
        assert_eq!(wedge.score, 0.80);
        assert_eq!(wedge.details.github_language.as_deref(), Some("Rust"));
        assert_eq!(wedge.details.technical_post_count, Some(2));

        assert!(technical_wedge(&ctx(None, &posts, &[], Some(&idle))).is_none());
        assert!(technical_wedge(&ctx(None, &posts, &[], None)).is_none());
        assert!(technical_wedge(&ctx(None, &posts[2..], &[], Some(&active))).is_none());
    }

    #[test]
    fn test_company_initiative_uses_first_matching_signal() {
        let signals = vec![
            make_signal(SourceType::CompanyHiring, SignalCategory::BuyingSignal, "not timing"),
            make_signal(SourceType::LinkedinContent, SignalCategory::TimingTrigger, "wrong source"),
            make_signal(SourceType::CompanyInitiatives, SignalCategory::TimingTrigger, "Launching EMEA expansion"),
            make_signal(SourceType::CompanyHiring, SignalCategory::TimingTrigger, "Hiring 10 AEs"),
        ];
        let wedge = company_initiative_wedge(&ctx(None, &[], &signals, None)).unwrap();
        assert_eq!(wedge.score, 0.70);
        assert_eq!(wedge.description, "Launching EMEA expansion");
        assert_eq!(wedge.details.signal_id, Some(signals[2].id));
    }

    #[test]
    fn test_no_data_yields_no_wedges() {
        assert!(run_all(&ctx(None, &[], &[], None)).is_empty());
    }
}
