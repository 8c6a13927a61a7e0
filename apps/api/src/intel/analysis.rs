//! Text analysis: lexicon-based topic, sentiment, pain-point and buying-signal detection.
//!
//! Pure and deterministic. Runs once per post at ingest; the wedge rules read the
//! stored flags rather than re-analysing text, except for buying-intent phrasing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::prospect::{NewPost, Post};

/// Topic label → trigger terms. A trailing `*` marks a word prefix; other
/// single words must match a whole word; multi-word terms match as phrases.
const TOPIC_TERMS: &[(&str, &[&str])] = &[
    ("API", &["api", "apis", "endpoint*", "rest", "graphql", "webhook*"]),
    ("integration", &["integrat*", "connector*", "sync*", "interoperab*"]),
    ("technical", &["technical", "architecture", "infrastructure", "engineering"]),
    ("developer", &["developer*", "devs", "dev team", "engineer*", "devex"]),
    ("automation", &["automat*", "workflow*", "no-code", "low-code"]),
    ("forecasting", &["forecast*", "projection*", "predictab*"]),
    ("sales", &["sales", "selling", "quota*", "deal*", "prospect*"]),
    ("pipeline", &["pipeline*", "pipegen", "funnel*"]),
    ("hiring", &["hiring", "recruit*", "headcount", "we're growing", "join our team"]),
    ("AI", &["ai", "llm*", "machine learning", "genai", "gpt"]),
    ("data", &["data", "analytics", "dashboard*", "reporting", "metrics"]),
    ("leadership", &["leadership", "leader*", "managing", "mentor*", "culture"]),
    ("revenue operations", &["revops", "revenue operations", "sales ops", "gtm ops"]),
    ("customer success", &["customer success", "churn*", "retention", "onboarding"]),
];

const PAIN_POINT_PHRASES: &[&str] = &[
    "struggl",
    "challeng",
    "frustrat",
    "pain point",
    "painful",
    "bottleneck",
    "problem",
    "difficult",
    "broken",
    "manual process",
    "waste",
    "hard to",
    "headache",
    "nightmare",
    "can't seem",
];

const BUYING_SIGNAL_PHRASES: &[&str] = &[
    "recommend",
    "evaluat",
    "looking for",
    "anyone use",
    "alternatives to",
    "switching from",
    "shortlist",
    "budget for",
    "vendor",
];

/// Word weights in `[-1.0, 1.0]`. The summed score is clamped to the same range.
const SENTIMENT_LEXICON: &[(&str, f64)] = &[
    ("excited", 0.5),
    ("thrilled", 0.5),
    ("proud", 0.4),
    ("great", 0.4),
    ("love", 0.5),
    ("amazing", 0.5),
    ("win", 0.4),
    ("growth", 0.3),
    ("success", 0.4),
    ("grateful", 0.4),
    ("happy", 0.4),
    ("launch", 0.3),
    ("struggling", -0.5),
    ("frustrated", -0.6),
    ("frustrating", -0.6),
    ("broken", -0.5),
    ("painful", -0.5),
    ("problem", -0.3),
    ("hard", -0.2),
    ("difficult", -0.3),
    ("waste", -0.4),
    ("failed", -0.4),
    ("nightmare", -0.6),
    ("worst", -0.6),
];

const MAX_KEY_THEMES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.2 {
            SentimentLabel::Positive
        } else if score < -0.2 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Everything derived from a post's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostAnalysis {
    pub topics: Vec<String>,
    pub key_themes: Vec<String>,
    pub sentiment_score: f64,
    pub sentiment: SentimentLabel,
    pub mentions_pain_points: bool,
    pub mentions_buying_signals: bool,
}

/// Lowercased text with byte offsets of each word.
struct Tokens {
    lower: String,
    words: Vec<(usize, String)>,
}

impl Tokens {
    fn new(text: &str) -> Self {
        let lower = text.to_lowercase();
        let mut words = Vec::new();
        let mut start: Option<usize> = None;
        for (i, c) in lower.char_indices() {
            let is_word = c.is_alphanumeric() || c == '\'';
            match (is_word, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    words.push((s, lower[s..i].to_string()));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push((s, lower[s..].to_string()));
        }
        Tokens { lower, words }
    }

    /// Byte offsets of every occurrence of `term`. Hyphens split words, so
    /// hyphenated terms match as phrases.
    fn occurrences(&self, term: &str) -> Vec<usize> {
        if term.contains(' ') || term.contains('-') {
            return self.lower.match_indices(term).map(|(i, _)| i).collect();
        }
        match term.strip_suffix('*') {
            Some(prefix) => self
                .words
                .iter()
                .filter(|(_, w)| w.starts_with(prefix))
                .map(|(i, _)| *i)
                .collect(),
            None => self
                .words
                .iter()
                .filter(|(_, w)| w == term)
                .map(|(i, _)| *i)
                .collect(),
        }
    }
}

/// (topic, first offset, mention count) for every topic present in the text.
fn topic_hits(tokens: &Tokens) -> Vec<(&'static str, usize, usize)> {
    let mut hits = Vec::new();
    for &(topic, terms) in TOPIC_TERMS {
        let offsets: Vec<usize> = terms.iter().flat_map(|t| tokens.occurrences(t)).collect();
        if let Some(first) = offsets.iter().min() {
            hits.push((topic, *first, offsets.len()));
        }
    }
    hits
}

/// Topics mentioned in the text, ordered by first mention.
pub fn detect_topics(text: &str) -> Vec<String> {
    let mut hits = topic_hits(&Tokens::new(text));
    hits.sort_by_key(|&(_, first, _)| first);
    hits.into_iter().map(|(topic, _, _)| topic.to_string()).collect()
}

/// Up to three most-mentioned topics. Ties go to the earlier mention.
pub fn key_themes(text: &str) -> Vec<String> {
    let mut hits = topic_hits(&Tokens::new(text));
    hits.sort_by(|a, b| b.2.cmp(&a.2).then(a.1.cmp(&b.1)));
    hits.into_iter()
        .take(MAX_KEY_THEMES)
        .map(|(topic, _, _)| topic.to_string())
        .collect()
}

/// Sums lexicon weights over the words of `text`, clamped to `[-1.0, 1.0]`.
pub fn sentiment_score(text: &str) -> f64 {
    let tokens = Tokens::new(text);
    let score: f64 = tokens
        .words
        .iter()
        .filter_map(|(_, word)| {
            SENTIMENT_LEXICON
                .iter()
                .find(|(lex, _)| lex == word)
                .map(|(_, weight)| *weight)
        })
        .sum();
    score.clamp(-1.0, 1.0)
}

pub fn mentions_pain_points(text: &str) -> bool {
    let lower = text.to_lowercase();
    PAIN_POINT_PHRASES.iter().any(|p| lower.contains(p))
}

pub fn mentions_buying_signals(text: &str) -> bool {
    let lower = text.to_lowercase();
    BUYING_SIGNAL_PHRASES.iter().any(|p| lower.contains(p))
}

/// What the author appears to be shopping for, phrased for an opening hook.
pub fn buying_intent(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if lower.contains("recommend") {
        "recommendations"
    } else if lower.contains("evaluat") {
        "solutions to evaluate"
    } else if lower.contains("looking for") {
        "a solution"
    } else if lower.contains("anyone use") {
        "tool recommendations"
    } else {
        "solutions"
    }
}

pub fn analyze_post(text: &str) -> PostAnalysis {
    let score = sentiment_score(text);
    PostAnalysis {
        topics: detect_topics(text),
        key_themes: key_themes(text),
        sentiment_score: score,
        sentiment: SentimentLabel::from_score(score),
        mentions_pain_points: mentions_pain_points(text),
        mentions_buying_signals: mentions_buying_signals(text),
    }
}

/// Builds a storable post, deriving every analysis field from its content.
pub fn build_post(contact_id: Uuid, new_post: NewPost) -> Post {
    let analysis = analyze_post(&new_post.content);
    Post {
        id: Uuid::new_v4(),
        contact_id,
        post_url: new_post.post_url,
        content: new_post.content,
        posted_at: new_post.posted_at,
        engagement_count: new_post.engagement_count.max(0),
        topics: analysis.topics,
        key_themes: analysis.key_themes,
        sentiment_score: analysis.sentiment_score,
        mentions_pain_points: analysis.mentions_pain_points,
        mentions_buying_signals: analysis.mentions_buying_signals,
    }
}

/// Topic frequency across many posts, most frequent first, ties by first appearance.
pub fn most_frequent_topics(posts: &[Post], n: usize) -> Vec<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut order = 0usize;
    for topic in posts.iter().flat_map(|p| p.topics.iter()) {
        let entry = counts.entry(topic.as_str()).or_insert_with(|| {
            order += 1;
            (0, order)
        });
        entry.0 += 1;
    }
    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(topic, (count, first))| (topic, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(n)
        .map(|(topic, _, _)| topic.to_string())
        .collect()
}
