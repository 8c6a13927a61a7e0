// Prospect intelligence pipeline.
// Implements: text analysis, signal scoring, wedge detection, playbook synthesis.
// Everything here is deterministic. Reads go through `crate::store` contracts only.

pub mod analysis;
pub mod config;
pub mod handlers;
pub mod playbook;
pub mod signal_scorer;
pub mod templates;
pub mod wedge;
pub mod wedge_detector;
pub mod wedge_rules;
