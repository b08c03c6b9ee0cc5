//! Composite relevance ranking for extracted facts.
//!
//! Each fact scores `semantic_weight * overlap + freshness_weight * decay +
//! confidence_weight * confidence`. Overlap is the fraction of the question's
//! tokens that also appear in the fact text, with exact token equality and no
//! stemming. Freshness decays exponentially from the extraction timestamp.

use std::{cmp::Ordering, collections::HashSet};

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use delve_config::Ranking;
use delve_domain::Fact;

const MIN_TOKEN_CHARS: usize = 3;
const SECONDS_PER_DAY: f64 = 86_400.0;
// Fallback for facts with no usable timestamp, neither fresh nor stale.
const UNKNOWN_FRESHNESS: f64 = 0.5;

/// Ranks facts against the question, descending by composite score, and
/// returns at most `cfg.top_k` of them. Ties keep their input order.
pub fn rank(facts: &[Fact], question: &str, cfg: &Ranking) -> Vec<Fact> {
	rank_at(facts, question, cfg, OffsetDateTime::now_utc())
}

pub fn rank_at(
	facts: &[Fact],
	question: &str,
	cfg: &Ranking,
	now: OffsetDateTime,
) -> Vec<Fact> {
	let question_tokens = tokenize(question);
	let mut scored = facts
		.iter()
		.map(|fact| (composite_score(fact, &question_tokens, cfg, now), fact.clone()))
		.collect::<Vec<_>>();

	scored.sort_by(|a, b| cmp_f64_desc(a.0, b.0));
	scored.truncate(cfg.top_k as usize);

	scored.into_iter().map(|(_, fact)| fact).collect()
}

pub fn composite_score(
	fact: &Fact,
	question_tokens: &HashSet<String>,
	cfg: &Ranking,
	now: OffsetDateTime,
) -> f64 {
	let semantic = overlap_score(&tokenize(&fact.text), question_tokens);
	let freshness = freshness_score(fact.extracted_at.as_deref(), now, cfg.freshness_tau_days);

	// Confidence is used as-is; record validation keeps it in [0, 1].
	cfg.semantic_weight * semantic
		+ cfg.freshness_weight * freshness
		+ cfg.confidence_weight * fact.confidence
}

/// Lowercased runs of word characters, keeping runs of at least
/// [`MIN_TOKEN_CHARS`].
pub fn tokenize(text: &str) -> HashSet<String> {
	text.to_lowercase()
		.split(|c: char| !c.is_alphanumeric() && c != '_')
		.filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
		.map(ToString::to_string)
		.collect()
}

fn overlap_score(text_tokens: &HashSet<String>, question_tokens: &HashSet<String>) -> f64 {
	if question_tokens.is_empty() {
		return 0.;
	}

	let shared = question_tokens.iter().filter(|token| text_tokens.contains(*token)).count();

	shared as f64 / question_tokens.len() as f64
}

/// `exp(-age_days / tau)`. Missing or unparseable timestamps score
/// [`UNKNOWN_FRESHNESS`]; future timestamps clamp to age zero, so the score
/// never exceeds one.
pub fn freshness_score(extracted_at: Option<&str>, now: OffsetDateTime, tau_days: f64) -> f64 {
	let Some(raw) = extracted_at else {
		return UNKNOWN_FRESHNESS;
	};
	let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) else {
		return UNKNOWN_FRESHNESS;
	};
	let age_days = ((now - timestamp).as_seconds_f64() / SECONDS_PER_DAY).max(0.);

	(-age_days / tau_days).exp()
}

pub fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
