//! One research cycle: search, fetch each hit, summarize, collect facts.
//!
//! The cycle is total. Provider failures never escape; they degrade the
//! outcome or skip the affected item instead.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{DelveService, Error, Result};
use delve_domain::{Fact, Summary};
use delve_providers::SearchHit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTool {
	Semantic,
	Keyword,
	#[serde(other)]
	Unknown,
}
impl SearchTool {
	pub fn parse(tag: &str) -> Self {
		match tag.trim().to_lowercase().as_str() {
			"semantic" => Self::Semantic,
			"keyword" => Self::Keyword,
			_ => Self::Unknown,
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QueryPlan {
	pub tool: SearchTool,
	pub query: String,
	#[serde(default)]
	pub limit: Option<u32>,
	#[serde(default, alias = "aspectId")]
	pub aspect_id: Option<String>,
	#[serde(default)]
	pub model: Option<String>,
	#[serde(default, alias = "createdAfter")]
	pub created_after: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
	Completed,
	#[default]
	Degraded,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ResearchOutcome {
	pub status: ResearchStatus,
	pub raw_results: Vec<SearchHit>,
	pub summaries: Vec<Summary>,
	pub facts: Vec<Fact>,
}

/// Runs one research cycle for the plan. Always returns an outcome; a failed
/// search or dispatch yields an empty degraded one.
pub async fn research(service: &DelveService, plan: &QueryPlan) -> ResearchOutcome {
	let cycle_id = Uuid::new_v4();

	tracing::info!(%cycle_id, tool = ?plan.tool, query = %plan.query, "Starting research cycle.");

	match run_cycle(service, plan, cycle_id).await {
		Ok(outcome) => {
			tracing::info!(
				%cycle_id,
				hits = outcome.raw_results.len(),
				summaries = outcome.summaries.len(),
				facts = outcome.facts.len(),
				"Finished research cycle.",
			);

			outcome
		},
		Err(err) => {
			tracing::error!(%cycle_id, error = %err, "Research cycle degraded.");

			ResearchOutcome::default()
		},
	}
}

async fn run_cycle(
	service: &DelveService,
	plan: &QueryPlan,
	cycle_id: Uuid,
) -> Result<ResearchOutcome> {
	let retry = service.retry_policy();
	let limit = plan.limit.unwrap_or(service.cfg.research.default_limit);
	let hits = match plan.tool {
		SearchTool::Semantic => service
			.providers
			.semantic_search
			.search(
				&service.cfg.providers.semantic_search,
				&retry,
				&plan.query,
				limit,
				plan.created_after.as_deref(),
			)
			.await,
		// The keyword index has no date filter.
		SearchTool::Keyword => service
			.providers
			.keyword_search
			.search(&service.cfg.providers.keyword_search, &retry, &plan.query, limit)
			.await,
		SearchTool::Unknown => {
			tracing::warn!(%cycle_id, "Unknown search tool; completing with no results.");

			return Ok(ResearchOutcome { status: ResearchStatus::Completed, ..Default::default() });
		},
	}
	.map_err(|err| Error::Search { message: err.to_string() })?;
	let now = OffsetDateTime::now_utc();
	let mut summaries = Vec::new();
	let mut facts = Vec::new();

	for hit in &hits {
		let Some(summary) = summarize_hit(service, plan, &retry, cycle_id, hit).await else {
			continue;
		};

		facts.extend(summary.to_facts(plan.aspect_id.as_deref(), now));
		summaries.push(summary);
	}

	Ok(ResearchOutcome { status: ResearchStatus::Completed, raw_results: hits, summaries, facts })
}

async fn summarize_hit(
	service: &DelveService,
	plan: &QueryPlan,
	retry: &delve_providers::RetryPolicy,
	cycle_id: Uuid,
	hit: &SearchHit,
) -> Option<Summary> {
	// Hits without a url carry nothing to fetch.
	let url = hit.url.as_deref().filter(|url| !url.trim().is_empty())?;
	let conversation =
		match service.providers.fetch.conversation(&service.cfg.providers.fetch, url).await {
			Ok(conversation) => conversation,
			Err(err) => {
				let err = Error::Fetch { message: err.to_string() };

				tracing::warn!(%cycle_id, url, error = %err, "Skipping conversation that failed to fetch.");

				return None;
			},
		};

	match service
		.providers
		.summarizer
		.summarize(&service.cfg.providers.summarizer, retry, &conversation, plan.model.as_deref())
		.await
	{
		Ok(summary) => Some(summary),
		Err(err) => {
			let err = Error::Summarizer { message: err.to_string() };

			tracing::warn!(%cycle_id, url, error = %err, "Skipping conversation that failed to summarize.");

			None
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_tool_tags_case_insensitively() {
		assert_eq!(SearchTool::parse("Semantic"), SearchTool::Semantic);
		assert_eq!(SearchTool::parse(" keyword "), SearchTool::Keyword);
		assert_eq!(SearchTool::parse("graph"), SearchTool::Unknown);
		assert_eq!(SearchTool::parse(""), SearchTool::Unknown);
	}

	#[test]
	fn deserializes_unknown_tool_tags() {
		let plan: QueryPlan =
			serde_json::from_value(serde_json::json!({ "tool": "hybrid", "query": "q" }))
				.expect("Failed to deserialize plan.");

		assert_eq!(plan.tool, SearchTool::Unknown);
	}

	#[test]
	fn accepts_camel_case_plan_keys() {
		let plan: QueryPlan = serde_json::from_value(serde_json::json!({
			"tool": "semantic",
			"query": "q",
			"aspectId": "a-1",
			"createdAfter": "2026-01-01T00:00:00Z",
		}))
		.expect("Failed to deserialize plan.");

		assert_eq!(plan.aspect_id.as_deref(), Some("a-1"));
		assert_eq!(plan.created_after.as_deref(), Some("2026-01-01T00:00:00Z"));
	}

	#[test]
	fn default_outcome_is_degraded_and_empty() {
		let outcome = ResearchOutcome::default();

		assert_eq!(outcome.status, ResearchStatus::Degraded);
		assert!(outcome.raw_results.is_empty());
		assert!(outcome.summaries.is_empty());
		assert!(outcome.facts.is_empty());
	}
}
