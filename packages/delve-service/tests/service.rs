use std::sync::Arc;

use serde_json::json;

use delve_service::{DelveService, Providers, QueryPlan, ResearchStatus, SearchTool};
use delve_testkit::{
	EchoSummarizer, FailingSearch, FailingSummarizer, ScriptedFetch, StaticSearch, hit, test_config,
};

fn plan(tool: SearchTool) -> QueryPlan {
	QueryPlan {
		tool,
		query: "why does the workflow fail".to_string(),
		limit: None,
		aspect_id: None,
		model: None,
		created_after: None,
	}
}

fn conversation(url: &str, texts: &[&str]) -> serde_json::Value {
	let facts =
		texts.iter().map(|text| json!({ "text": text, "confidence": 0.9 })).collect::<Vec<_>>();

	json!({ "url": url, "facts": facts, "confidence": 0.7 })
}

#[tokio::test]
async fn collects_facts_from_every_reachable_hit() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1"), hit("https://c.test/2")]));
	let fetch = ScriptedFetch::new()
		.respond("https://c.test/1", conversation("https://c.test/1", &["first claim"]))
		.respond("https://c.test/2", conversation("https://c.test/2", &["second claim", "third"]));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search.clone(),
		fetch: Arc::new(fetch),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert_eq!(outcome.raw_results.len(), 2);
	assert_eq!(outcome.summaries.len(), 2);
	assert_eq!(outcome.facts.len(), 3);
	assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn skips_hits_that_fail_to_fetch() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1"), hit("https://c.test/2")]));
	let fetch = ScriptedFetch::new()
		.respond("https://c.test/1", conversation("https://c.test/1", &["kept claim"]))
		.fail_on("https://c.test/2");
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search,
		fetch: Arc::new(fetch),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert_eq!(outcome.raw_results.len(), 2);
	assert_eq!(outcome.summaries.len(), 1);
	assert_eq!(outcome.facts.len(), 1);
	assert_eq!(outcome.facts[0].text, "kept claim");
}

#[tokio::test]
async fn skips_hits_without_urls() {
	let mut url_less = hit("ignored");

	url_less.url = None;

	let search = Arc::new(StaticSearch::new(vec![url_less, hit("https://c.test/1")]));
	let fetch = ScriptedFetch::new()
		.respond("https://c.test/1", conversation("https://c.test/1", &["only claim"]));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search,
		fetch: Arc::new(fetch),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert_eq!(outcome.raw_results.len(), 2);
	assert_eq!(outcome.summaries.len(), 1);
}

#[tokio::test]
async fn skips_hits_that_fail_to_summarize() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1")]));
	let fetch = ScriptedFetch::new()
		.respond("https://c.test/1", conversation("https://c.test/1", &["lost claim"]));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search,
		fetch: Arc::new(fetch),
		summarizer: Arc::new(FailingSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert_eq!(outcome.raw_results.len(), 1);
	assert!(outcome.summaries.is_empty());
	assert!(outcome.facts.is_empty());
}

#[tokio::test]
async fn unknown_tool_completes_without_searching() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1")]));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search.clone(),
		fetch: Arc::new(ScriptedFetch::new()),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Unknown)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert!(outcome.raw_results.is_empty());
	assert!(outcome.summaries.is_empty());
	assert!(outcome.facts.is_empty());
	assert_eq!(search.calls(), 0);
}

#[tokio::test]
async fn failed_search_degrades_to_empty_outcome() {
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: Arc::new(FailingSearch::new("search backend is down")),
		keyword_search: Arc::new(FailingSearch::new("search backend is down")),
		fetch: Arc::new(ScriptedFetch::new()),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;

	assert_eq!(outcome.status, ResearchStatus::Degraded);
	assert!(outcome.raw_results.is_empty());
	assert!(outcome.summaries.is_empty());
	assert!(outcome.facts.is_empty());
}

#[tokio::test]
async fn keyword_tool_dispatches_to_keyword_provider() {
	let semantic = Arc::new(StaticSearch::new(vec![hit("https://c.test/1")]));
	let keyword = Arc::new(StaticSearch::new(Vec::new()));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: semantic.clone(),
		keyword_search: keyword.clone(),
		fetch: Arc::new(ScriptedFetch::new()),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Keyword)).await;

	assert_eq!(outcome.status, ResearchStatus::Completed);
	assert_eq!(keyword.calls(), 1);
	assert_eq!(semantic.calls(), 0);
}

#[tokio::test]
async fn facts_carry_aspect_and_provenance() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1")]));
	let fetch = ScriptedFetch::new()
		.respond("https://c.test/1", conversation("https://c.test/1", &["tagged claim"]));
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search,
		fetch: Arc::new(fetch),
		summarizer: Arc::new(EchoSummarizer),
	});
	let plan = QueryPlan { aspect_id: Some("a-1".to_string()), ..plan(SearchTool::Semantic) };
	let outcome = service.research(&plan).await;
	let fact = &outcome.facts[0];

	assert_eq!(fact.aspect_id.as_deref(), Some("a-1"));
	assert_eq!(fact.source_url.as_deref(), Some("https://c.test/1"));
	assert!(fact.extracted_at.is_some());
	assert_eq!(fact.confidence, 0.9);
}

#[tokio::test]
async fn rank_facts_orders_by_relevance() {
	let search = Arc::new(StaticSearch::new(vec![hit("https://c.test/1")]));
	let fetch = ScriptedFetch::new().respond(
		"https://c.test/1",
		conversation("https://c.test/1", &["the workflow fail happens on push", "unrelated trivia"]),
	);
	let service = DelveService::with_providers(test_config(), Providers {
		semantic_search: search.clone(),
		keyword_search: search,
		fetch: Arc::new(fetch),
		summarizer: Arc::new(EchoSummarizer),
	});
	let outcome = service.research(&plan(SearchTool::Semantic)).await;
	let ranked = service.rank_facts(&outcome.facts, "why does the workflow fail");

	assert_eq!(ranked.len(), 2);
	assert_eq!(ranked[0].text, "the workflow fail happens on push");
}
