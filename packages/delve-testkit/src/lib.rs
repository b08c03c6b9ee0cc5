//! Config fixtures and in-memory provider doubles for service tests.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Map, Value};

use delve_config::{
	Agent, Config, FetchProviderConfig, Providers, Ranking, Research, Retry, SearchProviderConfig,
	SummarizerProviderConfig,
};
use delve_domain::Summary;
use delve_providers::{Error, RetryPolicy, SearchHit};
use delve_service::{
	BoxFuture, FetchProvider, KeywordSearchProvider, SemanticSearchProvider, SummarizerProvider,
};

/// A valid config with single-attempt retries, so failing doubles never sleep.
pub fn test_config() -> Config {
	Config {
		agent: Agent { log_level: "info".to_string() },
		providers: Providers {
			semantic_search: search_provider_config("semantic-test"),
			keyword_search: search_provider_config("keyword-test"),
			fetch: FetchProviderConfig {
				timeout_ms: 1_000,
				user_agent: None,
				default_headers: Map::new(),
			},
			summarizer: SummarizerProviderConfig {
				provider_id: "summarizer-test".to_string(),
				api_base: "https://summarizer.test".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "delve-mini".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		research: Research::default(),
		ranking: Ranking::default(),
		retry: Retry { max_attempts: 1, base_delay_ms: 1, max_delay_ms: 1 },
	}
}

fn search_provider_config(provider_id: &str) -> SearchProviderConfig {
	SearchProviderConfig {
		provider_id: provider_id.to_string(),
		api_base: format!("https://{provider_id}.test"),
		api_key: "test-key".to_string(),
		path: "/v1/search".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn hit(url: &str) -> SearchHit {
	SearchHit {
		url: Some(url.to_string()),
		title: Some("title".to_string()),
		snippet: None,
		score: Some(0.5),
	}
}

/// Returns the same hits on every call and counts the calls.
pub struct StaticSearch {
	hits: Vec<SearchHit>,
	calls: AtomicUsize,
}
impl StaticSearch {
	pub fn new(hits: Vec<SearchHit>) -> Self {
		Self { hits, calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	fn respond(&self) -> BoxFuture<'_, delve_providers::Result<Vec<SearchHit>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let hits = self.hits.clone();

		Box::pin(async move { Ok(hits) })
	}
}
impl SemanticSearchProvider for StaticSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		_retry: &'a RetryPolicy,
		_query: &'a str,
		_limit: u32,
		_created_after: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		self.respond()
	}
}
impl KeywordSearchProvider for StaticSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		_retry: &'a RetryPolicy,
		_query: &'a str,
		_limit: u32,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		self.respond()
	}
}

/// Fails every search call with the given message.
pub struct FailingSearch {
	pub message: String,
}
impl FailingSearch {
	pub fn new(message: &str) -> Self {
		Self { message: message.to_string() }
	}

	fn respond(&self) -> BoxFuture<'_, delve_providers::Result<Vec<SearchHit>>> {
		let message = self.message.clone();

		Box::pin(async move { Err(Error::InvalidResponse { message }) })
	}
}
impl SemanticSearchProvider for FailingSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		_retry: &'a RetryPolicy,
		_query: &'a str,
		_limit: u32,
		_created_after: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		self.respond()
	}
}
impl KeywordSearchProvider for FailingSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a SearchProviderConfig,
		_retry: &'a RetryPolicy,
		_query: &'a str,
		_limit: u32,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		self.respond()
	}
}

/// Serves scripted conversation bodies by url; unscripted urls fail.
#[derive(Default)]
pub struct ScriptedFetch {
	responses: Mutex<HashMap<String, Value>>,
	failures: Mutex<HashSet<String>>,
}
impl ScriptedFetch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn respond(self, url: &str, body: Value) -> Self {
		{
			let mut responses = self.responses.lock().unwrap_or_else(|err| err.into_inner());

			responses.insert(url.to_string(), body);
		}

		self
	}

	pub fn fail_on(self, url: &str) -> Self {
		{
			let mut failures = self.failures.lock().unwrap_or_else(|err| err.into_inner());

			failures.insert(url.to_string());
		}

		self
	}
}
impl FetchProvider for ScriptedFetch {
	fn conversation<'a>(
		&'a self,
		_cfg: &'a FetchProviderConfig,
		url: &'a str,
	) -> BoxFuture<'a, delve_providers::Result<Value>> {
		let failed = {
			let failures = self.failures.lock().unwrap_or_else(|err| err.into_inner());

			failures.contains(url)
		};
		let result = if failed {
			Err(Error::InvalidResponse { message: format!("Scripted fetch failure for {url}.") })
		} else {
			let responses = self.responses.lock().unwrap_or_else(|err| err.into_inner());

			responses.get(url).cloned().ok_or_else(|| Error::InvalidResponse {
				message: format!("No scripted response for {url}."),
			})
		};

		Box::pin(async move { result })
	}
}

/// Builds a summary straight from the conversation body: `url` becomes
/// `source_url`, `facts` is carried over, `confidence` defaults to 0.8.
pub struct EchoSummarizer;
impl SummarizerProvider for EchoSummarizer {
	fn summarize<'a>(
		&'a self,
		_cfg: &'a SummarizerProviderConfig,
		_retry: &'a RetryPolicy,
		conversation: &'a Value,
		_model: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Summary>> {
		let summary = Summary {
			source_url: conversation
				.get("url")
				.and_then(Value::as_str)
				.unwrap_or_default()
				.to_string(),
			facts: conversation.get("facts").and_then(Value::as_array).cloned().unwrap_or_default(),
			topics: Vec::new(),
			confidence: conversation.get("confidence").and_then(Value::as_f64).unwrap_or(0.8),
		};

		Box::pin(async move { Ok(summary) })
	}
}

/// Fails every summarize call.
pub struct FailingSummarizer;
impl SummarizerProvider for FailingSummarizer {
	fn summarize<'a>(
		&'a self,
		_cfg: &'a SummarizerProviderConfig,
		_retry: &'a RetryPolicy,
		_conversation: &'a Value,
		_model: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Summary>> {
		Box::pin(async move {
			Err(Error::InvalidResponse { message: "Scripted summarizer failure.".to_string() })
		})
	}
}
