//! Research orchestration over pluggable search, fetch, and summarizer
//! providers.

mod error;
pub mod ranking;
pub mod research;

pub use error::{Error, Result};
pub use research::{QueryPlan, ResearchOutcome, ResearchStatus, SearchTool};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use delve_config::{
	Config, FetchProviderConfig, Ranking, SearchProviderConfig, SummarizerProviderConfig,
};
use delve_domain::{Fact, Summary};
use delve_providers::{RetryPolicy, SearchHit};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait SemanticSearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		retry: &'a RetryPolicy,
		query: &'a str,
		limit: u32,
		created_after: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>>;
}

pub trait KeywordSearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		retry: &'a RetryPolicy,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>>;
}

pub trait FetchProvider
where
	Self: Send + Sync,
{
	fn conversation<'a>(
		&'a self,
		cfg: &'a FetchProviderConfig,
		url: &'a str,
	) -> BoxFuture<'a, delve_providers::Result<Value>>;
}

pub trait SummarizerProvider
where
	Self: Send + Sync,
{
	fn summarize<'a>(
		&'a self,
		cfg: &'a SummarizerProviderConfig,
		retry: &'a RetryPolicy,
		conversation: &'a Value,
		model: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Summary>>;
}

#[derive(Clone)]
pub struct Providers {
	pub semantic_search: Arc<dyn SemanticSearchProvider>,
	pub keyword_search: Arc<dyn KeywordSearchProvider>,
	pub fetch: Arc<dyn FetchProvider>,
	pub summarizer: Arc<dyn SummarizerProvider>,
}
impl Default for Providers {
	fn default() -> Self {
		let default = Arc::new(DefaultProviders);

		Self {
			semantic_search: default.clone(),
			keyword_search: default.clone(),
			fetch: default.clone(),
			summarizer: default,
		}
	}
}

/// HTTP-backed providers from [`delve_providers`].
pub struct DefaultProviders;
impl SemanticSearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		retry: &'a RetryPolicy,
		query: &'a str,
		limit: u32,
		created_after: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		Box::pin(delve_providers::search::semantic(cfg, retry, query, limit, created_after))
	}
}
impl KeywordSearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		retry: &'a RetryPolicy,
		query: &'a str,
		limit: u32,
	) -> BoxFuture<'a, delve_providers::Result<Vec<SearchHit>>> {
		Box::pin(delve_providers::search::keyword(cfg, retry, query, limit))
	}
}
impl FetchProvider for DefaultProviders {
	fn conversation<'a>(
		&'a self,
		cfg: &'a FetchProviderConfig,
		url: &'a str,
	) -> BoxFuture<'a, delve_providers::Result<Value>> {
		Box::pin(delve_providers::fetch::conversation(cfg, url))
	}
}
impl SummarizerProvider for DefaultProviders {
	fn summarize<'a>(
		&'a self,
		cfg: &'a SummarizerProviderConfig,
		retry: &'a RetryPolicy,
		conversation: &'a Value,
		model: Option<&'a str>,
	) -> BoxFuture<'a, delve_providers::Result<Summary>> {
		Box::pin(delve_providers::summarizer::summarize(cfg, retry, conversation, model))
	}
}

pub struct DelveService {
	pub cfg: Config,
	pub providers: Providers,
}
impl DelveService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::from_config(&self.cfg.retry)
	}

	/// Runs one research cycle; see [`research::research`].
	pub async fn research(&self, plan: &QueryPlan) -> ResearchOutcome {
		research::research(self, plan).await
	}

	pub fn ranking(&self) -> &Ranking {
		&self.cfg.ranking
	}

	/// Ranks facts against the question using the configured weights and
	/// returns the top slice in descending composite order.
	pub fn rank_facts(&self, facts: &[Fact], question: &str) -> Vec<Fact> {
		ranking::rank(facts, question, &self.cfg.ranking)
	}
}
