use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub agent: Agent,
	pub providers: Providers,
	#[serde(default)]
	pub research: Research,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub retry: Retry,
}

#[derive(Debug, Deserialize)]
pub struct Agent {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub semantic_search: SearchProviderConfig,
	pub keyword_search: SearchProviderConfig,
	pub fetch: FetchProviderConfig,
	pub summarizer: SummarizerProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct SearchProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct FetchProviderConfig {
	pub timeout_ms: u64,
	#[serde(default)]
	pub user_agent: Option<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizerProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Research {
	pub default_limit: u32,
}
impl Default for Research {
	fn default() -> Self {
		Self { default_limit: 10 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub semantic_weight: f64,
	pub freshness_weight: f64,
	pub confidence_weight: f64,
	pub freshness_tau_days: f64,
	pub top_k: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			semantic_weight: 0.5,
			freshness_weight: 0.2,
			confidence_weight: 0.3,
			freshness_tau_days: 30.0,
			top_k: 40,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Retry {
	pub max_attempts: u32,
	pub base_delay_ms: u64,
	pub max_delay_ms: u64,
}
impl Default for Retry {
	fn default() -> Self {
		Self { max_attempts: 3, base_delay_ms: 1_000, max_delay_ms: 10_000 }
	}
}
