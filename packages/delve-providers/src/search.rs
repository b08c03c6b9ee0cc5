use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	Error, Result,
	retry::{RetryPolicy, with_retry},
};
use delve_config::SearchProviderConfig;

/// One raw search result. `url` stays optional here; the sub-agent, not the
/// parser, decides what to do with an unresolvable hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub snippet: Option<String>,
	#[serde(default)]
	pub score: Option<f64>,
}

pub async fn semantic(
	cfg: &SearchProviderConfig,
	retry: &RetryPolicy,
	query: &str,
	limit: u32,
	created_after: Option<&str>,
) -> Result<Vec<SearchHit>> {
	let mut body = serde_json::json!({ "query": query, "limit": limit });

	if let Some(created_after) = created_after {
		body["created_after"] = Value::String(created_after.to_string());
	}

	request(cfg, retry, body).await
}

// The keyword index has no date filter; `created_after` only applies to the
// semantic variant.
pub async fn keyword(
	cfg: &SearchProviderConfig,
	retry: &RetryPolicy,
	query: &str,
	limit: u32,
) -> Result<Vec<SearchHit>> {
	request(cfg, retry, serde_json::json!({ "query": query, "limit": limit })).await
}

async fn request(
	cfg: &SearchProviderConfig,
	retry: &RetryPolicy,
	body: Value,
) -> Result<Vec<SearchHit>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;

	with_retry(retry, "search", || {
		let client = client.clone();
		let url = url.clone();
		let headers = headers.clone();
		let body = body.clone();

		async move {
			let res = client.post(&url).headers(headers).json(&body).send().await?;
			let json: Value = res.error_for_status()?.json().await?;

			parse_search_response(json)
		}
	})
	.await
}

fn parse_search_response(json: Value) -> Result<Vec<SearchHit>> {
	let Some(items) = json.get("results").or_else(|| json.get("data")).and_then(Value::as_array)
	else {
		return Err(Error::InvalidResponse {
			message: "Search response is missing a results array.".to_string(),
		});
	};
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		out.push(serde_json::from_value(item.clone())?);
	}

	Ok(out)
}
