use std::time::Duration;

use reqwest::{Client, header::USER_AGENT};
use serde_json::Value;

use crate::{Error, Result};
use delve_config::FetchProviderConfig;

/// Fetches one conversation payload. Non-success statuses and non-JSON bodies
/// are errors here; the sub-agent downgrades them to per-item skips.
pub async fn conversation(cfg: &FetchProviderConfig, url: &str) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let mut request = client.get(url).headers(crate::default_headers(&cfg.default_headers)?);

	if let Some(user_agent) = cfg.user_agent.as_deref() {
		request = request.header(USER_AGENT, user_agent);
	}

	let res = request.send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	if !json.is_object() {
		return Err(Error::InvalidResponse {
			message: "Conversation body is not a JSON object.".to_string(),
		});
	}

	Ok(json)
}
