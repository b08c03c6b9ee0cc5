use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{
	Error, Result,
	retry::{RetryPolicy, with_retry},
};
use delve_config::SummarizerProviderConfig;
use delve_domain::{Summary, Validated, has_required_keys, valid_json};

const SYSTEM_PROMPT: &str = "\
You summarize one conversation into structured research notes. Respond with a \
single JSON object: {\"source_url\": string, \"facts\": [{\"text\": string, \
\"confidence\": number}], \"topics\": [string], \"confidence\": number}. \
Confidence values are between 0 and 1. Echo the conversation's url as \
source_url. Respond with JSON only.";

pub async fn summarize(
	cfg: &SummarizerProviderConfig,
	retry: &RetryPolicy,
	conversation: &Value,
	model: Option<&str>,
) -> Result<Summary> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
	let model = model.filter(|model| !model.trim().is_empty()).unwrap_or(cfg.model.as_str());
	let body = serde_json::json!({
		"model": model,
		"temperature": cfg.temperature,
		"messages": build_messages(conversation),
	});

	with_retry(retry, "summarize", || {
		let client = client.clone();
		let url = url.clone();
		let headers = headers.clone();
		let body = body.clone();

		async move {
			let res = client.post(&url).headers(headers).json(&body).send().await?;
			let json: Value = res.error_for_status()?.json().await?;

			parse_summary_response(json, conversation)
		}
	})
	.await
}

fn build_messages(conversation: &Value) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": conversation.to_string() }),
	]
}

fn parse_summary_response(json: Value, conversation: &Value) -> Result<Summary> {
	let payload = extract_payload(json)?;

	if !has_required_keys(&payload, &["facts"]) {
		return Err(Error::InvalidResponse {
			message: "Summarizer payload is missing a facts key.".to_string(),
		});
	}

	let mut summary = Summary::from_value(payload)?;

	if summary.source_url.trim().is_empty()
		&& let Some(url) = conversation.get("url").and_then(Value::as_str)
	{
		summary.source_url = url.to_string();
	}

	let errors = summary.validation_errors();

	if !errors.is_empty() {
		return Err(Error::InvalidResponse {
			message: format!("Summarizer returned an invalid summary: {}", errors.join(" ")),
		});
	}

	Ok(summary)
}

fn extract_payload(json: Value) -> Result<Value> {
	if let Some(content) = json
		.get("choices")
		.and_then(Value::as_array)
		.and_then(|choices| choices.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|message| message.get("content"))
		.and_then(Value::as_str)
	{
		if !valid_json(content) {
			return Err(Error::InvalidResponse {
				message: "Summarizer content is not valid JSON.".to_string(),
			});
		}

		return Ok(serde_json::from_str(content)?);
	}

	if json.is_object() {
		return Ok(json);
	}

	Err(Error::InvalidResponse { message: "Summarizer response is missing JSON content.".to_string() })
}

#[cfg(test)]
mod tests {
	use super::*;

	fn conversation() -> Value {
		serde_json::json!({ "url": "https://example.com/c/1", "messages": [] })
	}

	#[test]
	fn parses_choice_content_json() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "{\"source_url\": \"https://example.com/c/1\", \"facts\": []}" } }
			]
		});
		let summary = parse_summary_response(json, &conversation()).expect("parse failed");

		assert_eq!(summary.source_url, "https://example.com/c/1");
		assert!(summary.facts.is_empty());
	}

	#[test]
	fn accepts_bare_object_payload() {
		let json = serde_json::json!({ "source_url": "https://example.com/c/1", "facts": [] });
		let summary = parse_summary_response(json, &conversation()).expect("parse failed");

		assert_eq!(summary.source_url, "https://example.com/c/1");
	}

	#[test]
	fn fills_missing_source_url_from_conversation() {
		let json = serde_json::json!({ "facts": [{ "text": "claim" }] });
		let summary = parse_summary_response(json, &conversation()).expect("parse failed");

		assert_eq!(summary.source_url, "https://example.com/c/1");
	}

	#[test]
	fn rejects_payload_without_facts_key() {
		let json = serde_json::json!({ "source_url": "https://example.com/c/1" });

		assert!(parse_summary_response(json, &conversation()).is_err());
	}

	#[test]
	fn rejects_out_of_range_confidence() {
		let json = serde_json::json!({
			"source_url": "https://example.com/c/1",
			"facts": [],
			"confidence": 1.2,
		});

		assert!(parse_summary_response(json, &conversation()).is_err());
	}

	#[test]
	fn rejects_non_json_content() {
		let json = serde_json::json!({
			"choices": [{ "message": { "content": "not json" } }]
		});

		assert!(parse_summary_response(json, &conversation()).is_err());
	}
}
