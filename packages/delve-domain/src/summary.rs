use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Fact, Validated};

/// A distilled view of one fetched conversation. `facts` keeps the
/// summarizer's raw records; conversion into [`Fact`] happens in
/// [`Summary::to_facts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
	#[serde(default, alias = "sourceUrl")]
	pub source_url: String,
	#[serde(default)]
	pub facts: Vec<Value>,
	#[serde(default)]
	pub topics: Vec<String>,
	#[serde(default = "default_confidence")]
	pub confidence: f64,
}
impl Summary {
	pub fn from_value(value: Value) -> serde_json::Result<Self> {
		serde_json::from_value(value)
	}

	pub fn to_value(&self) -> Value {
		serde_json::json!({
			"source_url": self.source_url,
			"facts": self.facts,
			"topics": self.topics,
			"confidence": self.confidence,
		})
	}

	/// Converts the raw fact records into tagged [`Fact`]s. Records without a
	/// non-blank `text` are skipped; a missing per-fact confidence inherits
	/// the summary's; a missing per-fact source falls back to the summary's.
	pub fn to_facts(&self, aspect_id: Option<&str>, now: OffsetDateTime) -> Vec<Fact> {
		let extracted_at = now.format(&Rfc3339).ok();
		let mut out = Vec::with_capacity(self.facts.len());

		for record in &self.facts {
			let Some(text) = record
				.get("text")
				.and_then(Value::as_str)
				.map(str::trim)
				.filter(|text| !text.is_empty())
			else {
				continue;
			};
			let confidence =
				record.get("confidence").and_then(Value::as_f64).unwrap_or(self.confidence);
			let source_url = record
				.get("source_url")
				.or_else(|| record.get("sourceUrl"))
				.and_then(Value::as_str)
				.filter(|url| !url.trim().is_empty())
				.unwrap_or(self.source_url.as_str());

			out.push(Fact {
				text: text.to_string(),
				confidence,
				extracted_at: extracted_at.clone(),
				aspect_id: aspect_id.map(ToString::to_string),
				source_url: Some(source_url.to_string()),
			});
		}

		out
	}
}
impl Validated for Summary {
	fn validation_errors(&self) -> Vec<String> {
		let mut errors = Vec::new();

		if self.source_url.trim().is_empty() {
			errors.push("source_url must be non-empty.".to_string());
		}
		if !(0.0..=1.0).contains(&self.confidence) {
			errors.push("confidence must be in the range 0.0-1.0.".to_string());
		}

		errors
	}
}

fn default_confidence() -> f64 {
	0.5
}
