use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An atomic extracted claim with confidence and provenance. Confidence is
/// expected in [0, 1] but is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
	pub text: String,
	#[serde(default = "default_confidence")]
	pub confidence: f64,
	#[serde(default, alias = "extractedAt")]
	pub extracted_at: Option<String>,
	#[serde(default, alias = "aspectId")]
	pub aspect_id: Option<String>,
	#[serde(default, alias = "sourceUrl")]
	pub source_url: Option<String>,
}
impl Fact {
	pub fn from_value(value: Value) -> serde_json::Result<Self> {
		serde_json::from_value(value)
	}

	pub fn to_value(&self) -> Value {
		serde_json::json!({
			"text": self.text,
			"confidence": self.confidence,
			"extracted_at": self.extracted_at,
			"aspect_id": self.aspect_id,
			"source_url": self.source_url,
		})
	}
}

fn default_confidence() -> f64 {
	0.5
}
