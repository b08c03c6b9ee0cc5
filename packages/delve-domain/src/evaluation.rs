use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Validated;

/// A point-in-time assessment of research progress. Produced by an external
/// collaborator; validated here with the same fail-closed contract as
/// [`crate::Summary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
	#[serde(default, alias = "coverageScore")]
	pub coverage_score: Option<f64>,
	#[serde(default, alias = "confidenceScore")]
	pub confidence_score: Option<f64>,
	#[serde(default, alias = "sourceDiversity")]
	pub source_diversity: Option<f64>,
	#[serde(default, alias = "aspectCompletion")]
	pub aspect_completion: Option<f64>,
	#[serde(default, alias = "missingAspects")]
	pub missing_aspects: Vec<String>,
	#[serde(default)]
	pub notes: Vec<String>,
}
impl Evaluation {
	pub fn from_value(value: Value) -> serde_json::Result<Self> {
		serde_json::from_value(value)
	}

	pub fn to_value(&self) -> Value {
		serde_json::json!({
			"coverage_score": self.coverage_score,
			"confidence_score": self.confidence_score,
			"source_diversity": self.source_diversity,
			"aspect_completion": self.aspect_completion,
			"missing_aspects": self.missing_aspects,
			"notes": self.notes,
		})
	}
}
impl Validated for Evaluation {
	fn validation_errors(&self) -> Vec<String> {
		let mut errors = Vec::new();

		for (label, score) in [
			("coverage_score", self.coverage_score),
			("confidence_score", self.confidence_score),
			("source_diversity", self.source_diversity),
			("aspect_completion", self.aspect_completion),
		] {
			match score {
				None => errors.push(format!("{label} must be present.")),
				Some(score) if !(0.0..=1.0).contains(&score) =>
					errors.push(format!("{label} must be in the range 0.0-1.0.")),
				Some(_) => {},
			}
		}

		errors
	}
}
