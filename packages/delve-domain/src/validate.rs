use std::collections::HashSet;

use serde_json::Value;

/// Records that can report their own contract violations. `is_valid` is the
/// fail-closed check used before a record is trusted downstream.
pub trait Validated {
	fn validation_errors(&self) -> Vec<String>;

	fn is_valid(&self) -> bool {
		self.validation_errors().is_empty()
	}
}

pub fn extract_errors<T>(record: &T) -> Vec<String>
where
	T: Validated,
{
	record.validation_errors()
}

pub fn valid_json(text: &str) -> bool {
	serde_json::from_str::<Value>(text).is_ok()
}

/// True only if `value` is an object and every key is present either verbatim
/// or in its camelCase spelling. Upstream JSON producers are heterogeneous
/// about key casing.
pub fn has_required_keys(value: &Value, keys: &[&str]) -> bool {
	let Some(map) = value.as_object() else { return false };

	keys.iter().all(|key| map.contains_key(*key) || map.contains_key(&camel_case(key)))
}

/// Vacuously true for non-array input. String elements are compared trimmed
/// and lower-cased; other elements by their canonical JSON rendering, kept
/// type-distinct from strings.
pub fn no_duplicates(value: &Value) -> bool {
	let Some(items) = value.as_array() else { return true };
	let mut seen = HashSet::new();

	for item in items {
		let key = match item {
			Value::String(text) => ("string", text.trim().to_lowercase()),
			other => ("value", other.to_string()),
		};

		if !seen.insert(key) {
			return false;
		}
	}

	true
}

fn camel_case(key: &str) -> String {
	let mut out = String::with_capacity(key.len());
	let mut upper_next = false;

	for ch in key.chars() {
		if ch == '_' {
			upper_next = true;

			continue;
		}

		if upper_next {
			out.extend(ch.to_uppercase());

			upper_next = false;
		} else {
			out.push(ch);
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_camel_case_spelling() {
		let value = serde_json::json!({ "sourceUrl": "https://example.com" });

		assert!(has_required_keys(&value, &["source_url"]));
	}

	#[test]
	fn rejects_non_object_input() {
		assert!(!has_required_keys(&Value::String("not-a-map".to_string()), &["a"]));
	}

	#[test]
	fn parses_json_without_raising() {
		assert!(valid_json(r#"{"a": 1}"#));
		assert!(!valid_json("{not json"));
	}
}
