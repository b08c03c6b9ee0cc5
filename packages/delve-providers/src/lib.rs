pub mod fetch;
pub mod retry;
pub mod search;
pub mod summarizer;

mod error;

pub use error::{Error, Result};
pub use retry::{RetryPolicy, with_retry};
pub use search::SearchHit;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn default_headers(headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut out = HeaderMap::new();

	for (key, value) in headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		out.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(out)
}

pub fn auth_headers(api_key: &str, headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut out = default_headers(headers)?;

	out.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	Ok(out)
}
