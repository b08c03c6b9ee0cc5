mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Agent, Config, FetchProviderConfig, Providers, Ranking, Research, Retry, SearchProviderConfig,
	SummarizerProviderConfig,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.agent.log_level.trim().is_empty() {
		return Err(Error::Validation { message: "agent.log_level must be non-empty.".to_string() });
	}

	for (label, provider) in [
		("semantic_search", &cfg.providers.semantic_search),
		("keyword_search", &cfg.providers.keyword_search),
	] {
		if provider.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_base must be non-empty."),
			});
		}
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_key must be non-empty."),
			});
		}
		if provider.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.providers.fetch.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.fetch.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.summarizer.api_base.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.summarizer.api_base must be non-empty.".to_string(),
		});
	}
	if cfg.providers.summarizer.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.summarizer.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.summarizer.model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.summarizer.model must be non-empty.".to_string(),
		});
	}
	if cfg.providers.summarizer.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.summarizer.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.research.default_limit == 0 {
		return Err(Error::Validation {
			message: "research.default_limit must be greater than zero.".to_string(),
		});
	}

	for (label, weight) in [
		("ranking.semantic_weight", cfg.ranking.semantic_weight),
		("ranking.freshness_weight", cfg.ranking.freshness_weight),
		("ranking.confidence_weight", cfg.ranking.confidence_weight),
	] {
		if !weight.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if weight < 0.0 {
			return Err(Error::Validation { message: format!("{label} must be zero or greater.") });
		}
	}

	if !cfg.ranking.freshness_tau_days.is_finite() || cfg.ranking.freshness_tau_days <= 0.0 {
		return Err(Error::Validation {
			message: "ranking.freshness_tau_days must be a positive finite number.".to_string(),
		});
	}
	if cfg.ranking.top_k == 0 {
		return Err(Error::Validation {
			message: "ranking.top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retry.max_attempts == 0 {
		return Err(Error::Validation {
			message: "retry.max_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.retry.base_delay_ms == 0 {
		return Err(Error::Validation {
			message: "retry.base_delay_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.retry.max_delay_ms < cfg.retry.base_delay_ms {
		return Err(Error::Validation {
			message: "retry.max_delay_ms must be at least retry.base_delay_ms.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.fetch
		.user_agent
		.as_deref()
		.map(|agent| agent.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.fetch.user_agent = None;
	}
}
