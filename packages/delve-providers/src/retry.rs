use std::{fmt::Display, future::Future, time::Duration};

use tokio::time;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
}
impl RetryPolicy {
	pub fn from_config(cfg: &delve_config::Retry) -> Self {
		Self {
			max_attempts: cfg.max_attempts.max(1),
			base_delay: Duration::from_millis(cfg.base_delay_ms),
			max_delay: Duration::from_millis(cfg.max_delay_ms),
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: 3,
			base_delay: Duration::from_secs(1),
			max_delay: Duration::from_secs(10),
		}
	}
}

/// Runs `op` up to `policy.max_attempts` times with exponential backoff
/// between attempts. The final failure is returned to the caller unchanged;
/// intermediate failures are only logged.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	E: Display,
{
	let max_attempts = policy.max_attempts.max(1);
	let mut attempt = 0_u32;

	loop {
		attempt += 1;

		match op().await {
			Ok(value) => return Ok(value),
			Err(err) => {
				if attempt >= max_attempts {
					tracing::error!(
						error = %err,
						operation = label,
						attempts = max_attempts,
						"Operation failed. Retries exhausted.",
					);

					return Err(err);
				}

				let delay = delay_for_attempt(policy, attempt);

				tracing::warn!(
					error = %err,
					operation = label,
					attempt,
					delay_ms = delay.as_millis() as u64,
					"Operation failed. Retrying after backoff.",
				);
				time::sleep(delay).await;
			},
		}
	}
}

pub fn delay_for_attempt(policy: &RetryPolicy, attempt: u32) -> Duration {
	let exp = attempt.max(1).saturating_sub(1).min(6);
	let delay = policy.base_delay.saturating_mul(1 << exp);

	delay.min(policy.max_delay)
}
