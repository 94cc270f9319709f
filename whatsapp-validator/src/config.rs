use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str =
	"https://whatsapp-number-validator3.p.rapidapi.com/WhatsappNumberHasItWithToken";
pub const DEFAULT_BULK_ENDPOINT: &str =
	"https://whatsapp-number-validator3.p.rapidapi.com/WhatsappNumberHasItBulkWithToken";
pub const DEFAULT_HOST: &str = "whatsapp-number-validator3.p.rapidapi.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Settings for the RapidAPI validator. Field names follow the host configuration file, and
/// fields left out of it take their [Default] values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
	pub endpoint: String,
	/// Empty means the API has no bulk endpoint.
	pub bulk_endpoint: String,
	pub key: SecretString,
	pub host: String,
	/// Seconds. Zero disables the timeout.
	pub timeout: u64,
	pub retry_attempts: u32,
}

/// The public RapidAPI service, with no key.
impl Default for ValidatorConfig {
	fn default() -> Self {
		Self::new(DEFAULT_ENDPOINT, String::new(), DEFAULT_HOST)
			.with_bulk_endpoint(DEFAULT_BULK_ENDPOINT)
	}
}

impl ValidatorConfig {
	pub fn new(
		endpoint: impl Into<String>,
		key: impl Into<String>,
		host: impl Into<String>,
	) -> Self {
		Self {
			endpoint: endpoint.into(),
			bulk_endpoint: String::new(),
			key: SecretString::new(key.into()),
			host: host.into(),
			timeout: DEFAULT_TIMEOUT_SECS,
			retry_attempts: DEFAULT_RETRY_ATTEMPTS,
		}
	}

	#[must_use]
	pub fn with_bulk_endpoint(mut self, bulk_endpoint: impl Into<String>) -> Self {
		self.bulk_endpoint = bulk_endpoint.into();
		self
	}

	#[must_use]
	pub fn with_timeout(mut self, seconds: u64) -> Self {
		self.timeout = seconds;
		self
	}

	#[must_use]
	pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
		self.retry_attempts = attempts;
		self
	}

	/// `None` when the timeout is disabled.
	pub fn timeout(&self) -> Option<Duration> {
		(self.timeout > 0).then(|| Duration::from_secs(self.timeout))
	}

	pub fn supports_bulk(&self) -> bool {
		!self.bulk_endpoint.is_empty()
	}

	/// Fails on the first required field that is empty.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.endpoint.is_empty() {
			return Err(ConfigError::Missing("endpoint"));
		}
		if self.key.expose_secret().is_empty() {
			return Err(ConfigError::Missing("key"));
		}
		if self.host.is_empty() {
			return Err(ConfigError::Missing("host"));
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	#[error("Missing required RapidAPI configuration: {0}")]
	Missing(&'static str),
	#[error("Unsupported WhatsApp validator driver: {0}")]
	UnsupportedDriver(String),
}
