use std::{thread, time::Duration};

use log::{debug, trace, warn};
use reqwest::{
	blocking::Client,
	header::{ACCEPT, CONTENT_TYPE},
	Method,
};
use serde_json::Value;

use super::{ApiRequest, HttpClient, TransportError};
use crate::config::ValidatorConfig;

const RETRY_DELAY: Duration = Duration::from_millis(100);

/// [HttpClient] backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct WebApiTransport {
	client: Client,
	attempts: u32,
}

impl WebApiTransport {
	/// `attempts` is the total number of tries per request. Zero is treated as one.
	///
	/// A `None` or zero `timeout` lets requests run without a time limit.
	pub fn new(timeout: Option<Duration>, attempts: u32) -> Result<Self, TransportError> {
		let timeout = timeout.filter(|t| !t.is_zero());
		let client = Client::builder().timeout(timeout).gzip(true).build()?;
		Ok(Self {
			client,
			attempts: attempts.max(1),
		})
	}

	pub fn from_config(config: &ValidatorConfig) -> Result<Self, TransportError> {
		Self::new(config.timeout(), config.retry_attempts)
	}

	fn send_once(&self, req: &ApiRequest) -> Result<Value, TransportError> {
		let mut builder = self
			.client
			.request(req.method().clone(), req.url())
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json");
		for (name, value) in req.headers() {
			builder = builder.header(name.as_str(), value.as_str());
		}
		builder = if *req.method() == Method::GET {
			builder.query(&query_pairs(req.body()))
		} else {
			builder.json(req.body())
		};

		let resp = builder.send()?;
		let status = resp.status();
		debug!("Response HTTP status: {}", status);

		let bytes = resp.bytes()?;
		trace!("Response body: {:?}", bytes);

		if !status.is_success() {
			let body = String::from_utf8_lossy(&bytes).into_owned();
			debug!("Error response body: {}", body);
			return Err(TransportError::Status {
				status: status.as_u16(),
				body,
			});
		}
		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(Value::Null);
		}
		Ok(serde_json::from_slice(&bytes)?)
	}
}

impl HttpClient for WebApiTransport {
	fn send(&self, req: ApiRequest) -> Result<Value, TransportError> {
		debug!("HTTP Request: {} {}", req.method(), req.url());
		let mut attempt = 1;
		loop {
			match self.send_once(&req) {
				Err(e) if e.is_retryable() && attempt < self.attempts => {
					warn!(
						"Attempt {}/{} for {} failed: {}",
						attempt,
						self.attempts,
						req.url(),
						e
					);
					thread::sleep(RETRY_DELAY);
					attempt += 1;
				}
				result => return result,
			}
		}
	}
}

/// Flatten the scalar top-level fields of a JSON object into query parameters.
fn query_pairs(body: &Value) -> Vec<(String, String)> {
	let Some(fields) = body.as_object() else {
		return vec![];
	};
	fields
		.iter()
		.filter_map(|(key, value)| {
			let value = match value {
				Value::String(s) => s.clone(),
				Value::Number(n) => n.to_string(),
				Value::Bool(b) => b.to_string(),
				_ => return None,
			};
			Some((key.clone(), value))
		})
		.collect()
}
