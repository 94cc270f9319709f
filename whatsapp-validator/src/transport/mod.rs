pub mod webapi;

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
pub use webapi::WebApiTransport;

/// A JSON request to the validation API, described as plain data.
#[derive(Debug, Clone)]
pub struct ApiRequest {
	method: Method,
	url: String,
	headers: Vec<(String, String)>,
	body: Value,
}

impl ApiRequest {
	pub fn new(method: Method, url: impl Into<String>, body: Value) -> Self {
		Self {
			method,
			url: url.into(),
			headers: vec![],
			body,
		}
	}

	pub fn post(url: impl Into<String>, body: Value) -> Self {
		Self::new(Method::POST, url, body)
	}

	#[must_use]
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn headers(&self) -> &[(String, String)] {
		&self.headers
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}

	pub fn body(&self) -> &Value {
		&self.body
	}
}

/// Sends a request and hands back the decoded JSON body.
///
/// Implementations own timeouts and retries. Callers only ever see the final outcome.
pub trait HttpClient {
	fn send(&self, req: ApiRequest) -> Result<Value, TransportError>;
}

impl<T> HttpClient for &T
where
	T: HttpClient + ?Sized,
{
	fn send(&self, req: ApiRequest) -> Result<Value, TransportError> {
		(**self).send(req)
	}
}

impl<T> HttpClient for Arc<T>
where
	T: HttpClient + ?Sized,
{
	fn send(&self, req: ApiRequest) -> Result<Value, TransportError> {
		(**self).send(req)
	}
}

impl<T> HttpClient for Box<T>
where
	T: HttpClient + ?Sized,
{
	fn send(&self, req: ApiRequest) -> Result<Value, TransportError> {
		(**self).send(req)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error("API request failed: {0}")]
	Network(String),
	#[error("API request failed with status code: {status}")]
	Status { status: u16, body: String },
	#[error("Invalid API response: {0}")]
	Decode(#[from] serde_json::Error),
}

impl TransportError {
	/// Whether another attempt at the same request could reasonably succeed.
	pub fn is_retryable(&self) -> bool {
		match self {
			TransportError::Network(_) => true,
			TransportError::Status { status, .. } => *status == 429 || *status >= 500,
			TransportError::Decode(_) => false,
		}
	}
}

impl From<reqwest::Error> for TransportError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			return TransportError::Network(format!("request timed out: {}", err));
		}
		TransportError::Network(err.to_string())
	}
}
