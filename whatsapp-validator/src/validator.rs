use std::collections::{HashMap, HashSet};

use log::debug;
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
	config::{ConfigError, ValidatorConfig},
	formatter::{CanonicalNumber, DefaultFormatter, FormatError, NormalizedNumbers, PhoneNumberFormatter},
	logger::{LogLogger, Logger},
	results::ValidationResults,
	transport::{ApiRequest, HttpClient, TransportError},
};

const HOST_HEADER: &str = "x-rapidapi-host";
const KEY_HEADER: &str = "x-rapidapi-key";

/// The operations every validation backend provides.
pub trait WhatsAppValidator {
	/// Whether `phone_number` is registered on WhatsApp.
	///
	/// Formatting errors surface before any request is made. Transport and API errors are logged
	/// and returned; they are never turned into `false`.
	fn validate(&self, phone_number: &str) -> Result<bool, ValidationError>;

	/// Validate many numbers, keyed by the strings exactly as they were passed in.
	///
	/// A single badly formatted number rejects the whole batch.
	fn validate_bulk(&self, phone_numbers: &[String]) -> Result<ValidationResults, ValidationError>;

	fn supports_bulk_validation(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
	#[error(transparent)]
	InvalidFormat(#[from] FormatError),
	#[error(transparent)]
	Transport(#[from] TransportError),
	#[error("Invalid API response: {0}")]
	InvalidApiResponse(String),
	#[error(transparent)]
	Configuration(#[from] ConfigError),
}

/// Validator for the RapidAPI WhatsApp number checker.
pub struct RapidApiValidator<C, L = LogLogger, F = DefaultFormatter>
where
	C: HttpClient,
	L: Logger,
	F: PhoneNumberFormatter,
{
	config: ValidatorConfig,
	client: C,
	logger: L,
	formatter: F,
}

impl<C> RapidApiValidator<C>
where
	C: HttpClient,
{
	pub fn new(config: ValidatorConfig, client: C) -> Result<Self, ValidationError> {
		Self::with_parts(config, client, LogLogger::default(), DefaultFormatter)
	}
}

impl<C, L, F> RapidApiValidator<C, L, F>
where
	C: HttpClient,
	L: Logger,
	F: PhoneNumberFormatter,
{
	/// Fails if `endpoint`, `key` or `host` is empty.
	pub fn with_parts(
		config: ValidatorConfig,
		client: C,
		logger: L,
		formatter: F,
	) -> Result<Self, ValidationError> {
		config.validate()?;
		Ok(Self {
			config,
			client,
			logger,
			formatter,
		})
	}

	pub fn config(&self) -> &ValidatorConfig {
		&self.config
	}

	fn request(&self, url: &str, body: Value) -> ApiRequest {
		ApiRequest::post(url, body)
			.with_header(HOST_HEADER, self.config.host.as_str())
			.with_header(KEY_HEADER, self.config.key.expose_secret().as_str())
	}

	fn perform_validation(&self, number: &CanonicalNumber) -> Result<bool, ValidationError> {
		let req = self.request(
			&self.config.endpoint,
			json!({ "phone_number": self.formatter.to_api_form(number) }),
		);
		let response = self.client.send(req)?;
		match status_of(&response) {
			Some(status) => Ok(status.as_str() == Some("valid")),
			None => Err(ValidationError::InvalidApiResponse(
				"missing status field".into(),
			)),
		}
	}

	/// Degraded bulk mode: one request per number. A failed number is logged and recorded as
	/// `false` without aborting the rest.
	fn validate_each(&self, numbers: &NormalizedNumbers) -> ValidationResults {
		let mut results = ValidationResults::with_capacity(numbers.len());
		for (original, canonical) in numbers {
			let valid = match self.perform_validation(canonical) {
				Ok(valid) => valid,
				Err(e) => {
					self.logger.error(
						"Validation failed",
						json!({ "phone_number": original, "error": e.to_string() }),
					);
					false
				}
			};
			results.insert(original.as_str(), valid);
		}
		results
	}

	fn perform_bulk_validation(
		&self,
		numbers: &NormalizedNumbers,
	) -> Result<ValidationResults, ValidationError> {
		let api_forms: Vec<String> = numbers
			.iter()
			.map(|(_, canonical)| self.formatter.to_api_form(canonical))
			.collect();
		let req = self.request(
			&self.config.bulk_endpoint,
			json!({ "phone_numbers": api_forms }),
		);
		let response = self.client.send(req)?;
		let entries = match response.as_array() {
			Some(entries) if !entries.is_empty() => entries,
			_ => {
				return Err(ValidationError::InvalidApiResponse(
					"expected array of results".into(),
				))
			}
		};

		let requested: HashSet<&str> = api_forms.iter().map(String::as_str).collect();
		let mut lookup: HashMap<String, bool> = HashMap::with_capacity(entries.len());
		for entry in entries {
			let (Some(number), Some(status)) = (
				entry.get("phone_number").and_then(digits_of),
				status_of(entry),
			) else {
				self.logger.error(
					"Skipping malformed bulk result entry",
					json!({ "entry": entry }),
				);
				continue;
			};
			if !requested.contains(number.as_str()) {
				// Matching is by digits only; a number echoed back in another representation
				// (e.g. with a `00` prefix) never lines up with what was sent.
				self.logger.info(
					"Bulk result does not match any requested number",
					json!({ "phone_number": number }),
				);
			}
			lookup.insert(number, status.as_str() == Some("valid"));
		}

		let mut results = ValidationResults::with_capacity(numbers.len());
		for ((original, _), api_form) in numbers.iter().zip(&api_forms) {
			let valid = lookup.get(api_form).copied().unwrap_or_else(|| {
				debug!("No bulk result for {}, recording as not validated", original);
				false
			});
			results.insert(original.as_str(), valid);
		}
		Ok(results)
	}
}

impl<C, L, F> WhatsAppValidator for RapidApiValidator<C, L, F>
where
	C: HttpClient,
	L: Logger,
	F: PhoneNumberFormatter,
{
	fn validate(&self, phone_number: &str) -> Result<bool, ValidationError> {
		let canonical = self.formatter.normalize(phone_number)?;
		self.perform_validation(&canonical).map_err(|e| {
			self.logger.error(
				"Validation failed",
				json!({ "phone_number": phone_number, "error": e.to_string() }),
			);
			e
		})
	}

	fn validate_bulk(&self, phone_numbers: &[String]) -> Result<ValidationResults, ValidationError> {
		let numbers = self.formatter.normalize_all(phone_numbers)?;
		if numbers.is_empty() {
			return Ok(ValidationResults::new());
		}

		if !self.supports_bulk_validation() {
			return Ok(self.validate_each(&numbers));
		}

		self.perform_bulk_validation(&numbers).map_err(|e| {
			self.logger.error(
				"Bulk validation failed",
				json!({ "phone_numbers": phone_numbers, "error": e.to_string() }),
			);
			e
		})
	}

	fn supports_bulk_validation(&self) -> bool {
		self.config.supports_bulk()
	}
}

/// A `null` status counts as absent.
fn status_of(value: &Value) -> Option<&Value> {
	value.get("status").filter(|status| !status.is_null())
}

/// The remote may echo numbers back as strings or bare JSON numbers.
fn digits_of(value: &Value) -> Option<String> {
	let raw = match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => n.to_string(),
		_ => return None,
	};
	Some(raw.chars().filter(char::is_ascii_digit).collect())
}

#[cfg(test)]
mod tests {
	use std::{
		cell::RefCell,
		collections::VecDeque,
		sync::{Arc, Mutex},
	};

	use super::*;
	use crate::logger::NullLogger;

	const ENDPOINT: &str = "https://api.test/WhatsappNumberHasItWithToken";
	const BULK_ENDPOINT: &str = "https://api.test/WhatsappNumberHasItBulkWithToken";

	/// Replays scripted outcomes in order and records every request it sees.
	#[derive(Default)]
	struct FakeClient {
		responses: RefCell<VecDeque<Result<Value, TransportError>>>,
		requests: RefCell<Vec<ApiRequest>>,
	}

	impl FakeClient {
		fn replying(responses: Vec<Result<Value, TransportError>>) -> Self {
			Self {
				responses: RefCell::new(responses.into()),
				requests: RefCell::new(vec![]),
			}
		}

		fn requests(&self) -> Vec<ApiRequest> {
			self.requests.borrow().clone()
		}
	}

	impl HttpClient for FakeClient {
		fn send(&self, req: ApiRequest) -> Result<Value, TransportError> {
			self.requests.borrow_mut().push(req);
			self.responses
				.borrow_mut()
				.pop_front()
				.expect("unexpected request: no scripted response left")
		}
	}

	#[derive(Default)]
	struct RecordingLogger {
		errors: Mutex<Vec<(String, Value)>>,
		infos: Mutex<Vec<(String, Value)>>,
	}

	impl Logger for RecordingLogger {
		fn error(&self, message: &str, context: Value) {
			self.errors.lock().unwrap().push((message.into(), context));
		}

		fn info(&self, message: &str, context: Value) {
			self.infos.lock().unwrap().push((message.into(), context));
		}
	}

	fn config() -> ValidatorConfig {
		ValidatorConfig::new(ENDPOINT, "test-key", "api.test")
	}

	fn bulk_config() -> ValidatorConfig {
		config().with_bulk_endpoint(BULK_ENDPOINT)
	}

	fn validator(
		config: ValidatorConfig,
		client: &FakeClient,
	) -> RapidApiValidator<&FakeClient, NullLogger> {
		RapidApiValidator::with_parts(config, client, NullLogger, DefaultFormatter).unwrap()
	}

	fn numbers(raws: &[&str]) -> Vec<String> {
		raws.iter().map(|s| s.to_string()).collect()
	}

	fn network_error() -> TransportError {
		TransportError::Network("connection refused".into())
	}

	#[test]
	fn test_validate_valid_number() {
		let client = FakeClient::replying(vec![Ok(
			json!({"status": "valid", "phone_number": "1234567890"}),
		)]);
		assert!(validator(config(), &client).validate("+1234567890").unwrap());

		let requests = client.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].method(), &reqwest::Method::POST);
		assert_eq!(requests[0].url(), ENDPOINT);
		assert_eq!(requests[0].body(), &json!({"phone_number": "1234567890"}));
		assert_eq!(requests[0].header("x-rapidapi-host"), Some("api.test"));
		assert_eq!(requests[0].header("x-rapidapi-key"), Some("test-key"));
	}

	#[test]
	fn test_validate_invalid_number() {
		let client = FakeClient::replying(vec![Ok(
			json!({"status": "invalid", "phone_number": "1234567890"}),
		)]);
		assert!(!validator(config(), &client).validate("+1234567890").unwrap());
	}

	#[test]
	fn test_validate_unknown_status_is_not_registered() {
		let client = FakeClient::replying(vec![Ok(json!({"status": "VALID"}))]);
		assert!(!validator(config(), &client).validate("+1234567890").unwrap());
	}

	#[test]
	fn test_validate_missing_status() {
		let client = FakeClient::replying(vec![Ok(json!({"phone_number": "1234567890"}))]);
		let err = validator(config(), &client)
			.validate("+1234567890")
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidApiResponse(ref msg) if msg == "missing status field"));
	}

	#[test]
	fn test_validate_null_status_is_missing() {
		let client = FakeClient::replying(vec![Ok(json!({"status": null}))]);
		let err = validator(config(), &client)
			.validate("+1234567890")
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidApiResponse(ref msg) if msg == "missing status field"));
	}

	#[test]
	fn test_validate_non_object_response() {
		let client = FakeClient::replying(vec![Ok(json!(["valid"]))]);
		let err = validator(config(), &client)
			.validate("+1234567890")
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidApiResponse(_)));
	}

	#[test]
	fn test_validate_sends_api_form() {
		let client = FakeClient::replying(vec![Ok(json!({"status": "valid"}))]);
		validator(config(), &client)
			.validate("+1 (234) 567-890")
			.unwrap();
		assert_eq!(
			client.requests()[0].body(),
			&json!({"phone_number": "1234567890"})
		);
	}

	#[test]
	fn test_validate_bad_format_makes_no_request() {
		let client = FakeClient::default();
		let err = validator(config(), &client).validate("abc").unwrap_err();
		assert!(matches!(
			err,
			ValidationError::InvalidFormat(FormatError::InvalidNumber)
		));
		assert!(client.requests().is_empty());
	}

	#[test]
	fn test_validate_propagates_and_logs_transport_errors() {
		let client = FakeClient::replying(vec![Err(TransportError::Status {
			status: 500,
			body: String::new(),
		})]);
		let logger = Arc::new(RecordingLogger::default());
		let validator =
			RapidApiValidator::with_parts(config(), &client, logger.clone(), DefaultFormatter)
				.unwrap();

		let err = validator.validate("+1234567890").unwrap_err();
		assert!(matches!(
			err,
			ValidationError::Transport(TransportError::Status { status: 500, .. })
		));

		let errors = logger.errors.lock().unwrap();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].0, "Validation failed");
		assert_eq!(errors[0].1["phone_number"], "+1234567890");
		assert_eq!(
			errors[0].1["error"],
			"API request failed with status code: 500"
		);
	}

	#[test]
	fn test_validate_bad_format_is_not_logged() {
		let client = FakeClient::default();
		let logger = Arc::new(RecordingLogger::default());
		let validator =
			RapidApiValidator::with_parts(config(), &client, logger.clone(), DefaultFormatter)
				.unwrap();
		assert!(validator.validate("+0").is_err());
		assert!(logger.errors.lock().unwrap().is_empty());
	}

	#[test]
	fn test_validate_bulk() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": "1234567890"},
			{"status": "invalid", "phone_number": "9876543210"},
		]))]);
		let results = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap();

		assert_eq!(results.get("+1234567890"), Some(true));
		assert_eq!(results.get("+9876543210"), Some(false));
		assert_eq!(results.len(), 2);

		let requests = client.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url(), BULK_ENDPOINT);
		assert_eq!(
			requests[0].body(),
			&json!({"phone_numbers": ["1234567890", "9876543210"]})
		);
		assert_eq!(requests[0].header("x-rapidapi-key"), Some("test-key"));
	}

	#[test]
	fn test_validate_bulk_keys_by_original_and_keeps_order() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": "9876543210"},
			{"status": "valid", "phone_number": "1234567890"},
		]))]);
		let results = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["1 234 567 890", "+98-7654-3210"]))
			.unwrap();
		let entries: Vec<(&str, bool)> = results.iter().collect();
		assert_eq!(
			entries,
			vec![("1 234 567 890", true), ("+98-7654-3210", true)]
		);
	}

	#[test]
	fn test_validate_bulk_omitted_number_defaults_to_false() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": "1234567890"},
		]))]);
		let results = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(true));
		assert_eq!(results.get("+9876543210"), Some(false));
	}

	#[test]
	fn test_validate_bulk_skips_malformed_entries() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"phone_number": "1234567890"},
			{"status": "valid"},
			"garbage",
			{"status": null, "phone_number": "9876543210"},
			{"status": "valid", "phone_number": "5550001111"},
		]))]);
		let logger = Arc::new(RecordingLogger::default());
		let validator = RapidApiValidator::with_parts(
			bulk_config(),
			&client,
			logger.clone(),
			DefaultFormatter,
		)
		.unwrap();

		let results = validator
			.validate_bulk(&numbers(&["+1234567890", "+5550001111"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(false));
		assert_eq!(results.get("+5550001111"), Some(true));

		let errors = logger.errors.lock().unwrap();
		assert_eq!(errors.len(), 4);
		assert!(errors
			.iter()
			.all(|(msg, _)| msg == "Skipping malformed bulk result entry"));
	}

	#[test]
	fn test_validate_bulk_accepts_numeric_and_formatted_echoes() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": 1234567890u64},
			{"status": "valid", "phone_number": "+98 7654 3210"},
		]))]);
		let results = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(true));
		assert_eq!(results.get("+9876543210"), Some(true));
	}

	#[test]
	fn test_validate_bulk_logs_unmatched_results() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": "001234567890"},
		]))]);
		let logger = Arc::new(RecordingLogger::default());
		let validator = RapidApiValidator::with_parts(
			bulk_config(),
			&client,
			logger.clone(),
			DefaultFormatter,
		)
		.unwrap();

		let results = validator
			.validate_bulk(&numbers(&["+1234567890"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(false));

		let infos = logger.infos.lock().unwrap();
		assert_eq!(infos.len(), 1);
		assert_eq!(infos[0].1["phone_number"], "001234567890");
	}

	#[test]
	fn test_validate_bulk_empty_response() {
		let client = FakeClient::replying(vec![Ok(json!([]))]);
		let err = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890"]))
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidApiResponse(ref msg) if msg == "expected array of results"));
	}

	#[test]
	fn test_validate_bulk_object_response() {
		let client = FakeClient::replying(vec![Ok(json!({"status": "valid"}))]);
		let err = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890"]))
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidApiResponse(_)));
	}

	#[test]
	fn test_validate_bulk_empty_input_makes_no_request() {
		let client = FakeClient::default();
		let bulk = validator(bulk_config(), &client).validate_bulk(&[]).unwrap();
		let degraded = validator(config(), &client).validate_bulk(&[]).unwrap();
		assert!(bulk.is_empty());
		assert!(degraded.is_empty());
		assert!(client.requests().is_empty());
	}

	#[test]
	fn test_validate_bulk_bad_format_aborts_batch() {
		let client = FakeClient::default();
		let err = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "nope", "+0"]))
			.unwrap_err();
		match err {
			ValidationError::InvalidFormat(FormatError::InvalidBatch(errors)) => {
				assert_eq!(errors.len(), 2);
				assert!(errors[0].starts_with("Invalid phone number at index 1"));
				assert!(errors[1].starts_with("Invalid phone number at index 2"));
			}
			other => panic!("unexpected error: {:?}", other),
		}
		assert!(client.requests().is_empty());
	}

	#[test]
	fn test_validate_bulk_transport_error_propagates() {
		let client = FakeClient::replying(vec![Err(network_error())]);
		let logger = Arc::new(RecordingLogger::default());
		let validator = RapidApiValidator::with_parts(
			bulk_config(),
			&client,
			logger.clone(),
			DefaultFormatter,
		)
		.unwrap();

		let err = validator
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap_err();
		assert!(matches!(
			err,
			ValidationError::Transport(TransportError::Network(_))
		));

		let errors = logger.errors.lock().unwrap();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].0, "Bulk validation failed");
		assert_eq!(
			errors[0].1["phone_numbers"],
			json!(["+1234567890", "+9876543210"])
		);
	}

	#[test]
	fn test_validate_bulk_degrades_without_bulk_endpoint() {
		let client = FakeClient::replying(vec![
			Ok(json!({"status": "valid", "phone_number": "1234567890"})),
			Ok(json!({"status": "invalid", "phone_number": "9876543210"})),
		]);
		let results = validator(config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(true));
		assert_eq!(results.get("+9876543210"), Some(false));

		let requests = client.requests();
		assert_eq!(requests.len(), 2);
		assert!(requests.iter().all(|r| r.url() == ENDPOINT));
		assert_eq!(requests[0].body(), &json!({"phone_number": "1234567890"}));
		assert_eq!(requests[1].body(), &json!({"phone_number": "9876543210"}));
	}

	#[test]
	fn test_validate_bulk_degraded_failure_records_false() {
		let client = FakeClient::replying(vec![
			Err(network_error()),
			Ok(json!({"status": "valid", "phone_number": "9876543210"})),
		]);
		let logger = Arc::new(RecordingLogger::default());
		let validator =
			RapidApiValidator::with_parts(config(), &client, logger.clone(), DefaultFormatter)
				.unwrap();

		let results = validator
			.validate_bulk(&numbers(&["+1234567890", "+9876543210"]))
			.unwrap();
		assert_eq!(results.get("+1234567890"), Some(false));
		assert_eq!(results.get("+9876543210"), Some(true));

		let errors = logger.errors.lock().unwrap();
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].1["phone_number"], "+1234567890");
	}

	#[test]
	fn test_validate_bulk_degraded_bad_format_still_aborts() {
		let client = FakeClient::default();
		let err = validator(config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "bad"]))
			.unwrap_err();
		assert!(matches!(err, ValidationError::InvalidFormat(_)));
		assert!(client.requests().is_empty());
	}

	#[test]
	fn test_validate_bulk_repeated_original_collapses() {
		let client = FakeClient::replying(vec![Ok(json!([
			{"status": "valid", "phone_number": "1234567890"},
		]))]);
		let results = validator(bulk_config(), &client)
			.validate_bulk(&numbers(&["+1234567890", "+1234567890"]))
			.unwrap();
		assert_eq!(results.len(), 1);
		assert_eq!(
			client.requests()[0].body(),
			&json!({"phone_numbers": ["1234567890"]})
		);
	}

	#[test]
	fn test_supports_bulk_validation() {
		let client = FakeClient::default();
		assert!(validator(bulk_config(), &client).supports_bulk_validation());
		assert!(!validator(config(), &client).supports_bulk_validation());
	}

	#[test]
	fn test_construction_requires_configuration() {
		let client = FakeClient::default();
		let cases = [
			(ValidatorConfig::new("", "key", "host"), "endpoint"),
			(ValidatorConfig::new(ENDPOINT, "", "host"), "key"),
			(ValidatorConfig::new(ENDPOINT, "key", ""), "host"),
		];
		for (config, field) in cases {
			let err = RapidApiValidator::new(config, &client).err().unwrap();
			assert!(matches!(
				err,
				ValidationError::Configuration(ConfigError::Missing(f)) if f == field
			));
		}
		assert!(client.requests().is_empty());
	}
}
