use std::sync::Arc;

use serde_json::Value;

pub const DEFAULT_LOGGER_NAME: &str = "WhatsApp Number Validator";
const LOG_TARGET: &str = "whatsapp_validator";

/// Sink for non-fatal anomalies. Logging never changes control flow.
pub trait Logger {
	fn error(&self, message: &str, context: Value);
	fn info(&self, message: &str, context: Value);
}

impl<L> Logger for &L
where
	L: Logger + ?Sized,
{
	fn error(&self, message: &str, context: Value) {
		(**self).error(message, context)
	}

	fn info(&self, message: &str, context: Value) {
		(**self).info(message, context)
	}
}

impl<L> Logger for Arc<L>
where
	L: Logger + ?Sized,
{
	fn error(&self, message: &str, context: Value) {
		(**self).error(message, context)
	}

	fn info(&self, message: &str, context: Value) {
		(**self).info(message, context)
	}
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone)]
pub struct LogLogger {
	name: String,
}

impl LogLogger {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

impl Default for LogLogger {
	fn default() -> Self {
		Self::new(DEFAULT_LOGGER_NAME)
	}
}

impl Logger for LogLogger {
	fn error(&self, message: &str, context: Value) {
		log::error!(target: LOG_TARGET, "{}", render(&self.name, message, &context));
	}

	fn info(&self, message: &str, context: Value) {
		log::info!(target: LOG_TARGET, "{}", render(&self.name, message, &context));
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
	fn error(&self, _message: &str, _context: Value) {}

	fn info(&self, _message: &str, _context: Value) {}
}

fn render(name: &str, message: &str, context: &Value) -> String {
	let empty = match context {
		Value::Null => true,
		Value::Object(map) => map.is_empty(),
		_ => false,
	};
	if empty {
		format!("[{}] {}", name, message)
	} else {
		format!("[{}] {} {}", name, message, context)
	}
}
