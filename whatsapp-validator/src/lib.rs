//! Check whether phone numbers are registered WhatsApp accounts by asking a remote validation API.
//!
//! The [validator::RapidApiValidator] normalizes input with a [formatter::PhoneNumberFormatter],
//! sends it through an [transport::HttpClient] and interprets the response. Bulk requests fall
//! back to one request per number when the API has no bulk endpoint.

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod driver;
pub mod formatter;
pub mod logger;
mod results;
pub mod transport;
pub mod validator;

pub use config::{ConfigError, ValidatorConfig};
pub use driver::{build_validator, Driver};
pub use formatter::{CanonicalNumber, DefaultFormatter, FormatError, PhoneNumberFormatter};
pub use logger::{LogLogger, Logger, NullLogger};
pub use results::ValidationResults;
pub use transport::{ApiRequest, HttpClient, TransportError, WebApiTransport};
pub use validator::{RapidApiValidator, ValidationError, WhatsAppValidator};
