use std::{fmt, str::FromStr};

use crate::{
	config::{ConfigError, ValidatorConfig},
	formatter::DefaultFormatter,
	logger::Logger,
	transport::HttpClient,
	validator::{RapidApiValidator, ValidationError, WhatsAppValidator},
};

/// Validation backends that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Driver {
	#[default]
	RapidApi,
}

impl Driver {
	pub fn name(&self) -> &'static str {
		match self {
			Driver::RapidApi => "rapidapi",
		}
	}
}

impl fmt::Display for Driver {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Driver {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"rapidapi" => Ok(Driver::RapidApi),
			_ => Err(ConfigError::UnsupportedDriver(s.to_owned())),
		}
	}
}

/// Construct the validator for `driver`. New backends are added here.
pub fn build_validator<C, L>(
	driver: Driver,
	config: ValidatorConfig,
	client: C,
	logger: L,
) -> Result<Box<dyn WhatsAppValidator>, ValidationError>
where
	C: HttpClient + 'static,
	L: Logger + 'static,
{
	match driver {
		Driver::RapidApi => Ok(Box::new(RapidApiValidator::with_parts(
			config,
			client,
			logger,
			DefaultFormatter,
		)?)),
	}
}
