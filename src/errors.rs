use std::path::PathBuf;

use thiserror::Error;
use whatsapp_validator::ConfigError;

#[derive(Debug, Error)]
pub(crate) enum SettingsError {
	#[error("Failed to read config file {path}: {source}")]
	Read {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("Failed to parse config file {path}: {source}")]
	Parse {
		path: PathBuf,
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	#[error("Invalid value for {var}: {value:?}")]
	InvalidEnv { var: &'static str, value: String },
	#[error(transparent)]
	Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub(crate) enum InputError {
	#[error("No phone numbers given.")]
	NoNumbers,
	#[error("{0} of {1} phone numbers could not be formatted.")]
	Unformattable(usize, usize),
}
