use std::{
	fs::File,
	io::{BufReader, ErrorKind},
	path::{Path, PathBuf},
	str::FromStr,
};

use log::*;
use secrecy::SecretString;
use serde::Deserialize;
use whatsapp_validator::{Driver, ValidatorConfig};

use crate::errors::SettingsError;

const CONFIG_DIR_NAME: &str = "whatsapp-validator";
const CONFIG_FILE_NAME: &str = "config.json";

/// Shape of the config file. The environment overrides anything in it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
	driver: Option<String>,
	rapidapi: ValidatorConfig,
}

#[derive(Debug)]
pub(crate) struct Settings {
	pub driver: Driver,
	pub rapidapi: ValidatorConfig,
}

pub(crate) fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl Settings {
	/// Load settings from `path` (or the default location) with overrides from the process
	/// environment. `driver` takes precedence over both.
	pub fn load(path: Option<&Path>, driver: Option<&str>) -> Result<Self, SettingsError> {
		Self::load_with_env(path, driver, |var| std::env::var(var).ok())
	}

	fn load_with_env<E>(
		path: Option<&Path>,
		driver: Option<&str>,
		env: E,
	) -> Result<Self, SettingsError>
	where
		E: Fn(&str) -> Option<String>,
	{
		let file = match path {
			Some(path) => read_settings_file(path, true)?,
			None => match default_config_path() {
				Some(path) => read_settings_file(&path, false)?,
				None => {
					warn!("Could not determine config directory, using defaults");
					SettingsFile::default()
				}
			},
		};

		let driver = match driver
			.map(str::to_owned)
			.or_else(|| env("WHATSAPP_DRIVER"))
			.or(file.driver)
		{
			Some(name) => Driver::from_str(&name)?,
			None => Driver::default(),
		};

		let mut rapidapi = file.rapidapi;
		if let Some(endpoint) = env("WHATSAPP_RAPIDAPI_ENDPOINT") {
			rapidapi.endpoint = endpoint;
		}
		if let Some(bulk_endpoint) = env("WHATSAPP_RAPIDAPI_BULK_ENDPOINT") {
			rapidapi.bulk_endpoint = bulk_endpoint;
		}
		if let Some(key) = env("WHATSAPP_RAPIDAPI_KEY") {
			rapidapi.key = SecretString::new(key);
		}
		if let Some(host) = env("WHATSAPP_RAPIDAPI_HOST") {
			rapidapi.host = host;
		}
		if let Some(timeout) = parse_env(&env, "WHATSAPP_RAPIDAPI_TIMEOUT")? {
			rapidapi.timeout = timeout;
		}
		if let Some(attempts) = parse_env(&env, "WHATSAPP_RAPIDAPI_RETRY_ATTEMPTS")? {
			rapidapi.retry_attempts = attempts;
		}
		Ok(Self { driver, rapidapi })
	}
}

fn read_settings_file(path: &Path, required: bool) -> Result<SettingsFile, SettingsError> {
	let file = match File::open(path) {
		Ok(file) => file,
		Err(e) if e.kind() == ErrorKind::NotFound && !required => {
			debug!("No config file at {}, using defaults", path.display());
			return Ok(SettingsFile::default());
		}
		Err(source) => {
			return Err(SettingsError::Read {
				path: path.to_owned(),
				source,
			})
		}
	};
	debug!("Loading settings from {}", path.display());
	let mut deser = serde_json::Deserializer::from_reader(BufReader::new(file));
	serde_path_to_error::deserialize(&mut deser).map_err(|source| SettingsError::Parse {
		path: path.to_owned(),
		source,
	})
}

fn parse_env<E, T>(env: &E, var: &'static str) -> Result<Option<T>, SettingsError>
where
	E: Fn(&str) -> Option<String>,
	T: FromStr,
{
	match env(var) {
		Some(value) => value
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| SettingsError::InvalidEnv { var, value }),
		None => Ok(None),
	}
}
