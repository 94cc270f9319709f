use clap::Parser;
use log::*;
use whatsapp_validator::{build_validator, LogLogger, WebApiTransport};

use crate::commands::CommandType;
use crate::settings::Settings;

mod commands;
mod errors;
mod settings;

fn main() -> anyhow::Result<()> {
	let args = commands::Args::parse();

	stderrlog::new()
		.verbosity(args.global.verbosity as usize)
		.module(module_path!())
		.module("whatsapp_validator")
		.init()?;
	debug!("{:?}", args);

	let cmd: CommandType = args.sub.into();
	let cmd = match cmd {
		CommandType::Const(cmd) => return cmd.execute(&args.global),
		CommandType::Validator(cmd) => cmd,
	};

	let Settings { driver, rapidapi } =
		Settings::load(args.global.config.as_deref(), args.global.driver.as_deref())?;
	debug!(
		"driver: {}, endpoint: {}, bulk endpoint: {:?}",
		driver, rapidapi.endpoint, rapidapi.bulk_endpoint
	);
	let transport = WebApiTransport::from_config(&rapidapi)?;
	let validator = build_validator(driver, rapidapi, transport, LogLogger::default())?;

	cmd.execute(validator.as_ref(), driver, &args.global)
}
