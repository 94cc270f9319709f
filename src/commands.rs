use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;
use whatsapp_validator::{Driver, WhatsAppValidator};

pub mod bulk;
pub mod capabilities;
pub mod check;
pub mod completions;
pub mod format;

pub use bulk::BulkCommand;
pub use capabilities::CapabilitiesCommand;
pub use check::CheckCommand;
pub use completions::CompletionsCommand;
pub use format::FormatCommand;

/// A command that needs neither settings nor the network.
pub(crate) trait ConstCommand {
	fn execute(&self, args: &GlobalArgs) -> anyhow::Result<()>;
}

/// A command that talks to the validation API.
pub(crate) trait ValidatorCommand {
	fn execute(
		&self,
		validator: &dyn WhatsAppValidator,
		driver: Driver,
		args: &GlobalArgs,
	) -> anyhow::Result<()>;
}

pub(crate) enum CommandType {
	Const(Box<dyn ConstCommand>),
	Validator(Box<dyn ValidatorCommand>),
}

#[derive(Debug, Clone, Parser)]
#[clap(name="whatsapp-validator-cli", bin_name="wa-validate", author, version, about = "Check whether phone numbers are registered on WhatsApp.", long_about = None)]
pub(crate) struct Args {
	#[clap(flatten)]
	pub global: GlobalArgs,

	#[clap(subcommand)]
	pub sub: Subcommands,
}

#[derive(Debug, Clone, Parser)]
pub(crate) struct GlobalArgs {
	#[clap(
		short,
		long,
		global = true,
		help = "Path to the config file.",
		long_help = "Path to the config file. Default: <config dir>/whatsapp-validator/config.json, which may be absent. Every setting can also be given through WHATSAPP_* environment variables."
	)]
	pub config: Option<PathBuf>,
	#[clap(
		short,
		long,
		global = true,
		help = "Validation backend to use. Overrides the config file and WHATSAPP_DRIVER."
	)]
	pub driver: Option<String>,
	#[clap(long, global = true, help = "Print machine-readable JSON instead of text.")]
	pub json: bool,
	#[clap(short, long, global = true, value_enum, default_value_t=Verbosity::Info, help = "Set the log level. Be warned, trace is capable of printing sensitive data.")]
	pub verbosity: Verbosity,
}

#[derive(Debug, Clone, Parser)]
pub(crate) enum Subcommands {
	Check(CheckCommand),
	Bulk(BulkCommand),
	Format(FormatCommand),
	Capabilities(CapabilitiesCommand),
	Completion(CompletionsCommand),
}

impl From<Subcommands> for CommandType {
	fn from(sub: Subcommands) -> Self {
		match sub {
			Subcommands::Check(cmd) => CommandType::Validator(Box::new(cmd)),
			Subcommands::Bulk(cmd) => CommandType::Validator(Box::new(cmd)),
			Subcommands::Capabilities(cmd) => CommandType::Validator(Box::new(cmd)),
			Subcommands::Format(cmd) => CommandType::Const(Box::new(cmd)),
			Subcommands::Completion(cmd) => CommandType::Const(Box::new(cmd)),
		}
	}
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Verbosity {
	Error = 0,
	Warn = 1,
	Info = 2,
	Debug = 3,
	Trace = 4,
}

impl std::fmt::Display for Verbosity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_fmt(format_args!(
			"{}",
			match self {
				Verbosity::Error => "error",
				Verbosity::Warn => "warn",
				Verbosity::Info => "info",
				Verbosity::Debug => "debug",
				Verbosity::Trace => "trace",
			}
		))
	}
}

pub(crate) fn verdict(valid: bool) -> &'static str {
	if valid {
		"valid"
	} else {
		"invalid"
	}
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
	Ok(serde_json::to_string_pretty(value)?)
}
