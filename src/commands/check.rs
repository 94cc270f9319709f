use log::*;
use serde_json::json;

use super::*;

#[derive(Debug, Clone, Parser)]
#[clap(about = "Check whether a single phone number is on WhatsApp")]
pub struct CheckCommand {
	#[clap(help = "Phone number in international format, eg. \"+1 234 567 890\".")]
	pub number: String,
}

impl ValidatorCommand for CheckCommand {
	fn execute(
		&self,
		validator: &dyn WhatsAppValidator,
		_driver: Driver,
		args: &GlobalArgs,
	) -> anyhow::Result<()> {
		info!("Checking {}", self.number);
		let valid = validator.validate(&self.number)?;
		println!("{}", render(&self.number, valid, args.json)?);
		Ok(())
	}
}

fn render(number: &str, valid: bool, json: bool) -> anyhow::Result<String> {
	if json {
		to_json(&json!({ "phone_number": number, "valid": valid }))
	} else {
		Ok(format!("{}: {}", number, verdict(valid)))
	}
}
