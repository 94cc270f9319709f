use super::*;

#[derive(Debug, Clone, Parser)]
#[clap(about = "Show the configured backend and what it supports")]
pub struct CapabilitiesCommand {}

#[derive(Debug, Serialize)]
struct Capabilities<'a> {
	driver: &'a str,
	bulk_validation: bool,
}

impl ValidatorCommand for CapabilitiesCommand {
	fn execute(
		&self,
		validator: &dyn WhatsAppValidator,
		driver: Driver,
		args: &GlobalArgs,
	) -> anyhow::Result<()> {
		let caps = Capabilities {
			driver: driver.name(),
			bulk_validation: validator.supports_bulk_validation(),
		};
		println!("{}", render(&caps, args.json)?);
		Ok(())
	}
}

fn render(caps: &Capabilities, json: bool) -> anyhow::Result<String> {
	if json {
		return to_json(caps);
	}
	Ok(format!(
		"driver: {}\nbulk validation: {}",
		caps.driver,
		if caps.bulk_validation {
			"supported"
		} else {
			"not supported (numbers are checked one at a time)"
		}
	))
}
