use log::*;
use whatsapp_validator::{DefaultFormatter, PhoneNumberFormatter};

use super::*;
use crate::errors::InputError;

#[derive(Debug, Clone, Parser)]
#[clap(about = "Show how phone numbers are normalized, without contacting the API")]
pub struct FormatCommand {
	#[clap(required = true, help = "One or more phone numbers.")]
	pub numbers: Vec<String>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Formatted<'a> {
	input: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	canonical: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	api_form: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<String>,
}

impl Formatted<'_> {
	fn render(&self) -> String {
		match (&self.canonical, &self.api_form, &self.error) {
			(Some(canonical), Some(api_form), _) => {
				format!("{}: {} (api: {})", self.input, canonical, api_form)
			}
			(_, _, Some(error)) => format!("{}: {}", self.input, error),
			_ => format!("{}: ?", self.input),
		}
	}
}

fn describe<'a, F: PhoneNumberFormatter>(formatter: &F, input: &'a str) -> Formatted<'a> {
	match formatter.normalize(input) {
		Ok(canonical) => Formatted {
			input,
			api_form: Some(formatter.to_api_form(&canonical)),
			canonical: Some(canonical.to_string()),
			error: None,
		},
		Err(e) => Formatted {
			input,
			canonical: None,
			api_form: None,
			error: Some(e.to_string()),
		},
	}
}

impl ConstCommand for FormatCommand {
	fn execute(&self, args: &GlobalArgs) -> anyhow::Result<()> {
		let formatter = DefaultFormatter;
		let described: Vec<Formatted> = self
			.numbers
			.iter()
			.map(|n| describe(&formatter, n))
			.collect();

		if args.json {
			println!("{}", to_json(&described)?);
		} else {
			for d in &described {
				println!("{}", d.render());
			}
		}

		let failed = described.iter().filter(|d| d.error.is_some()).count();
		if failed > 0 {
			debug!("{} of {} numbers rejected", failed, described.len());
			return Err(InputError::Unformattable(failed, described.len()).into());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_describe_valid() {
		let d = describe(&DefaultFormatter, "+1 (234) 567-890");
		assert_eq!(d.canonical.as_deref(), Some("+1234567890"));
		assert_eq!(d.api_form.as_deref(), Some("1234567890"));
		assert_eq!(d.render(), "+1 (234) 567-890: +1234567890 (api: 1234567890)");
	}

	#[test]
	fn test_describe_invalid() {
		let d = describe(&DefaultFormatter, "+0123");
		assert!(d.canonical.is_none());
		assert_eq!(d.render(), "+0123: Invalid phone number format");
		assert_eq!(
			serde_json::to_value(&d).unwrap(),
			serde_json::json!({"input": "+0123", "error": "Invalid phone number format"})
		);
	}
}
