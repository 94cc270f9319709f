use std::{
	fs::File,
	io::{self, BufRead, BufReader},
};

use anyhow::Context;
use log::*;

use super::*;
use crate::errors::InputError;

#[derive(Debug, Clone, Parser)]
#[clap(about = "Check many phone numbers at once")]
pub struct BulkCommand {
	#[clap(help = "Phone numbers to check.")]
	pub numbers: Vec<String>,
	#[clap(
		short,
		long,
		help = "Read phone numbers from a file, one per line. Blank lines and lines starting with # are ignored. Use - for stdin."
	)]
	pub file: Option<PathBuf>,
}

impl BulkCommand {
	fn collect_numbers(&self) -> anyhow::Result<Vec<String>> {
		let mut numbers = self.numbers.clone();
		if let Some(path) = &self.file {
			let from_file = if path.as_os_str() == "-" {
				read_numbers(io::stdin().lock())
			} else {
				let file = File::open(path)
					.with_context(|| format!("Failed to open {}", path.display()))?;
				read_numbers(BufReader::new(file))
			}
			.with_context(|| format!("Failed to read phone numbers from {}", path.display()))?;
			debug!("Read {} numbers from {}", from_file.len(), path.display());
			numbers.extend(from_file);
		}
		if numbers.is_empty() {
			return Err(InputError::NoNumbers.into());
		}
		Ok(numbers)
	}
}

impl ValidatorCommand for BulkCommand {
	fn execute(
		&self,
		validator: &dyn WhatsAppValidator,
		_driver: Driver,
		args: &GlobalArgs,
	) -> anyhow::Result<()> {
		let numbers = self.collect_numbers()?;
		if !validator.supports_bulk_validation() {
			info!(
				"Bulk endpoint not configured, checking {} numbers one at a time",
				numbers.len()
			);
		}

		let results = validator.validate_bulk(&numbers)?;
		info!(
			"{} of {} numbers are on WhatsApp",
			results.valid_count(),
			results.len()
		);

		if args.json {
			println!("{}", to_json(&results)?);
		} else {
			for (number, valid) in results.iter() {
				println!("{}: {}", number, verdict(valid));
			}
		}
		Ok(())
	}
}

fn read_numbers(reader: impl BufRead) -> io::Result<Vec<String>> {
	let mut numbers = vec![];
	for line in reader.lines() {
		let line = line?;
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		numbers.push(line.to_owned());
	}
	Ok(numbers)
}
