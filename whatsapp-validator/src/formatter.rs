use std::collections::HashMap;
use std::fmt;

use regex::Regex;

lazy_static! {
	static ref CANONICAL_NUMBER: Regex = Regex::new(r"^\+[1-9][0-9]{1,14}$").unwrap();
}

/// A phone number in canonical form: `+` followed by 2 to 15 digits, the first of which is not zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalNumber(String);

impl CanonicalNumber {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The digits-only form that gets submitted to the remote API.
	pub fn to_api_form(&self) -> String {
		self.0.chars().filter(char::is_ascii_digit).collect()
	}
}

impl fmt::Display for CanonicalNumber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for CanonicalNumber {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
	#[error("Invalid phone number format")]
	InvalidNumber,
	/// One message per rejected element of a batch.
	#[error("{}", .0.join("\n"))]
	InvalidBatch(Vec<String>),
}

/// Original input paired with its canonical form, in input order.
///
/// Repeated originals occupy a single slot at the position where they first appeared.
pub type NormalizedNumbers = Vec<(String, CanonicalNumber)>;

pub trait PhoneNumberFormatter {
	/// Strip everything but digits and `+`, add a leading `+` if there is none, then check the
	/// result against the canonical syntax.
	fn normalize(&self, raw: &str) -> Result<CanonicalNumber, FormatError>;

	/// Normalize every element. Failures are collected rather than short-circuited, but any
	/// failure rejects the whole batch.
	fn normalize_all(&self, raws: &[String]) -> Result<NormalizedNumbers, FormatError> {
		let mut normalized: NormalizedNumbers = Vec::with_capacity(raws.len());
		let mut positions: HashMap<&str, usize> = HashMap::new();
		let mut errors = vec![];

		for (index, raw) in raws.iter().enumerate() {
			match self.normalize(raw) {
				Ok(canonical) => match positions.get(raw.as_str()) {
					Some(&pos) => normalized[pos].1 = canonical,
					None => {
						positions.insert(raw.as_str(), normalized.len());
						normalized.push((raw.clone(), canonical));
					}
				},
				Err(e) => errors.push(format!("Invalid phone number at index {}: {}", index, e)),
			}
		}

		if !errors.is_empty() {
			return Err(FormatError::InvalidBatch(errors));
		}
		Ok(normalized)
	}

	fn to_api_form(&self, canonical: &CanonicalNumber) -> String {
		canonical.to_api_form()
	}
}

/// Syntax-only formatter. There is no per-country length table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl PhoneNumberFormatter for DefaultFormatter {
	fn normalize(&self, raw: &str) -> Result<CanonicalNumber, FormatError> {
		let mut number: String = raw
			.chars()
			.filter(|c| c.is_ascii_digit() || *c == '+')
			.collect();

		if !number.starts_with('+') {
			number.insert(0, '+');
		}

		if !CANONICAL_NUMBER.is_match(&number) {
			return Err(FormatError::InvalidNumber);
		}
		Ok(CanonicalNumber(number))
	}
}
