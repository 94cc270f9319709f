use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Outcome of a bulk validation: the caller's original strings mapped to whether each one is a
/// WhatsApp account, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResults {
	entries: Vec<(String, bool)>,
	index: HashMap<String, usize>,
}

impl ValidationResults {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
			index: HashMap::with_capacity(capacity),
		}
	}

	/// Re-inserting an existing key overwrites its value but keeps its position.
	pub fn insert(&mut self, original: impl Into<String>, valid: bool) {
		let original = original.into();
		match self.index.get(&original) {
			Some(&pos) => self.entries[pos].1 = valid,
			None => {
				self.index.insert(original.clone(), self.entries.len());
				self.entries.push((original, valid));
			}
		}
	}

	pub fn get(&self, original: &str) -> Option<bool> {
		self.index.get(original).map(|&pos| self.entries[pos].1)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), *v))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn valid_count(&self) -> usize {
		self.entries.iter().filter(|(_, v)| *v).count()
	}
}

impl FromIterator<(String, bool)> for ValidationResults {
	fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
		let mut results = ValidationResults::new();
		for (original, valid) in iter {
			results.insert(original, valid);
		}
		results
	}
}

impl IntoIterator for ValidationResults {
	type Item = (String, bool);
	type IntoIter = std::vec::IntoIter<(String, bool)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

impl Serialize for ValidationResults {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (original, valid) in &self.entries {
			map.serialize_entry(original, valid)?;
		}
		map.end()
	}
}
