use recast_types::FieldPolicy;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Engine behavior switches.
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes:
///
/// ```toml
/// numeric_substitution = false
/// field_policy = "all"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Install a layout-reinterpreting rule for types structurally equal to
	/// the fixed type when no explicit rule covers them.
	pub implicit_basic: bool,
	/// Route unmatched numeric types through the closest registered numeric
	/// rule that can hold them losslessly.
	pub numeric_substitution: bool,
	/// Struct field policy for generic struct rules that do not pick one.
	pub field_policy: FieldPolicy,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			implicit_basic: true,
			numeric_substitution: true,
			field_policy: FieldPolicy::Visible,
		}
	}
}

impl Config {
	pub fn parse(input: &str) -> Result<Self> {
		toml::from_str(input).map_err(|e| Error::Config(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_empty_document_is_default() {
		assert_eq!(Config::parse("").unwrap(), Config::default());
	}

	#[test]
	fn test_partial_override() {
		let config = Config::parse("numeric_substitution = false\nfield_policy = \"all\"\n").unwrap();
		assert!(config.implicit_basic);
		assert!(!config.numeric_substitution);
		assert_eq!(config.field_policy, FieldPolicy::All);
	}

	#[test]
	fn test_unknown_key_rejected() {
		assert!(matches!(Config::parse("fast = true"), Err(Error::Config(_))));
	}
}
