// Copyright 2019-2021 Parity Technologies (UK) Ltd.
// This file is part of subclient.
//
// subclient is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// subclient is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with subclient.  If not, see <http://www.gnu.org/licenses/>.

use crate::lookup::NamingPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Client configuration. Every field is optional in the JSON form:
///
/// ```
/// use subclient::{lookup::NamingPolicy, settings::ClientSettings};
///
/// let settings = ClientSettings::from_json(r#"{ "namingPolicy": "exact" }"#).unwrap();
/// assert_eq!(settings.naming_policy, NamingPolicy::Exact);
/// assert_eq!(settings.metadata_ttl_ms, 3_600_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
	/// How module, call, constant and storage names are matched.
	pub naming_policy: NamingPolicy,
	/// Metadata older than this is fetched again before use.
	pub metadata_ttl_ms: u64,
}

impl Default for ClientSettings {
	fn default() -> Self {
		ClientSettings { naming_policy: NamingPolicy::CaseInsensitive, metadata_ttl_ms: 60 * 60 * 1000 }
	}
}

impl ClientSettings {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	pub fn metadata_ttl(&self) -> Duration {
		Duration::from_millis(self.metadata_ttl_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_gives_defaults() {
		assert_eq!(ClientSettings::from_json("{}").unwrap(), ClientSettings::default());
		assert_eq!(ClientSettings::default().metadata_ttl(), Duration::from_secs(3600));
	}

	#[test]
	fn fields_are_camel_case() {
		let settings = ClientSettings::from_json(r#"{"namingPolicy":"caseInsensitive","metadataTtlMs":0}"#).unwrap();
		assert_eq!(settings.naming_policy, NamingPolicy::CaseInsensitive);
		assert_eq!(settings.metadata_ttl(), Duration::ZERO);
	}

	#[test]
	fn unknown_fields_and_policies_are_rejected() {
		assert!(ClientSettings::from_json(r#"{"naming":"exact"}"#).is_err());
		assert!(ClientSettings::from_json(r#"{"namingPolicy":"fuzzy"}"#).is_err());
	}
}
