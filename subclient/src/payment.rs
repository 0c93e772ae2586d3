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

//! Fee estimates reported by `payment_queryFeeDetails`.

use crate::dynamic::Balance;
use serde::{de::Error as _, Deserialize, Deserializer};
use subclient_codec::U256;

/// The inclusion fee of an extrinsic, split into its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFeeDetails {
	#[serde(deserialize_with = "balance_from_hex")]
	pub base_fee: Balance,
	#[serde(deserialize_with = "balance_from_hex")]
	pub len_fee: Balance,
	#[serde(deserialize_with = "balance_from_hex")]
	pub adjusted_weight_fee: Balance,
}

impl QueryFeeDetails {
	pub fn total(&self) -> Balance {
		Balance(self.base_fee.0.saturating_add(self.len_fee.0).saturating_add(self.adjusted_weight_fee.0))
	}
}

/// Body of a `payment_queryFeeDetails` response. Unsigned extrinsics pay no inclusion fee.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeeDetailsResponse {
	#[serde(default)]
	pub inclusion_fee: Option<QueryFeeDetails>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrHex {
	Number(u64),
	Hex(String),
}

/// Fees arrive as big endian hex quantities (`"0x3e8"`), or as plain numbers from older nodes.
fn balance_from_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Balance, D::Error> {
	match NumberOrHex::deserialize(deserializer)? {
		NumberOrHex::Number(n) => Ok(Balance(U256::from(n))),
		NumberOrHex::Hex(text) => {
			let digits = text.strip_prefix("0x").unwrap_or(&text);
			U256::from_str_radix(digits, 16).map(Balance).map_err(|_| D::Error::custom(format!("invalid fee {text}")))
		}
	}
}
