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

//! The pieces an extrinsic is assembled from.

use super::Era;
use crate::dynamic::{Balance, Index};
use serde::Deserialize;
use std::sync::Arc;
use subclient_common::{Signer, SpecVersion};

/// A call into a runtime module, addressed by name. `args` encode in the call's field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<A> {
	pub module: String,
	pub name: String,
	pub args: A,
}

impl<A> Call<A> {
	pub fn new(module: impl Into<String>, name: impl Into<String>, args: A) -> Self {
		Call { module: module.into(), name: name.into(), args }
	}
}

/// A call whose module and call indices have been resolved against the metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedPayload<A> {
	pub module_index: u8,
	pub call_index: u8,
	pub call: Call<A>,
}

/// Versions reported by `state_getRuntimeVersion`. Other fields of the response are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeVersion {
	pub spec_version: SpecVersion,
	pub transaction_version: u32,
}

/// Everything signed extensions need besides the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParams {
	pub account_id: [u8; 32],
	pub nonce: Index,
	pub tip: Balance,
	pub era: Era,
	pub genesis_hash: [u8; 32],
	/// Hash of the block the era starts at. The genesis hash is used when absent.
	pub block_hash: Option<[u8; 32]>,
	pub runtime_version: RuntimeVersion,
}

pub struct SignedPayload<A> {
	pub unsigned: UnsignedPayload<A>,
	pub params: SignatureParams,
	pub signer: Arc<dyn Signer>,
}

impl<A> SignedPayload<A> {
	pub fn new(unsigned: UnsignedPayload<A>, params: SignatureParams, signer: Arc<dyn Signer>) -> Self {
		SignedPayload { unsigned, params, signer }
	}
}
