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

//! Capabilities shared by the subclient crates: hashing, signing and a request/response
//! transport, each with an implementation backed by `sp-core` where one exists.

#![forbid(unsafe_code)]

mod hashing;
mod signing;
mod transport;

pub use hashing::{Hashing, SubstrateHashing};
pub use signing::{Signer, SignerError};
pub use transport::{Transport, TransportError};

/// Runtime spec version, as reported by `state_getRuntimeVersion` and signed through
/// `CheckSpecVersion`.
pub type SpecVersion = u32;

/// Hex encode bytes with a leading `0x`.
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
	format!("0x{}", hex::encode(bytes))
}

/// Decode hex, with or without a leading `0x`.
pub fn from_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
	hex::decode(text.strip_prefix("0x").unwrap_or(text))
}
