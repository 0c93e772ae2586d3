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

/// The hash functions storage keys and signing payloads are built from.
pub trait Hashing: Send + Sync {
	fn blake2_128(&self, data: &[u8]) -> [u8; 16];
	fn blake2_256(&self, data: &[u8]) -> [u8; 32];
	fn twox_64(&self, data: &[u8]) -> [u8; 8];
	fn twox_128(&self, data: &[u8]) -> [u8; 16];
	fn twox_256(&self, data: &[u8]) -> [u8; 32];
}

/// [`Hashing`] using the implementations from `sp-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstrateHashing;

impl Hashing for SubstrateHashing {
	fn blake2_128(&self, data: &[u8]) -> [u8; 16] {
		sp_core::blake2_128(data)
	}

	fn blake2_256(&self, data: &[u8]) -> [u8; 32] {
		sp_core::blake2_256(data)
	}

	fn twox_64(&self, data: &[u8]) -> [u8; 8] {
		sp_core::twox_64(data)
	}

	fn twox_128(&self, data: &[u8]) -> [u8; 16] {
		sp_core::twox_128(data)
	}

	fn twox_256(&self, data: &[u8]) -> [u8; 32] {
		sp_core::twox_256(data)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn twox_128_of_well_known_prefixes() {
		let hashing = SubstrateHashing;
		assert_eq!(hex::encode(hashing.twox_128(b"System")), "26aa394eea5630e07c48ae0c9558cef7");
		assert_eq!(hex::encode(hashing.twox_128(b"Account")), "b99d880ec681799c0cf30e8886371da9");
		assert_eq!(hex::encode(hashing.twox_128(b"Timestamp")), "f0c365c3cf59d671eb72da0e7a4113c4");
		assert_eq!(hex::encode(hashing.twox_128(b"Now")), "9f1f0515f462cdcf84e0f1d6045dfcbb");
	}
}
