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

//! Storage keys.
//!
//! `twox_128(prefix) | twox_128(item) | hashed key 1 | hashed key 2 | ..`, where each map key
//! is SCALE encoded by the caller and hashed with the hasher declared at its position.

use crate::metadata::{ModuleStorage, StorageHasher, StorageItem};
use subclient_common::Hashing;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
	#[error("storage item '{item}' takes {expected} keys but {given} were given")]
	KeyCount { item: String, expected: usize, given: usize },
}

pub struct StorageKeyHasher<'a> {
	hashing: &'a dyn Hashing,
}

impl<'a> StorageKeyHasher<'a> {
	pub fn new(hashing: &'a dyn Hashing) -> Self {
		StorageKeyHasher { hashing }
	}

	/// The key of a plain item, which is also the prefix shared by every entry of a map.
	pub fn prefix(&self, storage: &ModuleStorage, item: &StorageItem) -> Vec<u8> {
		let mut key = Vec::with_capacity(32);
		key.extend(self.hashing.twox_128(storage.prefix.as_bytes()));
		key.extend(self.hashing.twox_128(item.name.as_bytes()));
		key
	}

	/// The full key of an entry. `keys` holds the encoded map keys, one per declared hasher.
	pub fn key(&self, storage: &ModuleStorage, item: &StorageItem, keys: &[Vec<u8>]) -> Result<Vec<u8>, StorageError> {
		let hashers = item.hashers();
		if hashers.len() != keys.len() {
			return Err(StorageError::KeyCount { item: item.name.clone(), expected: hashers.len(), given: keys.len() });
		}
		let mut out = self.prefix(storage, item);
		for (hasher, key) in hashers.iter().zip(keys) {
			self.hash_key(*hasher, key, &mut out);
		}
		log::trace!("storage key for {}.{}: {}", storage.prefix, item.name, hex::encode(&out));
		Ok(out)
	}

	pub fn hash_key(&self, hasher: StorageHasher, key: &[u8], out: &mut Vec<u8>) {
		match hasher {
			StorageHasher::Blake2_128 => out.extend(self.hashing.blake2_128(key)),
			StorageHasher::Blake2_256 => out.extend(self.hashing.blake2_256(key)),
			StorageHasher::Blake2_128Concat => {
				out.extend(self.hashing.blake2_128(key));
				out.extend_from_slice(key);
			}
			StorageHasher::Twox128 => out.extend(self.hashing.twox_128(key)),
			StorageHasher::Twox256 => out.extend(self.hashing.twox_256(key)),
			StorageHasher::Twox64Concat => {
				out.extend(self.hashing.twox_64(key));
				out.extend_from_slice(key);
			}
			StorageHasher::Identity => out.extend_from_slice(key),
		}
	}
}
