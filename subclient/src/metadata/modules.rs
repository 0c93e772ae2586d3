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

use super::{types::newtype_enum, TypeId};
use subclient_codec::{scale_composite, scale_unit_enum};

/// A pallet, as described by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
	pub name: String,
	pub storage: Option<ModuleStorage>,
	/// Variant type listing the module's calls.
	pub calls: Option<TypeId>,
	pub events: Option<TypeId>,
	pub constants: Vec<ModuleConstant>,
	pub errors: Option<TypeId>,
	/// The first byte of every call into this module.
	pub index: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStorage {
	/// Hashed into the first half of every storage key of the module.
	pub prefix: String,
	pub items: Vec<StorageItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageItem {
	pub name: String,
	pub modifier: StorageModifier,
	pub ty: StorageItemType,
	/// Encoded value used when nothing is stored and the modifier is [`StorageModifier::Default`].
	pub fallback: Vec<u8>,
	pub docs: Vec<String>,
}

impl StorageItem {
	pub fn value_type(&self) -> TypeId {
		match &self.ty {
			StorageItemType::Plain(ty) => *ty,
			StorageItemType::Map(map) => map.value,
		}
	}

	/// Declared hashers, one per key. Empty for plain items.
	pub fn hashers(&self) -> &[StorageHasher] {
		match &self.ty {
			StorageItemType::Plain(_) => &[],
			StorageItemType::Map(map) => &map.hashers,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageModifier {
	Optional,
	Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageItemType {
	Plain(TypeId),
	Map(StorageMap),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageMap {
	pub hashers: Vec<StorageHasher>,
	pub key: TypeId,
	pub value: TypeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum StorageHasher {
	Blake2_128,
	Blake2_256,
	Blake2_128Concat,
	Twox128,
	Twox256,
	Twox64Concat,
	Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleConstant {
	pub name: String,
	pub ty: TypeId,
	/// SCALE encoded value.
	pub value: Vec<u8>,
	pub docs: Vec<String>,
}

scale_composite!(Module {
	name: String,
	storage: Option<ModuleStorage>,
	calls: Option<TypeId>,
	events: Option<TypeId>,
	constants: Vec<ModuleConstant>,
	errors: Option<TypeId>,
	index: u8,
});
scale_composite!(ModuleStorage { prefix: String, items: Vec<StorageItem> });
scale_composite!(StorageItem {
	name: String,
	modifier: StorageModifier,
	ty: StorageItemType,
	fallback: Vec<u8>,
	docs: Vec<String>,
});
scale_composite!(StorageMap { hashers: Vec<StorageHasher>, key: TypeId, value: TypeId });
scale_composite!(ModuleConstant { name: String, ty: TypeId, value: Vec<u8>, docs: Vec<String> });

scale_unit_enum!(StorageModifier { Optional = 0, Default = 1 });
scale_unit_enum!(StorageHasher {
	Blake2_128 = 0,
	Blake2_256 = 1,
	Blake2_128Concat = 2,
	Twox128 = 3,
	Twox256 = 4,
	Twox64Concat = 5,
	Identity = 6,
});

newtype_enum!(StorageItemType { Plain(TypeId) = 0, Map(StorageMap) = 1 });
