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

//! Name and id based lookups over one metadata snapshot.
//!
//! Successful name lookups are memoized: modules by name, constants and storage items by
//! `(module, name)`. A [`Lookup`] never outlives its snapshot, so replacing the metadata
//! means building a new one and the caches go with the old.

use crate::metadata::{
	Module, ModuleConstant, ModuleStorage, RuntimeMetadata, RuntimeType, StorageItem, TypeDef, TypeDefVariant,
	VariantDef,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

/// How names given by callers are compared with the names declared by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingPolicy {
	Exact,
	#[default]
	CaseInsensitive,
}

impl NamingPolicy {
	pub fn matches(self, declared: &str, requested: &str) -> bool {
		match self {
			NamingPolicy::Exact => declared == requested,
			NamingPolicy::CaseInsensitive => declared.eq_ignore_ascii_case(requested),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	#[error("module '{0}' not found")]
	ModuleNotFound(String),
	#[error("constant '{module}.{name}' not found")]
	ConstantNotFound { module: String, name: String },
	#[error("module '{0}' has no storage")]
	StorageNotFound(String),
	#[error("storage item '{module}.{name}' not found")]
	StorageItemNotFound { module: String, name: String },
	#[error("could not find type with ID {0}")]
	TypeNotFound(u32),
	#[error("module '{0}' has no calls")]
	CallsNotFound(String),
	#[error("call '{module}.{name}' not found")]
	CallNotFound { module: String, name: String },
	#[error("extrinsic type has no parameter named '{0}'")]
	ParamNotFound(String),
	#[error("unexpected type; expecting a Variant type, but got {got}")]
	ExpectedVariant { got: String },
}

type ChildKey = (String, String);

pub struct Lookup {
	metadata: Arc<RuntimeMetadata>,
	policy: NamingPolicy,
	/// Position in the type table of each type id.
	types: HashMap<u32, usize>,
	modules: RwLock<HashMap<String, usize>>,
	constants: RwLock<HashMap<ChildKey, (usize, usize)>>,
	storage_items: RwLock<HashMap<ChildKey, (usize, usize)>>,
}

impl Lookup {
	pub fn new(metadata: Arc<RuntimeMetadata>, policy: NamingPolicy) -> Self {
		let types = metadata.lookup.types.iter().enumerate().map(|(pos, entry)| (entry.id.id(), pos)).collect();
		Lookup {
			metadata,
			policy,
			types,
			modules: RwLock::new(HashMap::new()),
			constants: RwLock::new(HashMap::new()),
			storage_items: RwLock::new(HashMap::new()),
		}
	}

	pub fn metadata(&self) -> &RuntimeMetadata {
		&self.metadata
	}

	pub fn policy(&self) -> NamingPolicy {
		self.policy
	}

	pub fn modules(&self) -> &[Module] {
		&self.metadata.modules
	}

	pub fn find_module(&self, name: &str) -> Result<&Module, LookupError> {
		let cached = self.modules.read().get(name).copied();
		if let Some(module) = cached.and_then(|pos| self.metadata.modules.get(pos)) {
			return Ok(module);
		}
		let pos = self.module_position(name)?;
		self.modules.write().insert(name.to_string(), pos);
		self.metadata.modules.get(pos).ok_or_else(|| LookupError::ModuleNotFound(name.into()))
	}

	pub fn find_constant(&self, module: &str, name: &str) -> Result<&ModuleConstant, LookupError> {
		let key = (module.to_string(), name.to_string());
		let cached = self.constants.read().get(&key).copied();
		if let Some(constant) = cached.and_then(|(m, c)| self.constant_at(m, c)) {
			return Ok(constant);
		}

		let module_pos = self.module_position(module)?;
		let not_found = || LookupError::ConstantNotFound { module: module.into(), name: name.into() };
		let constant_pos = self.metadata.modules[module_pos]
			.constants
			.iter()
			.position(|c| self.policy.matches(&c.name, name))
			.ok_or_else(not_found)?;
		self.constants.write().insert(key, (module_pos, constant_pos));
		self.constant_at(module_pos, constant_pos).ok_or_else(not_found)
	}

	/// The storage item, along with the storage block of its module (which holds the key prefix).
	pub fn find_storage_item(&self, module: &str, name: &str) -> Result<(&StorageItem, &ModuleStorage), LookupError> {
		let key = (module.to_string(), name.to_string());
		let cached = self.storage_items.read().get(&key).copied();
		if let Some(found) = cached.and_then(|(m, i)| self.storage_item_at(m, i)) {
			return Ok(found);
		}

		let module_pos = self.module_position(module)?;
		let storage = self.metadata.modules[module_pos]
			.storage
			.as_ref()
			.ok_or_else(|| LookupError::StorageNotFound(module.into()))?;
		let not_found = || LookupError::StorageItemNotFound { module: module.into(), name: name.into() };
		let item_pos = storage.items.iter().position(|i| self.policy.matches(&i.name, name)).ok_or_else(not_found)?;
		self.storage_items.write().insert(key, (module_pos, item_pos));
		self.storage_item_at(module_pos, item_pos).ok_or_else(not_found)
	}

	pub fn find_type(&self, id: u32) -> Result<&RuntimeType, LookupError> {
		self.types
			.get(&id)
			.and_then(|pos| self.metadata.lookup.types.get(*pos))
			.map(|entry| &entry.ty)
			.ok_or(LookupError::TypeNotFound(id))
	}

	/// The module and the call variant that `module.call` refers to.
	pub fn find_call(&self, module: &str, call: &str) -> Result<(&Module, &VariantDef), LookupError> {
		let found = self.find_module(module)?;
		let calls = found.calls.ok_or_else(|| LookupError::CallsNotFound(found.name.clone()))?;
		let variant = variants_of(self.find_type(calls.id())?)?
			.variants
			.iter()
			.find(|v| self.policy.matches(&v.name, call))
			.ok_or_else(|| LookupError::CallNotFound { module: module.into(), name: call.into() })?;
		Ok((found, variant))
	}

	/// Resolve a generic parameter of the extrinsic type, eg `Address` or `Signature`.
	pub fn extrinsic_param(&self, name: &str) -> Result<&RuntimeType, LookupError> {
		let extrinsic = self.find_type(self.metadata.extrinsic.ty.id())?;
		let param = extrinsic
			.params
			.iter()
			.find(|p| p.name == name)
			.and_then(|p| p.ty)
			.ok_or_else(|| LookupError::ParamNotFound(name.into()))?;
		self.find_type(param.id())
	}

	fn module_position(&self, name: &str) -> Result<usize, LookupError> {
		self.metadata
			.modules
			.iter()
			.position(|m| self.policy.matches(&m.name, name))
			.ok_or_else(|| LookupError::ModuleNotFound(name.into()))
	}

	fn constant_at(&self, module: usize, constant: usize) -> Option<&ModuleConstant> {
		self.metadata.modules.get(module)?.constants.get(constant)
	}

	fn storage_item_at(&self, module: usize, item: usize) -> Option<(&StorageItem, &ModuleStorage)> {
		let storage = self.metadata.modules.get(module)?.storage.as_ref()?;
		Some((storage.items.get(item)?, storage))
	}
}

/// The variant definition of a type, or an error if it is some other kind of type.
pub fn variants_of(ty: &RuntimeType) -> Result<&TypeDefVariant, LookupError> {
	match &ty.def {
		TypeDef::Variant(variants) => Ok(variants),
		_ => Err(LookupError::ExpectedVariant { got: ty.display_name() }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_suite;

	fn lookup(policy: NamingPolicy) -> Lookup {
		Lookup::new(Arc::new(test_suite::metadata()), policy)
	}

	#[test]
	fn naming_policy_applies_to_modules() {
		let insensitive = lookup(NamingPolicy::CaseInsensitive);
		assert_eq!(insensitive.find_module("Crowdloan").unwrap().name, "crowdloan");
		assert_eq!(insensitive.find_module("crowdloan").unwrap().index, 73);

		let exact = lookup(NamingPolicy::Exact);
		assert_eq!(exact.find_module("Crowdloan"), Err(LookupError::ModuleNotFound("Crowdloan".into())));
		assert_eq!(exact.find_module("crowdloan").unwrap().index, 73);
	}

	#[test]
	fn naming_policy_applies_to_children() {
		let insensitive = lookup(NamingPolicy::CaseInsensitive);
		assert_eq!(insensitive.find_constant("timestamp", "minimumperiod").unwrap().value, 3000u64.to_le_bytes());
		let (item, storage) = insensitive.find_storage_item("timestamp", "now").unwrap();
		assert_eq!((storage.prefix.as_str(), item.name.as_str()), ("Timestamp", "Now"));
		assert_eq!(insensitive.find_call("Crowdloan", "ADD_MEMO").unwrap().1.index, 6);

		let exact = lookup(NamingPolicy::Exact);
		assert!(exact.find_constant("Timestamp", "minimumperiod").is_err());
		assert!(exact.find_storage_item("Timestamp", "now").is_err());
		assert!(exact.find_call("crowdloan", "ADD_MEMO").is_err());
		assert!(exact.find_storage_item("Timestamp", "Now").is_ok());
	}

	#[test]
	fn successful_lookups_are_memoized() {
		let lookup = lookup(NamingPolicy::CaseInsensitive);
		let first = lookup.find_module("system").unwrap() as *const Module;
		let second = lookup.find_module("system").unwrap() as *const Module;
		assert_eq!(first, second);
		assert_eq!(lookup.modules.read().get("system"), Some(&0));

		lookup.find_constant("system", "BlockHashCount").unwrap();
		assert!(lookup.constants.read().contains_key(&("system".to_string(), "BlockHashCount".to_string())));
		lookup.find_storage_item("System", "Account").unwrap();
		assert_eq!(lookup.storage_items.read().len(), 1);

		// failures are not cached
		assert!(lookup.find_module("nope").is_err());
		assert!(!lookup.modules.read().contains_key("nope"));
	}

	#[test]
	fn missing_things_are_errors() {
		let lookup = lookup(NamingPolicy::CaseInsensitive);
		assert_eq!(lookup.find_type(9999).unwrap_err(), LookupError::TypeNotFound(9999));
		assert!(matches!(lookup.find_constant("system", "nope"), Err(LookupError::ConstantNotFound { .. })));
		assert!(matches!(lookup.find_storage_item("crowdloan", "x"), Err(LookupError::StorageNotFound(_))));
		assert!(matches!(lookup.find_storage_item("system", "x"), Err(LookupError::StorageItemNotFound { .. })));
		assert!(matches!(lookup.find_call("system", "remark"), Err(LookupError::CallsNotFound(_))));
		assert!(matches!(lookup.extrinsic_param("Nope"), Err(LookupError::ParamNotFound(_))));
		assert!(matches!(variants_of(lookup.find_type(0).unwrap()), Err(LookupError::ExpectedVariant { .. })));
	}

	#[test]
	fn extrinsic_params_resolve_to_variants() {
		let lookup = lookup(NamingPolicy::CaseInsensitive);
		let address = variants_of(lookup.extrinsic_param("Address").unwrap()).unwrap();
		assert_eq!(address.variants.iter().find(|v| v.name == "Id").map(|v| v.index), Some(0));
		let signature = variants_of(lookup.extrinsic_param("Signature").unwrap()).unwrap();
		assert_eq!(signature.variants.len(), 3);
	}
}
