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

//! Host types whose wire width is decided by the runtime.
//!
//! A [`DynamicType`] names the schema entry that describes it. When the codec meets one,
//! [`DynamicFactory`] resolves that entry against the current [`Schema`] into a
//! [`ResolvedAdapter`]: the concrete descriptor the runtime uses plus a pair of conversions
//! between the host's raw little-endian buffer and the concrete value. Reads and writes are
//! then delegated to whichever adapter the registry holds for the concrete descriptor.

use crate::{
	lookup::Lookup,
	metadata::{TypeDef, TypeDefPrimitive},
	schema::{Schema, SchemaHandle},
};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};
use subclient_codec::{
	Adapter, AdapterFactory, Error as CodecError, FixedWidth, Primitive, Reader, ScaleCoder, Shape, TypeDescriptor,
	TypeTag, Value, I256, U256, U512,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DynamicError {
	#[error("no runtime metadata has been published yet")]
	NoSchema,
	#[error("could not find type with ID {0}")]
	TypeNotFound(u32),
	#[error("type {id} ({kind}) cannot back a dynamic value")]
	Unsupported { id: u32, kind: String },
	#[error("{len}-byte value does not fit into {width} bytes")]
	Overflow { len: usize, width: usize },
	#[error("invalid boolean buffer {0:?}")]
	InvalidBool(Vec<u8>),
}

/// A host type carried as a raw little-endian buffer whose encoding follows schema entry
/// [`DynamicType::LOOKUP_INDEX`]. Use [`crate::dynamic_type!`] to implement `ScaleType` for it.
pub trait DynamicType: Sized + 'static {
	const LOOKUP_INDEX: u32;

	fn from_raw(raw: &[u8]) -> Result<Self, DynamicError>;
	fn to_raw(&self) -> Vec<u8>;
}

/// Implement [`subclient_codec::ScaleType`] for types implementing [`DynamicType`].
#[macro_export]
macro_rules! dynamic_type {
	($($ty:ident),* $(,)?) => {
		$(
			impl $crate::codec::ScaleType for $ty {
				fn descriptor() -> $crate::codec::TypeDescriptor {
					$crate::codec::TypeDescriptor::dynamic(
						concat!(module_path!(), "::", stringify!($ty)),
						<$ty as $crate::dynamic::DynamicType>::LOOKUP_INDEX,
					)
				}

				fn to_value(&self) -> $crate::codec::Value {
					$crate::codec::Value::raw($crate::dynamic::DynamicType::to_raw(self))
				}

				fn from_value(value: $crate::codec::Value) -> Result<Self, $crate::codec::Error> {
					let raw = value.into_raw()?;
					<$ty as $crate::dynamic::DynamicType>::from_raw(&raw).map_err($crate::codec::Error::custom)
				}
			}
		)*
	};
}

macro_rules! wide_unsigned {
	($($(#[$attr:meta])* $name:ident = $index:literal),* $(,)?) => {
		$(
			$(#[$attr])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, derive_more::From, derive_more::Display)]
			pub struct $name(pub U256);

			impl DynamicType for $name {
				const LOOKUP_INDEX: u32 = $index;

				fn from_raw(raw: &[u8]) -> Result<Self, DynamicError> {
					Ok($name(U256::from_little_endian(&fit(raw, 32)?)))
				}

				fn to_raw(&self) -> Vec<u8> {
					let mut le = [0u8; 32];
					self.0.to_little_endian(&mut le);
					trimmed(&le)
				}
			}

			impl From<u128> for $name {
				fn from(val: u128) -> Self {
					$name(U256::from(val))
				}
			}

			dynamic_type!($name);
		)*
	};
}

wide_unsigned! {
	/// Account nonce.
	Index = 4,
	Balance = 6,
}

/// Pad `raw` with zeros up to `width`, or cut it down to `width` if the excess is all zeros.
fn fit(raw: &[u8], width: usize) -> Result<Vec<u8>, DynamicError> {
	if raw.len() > width && raw[width..].iter().any(|b| *b != 0) {
		return Err(DynamicError::Overflow { len: raw.len(), width });
	}
	let mut out = raw[..raw.len().min(width)].to_vec();
	out.resize(width, 0);
	Ok(out)
}

/// `le` without its trailing zero bytes, keeping at least one byte.
fn trimmed(le: &[u8]) -> Vec<u8> {
	let len = le.iter().rposition(|b| *b != 0).map_or(1, |pos| pos + 1);
	le[..len.min(le.len())].to_vec()
}

type ToRaw = fn(Value) -> Result<Vec<u8>, CodecError>;
type FromRaw = fn(&[u8]) -> Result<Value, CodecError>;

/// The concrete codec a dynamic type is bridged to.
pub struct ResolvedAdapter {
	descriptor: TypeDescriptor,
	to_raw: ToRaw,
	from_raw: FromRaw,
}

impl ResolvedAdapter {
	fn fixed<T: FixedWidth>() -> Self {
		ResolvedAdapter { descriptor: TypeDescriptor::primitive(T::TAG), to_raw: fixed_to_raw::<T>, from_raw: fixed_from_raw::<T> }
	}

	fn for_primitive(primitive: TypeDefPrimitive) -> Option<Self> {
		let resolved = match primitive {
			TypeDefPrimitive::Bool => {
				ResolvedAdapter { descriptor: TypeDescriptor::primitive(TypeTag::Bool), to_raw: bool_to_raw, from_raw: bool_from_raw }
			}
			TypeDefPrimitive::Str => {
				ResolvedAdapter { descriptor: TypeDescriptor::primitive(TypeTag::Str), to_raw: str_to_raw, from_raw: str_from_raw }
			}
			TypeDefPrimitive::U8 => Self::fixed::<u8>(),
			TypeDefPrimitive::U16 => Self::fixed::<u16>(),
			TypeDefPrimitive::U32 => Self::fixed::<u32>(),
			TypeDefPrimitive::U64 => Self::fixed::<u64>(),
			TypeDefPrimitive::U128 => Self::fixed::<u128>(),
			TypeDefPrimitive::U256 => Self::fixed::<U256>(),
			TypeDefPrimitive::I8 => Self::fixed::<i8>(),
			TypeDefPrimitive::I16 => Self::fixed::<i16>(),
			TypeDefPrimitive::I32 => Self::fixed::<i32>(),
			TypeDefPrimitive::I64 => Self::fixed::<i64>(),
			TypeDefPrimitive::I128 => Self::fixed::<i128>(),
			TypeDefPrimitive::I256 => Self::fixed::<I256>(),
			TypeDefPrimitive::Char => return None,
		};
		Some(resolved)
	}

	fn compact() -> Self {
		ResolvedAdapter {
			descriptor: TypeDescriptor::primitive(TypeTag::Compact),
			to_raw: compact_to_raw,
			from_raw: compact_from_raw,
		}
	}

	pub fn descriptor(&self) -> &TypeDescriptor {
		&self.descriptor
	}

	/// Decode the concrete value and hand back its raw buffer.
	pub fn read_raw(&self, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Vec<u8>, CodecError> {
		let value = coder.read_value(&self.descriptor, reader)?;
		(self.to_raw)(value)
	}

	/// Build the concrete value from a raw buffer and encode it.
	pub fn write_raw(&self, raw: &[u8], coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), CodecError> {
		let value = (self.from_raw)(raw)?;
		coder.write_value(&self.descriptor, &value, out)
	}
}

fn fixed_to_raw<T: FixedWidth>(value: Value) -> Result<Vec<u8>, CodecError> {
	let number = T::from_primitive(&value.into_primitive()?)?;
	let mut out = Vec::with_capacity(T::WIDTH);
	number.extend_le(&mut out);
	Ok(out)
}

fn fixed_from_raw<T: FixedWidth>(raw: &[u8]) -> Result<Value, CodecError> {
	let le = fit(raw, T::WIDTH).map_err(CodecError::custom)?;
	Ok(Value::Primitive(T::from_le_slice(&le).into_primitive()))
}

fn bool_to_raw(value: Value) -> Result<Vec<u8>, CodecError> {
	match value.into_primitive()? {
		Primitive::Bool(b) => Ok(vec![b as u8]),
		other => Err(CodecError::TypeMismatch { expected: "bool".into(), got: other.kind().into() }),
	}
}

fn bool_from_raw(raw: &[u8]) -> Result<Value, CodecError> {
	match fit(raw, 1).map_err(CodecError::custom)?[0] {
		0 => Ok(Value::bool(false)),
		1 => Ok(Value::bool(true)),
		_ => Err(CodecError::custom(DynamicError::InvalidBool(raw.to_vec()))),
	}
}

fn str_to_raw(value: Value) -> Result<Vec<u8>, CodecError> {
	match value.into_primitive()? {
		Primitive::Str(s) => Ok(s.into_bytes()),
		other => Err(CodecError::TypeMismatch { expected: "str".into(), got: other.kind().into() }),
	}
}

fn str_from_raw(raw: &[u8]) -> Result<Value, CodecError> {
	Ok(Value::string(String::from_utf8(raw.to_vec())?))
}

fn compact_to_raw(value: Value) -> Result<Vec<u8>, CodecError> {
	match value.into_primitive()? {
		Primitive::Compact(v) => {
			let mut le = [0u8; 64];
			v.to_little_endian(&mut le);
			Ok(trimmed(&le))
		}
		other => Err(CodecError::TypeMismatch { expected: "compact".into(), got: other.kind().into() }),
	}
}

fn compact_from_raw(raw: &[u8]) -> Result<Value, CodecError> {
	let le = fit(raw, 64).map_err(CodecError::custom)?;
	Ok(Value::compact(U512::from_little_endian(&le)))
}

/// Resolves schema entries into [`ResolvedAdapter`]s, caching them by lookup index.
/// Lives inside a [`Schema`], so the cache never outlives the metadata it was built from.
#[derive(Default)]
pub struct DynamicResolver {
	cache: RwLock<HashMap<u32, Arc<ResolvedAdapter>>>,
}

impl DynamicResolver {
	pub fn resolve(&self, lookup: &Lookup, lookup_index: u32) -> Result<Arc<ResolvedAdapter>, DynamicError> {
		if let Some(resolved) = self.cache.read().get(&lookup_index) {
			return Ok(resolved.clone());
		}

		let ty = lookup.find_type(lookup_index).map_err(|_| DynamicError::TypeNotFound(lookup_index))?;
		let unsupported = |kind: &str| DynamicError::Unsupported { id: lookup_index, kind: kind.into() };
		let resolved = match &ty.def {
			TypeDef::Primitive(primitive) => {
				ResolvedAdapter::for_primitive(*primitive).ok_or_else(|| unsupported("char"))?
			}
			TypeDef::Compact(_) => ResolvedAdapter::compact(),
			other => return Err(unsupported(other.kind())),
		};
		log::trace!("dynamic type {} resolved to {}", lookup_index, resolved.descriptor.tag);

		let resolved = Arc::new(resolved);
		self.cache.write().insert(lookup_index, resolved.clone());
		Ok(resolved)
	}
}

/// Generic factory handling every [`Shape::Dynamic`] descriptor by consulting the current schema.
pub struct DynamicFactory {
	schema: SchemaHandle,
}

impl DynamicFactory {
	pub fn new(schema: SchemaHandle) -> Self {
		DynamicFactory { schema }
	}
}

impl AdapterFactory for DynamicFactory {
	fn name(&self) -> &str {
		"dynamic"
	}

	fn make(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn Adapter>, CodecError> {
		let Shape::Dynamic { lookup_index } = descriptor.shape else {
			return Err(CodecError::NoAdapterFound(descriptor.tag.clone()));
		};
		let schema: Arc<Schema> = self.schema.load_full().ok_or_else(|| CodecError::custom(DynamicError::NoSchema))?;
		let resolved = schema.resolve_dynamic(lookup_index).map_err(CodecError::custom)?;
		Ok(Arc::new(DynamicAdapter { resolved }))
	}
}

struct DynamicAdapter {
	resolved: Arc<ResolvedAdapter>,
}

impl Adapter for DynamicAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, CodecError> {
		self.resolved.read_raw(reader, coder).map(Value::raw)
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), CodecError> {
		match value {
			Value::Primitive(Primitive::Raw(raw)) => self.resolved.write_raw(raw, coder, out),
			other => Err(CodecError::TypeMismatch { expected: "raw bytes".into(), got: other.kind() }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{lookup::NamingPolicy, schema, test_suite};
	use subclient_codec::{Compact, ScaleType};

	/// A balance that the runtime stores in compact form.
	#[derive(Debug, PartialEq)]
	struct CompactBalance(U256);

	impl DynamicType for CompactBalance {
		const LOOKUP_INDEX: u32 = 7;

		fn from_raw(raw: &[u8]) -> Result<Self, DynamicError> {
			Balance::from_raw(raw).map(|b| CompactBalance(b.0))
		}

		fn to_raw(&self) -> Vec<u8> {
			Balance(self.0).to_raw()
		}
	}

	dynamic_type!(CompactBalance);

	/// Points at the `MultiAddress` variant, which a raw buffer cannot represent.
	#[derive(Debug)]
	struct Unbridgeable;

	impl DynamicType for Unbridgeable {
		const LOOKUP_INDEX: u32 = 8;

		fn from_raw(_: &[u8]) -> Result<Self, DynamicError> {
			Ok(Unbridgeable)
		}

		fn to_raw(&self) -> Vec<u8> {
			vec![]
		}
	}

	dynamic_type!(Unbridgeable);

	fn coder_with_schema() -> (ScaleCoder, SchemaHandle) {
		let handle = schema::empty_handle();
		handle.store(Some(Arc::new(Schema::new(test_suite::metadata(), NamingPolicy::default()))));
		let coder = ScaleCoder::default();
		coder.registry().register_generic_factory(DynamicFactory::new(handle.clone()));
		(coder, handle)
	}

	#[test]
	fn widths_follow_the_schema() {
		let (coder, _) = coder_with_schema();
		assert_eq!(coder.encode(&Index::from(5u128)).unwrap(), vec![5, 0, 0, 0]);
		assert_eq!(coder.encode(&Balance::from(5u128)).unwrap(), 5u128.to_le_bytes().to_vec());
		assert_eq!(coder.decode::<Index>(&[1, 1, 0, 0]).unwrap(), Index::from(257u128));
		assert_eq!(coder.decode::<Balance>(&u128::MAX.to_le_bytes()).unwrap(), Balance::from(u128::MAX));
	}

	#[test]
	fn values_too_wide_for_the_runtime_type_overflow() {
		let (coder, _) = coder_with_schema();
		assert!(coder.encode(&Index::from(1u128 << 40)).is_err());
		assert!(coder.encode(&Index::from(u32::MAX as u128)).is_ok());
	}

	#[test]
	fn compact_entries_match_the_compact_adapter() {
		let (coder, _) = coder_with_schema();
		for value in [0u128, 63, 64, 1 << 30, 1_000_000_000_000, u128::MAX] {
			let direct = coder.encode(&Compact(value)).unwrap();
			let dynamic = coder.encode(&CompactBalance(U256::from(value))).unwrap();
			assert_eq!(direct, dynamic, "encoding {value}");
			assert_eq!(coder.decode::<CompactBalance>(&direct).unwrap(), CompactBalance(U256::from(value)));
		}
	}

	#[test]
	fn unsupported_and_missing_entries_are_errors() {
		let (coder, handle) = coder_with_schema();
		let schema = handle.load_full().unwrap();
		assert_eq!(
			schema.resolve_dynamic(8).err(),
			Some(DynamicError::Unsupported { id: 8, kind: "variant".into() })
		);
		assert_eq!(schema.resolve_dynamic(19).err(), Some(DynamicError::Unsupported { id: 19, kind: "char".into() }));
		assert_eq!(schema.resolve_dynamic(999).err(), Some(DynamicError::TypeNotFound(999)));
		assert!(matches!(coder.decode::<Unbridgeable>(&[0]), Err(CodecError::Custom(_))));
	}

	#[test]
	fn resolutions_are_cached_per_schema() {
		let (_, handle) = coder_with_schema();
		let schema = handle.load_full().unwrap();
		let first = schema.resolve_dynamic(Index::LOOKUP_INDEX).unwrap();
		let second = schema.resolve_dynamic(Index::LOOKUP_INDEX).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(first.descriptor().tag, TypeTag::U32);

		let fresh = Schema::new(test_suite::metadata(), NamingPolicy::default());
		assert!(!Arc::ptr_eq(&first, &fresh.resolve_dynamic(Index::LOOKUP_INDEX).unwrap()));
	}

	#[test]
	fn nothing_resolves_before_a_schema_is_published() {
		let coder = ScaleCoder::default();
		coder.registry().register_generic_factory(DynamicFactory::new(schema::empty_handle()));
		let err = coder.encode(&Index::from(1u128)).unwrap_err();
		assert_eq!(err.to_string(), DynamicError::NoSchema.to_string());
	}

	#[test]
	fn raw_buffers_are_trimmed_and_padded() {
		assert_eq!(Index::from(0u128).to_raw(), vec![0]);
		assert_eq!(Index::from(0x0102u128).to_raw(), vec![2, 1]);
		assert_eq!(Index::from_raw(&[7, 0, 0, 0, 0, 0]).unwrap(), Index::from(7u128));
		assert!(Index::from_raw(&[1; 33]).is_err());
		assert_eq!(Index::descriptor().tag, TypeTag::Named("subclient::dynamic::Index"));
	}
}
