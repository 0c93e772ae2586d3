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

//! The runtime type table.

use subclient_codec::{scale_composite, scale_unit_enum, Compact, Error as CodecError, ScaleType, TypeDescriptor, Value};

/// Reference to an entry of the runtime type table. Compact encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::From, derive_more::Display)]
pub struct TypeId(pub u32);

impl TypeId {
	pub fn id(&self) -> u32 {
		self.0
	}
}

impl ScaleType for TypeId {
	fn descriptor() -> TypeDescriptor {
		Compact::<u32>::descriptor()
	}

	fn to_value(&self) -> Value {
		Compact(self.0).to_value()
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		Compact::<u32>::from_value(value).map(|c| TypeId(c.0))
	}
}

/// Implements `ScaleType` for an enum whose variants each wrap exactly one value.
macro_rules! newtype_enum {
	($name:ident { $($variant:ident($inner:ty) = $index:literal),* $(,)? }) => {
		impl ::subclient_codec::ScaleType for $name {
			fn descriptor() -> ::subclient_codec::TypeDescriptor {
				::subclient_codec::TypeDescriptor::variant(
					concat!(module_path!(), "::", stringify!($name)),
					vec![$(::subclient_codec::VariantDescriptor::new($index, stringify!($variant), vec![::subclient_codec::Field::unnamed(<$inner as ::subclient_codec::ScaleType>::descriptor)])),*],
				)
			}

			fn to_value(&self) -> ::subclient_codec::Value {
				match self {
					$($name::$variant(inner) => ::subclient_codec::Value::variant(stringify!($variant), ::subclient_codec::Composite::Unnamed(vec![::subclient_codec::ScaleType::to_value(inner)]))),*
				}
			}

			fn from_value(value: ::subclient_codec::Value) -> Result<Self, ::subclient_codec::Error> {
				let variant = value.into_variant()?;
				let name = variant.name.clone();
				match name.as_str() {
					$(stringify!($variant) => Ok($name::$variant(<$inner as ::subclient_codec::ScaleType>::from_value(variant.into_single()?)?)),)*
					other => Err(::subclient_codec::Error::TypeMismatch { expected: stringify!($name).into(), got: format!("variant '{other}'") }),
				}
			}
		}
	};
}
pub(crate) use newtype_enum;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLookup {
	pub types: Vec<LookupEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
	pub id: TypeId,
	pub ty: RuntimeType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeType {
	pub path: Vec<String>,
	pub params: Vec<TypeParam>,
	pub def: TypeDef,
	pub docs: Vec<String>,
}

impl RuntimeType {
	/// The type's path joined with `::`, or the kind of its definition for anonymous types.
	pub fn display_name(&self) -> String {
		if self.path.is_empty() {
			self.def.kind().to_string()
		} else {
			self.path.join("::")
		}
	}
}

/// A generic parameter of a type, eg `Address` in `UncheckedExtrinsic<Address, ..>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
	pub name: String,
	pub ty: Option<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
	Composite(TypeDefComposite),
	Variant(TypeDefVariant),
	Sequence(TypeDefSequence),
	Array(TypeDefArray),
	Tuple(TypeDefTuple),
	Primitive(TypeDefPrimitive),
	Compact(TypeDefCompact),
	BitSequence(TypeDefBitSequence),
}

impl TypeDef {
	pub fn kind(&self) -> &'static str {
		match self {
			TypeDef::Composite(_) => "composite",
			TypeDef::Variant(_) => "variant",
			TypeDef::Sequence(_) => "sequence",
			TypeDef::Array(_) => "array",
			TypeDef::Tuple(_) => "tuple",
			TypeDef::Primitive(_) => "primitive",
			TypeDef::Compact(_) => "compact",
			TypeDef::BitSequence(_) => "bit sequence",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefComposite {
	pub fields: Vec<FieldDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
	pub name: Option<String>,
	pub ty: TypeId,
	pub type_name: Option<String>,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefVariant {
	pub variants: Vec<VariantDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
	pub name: String,
	pub fields: Vec<FieldDef>,
	pub index: u8,
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefSequence {
	pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefArray {
	pub len: u32,
	pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefTuple {
	pub fields: Vec<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefPrimitive {
	Bool,
	Char,
	Str,
	U8,
	U16,
	U32,
	U64,
	U128,
	U256,
	I8,
	I16,
	I32,
	I64,
	I128,
	I256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefCompact {
	pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefBitSequence {
	pub store: TypeId,
	pub order: TypeId,
}

scale_composite!(TypeLookup { types: Vec<LookupEntry> });
scale_composite!(LookupEntry { id: TypeId, ty: RuntimeType });
scale_composite!(RuntimeType { path: Vec<String>, params: Vec<TypeParam>, def: TypeDef, docs: Vec<String> });
scale_composite!(TypeParam { name: String, ty: Option<TypeId> });
scale_composite!(TypeDefComposite { fields: Vec<FieldDef> });
scale_composite!(FieldDef { name: Option<String>, ty: TypeId, type_name: Option<String>, docs: Vec<String> });
scale_composite!(TypeDefVariant { variants: Vec<VariantDef> });
scale_composite!(VariantDef { name: String, fields: Vec<FieldDef>, index: u8, docs: Vec<String> });
scale_composite!(TypeDefSequence { ty: TypeId });
scale_composite!(TypeDefArray { len: u32, ty: TypeId });
scale_composite!(TypeDefTuple { fields: Vec<TypeId> });
scale_composite!(TypeDefCompact { ty: TypeId });
scale_composite!(TypeDefBitSequence { store: TypeId, order: TypeId });

scale_unit_enum!(TypeDefPrimitive {
	Bool = 0,
	Char = 1,
	Str = 2,
	U8 = 3,
	U16 = 4,
	U32 = 5,
	U64 = 6,
	U128 = 7,
	U256 = 8,
	I8 = 9,
	I16 = 10,
	I32 = 11,
	I64 = 12,
	I128 = 13,
	I256 = 14,
});

newtype_enum!(TypeDef {
	Composite(TypeDefComposite) = 0,
	Variant(TypeDefVariant) = 1,
	Sequence(TypeDefSequence) = 2,
	Array(TypeDefArray) = 3,
	Tuple(TypeDefTuple) = 4,
	Primitive(TypeDefPrimitive) = 5,
	Compact(TypeDefCompact) = 6,
	BitSequence(TypeDefBitSequence) = 7,
});
