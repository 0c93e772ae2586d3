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

//! Static descriptions of host types: a hashable identity ([`TypeTag`]) and an explicit,
//! ordered shape ([`Shape`]) that the structural codec walks.

use crate::{Error, Value};
use std::fmt;

/// A lazily evaluated reference to another descriptor. Keeping field types behind a
/// function pointer lets recursive types describe themselves.
pub type TypeRef = fn() -> TypeDescriptor;

/// Identity of a host type. Adapters are registered against tags and resolution
/// results are cached by tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
	Bool,
	Str,
	U8,
	U16,
	U32,
	U64,
	U128,
	U256,
	U512,
	I8,
	I16,
	I32,
	I64,
	I128,
	I256,
	I512,
	Compact,
	Option(Box<TypeTag>),
	Sequence(Box<TypeTag>),
	Array(Box<TypeTag>, usize),
	Tuple(Vec<TypeTag>),
	/// A user defined composite, variant or dynamic type, identified by its path.
	Named(&'static str),
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeTag::Bool => f.write_str("bool"),
			TypeTag::Str => f.write_str("str"),
			TypeTag::U8 => f.write_str("u8"),
			TypeTag::U16 => f.write_str("u16"),
			TypeTag::U32 => f.write_str("u32"),
			TypeTag::U64 => f.write_str("u64"),
			TypeTag::U128 => f.write_str("u128"),
			TypeTag::U256 => f.write_str("u256"),
			TypeTag::U512 => f.write_str("u512"),
			TypeTag::I8 => f.write_str("i8"),
			TypeTag::I16 => f.write_str("i16"),
			TypeTag::I32 => f.write_str("i32"),
			TypeTag::I64 => f.write_str("i64"),
			TypeTag::I128 => f.write_str("i128"),
			TypeTag::I256 => f.write_str("i256"),
			TypeTag::I512 => f.write_str("i512"),
			TypeTag::Compact => f.write_str("Compact"),
			TypeTag::Option(inner) => write!(f, "Option<{inner}>"),
			TypeTag::Sequence(inner) => write!(f, "Vec<{inner}>"),
			TypeTag::Array(inner, len) => write!(f, "[{inner}; {len}]"),
			TypeTag::Tuple(items) => {
				f.write_str("(")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str(")")
			}
			TypeTag::Named(path) => f.write_str(path),
		}
	}
}

/// Everything the codec needs to know about a type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
	pub tag: TypeTag,
	pub shape: Shape,
}

impl TypeDescriptor {
	pub fn primitive(tag: TypeTag) -> Self {
		TypeDescriptor { tag, shape: Shape::Primitive }
	}

	pub fn composite(path: &'static str, fields: Vec<Field>) -> Self {
		TypeDescriptor { tag: TypeTag::Named(path), shape: Shape::Composite(fields) }
	}

	pub fn variant(path: &'static str, variants: Vec<VariantDescriptor>) -> Self {
		TypeDescriptor { tag: TypeTag::Named(path), shape: Shape::Variant(variants) }
	}

	/// A type whose wire representation is chosen from the runtime schema entry `lookup_index`.
	pub fn dynamic(path: &'static str, lookup_index: u32) -> Self {
		TypeDescriptor { tag: TypeTag::Named(path), shape: Shape::Dynamic { lookup_index } }
	}
}

/// How a type is laid out on the wire.
#[derive(Debug, Clone)]
pub enum Shape {
	/// Handled by a directly registered adapter.
	Primitive,
	Option(TypeRef),
	Sequence(TypeRef),
	Array { len: usize, item: TypeRef },
	Tuple(Vec<TypeRef>),
	/// Fields in declaration order.
	Composite(Vec<Field>),
	Variant(Vec<VariantDescriptor>),
	Dynamic { lookup_index: u32 },
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
	pub name: Option<&'static str>,
	pub ty: TypeRef,
}

impl Field {
	pub fn named(name: &'static str, ty: TypeRef) -> Self {
		Field { name: Some(name), ty }
	}

	pub fn unnamed(ty: TypeRef) -> Self {
		Field { name: None, ty }
	}
}

#[derive(Debug, Clone)]
pub struct VariantDescriptor {
	pub index: u8,
	pub name: &'static str,
	pub fields: Vec<Field>,
}

impl VariantDescriptor {
	pub fn new(index: u8, name: &'static str, fields: Vec<Field>) -> Self {
		VariantDescriptor { index, name, fields }
	}
}

/// A host type that can be encoded and decoded through a [`crate::ScaleCoder`].
///
/// Implementations describe themselves statically and convert to and from [`Value`];
/// the registry decides which adapter handles the bytes.
pub trait ScaleType: Sized + 'static {
	fn descriptor() -> TypeDescriptor;
	fn to_value(&self) -> Value;
	fn from_value(value: Value) -> Result<Self, Error>;
}

impl ScaleType for bool {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::primitive(TypeTag::Bool)
	}

	fn to_value(&self) -> Value {
		Value::bool(*self)
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		match value.into_primitive()? {
			crate::Primitive::Bool(b) => Ok(b),
			other => Err(Error::mismatch("bool", other.kind())),
		}
	}
}

impl ScaleType for String {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::primitive(TypeTag::Str)
	}

	fn to_value(&self) -> Value {
		Value::string(self.clone())
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		match value.into_primitive()? {
			crate::Primitive::Str(s) => Ok(s),
			other => Err(Error::mismatch("str", other.kind())),
		}
	}
}

impl<T: ScaleType> ScaleType for Option<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor { tag: TypeTag::Option(Box::new(T::descriptor().tag)), shape: Shape::Option(T::descriptor) }
	}

	fn to_value(&self) -> Value {
		match self {
			Some(inner) => Value::some(inner.to_value()),
			None => Value::none(),
		}
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		let variant = value.into_variant()?;
		let name = variant.name.clone();
		match name.as_str() {
			"None" => Ok(None),
			"Some" => T::from_value(variant.into_single()?).map(Some),
			other => Err(Error::mismatch("None or Some", format!("variant '{other}'"))),
		}
	}
}

impl<T: ScaleType> ScaleType for Vec<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor { tag: TypeTag::Sequence(Box::new(T::descriptor().tag)), shape: Shape::Sequence(T::descriptor) }
	}

	fn to_value(&self) -> Value {
		Value::unnamed_composite(self.iter().map(ScaleType::to_value).collect())
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		value.into_composite()?.into_values().into_iter().map(T::from_value).collect()
	}
}

impl<T: ScaleType, const N: usize> ScaleType for [T; N] {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor {
			tag: TypeTag::Array(Box::new(T::descriptor().tag), N),
			shape: Shape::Array { len: N, item: T::descriptor },
		}
	}

	fn to_value(&self) -> Value {
		Value::unnamed_composite(self.iter().map(ScaleType::to_value).collect())
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		let items = Vec::<T>::from_value(value)?;
		let len = items.len();
		items.try_into().map_err(|_| Error::mismatch(format!("{N} items"), format!("{len} items")))
	}
}

impl ScaleType for () {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor { tag: TypeTag::Tuple(vec![]), shape: Shape::Tuple(vec![]) }
	}

	fn to_value(&self) -> Value {
		Value::unnamed_composite(vec![])
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		match value.into_composite()? {
			c if c.is_empty() => Ok(()),
			c => Err(Error::mismatch("()", format!("{} items", c.len()))),
		}
	}
}

macro_rules! tuple_scale_type {
	($len:literal: $($name:ident $idx:tt),+) => {
		impl<$($name: ScaleType),+> ScaleType for ($($name,)+) {
			fn descriptor() -> TypeDescriptor {
				TypeDescriptor {
					tag: TypeTag::Tuple(vec![$($name::descriptor().tag),+]),
					shape: Shape::Tuple(vec![$($name::descriptor as TypeRef),+]),
				}
			}

			fn to_value(&self) -> Value {
				Value::unnamed_composite(vec![$(self.$idx.to_value()),+])
			}

			fn from_value(value: Value) -> Result<Self, Error> {
				let values = value.into_composite()?.into_values();
				if values.len() != $len {
					return Err(Error::mismatch(concat!($len, " tuple items"), format!("{} items", values.len())));
				}
				let mut values = values.into_iter();
				Ok(($(
					match values.next() {
						Some(v) => $name::from_value(v)?,
						None => return Err(Error::mismatch(concat!($len, " tuple items"), "fewer items")),
					},
				)+))
			}
		}
	};
}

tuple_scale_type!(1: A 0);
tuple_scale_type!(2: A 0, B 1);
tuple_scale_type!(3: A 0, B 1, C 2);
tuple_scale_type!(4: A 0, B 1, C 2, D 3);
tuple_scale_type!(5: A 0, B 1, C 2, D 3, E 4);
