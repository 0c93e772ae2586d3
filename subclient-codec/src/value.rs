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

/*!
This module exposes the [`Value`] type and related subtypes, the runtime representation
every adapter reads into and writes out of (much like `serde_json::Value` is a runtime
representation of JSON data). Host types convert to and from it through
[`crate::ScaleType`].
*/

use crate::{numeric::I256, numeric::I512, Error, ScaleType};
use primitive_types::{U256, U512};
use std::fmt::Debug;

/// The shape and associated values of something that has been decoded, or is about to be encoded.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
	/// A named or unnamed struct-like, array-like or tuple-like set of values.
	Composite(Composite),
	/// An enum variant.
	Variant(Variant),
	/// Any of the primitive values we can have.
	Primitive(Primitive),
}

macro_rules! primitive_constructors {
	($($fn_name:ident: $ty:ty => $variant:ident),* $(,)?) => {
		$(
			pub fn $fn_name(val: $ty) -> Value {
				Value::Primitive(Primitive::$variant(val))
			}
		)*
	};
}

impl Value {
	primitive_constructors! {
		bool: bool => Bool,
		u8: u8 => U8,
		u16: u16 => U16,
		u32: u32 => U32,
		u64: u64 => U64,
		u128: u128 => U128,
		u256: U256 => U256,
		u512: U512 => U512,
		i8: i8 => I8,
		i16: i16 => I16,
		i32: i32 => I32,
		i64: i64 => I64,
		i128: i128 => I128,
		i256: I256 => I256,
		i512: I512 => I512,
		compact: U512 => Compact,
		raw: Vec<u8> => Raw,
	}

	pub fn string<S: Into<String>>(val: S) -> Value {
		Value::Primitive(Primitive::Str(val.into()))
	}

	/// Eg `{ foo: 2, bar: false }`
	pub fn named_composite(values: Vec<(String, Value)>) -> Value {
		Value::Composite(Composite::Named(values))
	}

	/// Eg `(2, false)`
	pub fn unnamed_composite(values: Vec<Value>) -> Value {
		Value::Composite(Composite::Unnamed(values))
	}

	pub fn variant<S: Into<String>>(name: S, values: Composite) -> Value {
		Value::Variant(Variant { name: name.into(), values })
	}

	/// The absent case of an optional value.
	pub fn none() -> Value {
		Value::variant("None", Composite::Unnamed(vec![]))
	}

	/// The present case of an optional value.
	pub fn some(value: Value) -> Value {
		Value::variant("Some", Composite::Unnamed(vec![value]))
	}

	/// A short description of the shape of this value, used in error messages.
	pub fn kind(&self) -> String {
		match self {
			Value::Composite(Composite::Named(_)) => "named composite".into(),
			Value::Composite(Composite::Unnamed(_)) => "unnamed composite".into(),
			Value::Variant(v) => format!("variant '{}'", v.name),
			Value::Primitive(p) => p.kind().into(),
		}
	}

	pub fn into_composite(self) -> Result<Composite, Error> {
		match self {
			Value::Composite(c) => Ok(c),
			other => Err(Error::mismatch("composite", other.kind())),
		}
	}

	pub fn into_variant(self) -> Result<Variant, Error> {
		match self {
			Value::Variant(v) => Ok(v),
			other => Err(Error::mismatch("variant", other.kind())),
		}
	}

	pub fn into_primitive(self) -> Result<Primitive, Error> {
		match self {
			Value::Primitive(p) => Ok(p),
			other => Err(Error::mismatch("primitive", other.kind())),
		}
	}

	/// The raw little-endian buffer carried by a dynamic value.
	pub fn into_raw(self) -> Result<Vec<u8>, Error> {
		match self {
			Value::Primitive(Primitive::Raw(bytes)) => Ok(bytes),
			other => Err(Error::mismatch("raw bytes", other.kind())),
		}
	}
}

impl Debug for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Composite(val) => Debug::fmt(val, f),
			Self::Variant(val) => Debug::fmt(val, f),
			Self::Primitive(val) => Debug::fmt(val, f),
		}
	}
}

/// A named or unnamed struct-like, array-like or tuple-like set of values.
/// This is used to represent a range of composite values on their own, or
/// as values for a specific [`Variant`].
#[derive(Clone, PartialEq, Eq)]
pub enum Composite {
	/// Eg `{ foo: 2, bar: false }`
	Named(Vec<(String, Value)>),
	/// Eg `(2, false)`
	Unnamed(Vec<Value>),
}

impl Composite {
	/// Return the number of values stored in this composite type.
	pub fn len(&self) -> usize {
		match self {
			Composite::Named(values) => values.len(),
			Composite::Unnamed(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drop any field names, keeping the values in order.
	pub fn into_values(self) -> Vec<Value> {
		match self {
			Composite::Named(values) => values.into_iter().map(|(_, v)| v).collect(),
			Composite::Unnamed(values) => values,
		}
	}
}

impl Debug for Composite {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Composite::Named(fields) => {
				let mut struc = f.debug_struct("");
				for (name, val) in fields {
					struc.field(name, val);
				}
				struc.finish()
			}
			Composite::Unnamed(fields) => {
				let mut struc = f.debug_tuple("");
				for val in fields {
					struc.field(val);
				}
				struc.finish()
			}
		}
	}
}

impl From<Composite> for Value {
	fn from(val: Composite) -> Self {
		Value::Composite(val)
	}
}

/// This represents the value of a specific variant from an enum, and contains
/// the name of the variant, and the named/unnamed values associated with it.
#[derive(Clone, PartialEq, Eq)]
pub struct Variant {
	/// The name of the variant.
	pub name: String,
	/// Values for each of the named or unnamed fields associated with this variant.
	pub values: Composite,
}

impl Variant {
	/// The only value of a single-field variant, like `Some(x)` or a newtype variant.
	pub fn into_single(self) -> Result<Value, Error> {
		let name = self.name;
		let mut values = self.values.into_values();
		match values.len() {
			1 => Ok(values.remove(0)),
			n => Err(Error::mismatch(format!("variant '{name}' with one field"), format!("{n} fields"))),
		}
	}
}

impl Debug for Variant {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.name)?;
		f.write_str(" ")?;
		Debug::fmt(&self.values, f)
	}
}

impl From<Variant> for Value {
	fn from(val: Variant) -> Self {
		Value::Variant(val)
	}
}

/// A "primitive" value (this includes strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
	Bool(bool),
	Str(String),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	U128(u128),
	U256(U256),
	U512(U512),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	I128(i128),
	I256(I256),
	I512(I512),
	/// An arbitrary precision unsigned integer in its compact form.
	Compact(U512),
	/// A little-endian buffer whose wire width is only known once a schema is available.
	Raw(Vec<u8>),
}

impl Primitive {
	pub fn kind(&self) -> &'static str {
		match self {
			Primitive::Bool(_) => "bool",
			Primitive::Str(_) => "str",
			Primitive::U8(_) => "u8",
			Primitive::U16(_) => "u16",
			Primitive::U32(_) => "u32",
			Primitive::U64(_) => "u64",
			Primitive::U128(_) => "u128",
			Primitive::U256(_) => "u256",
			Primitive::U512(_) => "u512",
			Primitive::I8(_) => "i8",
			Primitive::I16(_) => "i16",
			Primitive::I32(_) => "i32",
			Primitive::I64(_) => "i64",
			Primitive::I128(_) => "i128",
			Primitive::I256(_) => "i256",
			Primitive::I512(_) => "i512",
			Primitive::Compact(_) => "compact",
			Primitive::Raw(_) => "raw bytes",
		}
	}
}

impl From<Primitive> for Value {
	fn from(val: Primitive) -> Self {
		Value::Primitive(val)
	}
}

/// Pulls typed fields back out of a composite value. Named composites are matched
/// by field name, unnamed ones positionally.
pub struct Fields {
	ty: &'static str,
	fields: Vec<(Option<String>, Value)>,
}

impl Fields {
	pub fn new(ty: &'static str, value: Value) -> Result<Self, Error> {
		let fields = match value.into_composite()? {
			Composite::Named(fields) => fields.into_iter().map(|(name, v)| (Some(name), v)).collect(),
			Composite::Unnamed(fields) => fields.into_iter().map(|v| (None, v)).collect(),
		};
		Ok(Fields { ty, fields })
	}

	pub fn take<T: ScaleType>(&mut self, field: &'static str) -> Result<T, Error> {
		let position = self
			.fields
			.iter()
			.position(|(name, _)| name.as_deref().map_or(true, |name| name == field))
			.ok_or(Error::MissingField { ty: self.ty, field })?;
		let (_, value) = self.fields.remove(position);
		T::from_value(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fields_match_by_name_or_position() {
		let named = Value::named_composite(vec![("b".into(), Value::u8(2)), ("a".into(), Value::u8(1))]);
		let mut fields = Fields::new("Pair", named).unwrap();
		assert_eq!(fields.take::<u8>("a").unwrap(), 1);
		assert_eq!(fields.take::<u8>("b").unwrap(), 2);
		assert!(matches!(fields.take::<u8>("c"), Err(Error::MissingField { field: "c", .. })));

		let unnamed = Value::unnamed_composite(vec![Value::u8(1), Value::u8(2)]);
		let mut fields = Fields::new("Pair", unnamed).unwrap();
		assert_eq!(fields.take::<u8>("a").unwrap(), 1);
		assert_eq!(fields.take::<u8>("b").unwrap(), 2);
	}

	#[test]
	fn single_field_variant() {
		let some = Value::some(Value::bool(true)).into_variant().unwrap();
		assert_eq!(some.into_single().unwrap(), Value::bool(true));
		let none = Value::none().into_variant().unwrap();
		assert!(none.into_single().is_err());
	}
}
