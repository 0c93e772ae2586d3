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

//! The [`Adapter`] trait and the adapters registered for primitive types.

use crate::{compact, Composite, Error, Primitive, Reader, ScaleCoder, TypeDescriptor, Value};

/// Reads and writes one kind of type. Nested types are delegated back to the coder,
/// so an adapter only ever deals with its own layer of the encoding.
pub trait Adapter: Send + Sync {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error>;
	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>)
		-> Result<(), Error>;
}

pub struct BoolAdapter;

impl Adapter for BoolAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		match reader.read_byte()? {
			0 => Ok(Value::bool(false)),
			1 => Ok(Value::bool(true)),
			b => Err(Error::InvalidBool(b)),
		}
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		match value {
			Value::Primitive(Primitive::Bool(b)) => {
				out.push(*b as u8);
				Ok(())
			}
			other => Err(Error::mismatch("bool", other.kind())),
		}
	}
}

/// `Option<bool>` packs presence and value into a single byte:
/// `0` is `None`, `1` is `Some(true)` and `2` is `Some(false)`.
pub struct OptionalBoolAdapter;

impl Adapter for OptionalBoolAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		match reader.read_byte()? {
			0 => Ok(Value::none()),
			1 => Ok(Value::some(Value::bool(true))),
			2 => Ok(Value::some(Value::bool(false))),
			b => Err(Error::InvalidOptionTag(b)),
		}
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let byte = match value {
			Value::Variant(v) if v.name == "None" && v.values.is_empty() => 0,
			Value::Variant(v) if v.name == "Some" => match single(&v.values) {
				Some(Value::Primitive(Primitive::Bool(true))) => 1,
				Some(Value::Primitive(Primitive::Bool(false))) => 2,
				_ => return Err(Error::mismatch("Some(bool)", value.kind())),
			},
			other => return Err(Error::mismatch("Option<bool>", other.kind())),
		};
		out.push(byte);
		Ok(())
	}
}

/// UTF-8 text behind a compact length prefix.
pub struct StrAdapter;

impl Adapter for StrAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		let len = compact::decode_len(reader)?;
		let bytes = reader.read(len)?;
		Ok(Value::string(String::from_utf8(bytes.to_vec())?))
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		match value {
			Value::Primitive(Primitive::Str(s)) => {
				compact::encode_len(s.len(), out);
				out.extend_from_slice(s.as_bytes());
				Ok(())
			}
			other => Err(Error::mismatch("str", other.kind())),
		}
	}
}

/// `Vec<u8>` read and written in one slice rather than byte by byte.
pub struct BytesAdapter;

impl Adapter for BytesAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		let len = compact::decode_len(reader)?;
		let bytes = reader.read(len)?;
		Ok(Value::unnamed_composite(bytes.iter().map(|b| Value::u8(*b)).collect()))
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Value::Composite(Composite::Unnamed(items)) = value else {
			return Err(Error::mismatch("Vec<u8>", value.kind()));
		};
		let start = out.len();
		compact::encode_len(items.len(), out);
		for item in items {
			match item {
				Value::Primitive(Primitive::U8(b)) => out.push(*b),
				other => {
					out.truncate(start);
					return Err(Error::mismatch("u8", other.kind()));
				}
			}
		}
		Ok(())
	}
}

/// The value of a composite holding exactly one entry.
pub(crate) fn single(values: &Composite) -> Option<&Value> {
	match values {
		Composite::Unnamed(vals) if vals.len() == 1 => vals.first(),
		Composite::Named(vals) if vals.len() == 1 => vals.first().map(|(_, v)| v),
		_ => None,
	}
}
