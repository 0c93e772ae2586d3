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

//! Generic encoding for anything described by its [`Shape`]: composites, variants,
//! options, sequences, arrays and tuples. Each nested field goes back through the
//! registry, so arbitrarily nested types need no dedicated adapter.

use crate::{
	adapter::single, compact, Adapter, AdapterFactory, Composite, Error, Field, Reader, ScaleCoder, Shape,
	TypeDescriptor, Value, Variant,
};
use std::sync::Arc;

/// Upper bound on the length of a decoded sequence of zero sized items.
pub const MAX_ZERO_SIZED_ITEMS: usize = 1 << 16;

/// The fallback factory registered by [`ScaleCoder::default`].
pub struct StructuralFactory;

impl AdapterFactory for StructuralFactory {
	fn name(&self) -> &str {
		"structural"
	}

	fn make(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn Adapter>, Error> {
		match descriptor.shape {
			Shape::Composite(_) => Ok(Arc::new(CompositeAdapter)),
			Shape::Variant(_) => Ok(Arc::new(VariantAdapter)),
			Shape::Option(_) => Ok(Arc::new(OptionAdapter)),
			Shape::Sequence(_) => Ok(Arc::new(SequenceAdapter)),
			Shape::Array { .. } => Ok(Arc::new(ArrayAdapter)),
			Shape::Tuple(_) => Ok(Arc::new(TupleAdapter)),
			Shape::Primitive | Shape::Dynamic { .. } => Err(Error::NoAdapterFound(descriptor.tag.clone())),
		}
	}
}

fn read_fields(fields: &[Field], reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Composite, Error> {
	let named = !fields.is_empty() && fields.iter().all(|f| f.name.is_some());
	if named {
		let mut values = Vec::with_capacity(fields.len());
		for field in fields {
			let value = coder.read_value(&(field.ty)(), reader)?;
			values.push((field.name.unwrap_or_default().to_string(), value));
		}
		Ok(Composite::Named(values))
	} else {
		let mut values = Vec::with_capacity(fields.len());
		for field in fields {
			values.push(coder.read_value(&(field.ty)(), reader)?);
		}
		Ok(Composite::Unnamed(values))
	}
}

fn write_fields(
	descriptor: &TypeDescriptor,
	fields: &[Field],
	values: &Composite,
	coder: &ScaleCoder,
	out: &mut Vec<u8>,
) -> Result<(), Error> {
	if fields.len() != values.len() {
		return Err(Error::mismatch(
			format!("{} fields for {}", fields.len(), descriptor.tag),
			format!("{} fields", values.len()),
		));
	}
	for (index, field) in fields.iter().enumerate() {
		let value = match (values, field.name) {
			(Composite::Named(values), Some(name)) => values.iter().find(|(n, _)| n == name).map(|(_, v)| v),
			(Composite::Named(values), None) => values.get(index).map(|(_, v)| v),
			(Composite::Unnamed(values), _) => values.get(index),
		};
		let value = value.ok_or_else(|| {
			Error::mismatch(format!("field '{}' of {}", field.name.unwrap_or("?"), descriptor.tag), "nothing")
		})?;
		coder.write_value(&(field.ty)(), value, out)?;
	}
	Ok(())
}

fn write_items(
	item: &TypeDescriptor,
	values: &Composite,
	coder: &ScaleCoder,
	out: &mut Vec<u8>,
) -> Result<(), Error> {
	match values {
		Composite::Unnamed(values) => values.iter().try_for_each(|v| coder.write_value(item, v, out)),
		Composite::Named(values) => values.iter().try_for_each(|(_, v)| coder.write_value(item, v, out)),
	}
}

fn expect_composite<'v>(descriptor: &TypeDescriptor, value: &'v Value) -> Result<&'v Composite, Error> {
	match value {
		Value::Composite(c) => Ok(c),
		other => Err(Error::mismatch(descriptor.tag.to_string(), other.kind())),
	}
}

struct CompositeAdapter;

impl Adapter for CompositeAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Composite(fields) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		read_fields(fields, reader, coder).map(Value::Composite)
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Composite(fields) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		write_fields(descriptor, fields, expect_composite(descriptor, value)?, coder, out)
	}
}

/// One discriminant byte selects the variant; indices that are not declared are errors.
struct VariantAdapter;

impl Adapter for VariantAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Variant(variants) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let index = reader.read_byte()?;
		let variant = variants
			.iter()
			.find(|v| v.index == index)
			.ok_or_else(|| Error::UnknownVariant { ty: descriptor.tag.clone(), index })?;
		log::trace!("{}: variant {} ({})", descriptor.tag, variant.name, index);
		let values = read_fields(&variant.fields, reader, coder)?;
		Ok(Value::Variant(Variant { name: variant.name.to_string(), values }))
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Variant(variants) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let Value::Variant(value) = value else {
			return Err(Error::mismatch(descriptor.tag.to_string(), value.kind()));
		};
		let variant = variants
			.iter()
			.find(|v| v.name == value.name)
			.ok_or_else(|| Error::UnknownVariantName { ty: descriptor.tag.clone(), name: value.name.clone() })?;
		out.push(variant.index);
		write_fields(descriptor, &variant.fields, &value.values, coder, out)
	}
}

struct OptionAdapter;

impl Adapter for OptionAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Option(inner) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		match reader.read_byte()? {
			0 => Ok(Value::none()),
			1 => Ok(Value::some(coder.read_value(&inner(), reader)?)),
			b => Err(Error::InvalidOptionTag(b)),
		}
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Option(inner) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		match value {
			Value::Variant(v) if v.name == "None" => {
				out.push(0);
				Ok(())
			}
			Value::Variant(v) if v.name == "Some" => {
				let inner_value =
					single(&v.values).ok_or_else(|| Error::mismatch("Some with one value", value.kind()))?;
				out.push(1);
				coder.write_value(&inner(), inner_value, out)
			}
			other => Err(Error::mismatch(descriptor.tag.to_string(), other.kind())),
		}
	}
}

/// Compact element count followed by the elements.
struct SequenceAdapter;

impl Adapter for SequenceAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Sequence(item) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let len = compact::decode_len(reader)?;
		let item = item();
		// the declared length is untrusted, so don't let it size the allocation
		let mut values = Vec::with_capacity(len.min(reader.remaining()));
		for read in 1..=len {
			let before = reader.offset();
			let value = coder.read_value(&item, reader)?;
			if reader.offset() == before {
				// zero sized items all decode to the same value without touching the input
				if len > MAX_ZERO_SIZED_ITEMS {
					return Err(Error::TooManyZeroSized { len, limit: MAX_ZERO_SIZED_ITEMS });
				}
				values.resize(len, value);
				break;
			}
			values.push(value);
			// every further item needs at least one byte
			let left = len - read;
			if left > reader.remaining() {
				return Err(Error::NotEnoughData { needed: left, remaining: reader.remaining() });
			}
		}
		Ok(Value::unnamed_composite(values))
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Sequence(item) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let values = expect_composite(descriptor, value)?;
		compact::encode_len(values.len(), out);
		write_items(&item(), values, coder, out)
	}
}

struct ArrayAdapter;

impl Adapter for ArrayAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Array { len, item } = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let item = item();
		let mut values = Vec::with_capacity((*len).min(reader.remaining()));
		for _ in 0..*len {
			values.push(coder.read_value(&item, reader)?);
		}
		Ok(Value::unnamed_composite(values))
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Array { len, item } = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let values = expect_composite(descriptor, value)?;
		if values.len() != *len {
			return Err(Error::mismatch(format!("{len} items"), format!("{} items", values.len())));
		}
		write_items(&item(), values, coder, out)
	}
}

struct TupleAdapter;

impl Adapter for TupleAdapter {
	fn read(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>, coder: &ScaleCoder) -> Result<Value, Error> {
		let Shape::Tuple(items) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let mut values = Vec::with_capacity(items.len());
		for item in items {
			values.push(coder.read_value(&item(), reader)?);
		}
		Ok(Value::unnamed_composite(values))
	}

	fn write(&self, descriptor: &TypeDescriptor, value: &Value, coder: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		let Shape::Tuple(items) = &descriptor.shape else {
			return Err(Error::NoAdapterFound(descriptor.tag.clone()));
		};
		let fields: Vec<Field> = items.iter().map(|ty| Field::unnamed(*ty)).collect();
		write_fields(descriptor, &fields, expect_composite(descriptor, value)?, coder, out)
	}
}
