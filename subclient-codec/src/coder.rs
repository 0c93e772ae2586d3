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

use crate::{
	adapter::{BoolAdapter, BytesAdapter, OptionalBoolAdapter, StrAdapter},
	CompactAdapter, Error, NumericAdapter, Reader, Registry, ScaleType, StructuralFactory, TypeDescriptor, TypeTag,
	Value, Writer, I256, I512,
};
use primitive_types::{U256, U512};
use std::sync::Arc;

/// Entry point for encoding and decoding. Cheap to clone; clones share one [`Registry`].
#[derive(Clone)]
pub struct ScaleCoder {
	registry: Arc<Registry>,
}

impl ScaleCoder {
	pub fn new(registry: Registry) -> Self {
		ScaleCoder { registry: Arc::new(registry) }
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn encode<T: ScaleType>(&self, value: &T) -> Result<Vec<u8>, Error> {
		let mut out = Vec::new();
		self.encode_to(value, &mut out)?;
		Ok(out)
	}

	/// Append the encoding of `value` to `out`. Nothing is appended if encoding fails.
	pub fn encode_to<T: ScaleType>(&self, value: &T, out: &mut Vec<u8>) -> Result<(), Error> {
		let start = out.len();
		self.write_value(&T::descriptor(), &value.to_value(), out).map_err(|e| {
			out.truncate(start);
			e
		})
	}

	/// Decode a `T` from the start of `bytes`. Trailing bytes are ignored.
	pub fn decode<T: ScaleType>(&self, bytes: &[u8]) -> Result<T, Error> {
		self.decode_from(&mut Reader::new(bytes))
	}

	pub fn decode_from<T: ScaleType>(&self, reader: &mut Reader<'_>) -> Result<T, Error> {
		T::from_value(self.read_value(&T::descriptor(), reader)?)
	}

	pub fn read_value(&self, descriptor: &TypeDescriptor, reader: &mut Reader<'_>) -> Result<Value, Error> {
		self.registry.read(descriptor, reader, self)
	}

	pub fn write_value(&self, descriptor: &TypeDescriptor, value: &Value, out: &mut Vec<u8>) -> Result<(), Error> {
		self.registry.write(descriptor, value, self, out)
	}

	/// Start building a byte string out of several values.
	pub fn writer(&self) -> Writer<'_> {
		Writer::new(self)
	}
}

impl Default for ScaleCoder {
	/// A coder with adapters for every primitive and the structural fallback.
	fn default() -> Self {
		let registry = Registry::new();
		registry.register_adapter(TypeTag::Bool, BoolAdapter);
		registry.register_adapter(TypeTag::Option(Box::new(TypeTag::Bool)), OptionalBoolAdapter);
		registry.register_adapter(TypeTag::Str, StrAdapter);
		registry.register_adapter(TypeTag::Sequence(Box::new(TypeTag::U8)), BytesAdapter);
		registry.register_adapter(TypeTag::Compact, CompactAdapter);
		registry.register_adapter(TypeTag::U8, NumericAdapter::<u8>::new());
		registry.register_adapter(TypeTag::U16, NumericAdapter::<u16>::new());
		registry.register_adapter(TypeTag::U32, NumericAdapter::<u32>::new());
		registry.register_adapter(TypeTag::U64, NumericAdapter::<u64>::new());
		registry.register_adapter(TypeTag::U128, NumericAdapter::<u128>::new());
		registry.register_adapter(TypeTag::U256, NumericAdapter::<U256>::new());
		registry.register_adapter(TypeTag::U512, NumericAdapter::<U512>::new());
		registry.register_adapter(TypeTag::I8, NumericAdapter::<i8>::new());
		registry.register_adapter(TypeTag::I16, NumericAdapter::<i16>::new());
		registry.register_adapter(TypeTag::I32, NumericAdapter::<i32>::new());
		registry.register_adapter(TypeTag::I64, NumericAdapter::<i64>::new());
		registry.register_adapter(TypeTag::I128, NumericAdapter::<i128>::new());
		registry.register_adapter(TypeTag::I256, NumericAdapter::<I256>::new());
		registry.register_adapter(TypeTag::I512, NumericAdapter::<I512>::new());
		registry.register_generic_factory(StructuralFactory);
		ScaleCoder::new(registry)
	}
}
