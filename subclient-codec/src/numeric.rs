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

//! Fixed width integers, encoded as raw little-endian bytes of their natural width.

use crate::{Adapter, Error, Primitive, Reader, ScaleCoder, ScaleType, TypeDescriptor, TypeTag, Value};
use primitive_types::{U256, U512};
use std::marker::PhantomData;

macro_rules! wide_signed {
	($(#[$attr:meta])* $name:ident, $bytes:literal) => {
		$(#[$attr])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub struct $name(pub [u8; $bytes]);

		impl $name {
			pub fn from_le_bytes(bytes: [u8; $bytes]) -> Self {
				$name(bytes)
			}

			pub fn to_le_bytes(self) -> [u8; $bytes] {
				self.0
			}

			pub fn is_negative(&self) -> bool {
				self.0[$bytes - 1] & 0x80 != 0
			}
		}

		impl From<i128> for $name {
			fn from(val: i128) -> Self {
				let fill = if val < 0 { 0xff } else { 0x00 };
				let mut bytes = [fill; $bytes];
				bytes[..16].copy_from_slice(&val.to_le_bytes());
				$name(bytes)
			}
		}
	};
}

wide_signed!(
	/// A 256 bit signed integer in little-endian two's complement.
	I256,
	32
);
wide_signed!(
	/// A 512 bit signed integer in little-endian two's complement.
	I512,
	64
);

/// An integer with a fixed encoded width.
pub trait FixedWidth: Sized + Copy + Send + Sync + 'static {
	/// Encoded width in bytes.
	const WIDTH: usize;
	const TAG: TypeTag;

	/// Build from exactly [`FixedWidth::WIDTH`] little-endian bytes.
	fn from_le_slice(bytes: &[u8]) -> Self;
	fn extend_le(&self, out: &mut Vec<u8>);
	fn into_primitive(self) -> Primitive;
	fn from_primitive(primitive: &Primitive) -> Result<Self, Error>;
}

macro_rules! native_fixed_width {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl FixedWidth for $ty {
				const WIDTH: usize = std::mem::size_of::<$ty>();
				const TAG: TypeTag = TypeTag::$variant;

				fn from_le_slice(bytes: &[u8]) -> Self {
					let mut buf = [0u8; std::mem::size_of::<$ty>()];
					buf.copy_from_slice(bytes);
					<$ty>::from_le_bytes(buf)
				}

				fn extend_le(&self, out: &mut Vec<u8>) {
					out.extend_from_slice(&self.to_le_bytes());
				}

				fn into_primitive(self) -> Primitive {
					Primitive::$variant(self)
				}

				fn from_primitive(primitive: &Primitive) -> Result<Self, Error> {
					match primitive {
						Primitive::$variant(val) => Ok(*val),
						other => Err(Error::mismatch(stringify!($ty), other.kind())),
					}
				}
			}
		)*
	};
}

native_fixed_width! {
	u8 => U8,
	u16 => U16,
	u32 => U32,
	u64 => U64,
	u128 => U128,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	i128 => I128,
}

macro_rules! uint_fixed_width {
	($($ty:ident => $variant:ident, $bytes:literal);* $(;)?) => {
		$(
			impl FixedWidth for $ty {
				const WIDTH: usize = $bytes;
				const TAG: TypeTag = TypeTag::$variant;

				fn from_le_slice(bytes: &[u8]) -> Self {
					$ty::from_little_endian(bytes)
				}

				fn extend_le(&self, out: &mut Vec<u8>) {
					let mut buf = [0u8; $bytes];
					self.to_little_endian(&mut buf);
					out.extend_from_slice(&buf);
				}

				fn into_primitive(self) -> Primitive {
					Primitive::$variant(self)
				}

				fn from_primitive(primitive: &Primitive) -> Result<Self, Error> {
					match primitive {
						Primitive::$variant(val) => Ok(*val),
						other => Err(Error::mismatch(stringify!($ty), other.kind())),
					}
				}
			}
		)*
	};
}

uint_fixed_width! {
	U256 => U256, 32;
	U512 => U512, 64;
}

macro_rules! int_fixed_width {
	($($ty:ident => $variant:ident, $bytes:literal);* $(;)?) => {
		$(
			impl FixedWidth for $ty {
				const WIDTH: usize = $bytes;
				const TAG: TypeTag = TypeTag::$variant;

				fn from_le_slice(bytes: &[u8]) -> Self {
					let mut buf = [0u8; $bytes];
					buf.copy_from_slice(bytes);
					$ty(buf)
				}

				fn extend_le(&self, out: &mut Vec<u8>) {
					out.extend_from_slice(&self.0);
				}

				fn into_primitive(self) -> Primitive {
					Primitive::$variant(self)
				}

				fn from_primitive(primitive: &Primitive) -> Result<Self, Error> {
					match primitive {
						Primitive::$variant(val) => Ok(*val),
						other => Err(Error::mismatch(stringify!($ty), other.kind())),
					}
				}
			}
		)*
	};
}

int_fixed_width! {
	I256 => I256, 32;
	I512 => I512, 64;
}

macro_rules! fixed_width_scale_type {
	($($ty:ty),* $(,)?) => {
		$(
			impl ScaleType for $ty {
				fn descriptor() -> TypeDescriptor {
					TypeDescriptor::primitive(<$ty as FixedWidth>::TAG)
				}

				fn to_value(&self) -> Value {
					Value::Primitive(FixedWidth::into_primitive(*self))
				}

				fn from_value(value: Value) -> Result<Self, Error> {
					<$ty as FixedWidth>::from_primitive(&value.into_primitive()?)
				}
			}
		)*
	};
}

fixed_width_scale_type!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, U256, U512, I256, I512);

/// Adapter for any [`FixedWidth`] integer.
pub struct NumericAdapter<T>(PhantomData<fn() -> T>);

impl<T> NumericAdapter<T> {
	pub fn new() -> Self {
		NumericAdapter(PhantomData)
	}
}

impl<T> Default for NumericAdapter<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: FixedWidth> Adapter for NumericAdapter<T> {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		let bytes = reader.read(T::WIDTH)?;
		Ok(Value::Primitive(T::from_le_slice(bytes).into_primitive()))
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		match value {
			Value::Primitive(primitive) => {
				T::from_primitive(primitive)?.extend_le(out);
				Ok(())
			}
			other => Err(Error::mismatch(T::TAG.to_string(), other.kind())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use codec::Encode;

	#[test]
	fn natural_width_little_endian() {
		let coder = ScaleCoder::default();
		assert_eq!(coder.encode(&0x0102u16).unwrap(), vec![0x02, 0x01]);
		assert_eq!(coder.encode(&-1i32).unwrap(), vec![0xff; 4]);
		assert_eq!(coder.encode(&u64::MAX).unwrap(), u64::MAX.encode());
		assert_eq!(coder.encode(&i128::MIN).unwrap(), i128::MIN.encode());
		assert_eq!(coder.encode(&U256::from(1u8)).unwrap().len(), 32);
		assert_eq!(coder.encode(&U512::MAX).unwrap(), vec![0xff; 64]);
	}

	#[test]
	fn round_trip_extremes() {
		let coder = ScaleCoder::default();
		for v in [i8::MIN, -1, 0, 1, i8::MAX] {
			assert_eq!(coder.decode::<i8>(&coder.encode(&v).unwrap()).unwrap(), v);
		}
		for v in [0u128, 1, u128::MAX / 3, u128::MAX] {
			assert_eq!(coder.decode::<u128>(&coder.encode(&v).unwrap()).unwrap(), v);
		}
		for v in [I256::from(-5i128), I256::from(i128::MAX)] {
			assert_eq!(coder.decode::<I256>(&coder.encode(&v).unwrap()).unwrap(), v);
		}
		let big = U256::MAX - U256::from(7u8);
		assert_eq!(coder.decode::<U256>(&coder.encode(&big).unwrap()).unwrap(), big);
	}

	#[test]
	fn wide_signed_sign_extends() {
		let minus_one = I512::from(-1i128);
		assert!(minus_one.is_negative());
		assert_eq!(minus_one.to_le_bytes(), [0xff; 64]);
		assert!(!I256::from(5i128).is_negative());
	}

	#[test]
	fn short_input_fails() {
		let coder = ScaleCoder::default();
		assert!(matches!(coder.decode::<u32>(&[1, 2, 3]), Err(Error::NotEnoughData { needed: 4, remaining: 3 })));
	}
}
