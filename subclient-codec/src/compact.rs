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

//! The compact (variable width) unsigned integer format.
//!
//! The two lowest bits of the first byte select the mode:
//!
//! | mode   | range              | layout                                          |
//! |--------|--------------------|-------------------------------------------------|
//! | `0b00` | `0..=63`           | one byte, `value << 2`                          |
//! | `0b01` | `64..=16383`       | two LE bytes, `(value << 2) \| 0b01`            |
//! | `0b10` | `16384..=2^30 - 1` | four LE bytes, `(value << 2) \| 0b10`           |
//! | `0b11` | everything larger  | `((n - 4) << 2) \| 0b11` then `n` LE bytes      |
//!
//! Encoding always picks the shortest layout. Decoding accepts over-long layouts.

use crate::{Adapter, Error, Primitive, Reader, ScaleCoder, ScaleType, TypeDescriptor, TypeTag, Value};
use primitive_types::{U256, U512};

/// Append the compact form of `value` to `out`.
pub fn encode(value: &U512, out: &mut Vec<u8>) {
	match value.bits() {
		0..=6 => out.push((value.low_u32() as u8) << 2),
		7..=14 => out.extend_from_slice(&(((value.low_u32() as u16) << 2) | 0b01).to_le_bytes()),
		15..=30 => out.extend_from_slice(&((value.low_u32() << 2) | 0b10).to_le_bytes()),
		bits => {
			let len = ((bits + 7) / 8).max(4);
			let mut le = [0u8; 64];
			value.to_little_endian(&mut le);
			out.push((((len - 4) as u8) << 2) | 0b11);
			out.extend_from_slice(&le[..len]);
		}
	}
}

/// Number of bytes [`encode`] produces for `value`.
pub fn encoded_len(value: &U512) -> usize {
	match value.bits() {
		0..=6 => 1,
		7..=14 => 2,
		15..=30 => 4,
		bits => 1 + ((bits + 7) / 8).max(4),
	}
}

/// Read one compact integer.
pub fn decode(reader: &mut Reader<'_>) -> Result<U512, Error> {
	let first = reader.read_byte()?;
	match first & 0b11 {
		0b00 => Ok(U512::from(first >> 2)),
		0b01 => {
			let second = reader.read_byte()?;
			Ok(U512::from(u16::from_le_bytes([first, second]) >> 2))
		}
		0b10 => {
			let [b1, b2, b3] = reader.read_array::<3>()?;
			Ok(U512::from(u32::from_le_bytes([first, b1, b2, b3]) >> 2))
		}
		_ => {
			let declared = (first >> 2) as usize + 4;
			let remaining = reader.remaining();
			if declared > remaining {
				return Err(Error::InvalidCompactLength { declared, remaining });
			}
			let bytes = reader.read(declared)?;
			let (low, high) = bytes.split_at(declared.min(64));
			if high.iter().any(|b| *b != 0) {
				return Err(Error::Overflow("u512"));
			}
			Ok(U512::from_little_endian(low))
		}
	}
}

/// Append a compact length prefix.
pub fn encode_len(len: usize, out: &mut Vec<u8>) {
	encode(&U512::from(len as u64), out)
}

/// Read a compact length prefix.
pub fn decode_len(reader: &mut Reader<'_>) -> Result<usize, Error> {
	let len = decode(reader)?;
	if len.bits() > 64 {
		return Err(Error::Overflow("usize"));
	}
	usize::try_from(len.as_u64()).map_err(|_| Error::Overflow("usize"))
}

/// Integers that have a compact form.
pub trait CompactInt: Copy + Send + Sync + 'static {
	const NAME: &'static str;

	fn into_u512(self) -> U512;
	fn try_from_u512(value: U512) -> Option<Self>;
}

macro_rules! native_compact_int {
	($($ty:ty),*) => {
		$(
			impl CompactInt for $ty {
				const NAME: &'static str = stringify!($ty);

				fn into_u512(self) -> U512 {
					U512::from(self)
				}

				fn try_from_u512(value: U512) -> Option<Self> {
					if value.bits() > <$ty>::BITS as usize {
						None
					} else {
						Some(value.as_u128() as $ty)
					}
				}
			}
		)*
	};
}

native_compact_int!(u8, u16, u32, u64, u128);

impl CompactInt for U256 {
	const NAME: &'static str = "U256";

	fn into_u512(self) -> U512 {
		let mut le = [0u8; 32];
		self.to_little_endian(&mut le);
		U512::from_little_endian(&le)
	}

	fn try_from_u512(value: U512) -> Option<Self> {
		if value.bits() > 256 {
			return None;
		}
		let mut le = [0u8; 64];
		value.to_little_endian(&mut le);
		Some(U256::from_little_endian(&le[..32]))
	}
}

impl CompactInt for U512 {
	const NAME: &'static str = "U512";

	fn into_u512(self) -> U512 {
		self
	}

	fn try_from_u512(value: U512) -> Option<Self> {
		Some(value)
	}
}

/// Wrapper that makes an integer use the compact form on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::From)]
pub struct Compact<T>(pub T);

impl<T: CompactInt> ScaleType for Compact<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::primitive(TypeTag::Compact)
	}

	fn to_value(&self) -> Value {
		Value::compact(self.0.into_u512())
	}

	fn from_value(value: Value) -> Result<Self, Error> {
		match value.into_primitive()? {
			Primitive::Compact(v) => T::try_from_u512(v).map(Compact).ok_or(Error::Overflow(T::NAME)),
			other => Err(Error::mismatch("compact", other.kind())),
		}
	}
}

pub struct CompactAdapter;

impl Adapter for CompactAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
		decode(reader).map(Value::compact)
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
		match value {
			Value::Primitive(Primitive::Compact(v)) => {
				encode(v, out);
				Ok(())
			}
			other => Err(Error::mismatch("compact", other.kind())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encoded(value: u128) -> Vec<u8> {
		let mut out = Vec::new();
		encode(&U512::from(value), &mut out);
		out
	}

	fn decoded(bytes: &[u8]) -> Result<U512, Error> {
		let mut reader = Reader::new(bytes);
		let value = decode(&mut reader)?;
		assert!(reader.is_empty(), "compact decode should consume all of {bytes:?}");
		Ok(value)
	}

	#[test]
	fn mode_boundaries_are_minimal() {
		let cases: &[(u128, &[u8])] = &[
			(0, &[0x00]),
			(1, &[0x04]),
			(63, &[0xfc]),
			(64, &[0x01, 0x01]),
			(16383, &[0xfd, 0xff]),
			(16384, &[0x02, 0x00, 0x01, 0x00]),
			((1 << 30) - 1, &[0xfe, 0xff, 0xff, 0xff]),
			(1 << 30, &[0x03, 0x00, 0x00, 0x00, 0x40]),
			(u32::MAX as u128, &[0x03, 0xff, 0xff, 0xff, 0xff]),
			(1 << 32, &[0x07, 0x00, 0x00, 0x00, 0x00, 0x01]),
		];
		for (value, bytes) in cases {
			assert_eq!(&encoded(*value), bytes, "encoding {value}");
			assert_eq!(encoded_len(&U512::from(*value)), bytes.len());
			assert_eq!(decoded(bytes).unwrap(), U512::from(*value));
		}
	}

	#[test]
	fn agrees_with_parity_scale_codec() {
		use codec::Encode;
		let mut values: Vec<u128> = vec![0, 63, 64, 16383, 16384, (1 << 30) - 1, 1 << 30, u64::MAX as u128, u128::MAX];
		values.extend((0..128).map(|shift| 1u128 << shift));
		values.extend((1..128).map(|shift| (1u128 << shift) - 1));
		for value in values {
			assert_eq!(encoded(value), codec::Compact(value).encode(), "encoding {value}");
		}
	}

	#[test]
	fn full_u512_range() {
		let mut out = Vec::new();
		encode(&U512::MAX, &mut out);
		assert_eq!(out.len(), 65);
		assert_eq!(out[0], (60 << 2) | 0b11);
		assert_eq!(decoded(&out).unwrap(), U512::MAX);
	}

	#[test]
	fn declared_length_beyond_buffer_fails() {
		// mode 3 declaring 5 bytes, only 2 present
		let err = decoded(&[0x07, 0x01, 0x02]).unwrap_err();
		assert!(matches!(err, Error::InvalidCompactLength { declared: 5, remaining: 2 }));
		assert!(matches!(decoded(&[0x01]), Err(Error::NotEnoughData { .. })));
	}

	#[test]
	fn typed_wrapper_checks_width() {
		let coder = ScaleCoder::default();
		let bytes = coder.encode(&Compact(300u32)).unwrap();
		assert_eq!(bytes, vec![0xb1, 0x04]);
		assert_eq!(coder.decode::<Compact<u32>>(&bytes).unwrap(), Compact(300u32));
		assert!(matches!(coder.decode::<Compact<u8>>(&bytes), Err(Error::Overflow("u8"))));
		let wide = Compact(U256::MAX);
		assert_eq!(coder.decode::<Compact<U256>>(&coder.encode(&wide).unwrap()).unwrap(), wide);
	}
}
