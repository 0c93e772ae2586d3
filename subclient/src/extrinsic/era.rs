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

//! Transaction lifetime, in the two byte form `CheckMortality` expects.

use subclient_codec::{
	Adapter, Composite, Error as CodecError, Reader, Registry, ScaleCoder, ScaleType, TypeDescriptor, TypeTag, Value,
};

const ERA_TAG: TypeTag = TypeTag::Named("subclient::extrinsic::Era");

/// How long a transaction stays valid.
///
/// A mortal era is valid for `period` blocks starting at the most recent block whose number
/// is congruent to `phase` modulo `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Era {
	#[default]
	Immortal,
	Mortal { period: u64, phase: u64 },
}

impl Era {
	/// A mortal era starting at block `current`. The period is rounded up to a power of two
	/// between 4 and 65536, and the phase quantized to what two bytes can carry.
	pub fn mortal(period: u64, current: u64) -> Self {
		let period = period.checked_next_power_of_two().unwrap_or(1 << 16).clamp(4, 1 << 16);
		let phase = current % period;
		let quantize_factor = (period >> 12).max(1);
		Era::Mortal { period, phase: phase / quantize_factor * quantize_factor }
	}

	pub fn is_immortal(&self) -> bool {
		matches!(self, Era::Immortal)
	}

	/// First block of the era that contains `current`.
	pub fn birth(&self, current: u64) -> u64 {
		match *self {
			Era::Immortal => 0,
			// only reachable by building the variant by hand
			Era::Mortal { period: 0, .. } => 0,
			Era::Mortal { period, phase } => (current.max(phase) - phase) / period * period + phase,
		}
	}

	/// Last block (exclusive) for which a transaction in this era is valid.
	pub fn death(&self, current: u64) -> u64 {
		match *self {
			Era::Immortal => u64::MAX,
			Era::Mortal { period: 0, .. } => u64::MAX,
			Era::Mortal { period, .. } => self.birth(current) + period,
		}
	}

	pub fn to_bytes(&self) -> Vec<u8> {
		match *self {
			Era::Immortal => vec![0],
			Era::Mortal { period, phase } => {
				let quantize_factor = (period >> 12).max(1);
				let encoded = (period.trailing_zeros().saturating_sub(1).clamp(1, 15) as u16)
					| (((phase / quantize_factor) << 4) as u16);
				encoded.to_le_bytes().to_vec()
			}
		}
	}

	pub fn read(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
		let first = reader.read_byte()?;
		if first == 0 {
			return Ok(Era::Immortal);
		}
		let encoded = u64::from(first) | (u64::from(reader.read_byte()?) << 8);
		let period = 2u64 << (encoded % (1 << 4));
		let quantize_factor = (period >> 12).max(1);
		let phase = (encoded >> 4) * quantize_factor;
		if period >= 4 && phase < period {
			Ok(Era::Mortal { period, phase })
		} else {
			Err(CodecError::custom(InvalidEra(encoded as u16)))
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("invalid mortal era encoding {0:#06x}")]
pub struct InvalidEra(u16);

impl ScaleType for Era {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::primitive(ERA_TAG)
	}

	fn to_value(&self) -> Value {
		match *self {
			Era::Immortal => Value::variant("Immortal", Composite::Unnamed(vec![])),
			Era::Mortal { period, phase } => Value::variant(
				"Mortal",
				Composite::Named(vec![("period".into(), Value::u64(period)), ("phase".into(), Value::u64(phase))]),
			),
		}
	}

	fn from_value(value: Value) -> Result<Self, CodecError> {
		let variant = value.into_variant()?;
		match variant.name.as_str() {
			"Immortal" => Ok(Era::Immortal),
			"Mortal" => {
				let mut fields = subclient_codec::Fields::new("Era", Value::Composite(variant.values))?;
				Ok(Era::Mortal { period: fields.take("period")?, phase: fields.take("phase")? })
			}
			other => Err(CodecError::TypeMismatch { expected: "Era".into(), got: format!("variant '{other}'") }),
		}
	}
}

/// Reads and writes [`Era`] values.
pub struct EraAdapter;

impl Adapter for EraAdapter {
	fn read(&self, _: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, CodecError> {
		Era::read(reader).map(|era| era.to_value())
	}

	fn write(&self, _: &TypeDescriptor, value: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), CodecError> {
		let era = Era::from_value(value.clone())?;
		out.extend_from_slice(&era.to_bytes());
		Ok(())
	}
}

/// Make `registry` able to handle [`Era`].
pub fn register(registry: &Registry) {
	registry.register_adapter(ERA_TAG, EraAdapter);
}
