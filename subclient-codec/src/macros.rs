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

//! Macros that implement [`crate::ScaleType`] from an explicit field or variant list.

/// Implement [`crate::ScaleType`] for a struct. Fields are encoded in the order listed,
/// which should be their declaration order.
///
/// ```
/// use subclient_codec::{scale_composite, ScaleCoder};
///
/// struct Memo {
/// 	index: u32,
/// 	memo: Vec<u8>,
/// }
///
/// scale_composite!(Memo { index: u32, memo: Vec<u8> });
///
/// let bytes = ScaleCoder::default().encode(&Memo { index: 0, memo: b"hi".to_vec() }).unwrap();
/// assert_eq!(bytes, vec![0, 0, 0, 0, 8, b'h', b'i']);
/// ```
#[macro_export]
macro_rules! scale_composite {
	($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
		impl $crate::ScaleType for $name {
			fn descriptor() -> $crate::TypeDescriptor {
				$crate::TypeDescriptor::composite(
					concat!(module_path!(), "::", stringify!($name)),
					vec![$($crate::Field::named(stringify!($field), <$ty as $crate::ScaleType>::descriptor)),*],
				)
			}

			fn to_value(&self) -> $crate::Value {
				$crate::Value::named_composite(vec![
					$((stringify!($field).to_string(), $crate::ScaleType::to_value(&self.$field))),*
				])
			}

			#[allow(unused_mut, unused_variables)]
			fn from_value(value: $crate::Value) -> Result<Self, $crate::Error> {
				let mut fields = $crate::Fields::new(stringify!($name), value)?;
				Ok($name { $($field: fields.take::<$ty>(stringify!($field))?),* })
			}
		}
	};
}

/// Implement [`crate::ScaleType`] for an enum without fields, giving each variant's index.
#[macro_export]
macro_rules! scale_unit_enum {
	($name:ident { $($variant:ident = $index:literal),* $(,)? }) => {
		impl $crate::ScaleType for $name {
			fn descriptor() -> $crate::TypeDescriptor {
				$crate::TypeDescriptor::variant(
					concat!(module_path!(), "::", stringify!($name)),
					vec![$($crate::VariantDescriptor::new($index, stringify!($variant), vec![])),*],
				)
			}

			fn to_value(&self) -> $crate::Value {
				let name = match self {
					$($name::$variant => stringify!($variant)),*
				};
				$crate::Value::variant(name, $crate::Composite::Unnamed(vec![]))
			}

			fn from_value(value: $crate::Value) -> Result<Self, $crate::Error> {
				let variant = value.into_variant()?;
				match variant.name.as_str() {
					$(stringify!($variant) => Ok($name::$variant),)*
					other => Err($crate::Error::TypeMismatch {
						expected: stringify!($name).to_string(),
						got: format!("variant '{}'", other),
					}),
				}
			}
		}
	};
}
