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

use crate::TypeTag;

/// Errors that can occur while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("not enough data: needed {needed} more bytes but only {remaining} remain")]
	NotEnoughData { needed: usize, remaining: usize },
	#[error("compact integer declares {declared} bytes but only {remaining} remain")]
	InvalidCompactLength { declared: usize, remaining: usize },
	#[error("value does not fit into {0}")]
	Overflow(&'static str),
	#[error("sequence declares {len} zero sized items, more than the {limit} accepted")]
	TooManyZeroSized { len: usize, limit: usize },
	#[error("invalid boolean byte {0:#04x}")]
	InvalidBool(u8),
	#[error("invalid option presence byte {0:#04x}")]
	InvalidOptionTag(u8),
	#[error("variant index {index} is not declared by {ty}")]
	UnknownVariant { ty: TypeTag, index: u8 },
	#[error("variant '{name}' is not declared by {ty}")]
	UnknownVariantName { ty: TypeTag, name: String },
	#[error("string is not valid utf8: {0}")]
	InvalidUtf8(#[from] std::string::FromUtf8Error),
	#[error("expected {expected}, got {got}")]
	TypeMismatch { expected: String, got: String },
	#[error("missing field '{field}' when building {ty}")]
	MissingField { ty: &'static str, field: &'static str },
	/// Trial signal used between the registry and its generic factories.
	/// It never leaves [`crate::Registry`].
	#[error("no adapter found for {0}")]
	NoAdapterFound(TypeTag),
	#[error("type {0} cannot be decoded: no adapter matches it")]
	NotDecodable(TypeTag),
	#[error("type {0} cannot be encoded: no adapter matches it")]
	NotEncodable(TypeTag),
	#[error("{0}")]
	Custom(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
	/// Wrap an error raised outside of this crate (a dynamic type conversion for instance).
	pub fn custom<E: std::error::Error + Send + Sync + 'static>(err: E) -> Self {
		Error::Custom(Box::new(err))
	}

	pub(crate) fn mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
		Error::TypeMismatch { expected: expected.into(), got: got.into() }
	}
}
