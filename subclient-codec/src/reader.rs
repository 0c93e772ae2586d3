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

//! A bounds checked cursor over borrowed bytes.

use crate::Error;

/// Sequential reader over a byte slice. The offset never moves past the end of
/// the slice; a read that would do so fails and leaves the offset untouched.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
	data: &'a [u8],
	offset: usize,
}

impl<'a> Reader<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Reader { data, offset: 0 }
	}

	/// Number of bytes consumed so far.
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Number of bytes left to read.
	pub fn remaining(&self) -> usize {
		self.data.len() - self.offset
	}

	/// True once every byte has been consumed.
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// The bytes that have not been read yet, without consuming them.
	pub fn remaining_bytes(&self) -> &'a [u8] {
		&self.data[self.offset..]
	}

	pub fn peek_byte(&self) -> Option<u8> {
		self.data.get(self.offset).copied()
	}

	/// Read exactly `size` bytes.
	pub fn read(&mut self, size: usize) -> Result<&'a [u8], Error> {
		let remaining = self.remaining();
		if size > remaining {
			return Err(Error::NotEnoughData { needed: size, remaining });
		}
		let bytes = &self.data[self.offset..self.offset + size];
		self.offset += size;
		Ok(bytes)
	}

	pub fn read_byte(&mut self) -> Result<u8, Error> {
		Ok(self.read(1)?[0])
	}

	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read(N)?);
		Ok(out)
	}

	/// Consume everything that is left.
	pub fn read_to_end(&mut self) -> &'a [u8] {
		let rest = self.remaining_bytes();
		self.offset = self.data.len();
		rest
	}

	/// Restore an offset previously obtained from [`Reader::offset`].
	pub(crate) fn rewind(&mut self, offset: usize) {
		debug_assert!(offset <= self.offset, "can only rewind to an earlier checkpoint");
		self.offset = offset;
	}
}
