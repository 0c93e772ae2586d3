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

use crate::{Error, ScaleCoder, ScaleType, TypeDescriptor, Value};

/// Accumulates the encoding of several values. The bytes only leave through
/// [`Writer::commit`]; dropping the writer discards them.
pub struct Writer<'c> {
	coder: &'c ScaleCoder,
	bytes: Vec<u8>,
}

impl<'c> Writer<'c> {
	pub fn new(coder: &'c ScaleCoder) -> Self {
		Writer { coder, bytes: Vec::new() }
	}

	pub fn append<T: ScaleType>(&mut self, value: &T) -> Result<&mut Self, Error> {
		self.coder.encode_to(value, &mut self.bytes)?;
		Ok(self)
	}

	pub fn append_value(&mut self, descriptor: &TypeDescriptor, value: &Value) -> Result<&mut Self, Error> {
		let start = self.bytes.len();
		if let Err(e) = self.coder.write_value(descriptor, value, &mut self.bytes) {
			self.bytes.truncate(start);
			return Err(e);
		}
		Ok(self)
	}

	/// Append bytes that are already encoded.
	pub fn append_raw(&mut self, bytes: &[u8]) -> &mut Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	pub fn commit(self) -> Vec<u8> {
		self.bytes
	}
}

#[cfg(test)]
mod tests {
	use crate::{Compact, ScaleCoder};

	#[test]
	fn appends_in_order() {
		let coder = ScaleCoder::default();
		let mut writer = coder.writer();
		writer.append(&0x49u8).unwrap().append(&Compact(1u32)).unwrap().append_raw(&[0xff]);
		assert_eq!(writer.len(), 3);
		assert_eq!(writer.commit(), vec![0x49, 0x04, 0xff]);
	}
}
