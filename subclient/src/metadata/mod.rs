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

//! Runtime metadata, decoded with our own codec. Only the V14 layout is understood:
//!
//! `magic number (u32) | version (u8) | type table | modules | extrinsic details | runtime type`

mod extrinsic;
mod modules;
mod types;

pub use extrinsic::{ExtrinsicMetadata, SignedExtension};
pub use modules::{
	Module, ModuleConstant, ModuleStorage, StorageHasher, StorageItem, StorageItemType, StorageMap, StorageModifier,
};
pub use types::{
	FieldDef, LookupEntry, RuntimeType, TypeDef, TypeDefArray, TypeDefBitSequence, TypeDefCompact,
	TypeDefComposite, TypeDefPrimitive, TypeDefSequence, TypeDefTuple, TypeDefVariant, TypeId, TypeLookup,
	TypeParam, VariantDef,
};

use subclient_codec::{Error as CodecError, Reader, ScaleCoder};

/// "meta" as a little-endian u32.
pub const META_MAGIC: u32 = 0x6174_656d;
pub const SUPPORTED_VERSION: u8 = 14;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
	#[error("magic number {0:#010x} does not mark runtime metadata")]
	BadMagic(u32),
	#[error("metadata version {0} is not supported")]
	UnsupportedVersion(u8),
	#[error("{0}")]
	Codec(#[from] CodecError),
	#[error("metadata is not valid hex: {0}")]
	Hex(#[from] hex::FromHexError),
}

/// The schema a node publishes through `state_getMetadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeMetadata {
	pub magic_number: u32,
	pub version: u8,
	pub lookup: TypeLookup,
	pub modules: Vec<Module>,
	pub extrinsic: ExtrinsicMetadata,
	/// Trailing id of the runtime type, when the blob carries one.
	pub runtime_type: Option<TypeId>,
}

impl RuntimeMetadata {
	pub fn new(lookup: TypeLookup, modules: Vec<Module>, extrinsic: ExtrinsicMetadata) -> Self {
		RuntimeMetadata {
			magic_number: META_MAGIC,
			version: SUPPORTED_VERSION,
			lookup,
			modules,
			extrinsic,
			runtime_type: None,
		}
	}

	/// Decode SCALE encoded metadata. Here's an example command using `curl` and `jq`
	/// to download this from a locally running node (on the default port):
	///
	/// ```sh
	/// curl -sX POST -H "Content-Type: application/json" --data '{"jsonrpc":"2.0","method":"state_getMetadata", "id": 1}' localhost:9933 \
	///     | jq .result \
	///     | cut -d '"' -f 2 \
	///     | xxd -r -p > node_metadata.scale
	/// ```
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetadataError> {
		Self::decode_with(&ScaleCoder::default(), bytes)
	}

	/// Decode the hex string returned over RPC.
	pub fn from_hex(text: &str) -> Result<Self, MetadataError> {
		let bytes = subclient_common::from_hex(text.trim())?;
		Self::from_bytes(&bytes)
	}

	pub fn decode_with(coder: &ScaleCoder, bytes: &[u8]) -> Result<Self, MetadataError> {
		log::trace!("Decoding metadata");
		let mut reader = Reader::new(bytes);
		let magic_number: u32 = coder.decode_from(&mut reader)?;
		if magic_number != META_MAGIC {
			return Err(MetadataError::BadMagic(magic_number));
		}
		let version: u8 = coder.decode_from(&mut reader)?;
		if version != SUPPORTED_VERSION {
			return Err(MetadataError::UnsupportedVersion(version));
		}
		let lookup: TypeLookup = coder.decode_from(&mut reader)?;
		let modules: Vec<Module> = coder.decode_from(&mut reader)?;
		let extrinsic: ExtrinsicMetadata = coder.decode_from(&mut reader)?;
		let runtime_type = if reader.is_empty() { None } else { Some(coder.decode_from(&mut reader)?) };
		log::trace!("V{} metadata: {} types, {} modules", version, lookup.types.len(), modules.len());
		Ok(RuntimeMetadata { magic_number, version, lookup, modules, extrinsic, runtime_type })
	}

	pub fn to_bytes(&self, coder: &ScaleCoder) -> Result<Vec<u8>, MetadataError> {
		let mut writer = coder.writer();
		writer
			.append(&self.magic_number)?
			.append(&self.version)?
			.append(&self.lookup)?
			.append(&self.modules)?
			.append(&self.extrinsic)?;
		if let Some(ty) = &self.runtime_type {
			writer.append(ty)?;
		}
		Ok(writer.commit())
	}
}
