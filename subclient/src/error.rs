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
	dynamic::DynamicError, extrinsic::ExtrinsicError, lookup::LookupError, metadata::MetadataError,
	storage::StorageError,
};
use subclient_codec::Error as CodecError;
use subclient_common::TransportError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Codec(#[from] CodecError),
	#[error(transparent)]
	Metadata(#[from] MetadataError),
	#[error(transparent)]
	Lookup(#[from] LookupError),
	#[error(transparent)]
	Dynamic(#[from] DynamicError),
	#[error(transparent)]
	Extrinsic(#[from] ExtrinsicError),
	#[error(transparent)]
	Storage(#[from] StorageError),
	#[error(transparent)]
	Transport(#[from] TransportError),
	#[error("invalid hex in response: {0}")]
	Hex(#[from] hex::FromHexError),
	#[error("invalid json in response: {0}")]
	Json(#[from] serde_json::Error),
	#[error("no runtime metadata has been published yet")]
	NoSchema,
	#[error("unexpected response to {method}: {response}")]
	UnexpectedResponse { method: String, response: String },
}
