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

use super::TypeId;
use subclient_codec::scale_composite;

/// Details about the extrinsic format of the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicMetadata {
	/// The `UncheckedExtrinsic` type. Its `Address` and `Signature` parameters select
	/// how signed extrinsics carry the sender and signature.
	pub ty: TypeId,
	pub version: u8,
	/// In the order their data appears in an extrinsic.
	pub signed_extensions: Vec<SignedExtension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedExtension {
	pub identifier: String,
	/// Type of the data carried inside the extrinsic.
	pub ty: TypeId,
	/// Type of the data only included in the signing payload.
	pub additional_signed: TypeId,
}

scale_composite!(ExtrinsicMetadata { ty: TypeId, version: u8, signed_extensions: Vec<SignedExtension> });
scale_composite!(SignedExtension { identifier: String, ty: TypeId, additional_signed: TypeId });
