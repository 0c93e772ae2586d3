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

use sp_core::{ecdsa, ed25519, sr25519, Pair};

/// The signing capability was unable to produce a signature.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SignerError {
	#[error("signer rejected the payload: {0}")]
	Rejected(String),
}

/// Something that can sign extrinsic payloads.
pub trait Signer: Send + Sync {
	/// Name of the signature scheme, matched against the runtime's signature variants.
	fn scheme(&self) -> &str;

	fn public_key(&self) -> Vec<u8>;

	fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;

	/// The 32 byte account id for this signer. Keys longer than 32 bytes are hashed with blake2_256.
	fn account_id(&self) -> [u8; 32] {
		let public = self.public_key();
		match <[u8; 32]>::try_from(public.as_slice()) {
			Ok(id) => id,
			Err(_) => sp_core::blake2_256(&public),
		}
	}
}

macro_rules! pair_signer {
	($($pair:ty => $scheme:literal),*) => {
		$(
			impl Signer for $pair {
				fn scheme(&self) -> &str {
					$scheme
				}

				fn public_key(&self) -> Vec<u8> {
					AsRef::<[u8]>::as_ref(&Pair::public(self)).to_vec()
				}

				fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
					let signature = <$pair as Pair>::sign(self, message);
					Ok(AsRef::<[u8]>::as_ref(&signature).to_vec())
				}
			}
		)*
	};
}

pair_signer!(sr25519::Pair => "Sr25519", ed25519::Pair => "Ed25519", ecdsa::Pair => "Ecdsa");
