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

//! Building and signing extrinsics.
//!
//! A signed extrinsic is laid out as
//!
//! `0x80 | version | address variant | account id | signature variant | signature | extra | call`
//!
//! where `extra` is the data carried by the runtime's signed extensions, in the order the
//! metadata declares them. The signature covers `call | extra | additional`, with
//! `additional` being data both sides know (genesis hash, runtime versions) that is
//! therefore left out of the extrinsic itself.

mod era;
mod payload;

pub use era::{register as register_adapters, Era, EraAdapter, InvalidEra};
pub use payload::{Call, RuntimeVersion, SignatureParams, SignedPayload, UnsignedPayload};

use crate::lookup::{variants_of, Lookup, LookupError};
use subclient_codec::{compact, Compact, Error as CodecError, ScaleCoder, ScaleType};
use subclient_common::{Hashing, Signer, SignerError, SpecVersion};

/// Payloads longer than this are hashed with blake2_256 before being signed.
pub const MAX_UNHASHED_PAYLOAD: usize = 256;
const SIGNED_FLAG: u8 = 0b1000_0000;

const CHECK_SPEC_VERSION: &str = "CheckSpecVersion";
const CHECK_TX_VERSION: &str = "CheckTxVersion";
const CHECK_GENESIS: &str = "CheckGenesis";
const CHECK_MORTALITY: &str = "CheckMortality";
const CHECK_NONCE: &str = "CheckNonce";
const CHARGE_TRANSACTION_PAYMENT: &str = "ChargeTransactionPayment";

#[derive(Debug, thiserror::Error)]
pub enum ExtrinsicError {
	#[error("{0}")]
	Lookup(#[from] LookupError),
	#[error("{0}")]
	Codec(#[from] CodecError),
	#[error("{0}")]
	Signer(#[from] SignerError),
	#[error("address type has no 'Id' variant")]
	AddressVariant,
	#[error("signature type has no variant for the '{0}' scheme")]
	SignatureVariant(String),
}

/// Assembles extrinsics against one metadata snapshot.
pub struct ExtrinsicBuilder<'a> {
	coder: &'a ScaleCoder,
	lookup: &'a Lookup,
	hashing: &'a dyn Hashing,
}

impl<'a> ExtrinsicBuilder<'a> {
	/// `coder` must be able to handle [`Era`]; see [`register_adapters`].
	pub fn new(coder: &'a ScaleCoder, lookup: &'a Lookup, hashing: &'a dyn Hashing) -> Self {
		ExtrinsicBuilder { coder, lookup, hashing }
	}

	pub fn unsigned<A>(&self, call: Call<A>) -> Result<UnsignedPayload<A>, ExtrinsicError> {
		let (module, variant) = self.lookup.find_call(&call.module, &call.name)?;
		log::trace!("{}.{}: module index {}, call index {}", module.name, variant.name, module.index, variant.index);
		Ok(UnsignedPayload { module_index: module.index, call_index: variant.index, call })
	}

	/// `module index | call index | args`
	pub fn call_bytes<A: ScaleType>(&self, payload: &UnsignedPayload<A>) -> Result<Vec<u8>, ExtrinsicError> {
		let mut writer = self.coder.writer();
		writer.append(&payload.module_index)?.append(&payload.call_index)?.append(&payload.call.args)?;
		Ok(writer.commit())
	}

	/// An extrinsic without signature: the bare version byte followed by the call.
	pub fn unsigned_extrinsic<A: ScaleType>(&self, payload: &UnsignedPayload<A>) -> Result<Vec<u8>, ExtrinsicError> {
		let mut bytes = vec![self.version()];
		bytes.extend(self.call_bytes(payload)?);
		Ok(bytes)
	}

	/// Data carried inside the extrinsic by the signed extensions.
	pub fn extra(&self, params: &SignatureParams) -> Result<Vec<u8>, ExtrinsicError> {
		let mut writer = self.coder.writer();
		for extension in &self.lookup.metadata().extrinsic.signed_extensions {
			match extension.identifier.as_str() {
				CHECK_MORTALITY => writer.append(&params.era)?,
				CHECK_NONCE => writer.append(&Compact(params.nonce.0))?,
				CHARGE_TRANSACTION_PAYMENT => writer.append(&Compact(params.tip.0))?,
				_ => continue,
			};
		}
		Ok(writer.commit())
	}

	/// Data the signature covers without it being part of the extrinsic.
	pub fn additional(&self, params: &SignatureParams) -> Result<Vec<u8>, ExtrinsicError> {
		let mut writer = self.coder.writer();
		for extension in &self.lookup.metadata().extrinsic.signed_extensions {
			match extension.identifier.as_str() {
				CHECK_SPEC_VERSION => writer.append::<SpecVersion>(&params.runtime_version.spec_version)?,
				CHECK_TX_VERSION => writer.append(&params.runtime_version.transaction_version)?,
				CHECK_GENESIS => writer.append_raw(&params.genesis_hash),
				CHECK_MORTALITY => writer.append_raw(params.block_hash.as_ref().unwrap_or(&params.genesis_hash)),
				_ => continue,
			};
		}
		Ok(writer.commit())
	}

	/// `call | extra | additional`, exactly as handed to the signer (before any hashing).
	pub fn signing_payload<A: ScaleType>(&self, payload: &SignedPayload<A>) -> Result<Vec<u8>, ExtrinsicError> {
		let mut bytes = self.call_bytes(&payload.unsigned)?;
		bytes.extend(self.extra(&payload.params)?);
		bytes.extend(self.additional(&payload.params)?);
		Ok(bytes)
	}

	pub fn sign<A: ScaleType>(&self, payload: &SignedPayload<A>) -> Result<Vec<u8>, ExtrinsicError> {
		let message = self.signing_payload(payload)?;
		self.sign_message(payload.signer.as_ref(), &message)
	}

	pub fn signed_extrinsic<A: ScaleType>(&self, payload: &SignedPayload<A>) -> Result<Vec<u8>, ExtrinsicError> {
		let address_index = self.address_variant()?;
		let signature_index = self.signature_variant(payload.signer.scheme())?;

		let call = self.call_bytes(&payload.unsigned)?;
		let extra = self.extra(&payload.params)?;
		let mut message = call.clone();
		message.extend_from_slice(&extra);
		message.extend(self.additional(&payload.params)?);
		let signature = self.sign_message(payload.signer.as_ref(), &message)?;

		let mut writer = self.coder.writer();
		writer
			.append(&(SIGNED_FLAG | self.version()))?
			.append(&address_index)?
			.append_raw(&payload.params.account_id)
			.append(&signature_index)?
			.append_raw(&signature)
			.append_raw(&extra)
			.append_raw(&call);
		Ok(writer.commit())
	}

	/// The form nodes accept over RPC: the extrinsic preceded by its compact length.
	pub fn with_length_prefix(&self, extrinsic: &[u8]) -> Vec<u8> {
		let mut out = Vec::with_capacity(extrinsic.len() + 5);
		compact::encode_len(extrinsic.len(), &mut out);
		out.extend_from_slice(extrinsic);
		out
	}

	fn version(&self) -> u8 {
		self.lookup.metadata().extrinsic.version
	}

	fn sign_message(&self, signer: &dyn Signer, message: &[u8]) -> Result<Vec<u8>, ExtrinsicError> {
		let signature = if message.len() > MAX_UNHASHED_PAYLOAD {
			signer.sign(&self.hashing.blake2_256(message))?
		} else {
			signer.sign(message)?
		};
		Ok(signature)
	}

	fn address_variant(&self) -> Result<u8, ExtrinsicError> {
		let address = variants_of(self.lookup.extrinsic_param("Address")?)?;
		address.variants.iter().find(|v| v.name == "Id").map(|v| v.index).ok_or(ExtrinsicError::AddressVariant)
	}

	fn signature_variant(&self, scheme: &str) -> Result<u8, ExtrinsicError> {
		let signature = variants_of(self.lookup.extrinsic_param("Signature")?)?;
		signature
			.variants
			.iter()
			.find(|v| v.name.eq_ignore_ascii_case(scheme))
			.map(|v| v.index)
			.ok_or_else(|| ExtrinsicError::SignatureVariant(scheme.into()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		dynamic::{Balance, Index},
		lookup::NamingPolicy,
		metadata::{RuntimeMetadata, TypeDef},
		test_suite,
	};
	use sp_core::{ecdsa, ed25519, sr25519, Pair};
	use sp_keyring::AccountKeyring;
	use std::sync::Arc;
	use subclient_codec::scale_composite;
	use subclient_common::SubstrateHashing;

	#[derive(Debug, Clone, PartialEq)]
	struct AddMemo {
		index: u32,
		memo: Vec<u8>,
	}

	scale_composite!(AddMemo { index: u32, memo: Vec<u8> });

	const GENESIS: [u8; 32] = [0xb0; 32];

	struct Fixture {
		coder: ScaleCoder,
		lookup: Lookup,
	}

	impl Fixture {
		fn new() -> Self {
			Self::with_metadata(test_suite::metadata())
		}

		fn with_metadata(metadata: RuntimeMetadata) -> Self {
			let coder = ScaleCoder::default();
			register_adapters(coder.registry());
			Fixture { coder, lookup: Lookup::new(Arc::new(metadata), NamingPolicy::CaseInsensitive) }
		}

		fn builder(&self) -> ExtrinsicBuilder<'_> {
			ExtrinsicBuilder::new(&self.coder, &self.lookup, &SubstrateHashing)
		}
	}

	fn add_memo(memo: &[u8]) -> Call<AddMemo> {
		Call::new("Crowdloan", "add_memo", AddMemo { index: 0, memo: memo.to_vec() })
	}

	fn params(signer: &dyn Signer) -> SignatureParams {
		SignatureParams {
			account_id: signer.account_id(),
			nonce: Index::from(5u128),
			tip: Balance::default(),
			era: Era::Immortal,
			genesis_hash: GENESIS,
			block_hash: None,
			runtime_version: RuntimeVersion { spec_version: 9430, transaction_version: 24 },
		}
	}

	fn signed(fixture: &Fixture, memo: &[u8], signer: Arc<dyn Signer>) -> SignedPayload<AddMemo> {
		let unsigned = fixture.builder().unsigned(add_memo(memo)).unwrap();
		let params = params(signer.as_ref());
		SignedPayload::new(unsigned, params, signer)
	}

	#[test]
	fn add_memo_call_bytes() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		let payload = builder.unsigned(add_memo(b"hi")).unwrap();
		assert_eq!((payload.module_index, payload.call_index), (73, 6));
		assert_eq!(hex::encode(builder.call_bytes(&payload).unwrap()), "490600000000086869");
		assert_eq!(hex::encode(builder.unsigned_extrinsic(&payload).unwrap()), "04490600000000086869");
	}

	#[test]
	fn unknown_calls_are_lookup_errors() {
		let fixture = Fixture::new();
		let err = fixture.builder().unsigned(Call::new("crowdloan", "nope", ())).unwrap_err();
		assert!(matches!(err, ExtrinsicError::Lookup(LookupError::CallNotFound { .. })));
		let err = fixture.builder().unsigned(Call::new("nope", "add_memo", ())).unwrap_err();
		assert!(matches!(err, ExtrinsicError::Lookup(LookupError::ModuleNotFound(_))));
	}

	#[test]
	fn extra_and_additional_follow_the_declared_extensions() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		let mut params = params(&AccountKeyring::Alice.pair());
		params.tip = Balance::from(1000u128);
		assert_eq!(builder.extra(&params).unwrap(), vec![0x00, 0x14, 0xa1, 0x0f]);

		let additional = builder.additional(&params).unwrap();
		let mut expected = 9430u32.to_le_bytes().to_vec();
		expected.extend(24u32.to_le_bytes());
		expected.extend(GENESIS);
		expected.extend(GENESIS);
		assert_eq!(additional, expected);

		params.block_hash = Some([7; 32]);
		assert_eq!(&builder.additional(&params).unwrap()[40..], &[7; 32]);
	}

	#[test]
	fn mortal_eras_are_two_bytes() {
		let fixture = Fixture::new();
		let mut params = params(&AccountKeyring::Alice.pair());
		params.era = Era::mortal(64, 42);
		assert_eq!(fixture.builder().extra(&params).unwrap(), vec![0xa5, 0x02, 0x14, 0x00]);
	}

	#[test]
	fn short_payloads_are_signed_as_is() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		let pair = AccountKeyring::Alice.pair();
		let payload = signed(&fixture, b"hi", Arc::new(pair.clone()));

		let message = builder.signing_payload(&payload).unwrap();
		assert!(message.len() <= MAX_UNHASHED_PAYLOAD);
		assert_eq!(&message[..9], &hex::decode("490600000000086869").unwrap()[..]);

		let signature = sr25519::Signature::from_raw(builder.sign(&payload).unwrap().try_into().unwrap());
		assert!(sr25519::Pair::verify(&signature, &message, &pair.public()));
	}

	#[test]
	fn long_payloads_are_hashed_before_signing() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		let pair = AccountKeyring::Bob.pair();
		let payload = signed(&fixture, &[1; 300], Arc::new(pair.clone()));

		let message = builder.signing_payload(&payload).unwrap();
		assert!(message.len() > MAX_UNHASHED_PAYLOAD);
		let signature = sr25519::Signature::from_raw(builder.sign(&payload).unwrap().try_into().unwrap());
		assert!(sr25519::Pair::verify(&signature, sp_core::blake2_256(&message), &pair.public()));
		assert!(!sr25519::Pair::verify(&signature, &message, &pair.public()));
	}

	#[test]
	fn signed_extrinsic_layout() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		let pair = AccountKeyring::Alice.pair();
		let payload = signed(&fixture, b"hi", Arc::new(pair.clone()));
		let extrinsic = builder.signed_extrinsic(&payload).unwrap();

		assert_eq!(extrinsic[0], 0x84);
		assert_eq!(extrinsic[1], 0, "MultiAddress::Id");
		assert_eq!(&extrinsic[2..34], &AccountKeyring::Alice.to_raw_public());
		assert_eq!(extrinsic[34], 1, "MultiSignature::Sr25519");
		let signature = sr25519::Signature::from_raw(extrinsic[35..99].try_into().unwrap());
		let message = builder.signing_payload(&payload).unwrap();
		assert!(sr25519::Pair::verify(&signature, &message, &pair.public()));
		assert_eq!(&extrinsic[99..102], &[0x00, 0x14, 0x00]);
		assert_eq!(hex::encode(&extrinsic[102..]), "490600000000086869");
	}

	#[test]
	fn signature_variant_follows_the_scheme() {
		let fixture = Fixture::new();
		let builder = fixture.builder();

		let ed = signed(&fixture, b"hi", Arc::new(ed25519::Pair::from_seed(&[1; 32])));
		assert_eq!(builder.signed_extrinsic(&ed).unwrap()[34], 0);

		let ecdsa = signed(&fixture, b"hi", Arc::new(ecdsa::Pair::from_seed(&[1; 32])));
		let extrinsic = builder.signed_extrinsic(&ecdsa).unwrap();
		assert_eq!(extrinsic[34], 2);
		// 65 byte signature, then extra and call
		assert_eq!(extrinsic.len(), 35 + 65 + 3 + 9);
	}

	struct Bls;

	impl Signer for Bls {
		fn scheme(&self) -> &str {
			"Bls381"
		}

		fn public_key(&self) -> Vec<u8> {
			vec![0; 32]
		}

		fn sign(&self, _: &[u8]) -> Result<Vec<u8>, SignerError> {
			Err(SignerError::Rejected("unused".into()))
		}
	}

	#[test]
	fn unknown_schemes_and_address_types_are_errors() {
		let fixture = Fixture::new();
		let payload = signed(&fixture, b"hi", Arc::new(Bls));
		assert!(matches!(fixture.builder().signed_extrinsic(&payload), Err(ExtrinsicError::SignatureVariant(s)) if s == "Bls381"));
		assert!(matches!(fixture.builder().sign(&payload), Err(ExtrinsicError::Signer(_))));

		let mut metadata = test_suite::metadata();
		let address = metadata.lookup.types.iter_mut().find(|e| e.id.id() == 8).unwrap();
		match &mut address.ty.def {
			TypeDef::Variant(v) => v.variants[0].name = "Raw".into(),
			_ => unreachable!(),
		}
		let fixture = Fixture::with_metadata(metadata);
		let payload = signed(&fixture, b"hi", Arc::new(AccountKeyring::Alice.pair()));
		assert!(matches!(fixture.builder().signed_extrinsic(&payload), Err(ExtrinsicError::AddressVariant)));
	}

	#[test]
	fn length_prefix() {
		let fixture = Fixture::new();
		let builder = fixture.builder();
		assert_eq!(builder.with_length_prefix(&[1, 2, 3]), vec![12, 1, 2, 3]);
		assert_eq!(&builder.with_length_prefix(&[0; 100])[..2], &[0x91, 0x01]);
	}
}
