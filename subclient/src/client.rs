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

//! A client session: one codec, one metadata slot and a transport to a node.

use crate::{
	account::AccountInfo,
	dynamic::{Balance, DynamicFactory, Index},
	extrinsic::{self, Call, Era, ExtrinsicBuilder, RuntimeVersion, SignatureParams, SignedPayload},
	metadata::{RuntimeMetadata, StorageModifier},
	payment::{FeeDetailsResponse, QueryFeeDetails},
	schema::{self, Schema, SchemaHandle},
	settings::ClientSettings,
	storage::StorageKeyHasher,
	Error,
};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use subclient_codec::{compact, ScaleCoder, ScaleType};
use subclient_common::{from_hex, to_hex, Hashing, Signer, SubstrateHashing, Transport};

/// Optional inputs when preparing a signed extrinsic.
#[derive(Debug, Clone, Default)]
pub struct SigningOptions {
	pub tip: Balance,
	pub era: Era,
	/// Hash of the block a mortal era starts at.
	pub block_hash: Option<[u8; 32]>,
	/// Taken from `System.Account` when not given.
	pub nonce: Option<Index>,
}

pub struct Client<T> {
	transport: T,
	coder: ScaleCoder,
	hashing: Arc<dyn Hashing>,
	settings: ClientSettings,
	schema: SchemaHandle,
}

impl<T: Transport> Client<T> {
	pub fn new(transport: T, settings: ClientSettings) -> Self {
		Self::with_hashing(transport, settings, Arc::new(SubstrateHashing))
	}

	pub fn with_hashing(transport: T, settings: ClientSettings, hashing: Arc<dyn Hashing>) -> Self {
		let schema = schema::empty_handle();
		let coder = ScaleCoder::default();
		extrinsic::register_adapters(coder.registry());
		coder.registry().register_generic_factory(DynamicFactory::new(schema.clone()));
		Client { transport, coder, hashing, settings, schema }
	}

	pub fn coder(&self) -> &ScaleCoder {
		&self.coder
	}

	pub fn settings(&self) -> &ClientSettings {
		&self.settings
	}

	/// Make `metadata` the current schema. Resolutions remembered by the registry are
	/// dropped, since dynamic types may now resolve differently.
	pub fn publish_metadata(&self, metadata: RuntimeMetadata) -> Arc<Schema> {
		let schema = Arc::new(Schema::new(metadata, self.settings.naming_policy));
		self.schema.store(Some(schema.clone()));
		self.coder.registry().clear_matches();
		log::debug!("Published metadata with {} modules", schema.metadata().modules.len());
		schema
	}

	/// The current schema, if any has been published.
	pub fn schema(&self) -> Result<Arc<Schema>, Error> {
		self.schema.load_full().ok_or(Error::NoSchema)
	}

	pub fn refresh_metadata(&self) -> Result<Arc<Schema>, Error> {
		let response = self.request("state_getMetadata", vec![])?;
		let bytes = from_hex(expect_str("state_getMetadata", &response)?)?;
		let metadata = RuntimeMetadata::decode_with(&self.coder, &bytes)?;
		Ok(self.publish_metadata(metadata))
	}

	/// The current schema, fetched again first if it is missing or older than the configured TTL.
	pub fn schema_or_refresh(&self) -> Result<Arc<Schema>, Error> {
		match self.schema.load_full() {
			Some(schema) if schema.age() < self.settings.metadata_ttl() => Ok(schema),
			_ => self.refresh_metadata(),
		}
	}

	pub fn runtime_version(&self) -> Result<RuntimeVersion, Error> {
		let response = self.request("state_getRuntimeVersion", vec![])?;
		Ok(serde_json::from_value(response)?)
	}

	pub fn genesis_hash(&self) -> Result<[u8; 32], Error> {
		let response = self.request("chain_getBlockHash", vec![json!(0)])?;
		expect_hash("chain_getBlockHash", &response)
	}

	/// Decode a module constant as `V`.
	pub fn constant<V: ScaleType>(&self, module: &str, name: &str) -> Result<V, Error> {
		let schema = self.schema_or_refresh()?;
		let constant = schema.lookup().find_constant(module, name)?;
		Ok(self.coder.decode(&constant.value)?)
	}

	pub fn storage_key(&self, module: &str, item: &str, keys: &[Vec<u8>]) -> Result<Vec<u8>, Error> {
		let schema = self.schema_or_refresh()?;
		let (item, storage) = schema.lookup().find_storage_item(module, item)?;
		Ok(StorageKeyHasher::new(self.hashing.as_ref()).key(storage, item, keys)?)
	}

	/// Fetch and decode a storage entry. Items declared with a default resolve to that
	/// default when the node has nothing stored.
	pub fn storage<V: ScaleType>(&self, module: &str, item: &str, keys: &[Vec<u8>]) -> Result<Option<V>, Error> {
		let schema = self.schema_or_refresh()?;
		let (item, storage) = schema.lookup().find_storage_item(module, item)?;
		let key = StorageKeyHasher::new(self.hashing.as_ref()).key(storage, item, keys)?;

		let response = self.request("state_getStorage", vec![json!(to_hex(&key))])?;
		let bytes = match &response {
			JsonValue::Null => match item.modifier {
				StorageModifier::Default => Some(item.fallback.clone()),
				StorageModifier::Optional => None,
			},
			JsonValue::String(text) => Some(from_hex(text)?),
			_ => return Err(unexpected("state_getStorage", &response)),
		};
		bytes.map(|bytes| self.coder.decode(&bytes)).transpose().map_err(Into::into)
	}

	pub fn account(&self, account_id: [u8; 32]) -> Result<Option<AccountInfo>, Error> {
		self.storage("System", "Account", &[account_id.to_vec()])
	}

	/// Encode `call` as an unsigned extrinsic.
	pub fn unsigned<A: ScaleType>(&self, call: Call<A>) -> Result<Vec<u8>, Error> {
		let schema = self.schema_or_refresh()?;
		let builder = self.builder(&schema);
		let payload = builder.unsigned(call)?;
		Ok(builder.unsigned_extrinsic(&payload)?)
	}

	/// Collect everything needed to sign `call`: the nonce of the signer's account, the
	/// genesis hash and the runtime version are fetched from the node.
	pub fn signed_payload<A>(
		&self,
		call: Call<A>,
		signer: Arc<dyn Signer>,
		options: SigningOptions,
	) -> Result<SignedPayload<A>, Error> {
		let schema = self.schema_or_refresh()?;
		let unsigned = self.builder(&schema).unsigned(call)?;
		let account_id = signer.account_id();
		let nonce = match options.nonce {
			Some(nonce) => nonce,
			None => self.account(account_id)?.map(|account| account.nonce).unwrap_or_default(),
		};
		let params = SignatureParams {
			account_id,
			nonce,
			tip: options.tip,
			era: options.era,
			genesis_hash: self.genesis_hash()?,
			block_hash: options.block_hash,
			runtime_version: self.runtime_version()?,
		};
		Ok(SignedPayload::new(unsigned, params, signer))
	}

	pub fn encode_signed<A: ScaleType>(&self, payload: &SignedPayload<A>) -> Result<Vec<u8>, Error> {
		let schema = self.schema_or_refresh()?;
		Ok(self.builder(&schema).signed_extrinsic(payload)?)
	}

	/// Send an extrinsic (without length prefix) to the node, returning its hash.
	pub fn submit(&self, extrinsic: &[u8]) -> Result<[u8; 32], Error> {
		let response = self.request("author_submitExtrinsic", vec![json!(with_length_prefix(extrinsic))])?;
		expect_hash("author_submitExtrinsic", &response)
	}

	/// Ask the node what `extrinsic` (without length prefix) would pay to be included.
	/// `None` when the node reports no inclusion fee, as for unsigned extrinsics.
	pub fn query_fee_details(&self, extrinsic: &[u8]) -> Result<Option<QueryFeeDetails>, Error> {
		let response = self.request("payment_queryFeeDetails", vec![json!(with_length_prefix(extrinsic))])?;
		if response.is_null() {
			return Ok(None);
		}
		let details: FeeDetailsResponse = serde_json::from_value(response)?;
		Ok(details.inclusion_fee)
	}

	fn builder<'s>(&'s self, schema: &'s Schema) -> ExtrinsicBuilder<'s> {
		ExtrinsicBuilder::new(&self.coder, schema.lookup(), self.hashing.as_ref())
	}

	fn request(&self, method: &str, params: Vec<JsonValue>) -> Result<JsonValue, Error> {
		log::trace!("-> {}", method);
		Ok(self.transport.request(method, params)?)
	}
}

/// Hex of the wire form nodes accept: compact byte length, then the extrinsic.
fn with_length_prefix(extrinsic: &[u8]) -> String {
	let mut bytes = Vec::with_capacity(extrinsic.len() + 5);
	compact::encode_len(extrinsic.len(), &mut bytes);
	bytes.extend_from_slice(extrinsic);
	to_hex(bytes)
}

fn unexpected(method: &str, response: &JsonValue) -> Error {
	Error::UnexpectedResponse { method: method.into(), response: response.to_string() }
}

fn expect_str<'v>(method: &str, response: &'v JsonValue) -> Result<&'v str, Error> {
	response.as_str().ok_or_else(|| unexpected(method, response))
}

fn expect_hash(method: &str, response: &JsonValue) -> Result<[u8; 32], Error> {
	let bytes = from_hex(expect_str(method, response)?)?;
	<[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| unexpected(method, response))
}
