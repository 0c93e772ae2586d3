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

//! A whole client session against a scripted node.

use crate::test_suite::{self, AccountData, AccountInfo, AddMemo, GENESIS, SPEC_VERSION, TX_VERSION};
use codec::{Compact, Decode, Encode};
use serde_json::{json, Value as JsonValue};
use sp_keyring::AccountKeyring;
use sp_runtime::{traits::Verify, MultiSignature};
use std::{collections::HashMap, sync::Arc};
use subclient::{
	extrinsic::{Call, Era},
	Balance, Client, ClientSettings, Index, SigningOptions,
};
use subclient_common::{from_hex, to_hex, Transport, TransportError};

const TX_HASH: [u8; 32] = [0xee; 32];

fn alice_key() -> String {
	let alice = AccountKeyring::Alice.to_account_id().encode();
	let mut key = sp_core::twox_128(b"System").to_vec();
	key.extend(sp_core::twox_128(b"Account"));
	key.extend(sp_core::blake2_128(&alice));
	key.extend(alice);
	to_hex(key)
}

fn alice() -> AccountInfo {
	AccountInfo {
		nonce: 12,
		consumers: 1,
		providers: 1,
		sufficients: 0,
		data: AccountData { free: 42_000_000_000_000, reserved: 1, misc_frozen: 0, fee_frozen: 0 },
	}
}

fn node() -> impl Transport {
	let metadata = to_hex(test_suite::metadata_bytes());
	let mut storage = HashMap::new();
	storage.insert(alice_key(), to_hex(alice().encode()));

	move |method: &str, params: Vec<JsonValue>| -> Result<JsonValue, TransportError> {
		match method {
			"state_getMetadata" => Ok(json!(metadata)),
			"state_getRuntimeVersion" => Ok(json!({
				"specName": "polkadot",
				"implName": "parity-polkadot",
				"specVersion": SPEC_VERSION,
				"transactionVersion": TX_VERSION,
			})),
			"chain_getBlockHash" => Ok(json!(to_hex(GENESIS))),
			"state_getStorage" => {
				let key = params.first().and_then(JsonValue::as_str).unwrap_or_default();
				Ok(storage.get(key).map_or(JsonValue::Null, |v| json!(v)))
			}
			"author_submitExtrinsic" => {
				let bytes = from_hex(params[0].as_str().unwrap()).unwrap();
				// must be a well formed length prefixed extrinsic
				Vec::<u8>::decode(&mut &bytes[..]).map_err(|e| TransportError::Rpc { code: 1002, message: e.to_string() })?;
				Ok(json!(to_hex(TX_HASH)))
			}
			other => Err(TransportError::Rpc { code: -32601, message: format!("Method not found: {other}") }),
		}
	}
}

#[test]
fn account_info_with_runtime_widths() {
	let _ = pretty_env_logger::try_init();
	let client = Client::new(node(), ClientSettings::default());
	let account = client.account(AccountKeyring::Alice.to_account_id().into()).unwrap().unwrap();
	assert_eq!(account.nonce, Index::from(12u128));
	assert_eq!(account.data.free, Balance::from(42_000_000_000_000u128));
	assert_eq!(account.data.reserved, Balance::from(1u128));

	// nothing stored for Bob: the declared default
	let bob = client.account(AccountKeyring::Bob.to_account_id().into()).unwrap().unwrap();
	assert_eq!(bob, subclient::AccountInfo::default());
}

#[test]
fn constants_through_dynamic_types() {
	let client = Client::new(node(), ClientSettings::default());
	assert_eq!(
		client.constant::<Balance>("Balances", "ExistentialDeposit").unwrap(),
		Balance::from(test_suite::EXISTENTIAL_DEPOSIT)
	);
	assert_eq!(client.constant::<u32>("System", "BlockHashCount").unwrap(), 2400);
}

#[test]
fn sign_and_submit() {
	let client = Client::new(node(), ClientSettings::default());
	let call = Call::new("Crowdloan", "add_memo", AddMemo { index: 7, memo: b"ref".to_vec() });
	let options = SigningOptions { tip: Balance::from(10u128), era: Era::mortal(128, 999), block_hash: Some([3; 32]), nonce: None };
	let payload = client.signed_payload(call, Arc::new(AccountKeyring::Alice.pair()), options).unwrap();
	assert_eq!(payload.params.nonce, Index::from(12u128));

	let extrinsic = client.encode_signed(&payload).unwrap();
	assert_eq!(client.submit(&extrinsic).unwrap(), TX_HASH);

	// version, address variant and account come first
	let mut input = &extrinsic[34..];
	let signature = MultiSignature::decode(&mut input).unwrap();
	let extra = (sp_runtime::generic::Era::mortal(128, 999), Compact(12u32), Compact(10u128)).encode();
	assert_eq!(&input[..extra.len()], &extra[..]);

	let call = &input[extra.len()..];
	let additional = (SPEC_VERSION, TX_VERSION, GENESIS, [3u8; 32]).encode();
	let message = [call, &extra[..], &additional[..]].concat();
	assert!(signature.verify(&message[..], &AccountKeyring::Alice.to_account_id()));
}

#[test]
fn lookup_failures_are_reported() {
	let client = Client::new(node(), ClientSettings::from_json(r#"{"namingPolicy":"exact"}"#).unwrap());
	let call = Call::new("crowdloan", "add_memo", AddMemo { index: 0, memo: vec![] });
	assert!(client.unsigned(call).is_err());
	assert!(client.storage::<u64>("Timestamp", "Then", &[]).is_err());
}
