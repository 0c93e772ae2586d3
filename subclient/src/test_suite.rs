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

//! A small, hand built V14 schema shared by the unit tests.
//!
//! Type ids:
//!
//! | id | type                              | id | type                              |
//! |----|-----------------------------------|----|-----------------------------------|
//! | 0  | u8                                | 10 | [u8; 65]                          |
//! | 1  | AccountId32 ([u8; 32])            | 11 | MultiSignature                    |
//! | 2  | Vec<u8>                           | 12 | crowdloan::Call                   |
//! | 3  | str                               | 13 | UncheckedExtrinsic                |
//! | 4  | u32 (`Index`)                     | 14 | ()                                |
//! | 5  | Compact<u32>                      | 15 | u64                               |
//! | 6  | u128 (`Balance`)                  | 16 | u16                               |
//! | 7  | Compact<u128>                     | 17 | AccountData                       |
//! | 8  | MultiAddress                      | 18 | AccountInfo                       |
//! | 9  | [u8; 64]                          | 19 | char                              |

use crate::metadata::*;

fn entry(id: u32, path: &[&str], params: Vec<TypeParam>, def: TypeDef) -> LookupEntry {
	LookupEntry {
		id: TypeId(id),
		ty: RuntimeType { path: path.iter().map(|s| s.to_string()).collect(), params, def, docs: vec![] },
	}
}

fn primitive(id: u32, primitive: TypeDefPrimitive) -> LookupEntry {
	entry(id, &[], vec![], TypeDef::Primitive(primitive))
}

fn field(name: Option<&str>, ty: u32) -> FieldDef {
	FieldDef { name: name.map(Into::into), ty: TypeId(ty), type_name: None, docs: vec![] }
}

fn variant(name: &str, index: u8, fields: Vec<FieldDef>) -> VariantDef {
	VariantDef { name: name.into(), fields, index, docs: vec![] }
}

fn param(name: &str, ty: u32) -> TypeParam {
	TypeParam { name: name.into(), ty: Some(TypeId(ty)) }
}

fn types() -> Vec<LookupEntry> {
	vec![
		primitive(0, TypeDefPrimitive::U8),
		entry(1, &["sp_core", "crypto", "AccountId32"], vec![], TypeDef::Array(TypeDefArray { len: 32, ty: TypeId(0) })),
		entry(2, &[], vec![], TypeDef::Sequence(TypeDefSequence { ty: TypeId(0) })),
		primitive(3, TypeDefPrimitive::Str),
		primitive(4, TypeDefPrimitive::U32),
		entry(5, &[], vec![], TypeDef::Compact(TypeDefCompact { ty: TypeId(4) })),
		primitive(6, TypeDefPrimitive::U128),
		entry(7, &[], vec![], TypeDef::Compact(TypeDefCompact { ty: TypeId(6) })),
		entry(
			8,
			&["sp_runtime", "multiaddress", "MultiAddress"],
			vec![param("AccountId", 1), param("AccountIndex", 4)],
			TypeDef::Variant(TypeDefVariant {
				variants: vec![variant("Id", 0, vec![field(None, 1)]), variant("Index", 1, vec![field(None, 5)])],
			}),
		),
		entry(9, &[], vec![], TypeDef::Array(TypeDefArray { len: 64, ty: TypeId(0) })),
		entry(10, &[], vec![], TypeDef::Array(TypeDefArray { len: 65, ty: TypeId(0) })),
		entry(
			11,
			&["sp_runtime", "MultiSignature"],
			vec![],
			TypeDef::Variant(TypeDefVariant {
				variants: vec![
					variant("Ed25519", 0, vec![field(None, 9)]),
					variant("Sr25519", 1, vec![field(None, 9)]),
					variant("Ecdsa", 2, vec![field(None, 10)]),
				],
			}),
		),
		entry(
			12,
			&["polkadot_runtime_common", "crowdloan", "pallet", "Call"],
			vec![],
			TypeDef::Variant(TypeDefVariant {
				variants: vec![
					variant("contribute", 1, vec![field(Some("index"), 4), field(Some("value"), 7)]),
					variant("add_memo", 6, vec![field(Some("index"), 4), field(Some("memo"), 2)]),
				],
			}),
		),
		entry(
			13,
			&["sp_runtime", "generic", "unchecked_extrinsic", "UncheckedExtrinsic"],
			vec![param("Address", 8), param("Call", 12), param("Signature", 11), param("Extra", 14)],
			TypeDef::Composite(TypeDefComposite { fields: vec![field(None, 2)] }),
		),
		entry(14, &[], vec![], TypeDef::Tuple(TypeDefTuple { fields: vec![] })),
		primitive(15, TypeDefPrimitive::U64),
		primitive(16, TypeDefPrimitive::U16),
		entry(
			17,
			&["pallet_balances", "AccountData"],
			vec![],
			TypeDef::Composite(TypeDefComposite {
				fields: vec![
					field(Some("free"), 6),
					field(Some("reserved"), 6),
					field(Some("misc_frozen"), 6),
					field(Some("fee_frozen"), 6),
				],
			}),
		),
		entry(
			18,
			&["frame_system", "AccountInfo"],
			vec![],
			TypeDef::Composite(TypeDefComposite {
				fields: vec![
					field(Some("nonce"), 4),
					field(Some("consumers"), 4),
					field(Some("providers"), 4),
					field(Some("sufficients"), 4),
					field(Some("data"), 17),
				],
			}),
		),
		primitive(19, TypeDefPrimitive::Char),
	]
}

fn constant(name: &str, ty: u32, value: Vec<u8>) -> ModuleConstant {
	ModuleConstant { name: name.into(), ty: TypeId(ty), value, docs: vec![] }
}

fn item(name: &str, ty: StorageItemType, fallback: Vec<u8>) -> StorageItem {
	StorageItem { name: name.into(), modifier: StorageModifier::Default, ty, fallback, docs: vec![] }
}

fn modules() -> Vec<Module> {
	vec![
		Module {
			name: "System".into(),
			storage: Some(ModuleStorage {
				prefix: "System".into(),
				items: vec![
					item(
						"Account",
						StorageItemType::Map(StorageMap {
							hashers: vec![StorageHasher::Blake2_128Concat],
							key: TypeId(1),
							value: TypeId(18),
						}),
						vec![0; 80],
					),
					item("Number", StorageItemType::Plain(TypeId(4)), vec![0; 4]),
				],
			}),
			calls: None,
			events: None,
			constants: vec![constant("BlockHashCount", 4, 2400u32.to_le_bytes().to_vec()), constant("SS58Prefix", 16, vec![2, 0])],
			errors: None,
			index: 0,
		},
		Module {
			name: "Timestamp".into(),
			storage: Some(ModuleStorage {
				prefix: "Timestamp".into(),
				items: vec![item("Now", StorageItemType::Plain(TypeId(15)), vec![0; 8])],
			}),
			calls: None,
			events: None,
			constants: vec![constant("MinimumPeriod", 15, 3000u64.to_le_bytes().to_vec())],
			errors: None,
			index: 3,
		},
		Module {
			name: "Balances".into(),
			storage: None,
			calls: None,
			events: None,
			constants: vec![constant("ExistentialDeposit", 6, 333_333_333u128.to_le_bytes().to_vec())],
			errors: None,
			index: 4,
		},
		Module {
			name: "crowdloan".into(),
			storage: None,
			calls: Some(TypeId(12)),
			events: None,
			constants: vec![],
			errors: None,
			index: 73,
		},
	]
}

fn extension(identifier: &str, ty: u32, additional_signed: u32) -> SignedExtension {
	SignedExtension { identifier: identifier.into(), ty: TypeId(ty), additional_signed: TypeId(additional_signed) }
}

pub fn metadata() -> RuntimeMetadata {
	RuntimeMetadata::new(
		TypeLookup { types: types() },
		modules(),
		ExtrinsicMetadata {
			ty: TypeId(13),
			version: 4,
			signed_extensions: vec![
				extension("CheckNonZeroSender", 14, 14),
				extension("CheckSpecVersion", 14, 4),
				extension("CheckTxVersion", 14, 4),
				extension("CheckGenesis", 14, 1),
				extension("CheckMortality", 14, 1),
				extension("CheckNonce", 5, 14),
				extension("CheckWeight", 14, 14),
				extension("ChargeTransactionPayment", 7, 14),
			],
		},
	)
}
