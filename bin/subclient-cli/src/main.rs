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

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};
use subclient::{extrinsic::Era, ClientSettings, Lookup, NamingPolicy, RuntimeMetadata, ScaleCoder};
use subclient_codec::{compact, Reader, U512};
use subclient_common::{from_hex, to_hex, SubstrateHashing};

#[derive(Debug, Parser)]
#[command(about = "Inspect runtime metadata and build SCALE payloads offline")]
struct Opts {
	/// JSON client settings, eg `{ "namingPolicy": "exact" }`
	#[arg(long)]
	settings: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// List the modules of a metadata blob (raw SCALE or 0x prefixed hex)
	Modules { metadata: PathBuf },
	/// Print a module constant as hex
	Constant { metadata: PathBuf, module: String, name: String },
	/// Compute a storage key. Map keys are SCALE encoded hex, one per hasher
	StorageKey { metadata: PathBuf, module: String, item: String, keys: Vec<String> },
	/// Prefix SCALE encoded call arguments with the module and call indices
	Call { metadata: PathBuf, module: String, call: String, args: Option<String> },
	/// Compact encode an unsigned integer
	CompactEncode { value: String },
	/// Decode a hex compact integer
	CompactDecode { hex: String },
	/// Encode a mortal era starting at `current`
	Era { period: u64, current: u64 },
}

fn main() -> Result<(), anyhow::Error> {
	let opts = Opts::parse();
	pretty_env_logger::init();

	let settings = match &opts.settings {
		Some(path) => ClientSettings::from_json(&std::fs::read_to_string(path)?)?,
		None => ClientSettings::default(),
	};

	match opts.command {
		Command::Modules { metadata } => {
			let lookup = load(&metadata, settings.naming_policy)?;
			println!("Extrinsic version: {}", lookup.metadata().extrinsic.version);
			for module in lookup.modules() {
				let items = module.storage.as_ref().map_or(0, |s| s.items.len());
				println!(
					"{:>3} {} ({} constants, {} storage items, calls: {})",
					module.index,
					module.name,
					module.constants.len(),
					items,
					module.calls.is_some()
				);
			}
		}
		Command::Constant { metadata, module, name } => {
			let lookup = load(&metadata, settings.naming_policy)?;
			let constant = lookup.find_constant(&module, &name)?;
			println!("{}", to_hex(&constant.value));
		}
		Command::StorageKey { metadata, module, item, keys } => {
			let lookup = load(&metadata, settings.naming_policy)?;
			let (item, storage) = lookup.find_storage_item(&module, &item)?;
			let keys = keys.iter().map(|k| from_hex(k)).collect::<Result<Vec<_>, _>>()?;
			let key = subclient::storage::StorageKeyHasher::new(&SubstrateHashing).key(storage, item, &keys)?;
			println!("{}", to_hex(key));
		}
		Command::Call { metadata, module, call, args } => {
			let lookup = load(&metadata, settings.naming_policy)?;
			let (module, variant) = lookup.find_call(&module, &call)?;
			let mut bytes = vec![module.index, variant.index];
			if let Some(args) = args {
				bytes.extend(from_hex(&args)?);
			}
			println!("{}", to_hex(bytes));
		}
		Command::CompactEncode { value } => {
			let value = U512::from_dec_str(&value).map_err(|e| anyhow::anyhow!("Invalid integer {}: {:?}", value, e))?;
			let mut out = Vec::new();
			compact::encode(&value, &mut out);
			println!("{}", to_hex(out));
		}
		Command::CompactDecode { hex } => {
			let bytes = from_hex(&hex)?;
			let mut reader = Reader::new(&bytes);
			let value = compact::decode(&mut reader)?;
			if !reader.is_empty() {
				log::warn!("{} trailing bytes ignored", reader.remaining());
			}
			println!("{}", value);
		}
		Command::Era { period, current } => {
			let coder = ScaleCoder::default();
			subclient::extrinsic::register_adapters(coder.registry());
			let era = Era::mortal(period, current);
			println!("{:?}: {}", era, to_hex(coder.encode(&era)?));
		}
	}
	Ok(())
}

fn load(path: &Path, policy: NamingPolicy) -> Result<Lookup, anyhow::Error> {
	let bytes = std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
	let metadata = match std::str::from_utf8(&bytes) {
		Ok(text) if text.trim_start().starts_with("0x") => RuntimeMetadata::from_hex(text)?,
		_ => RuntimeMetadata::from_bytes(&bytes)?,
	};
	Ok(Lookup::new(Arc::new(metadata), policy))
}
