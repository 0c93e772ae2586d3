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

/*!
Client side support for Substrate based chains: runtime metadata lookup, runtime dependent
("dynamic") types, storage keys and signed extrinsics, all encoded through
[`subclient_codec`].

```
use subclient::{extrinsic::Era, ScaleCoder};

let coder = ScaleCoder::default();
subclient::extrinsic::register_adapters(coder.registry());
assert_eq!(coder.encode(&Era::mortal(64, 42)).unwrap(), vec![0xa5, 0x02]);
```
*/

#![forbid(unsafe_code)]

pub mod account;
pub mod client;
pub mod dynamic;
mod error;
pub mod extrinsic;
pub mod lookup;
pub mod metadata;
pub mod payment;
pub mod schema;
pub mod settings;
pub mod storage;
#[cfg(test)]
mod test_suite;

pub use subclient_codec as codec;
pub use subclient_common as common;

pub use account::{AccountData, AccountInfo};
pub use client::{Client, SigningOptions};
pub use dynamic::{Balance, DynamicType, Index};
pub use error::Error;
pub use lookup::{Lookup, NamingPolicy};
pub use metadata::RuntimeMetadata;
pub use payment::QueryFeeDetails;
pub use schema::Schema;
pub use settings::ClientSettings;
pub use subclient_codec::ScaleCoder;
