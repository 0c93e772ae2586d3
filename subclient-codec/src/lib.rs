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
A SCALE codec engine driven by explicit type descriptions.

Host types implement [`ScaleType`]: they describe their layout with a [`TypeDescriptor`] and
convert to and from the dynamic [`Value`] representation. A [`ScaleCoder`] looks up the
[`Adapter`] for each type in its [`Registry`]; types without a directly registered adapter
are handed to generic factories such as [`StructuralFactory`], which walks composite and
variant field lists recursively.

```
use subclient_codec::{Compact, ScaleCoder};

let coder = ScaleCoder::default();
let bytes = coder.encode(&(Compact(64u32), Some(true), String::from("hi"))).unwrap();
assert_eq!(bytes, vec![0x01, 0x01, 0x01, 0x08, b'h', b'i']);
```
*/

#![forbid(unsafe_code)]

mod adapter;
mod coder;
pub mod compact;
mod descriptor;
mod error;
mod macros;
pub mod numeric;
mod reader;
mod registry;
mod structural;
pub mod value;
mod writer;

pub use adapter::{Adapter, BoolAdapter, BytesAdapter, OptionalBoolAdapter, StrAdapter};
pub use coder::ScaleCoder;
pub use compact::{Compact, CompactAdapter, CompactInt};
pub use descriptor::{Field, ScaleType, Shape, TypeDescriptor, TypeRef, TypeTag, VariantDescriptor};
pub use error::Error;
pub use numeric::{FixedWidth, NumericAdapter, I256, I512};
pub use primitive_types::{U256, U512};
pub use reader::Reader;
pub use registry::{AdapterFactory, Registry};
pub use structural::{MAX_ZERO_SIZED_ITEMS, StructuralFactory};
pub use value::{Composite, Fields, Primitive, Value, Variant};
pub use writer::Writer;
