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

//! Published metadata snapshots.

use crate::{
	dynamic::{DynamicError, DynamicResolver, ResolvedAdapter},
	lookup::{Lookup, NamingPolicy},
	metadata::RuntimeMetadata,
};
use arc_swap::ArcSwapOption;
use std::{
	sync::Arc,
	time::{Duration, Instant},
};

/// Shared slot holding the current snapshot. Readers load it without locking.
pub type SchemaHandle = Arc<ArcSwapOption<Schema>>;

/// One decoded metadata blob together with the caches derived from it. Everything here
/// is immutable apart from the caches, and is replaced as a whole when fresh metadata
/// is published.
pub struct Schema {
	metadata: Arc<RuntimeMetadata>,
	lookup: Lookup,
	resolver: DynamicResolver,
	fetched_at: Instant,
}

impl Schema {
	pub fn new(metadata: RuntimeMetadata, policy: NamingPolicy) -> Self {
		let metadata = Arc::new(metadata);
		Schema {
			lookup: Lookup::new(metadata.clone(), policy),
			metadata,
			resolver: DynamicResolver::default(),
			fetched_at: Instant::now(),
		}
	}

	pub fn metadata(&self) -> &RuntimeMetadata {
		&self.metadata
	}

	pub fn lookup(&self) -> &Lookup {
		&self.lookup
	}

	pub fn resolve_dynamic(&self, lookup_index: u32) -> Result<Arc<ResolvedAdapter>, DynamicError> {
		self.resolver.resolve(&self.lookup, lookup_index)
	}

	pub fn age(&self) -> Duration {
		self.fetched_at.elapsed()
	}
}

/// An empty handle, to be filled by publishing metadata.
pub fn empty_handle() -> SchemaHandle {
	Arc::new(ArcSwapOption::empty())
}
