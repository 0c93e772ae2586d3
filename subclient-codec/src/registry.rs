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

//! Type to adapter resolution.
//!
//! Directly registered adapters win. Otherwise the generic factories are tried in the
//! order they were registered: the reader offset (or output length) is checkpointed
//! before each attempt and restored when a factory reports [`Error::NoAdapterFound`].
//! The index of the first factory that succeeds is remembered per [`TypeTag`].

use crate::{Adapter, Error, Reader, ScaleCoder, TypeDescriptor, TypeTag, Value};
use parking_lot::RwLock;
use std::{collections::HashMap, sync::Arc};

/// Builds adapters for whole families of types, eg "any composite".
pub trait AdapterFactory: Send + Sync {
	/// Used in log output.
	fn name(&self) -> &str;

	/// Return [`Error::NoAdapterFound`] if the descriptor is not something this factory handles.
	fn make(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn Adapter>, Error>;
}

#[derive(Default)]
pub struct Registry {
	adapters: RwLock<HashMap<TypeTag, Arc<dyn Adapter>>>,
	factories: RwLock<Vec<Arc<dyn AdapterFactory>>>,
	matches: RwLock<HashMap<TypeTag, usize>>,
}

impl Registry {
	/// An empty registry. See [`ScaleCoder::default`] for one with the standard adapters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an adapter for exactly one type. Replaces any adapter previously registered for `tag`.
	pub fn register_adapter<A: Adapter + 'static>(&self, tag: TypeTag, adapter: A) {
		self.adapters.write().insert(tag, Arc::new(adapter));
	}

	/// Append a factory to the fallback list.
	pub fn register_generic_factory<F: AdapterFactory + 'static>(&self, factory: F) {
		log::trace!("registering generic factory '{}'", factory.name());
		self.factories.write().push(Arc::new(factory));
	}

	/// Index of the factory that last handled `tag`, if any.
	pub fn cached_factory(&self, tag: &TypeTag) -> Option<usize> {
		self.matches.read().get(tag).copied()
	}

	/// Forget every remembered factory match.
	pub fn clear_matches(&self) {
		self.matches.write().clear();
	}

	/// Find the adapter for a type without touching any bytes. Factories are asked in
	/// order and the first that accepts the descriptor is remembered.
	pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn Adapter>, Error> {
		if let Some(adapter) = self.direct(&descriptor.tag) {
			return Ok(adapter);
		}
		if let Some(factory) = self.cached(&descriptor.tag) {
			return factory.make(descriptor).map_err(|e| not_found_as(e, Error::NotDecodable));
		}
		for (index, factory) in self.factories().into_iter().enumerate() {
			match factory.make(descriptor) {
				Ok(adapter) => {
					self.remember(&descriptor.tag, index);
					return Ok(adapter);
				}
				Err(Error::NoAdapterFound(_)) => continue,
				Err(err) => return Err(err),
			}
		}
		Err(Error::NotDecodable(descriptor.tag.clone()))
	}

	pub(crate) fn read(
		&self,
		descriptor: &TypeDescriptor,
		reader: &mut Reader<'_>,
		coder: &ScaleCoder,
	) -> Result<Value, Error> {
		if let Some(adapter) = self.direct(&descriptor.tag) {
			return adapter.read(descriptor, reader, coder);
		}
		if let Some(factory) = self.cached(&descriptor.tag) {
			return factory
				.make(descriptor)
				.and_then(|adapter| adapter.read(descriptor, reader, coder))
				.map_err(|e| not_found_as(e, Error::NotDecodable));
		}

		for (index, factory) in self.factories().into_iter().enumerate() {
			let checkpoint = reader.offset();
			match factory.make(descriptor).and_then(|adapter| adapter.read(descriptor, reader, coder)) {
				Ok(value) => {
					self.remember(&descriptor.tag, index);
					return Ok(value);
				}
				Err(Error::NoAdapterFound(_)) => {
					log::trace!("factory '{}' does not decode {}", factory.name(), descriptor.tag);
					reader.rewind(checkpoint);
				}
				Err(err) => {
					reader.rewind(checkpoint);
					return Err(err);
				}
			}
		}
		Err(Error::NotDecodable(descriptor.tag.clone()))
	}

	pub(crate) fn write(
		&self,
		descriptor: &TypeDescriptor,
		value: &Value,
		coder: &ScaleCoder,
		out: &mut Vec<u8>,
	) -> Result<(), Error> {
		if let Some(adapter) = self.direct(&descriptor.tag) {
			return adapter.write(descriptor, value, coder, out);
		}
		if let Some(factory) = self.cached(&descriptor.tag) {
			return factory
				.make(descriptor)
				.and_then(|adapter| adapter.write(descriptor, value, coder, out))
				.map_err(|e| not_found_as(e, Error::NotEncodable));
		}

		for (index, factory) in self.factories().into_iter().enumerate() {
			let checkpoint = out.len();
			match factory.make(descriptor).and_then(|adapter| adapter.write(descriptor, value, coder, out)) {
				Ok(()) => {
					self.remember(&descriptor.tag, index);
					return Ok(());
				}
				Err(Error::NoAdapterFound(_)) => {
					log::trace!("factory '{}' does not encode {}", factory.name(), descriptor.tag);
					out.truncate(checkpoint);
				}
				Err(err) => {
					out.truncate(checkpoint);
					return Err(err);
				}
			}
		}
		Err(Error::NotEncodable(descriptor.tag.clone()))
	}

	// The locks are never held while an adapter runs: adapters recurse into the registry.

	fn direct(&self, tag: &TypeTag) -> Option<Arc<dyn Adapter>> {
		self.adapters.read().get(tag).cloned()
	}

	fn cached(&self, tag: &TypeTag) -> Option<Arc<dyn AdapterFactory>> {
		let index = self.cached_factory(tag)?;
		self.factories.read().get(index).cloned()
	}

	fn factories(&self) -> Vec<Arc<dyn AdapterFactory>> {
		self.factories.read().clone()
	}

	fn remember(&self, tag: &TypeTag, index: usize) {
		self.matches.write().insert(tag.clone(), index);
	}
}

fn not_found_as(err: Error, wrap: fn(TypeTag) -> Error) -> Error {
	match err {
		Error::NoAdapterFound(tag) => wrap(tag),
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{scale_composite, ScaleType, StructuralFactory};
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[derive(Debug, PartialEq)]
	struct Transfer {
		dest: u8,
		amount: u32,
	}

	scale_composite!(Transfer { dest: u8, amount: u32 });

	/// Declines everything, counting how often it was asked.
	struct CountingFactory(Arc<AtomicUsize>);

	impl AdapterFactory for CountingFactory {
		fn name(&self) -> &str {
			"counting"
		}

		fn make(&self, descriptor: &TypeDescriptor) -> Result<Arc<dyn Adapter>, Error> {
			self.0.fetch_add(1, Ordering::SeqCst);
			Err(Error::NoAdapterFound(descriptor.tag.clone()))
		}
	}

	/// Accepts everything and then fails part way through reading.
	struct GreedyAdapter;

	impl Adapter for GreedyAdapter {
		fn read(&self, d: &TypeDescriptor, reader: &mut Reader<'_>, _: &ScaleCoder) -> Result<Value, Error> {
			reader.read(1)?;
			Err(Error::NoAdapterFound(d.tag.clone()))
		}

		fn write(&self, d: &TypeDescriptor, _: &Value, _: &ScaleCoder, out: &mut Vec<u8>) -> Result<(), Error> {
			out.push(0xaa);
			Err(Error::NoAdapterFound(d.tag.clone()))
		}
	}

	struct GreedyFactory;

	impl AdapterFactory for GreedyFactory {
		fn name(&self) -> &str {
			"greedy"
		}

		fn make(&self, _: &TypeDescriptor) -> Result<Arc<dyn Adapter>, Error> {
			Ok(Arc::new(GreedyAdapter))
		}
	}

	fn coder_with(first: impl AdapterFactory + 'static) -> ScaleCoder {
		let coder = ScaleCoder::new(Registry::new());
		coder.registry().register_adapter(TypeTag::U8, crate::NumericAdapter::<u8>::new());
		coder.registry().register_adapter(TypeTag::U32, crate::NumericAdapter::<u32>::new());
		coder.registry().register_generic_factory(first);
		coder.registry().register_generic_factory(StructuralFactory);
		coder
	}

	#[test]
	fn cached_factory_is_asked_once() {
		let calls = Arc::new(AtomicUsize::new(0));
		let coder = coder_with(CountingFactory(calls.clone()));
		let transfer = Transfer { dest: 1, amount: 2 };

		let bytes = coder.encode(&transfer).unwrap();
		assert_eq!(bytes, vec![1, 2, 0, 0, 0]);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(coder.registry().cached_factory(&Transfer::descriptor().tag), Some(1));

		assert_eq!(coder.decode::<Transfer>(&bytes).unwrap(), transfer);
		assert_eq!(coder.decode::<Transfer>(&bytes).unwrap(), transfer);
		assert_eq!(calls.load(Ordering::SeqCst), 1);

		coder.registry().clear_matches();
		assert_eq!(coder.decode::<Transfer>(&bytes).unwrap(), transfer);
		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[test]
	fn failed_trials_roll_back() {
		let transfer = Transfer { dest: 9, amount: 0x01020304 };
		let bytes = coder_with(GreedyFactory).encode(&transfer).unwrap();
		assert_eq!(bytes, vec![9, 4, 3, 2, 1]);
		assert_eq!(coder_with(GreedyFactory).decode::<Transfer>(&bytes).unwrap(), transfer);
	}

	#[test]
	fn unmatched_types_are_reported() {
		let coder = ScaleCoder::new(Registry::new());
		let err = coder.decode::<Transfer>(&[0; 5]).unwrap_err();
		assert!(matches!(err, Error::NotDecodable(_)), "{err}");
		let err = coder.encode(&Transfer { dest: 0, amount: 0 }).unwrap_err();
		assert!(matches!(err, Error::NotEncodable(_)), "{err}");
		assert!(coder.registry().resolve(&Transfer::descriptor()).is_err());
	}
}
