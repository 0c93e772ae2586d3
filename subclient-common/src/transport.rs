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

use serde_json::Value as JsonValue;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error("rpc error {code}: {message}")]
	Rpc { code: i64, message: String },
	#[error("transport failure: {0}")]
	Io(String),
}

/// Request/response access to a node's JSON-RPC interface. Connection handling,
/// timeouts and retries are left to the implementation.
pub trait Transport: Send + Sync {
	fn request(&self, method: &str, params: Vec<JsonValue>) -> Result<JsonValue, TransportError>;
}

impl<F> Transport for F
where
	F: Fn(&str, Vec<JsonValue>) -> Result<JsonValue, TransportError> + Send + Sync,
{
	fn request(&self, method: &str, params: Vec<JsonValue>) -> Result<JsonValue, TransportError> {
		self(method, params)
	}
}
