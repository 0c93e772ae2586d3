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

//! Account state kept by the `System` module.

use crate::dynamic::{Balance, Index};
use subclient_codec::scale_composite;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountData {
	pub free: Balance,
	pub reserved: Balance,
	pub misc_frozen: Balance,
	pub fee_frozen: Balance,
}

/// Value of `System.Account`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountInfo {
	/// Number of transactions sent from the account.
	pub nonce: Index,
	pub consumers: u32,
	pub providers: u32,
	pub sufficients: u32,
	pub data: AccountData,
}

scale_composite!(AccountData { free: Balance, reserved: Balance, misc_frozen: Balance, fee_frozen: Balance });
scale_composite!(AccountInfo { nonce: Index, consumers: u32, providers: u32, sufficients: u32, data: AccountData });
