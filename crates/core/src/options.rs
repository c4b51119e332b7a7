// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};

/// Which per-row change records a write summary carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnChanges {
	#[default]
	No,
	/// Rows whose value changed
	Yes,
	/// Every row, including unchanged and errored ones
	Always,
}

impl ReturnChanges {
	pub fn is_requested(&self) -> bool {
		!matches!(self, ReturnChanges::No)
	}
}

impl From<bool> for ReturnChanges {
	fn from(v: bool) -> Self {
		if v {
			ReturnChanges::Yes
		} else {
			ReturnChanges::No
		}
	}
}

/// Requested durability of a write. System tables accept but do not act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Durability {
	#[default]
	Soft,
	Hard,
}
