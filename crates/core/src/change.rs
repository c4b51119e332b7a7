// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Serialize};
use systable_type::{Row, Value};

/// What a change subscription asks the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChangeSpec {
	/// Emit the current rows before live changes
	pub include_initial: bool,
	/// Emit `state` events around the initial rows
	pub include_states: bool,
	/// Collapse multiple changes to one row into one event
	pub squash: bool,
}

/// One change to a row. `old_val`/`new_val` of `None` mean the row did not
/// exist before/after.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeEvent {
	pub old_val: Option<Row>,
	pub new_val: Option<Row>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
}

impl ChangeEvent {
	pub fn new(old_val: Option<Row>, new_val: Option<Row>) -> Self {
		Self {
			old_val,
			new_val,
			state: None,
		}
	}

	pub fn state(state: impl Into<String>) -> Self {
		Self {
			old_val: None,
			new_val: None,
			state: Some(state.into()),
		}
	}

	/// The event as a `{old_val, new_val}` object, absent rows rendered as null.
	pub fn to_value(&self) -> Value {
		if let Some(state) = &self.state {
			return Value::object([("state", Value::from(state.as_str()))]);
		}
		Value::object([
			("new_val", self.new_val.clone().unwrap_or(Value::Null)),
			("old_val", self.old_val.clone().unwrap_or(Value::Null)),
		])
	}
}
