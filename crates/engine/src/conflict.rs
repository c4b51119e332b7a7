// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::fmt;

use systable_core::RowFunctionRef;
use systable_type::{Error, Result, Value};

/// How an insert that collides with an existing primary key is resolved.
#[derive(Clone, Default)]
pub enum ConflictBehavior {
	/// Fail the row
	#[default]
	Error,
	/// Overwrite the existing row
	Replace,
	/// Shallow-merge the inserted fields into the existing row
	Update,
	/// Ask a function; it is called with `[primary_key_name, old_row, new_row]`
	Custom(RowFunctionRef),
}

impl fmt::Debug for ConflictBehavior {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConflictBehavior::Error => f.write_str("Error"),
			ConflictBehavior::Replace => f.write_str("Replace"),
			ConflictBehavior::Update => f.write_str("Update"),
			ConflictBehavior::Custom(func) => {
				f.debug_tuple("Custom").field(&format_args!("deterministic={}", func.is_deterministic())).finish()
			}
		}
	}
}

/// Row to write for an insert of `insert_row`, given the row currently stored
/// (`Null` when there is none).
pub(crate) fn resolve_insert_conflict(
	primary_key: &str,
	old_row: &Value,
	insert_row: &Value,
	behavior: &ConflictBehavior,
) -> Result<Value> {
	if old_row.is_null() {
		return Ok(insert_row.clone());
	}

	match behavior {
		ConflictBehavior::Replace => Ok(insert_row.clone()),
		ConflictBehavior::Update => Ok(old_row.merge(insert_row)),
		ConflictBehavior::Custom(func) => {
			func.call(&[Value::from(primary_key), old_row.clone(), insert_row.clone()])
		}
		ConflictBehavior::Error => Err(Error::Conflict {
			primary_key: primary_key.to_string(),
			old: old_row.clone(),
			new: insert_row.clone(),
		}),
	}
}
