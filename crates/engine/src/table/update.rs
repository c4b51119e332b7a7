// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Single-row read-modify-write.
//!
//! The whole cycle (read, transform, validate, write) runs with the backend's
//! exclusive section held, so it is atomic relative to every other writer of
//! the dataset, including sibling items of the same batch. Failures intrinsic
//! to the row are returned as an `errored` [`RowOutcome`]; only cancellation
//! is returned as `Err`.

use std::slice;

use systable_core::{Env, RowFunction};
use systable_type::{Result, Value};
use tracing::trace;

use super::VirtualTable;
use crate::{
	conflict::{ConflictBehavior, resolve_insert_conflict},
	replace::{check_database_move, check_row_replacement},
	stats::RowOutcome,
};

/// How a batch item derives the new row from the stored one.
pub(crate) enum WriteOp<'a> {
	/// Apply the caller's function to the old row
	Replace(&'a dyn RowFunction),
	/// Insert `row`, resolving a collision with `conflict`
	Insert {
		row: &'a Value,
		conflict: &'a ConflictBehavior,
	},
}

impl WriteOp<'_> {
	fn apply(&self, primary_key: &str, old_row: &Value) -> Result<Value> {
		match self {
			WriteOp::Replace(func) => func.call(slice::from_ref(old_row)),
			WriteOp::Insert {
				row,
				conflict,
			} => resolve_insert_conflict(primary_key, old_row, row, conflict),
		}
	}
}

impl VirtualTable {
	pub(crate) async fn do_single_update(
		&self,
		env: &Env,
		key: &Value,
		autogenerated: bool,
		op: WriteOp<'_>,
	) -> Result<RowOutcome> {
		let _guard = match self.backend.acquire_exclusive_section(&env.interrupt).await {
			Ok(guard) => guard,
			Err(err) if err.is_cancelled() => return Err(err),
			Err(err) => {
				trace!(key = %key, %err, "exclusive section unavailable");
				return Ok(RowOutcome::errored(Value::Null, &err));
			}
		};

		// the exclusive section is the real critical section, so check again here
		if let Err(err) = self.check_permissions(env) {
			return Ok(RowOutcome::errored(Value::Null, &err));
		}

		let old_row = match self.checked_read_row(key, &env.interrupt).await {
			Ok(row) => row.unwrap_or(Value::Null),
			Err(err) if err.is_cancelled() => return Err(err),
			Err(err) => {
				trace!(key = %key, %err, "backend read failed");
				return Ok(RowOutcome::errored(Value::Null, &err));
			}
		};

		match self.replace_row(env, key, autogenerated, &old_row, &op).await {
			Ok(new_row) => {
				let outcome = RowOutcome::completed(old_row, new_row);
				trace!(key = %key, outcome = %outcome.kind, "row written");
				Ok(outcome)
			}
			Err(err) if err.is_cancelled() => Err(err),
			Err(err) => {
				trace!(key = %key, %err, "row errored");
				Ok(RowOutcome::errored(old_row, &err))
			}
		}
	}

	async fn replace_row(
		&self,
		env: &Env,
		key: &Value,
		autogenerated: bool,
		old_row: &Value,
		op: &WriteOp<'_>,
	) -> Result<Value> {
		env.interrupt.check()?;
		let new_row = op.apply(&self.primary_key, old_row)?;

		check_row_replacement(&self.primary_key, key, &new_row)?;

		if !self.config.check_permissions && !env.is_admin() {
			check_database_move(old_row, &new_row)?;
		}

		let to_write = if new_row.is_null() {
			None
		} else {
			Some(&new_row)
		};
		env.interrupt
			.run_until_cancelled(self.backend.write_row(key, autogenerated, to_write, &env.interrupt))
			.await?;

		Ok(new_row)
	}
}

impl std::fmt::Debug for WriteOp<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			WriteOp::Replace(_) => f.write_str("Replace"),
			WriteOp::Insert {
				conflict,
				..
			} => f.debug_struct("Insert").field("conflict", conflict).finish(),
		}
	}
}
