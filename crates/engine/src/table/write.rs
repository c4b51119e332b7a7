// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Batched writes.
//!
//! A batch is a list of independent row writes. Items are dispatched with at
//! most `max_parallel_ops` in flight and their outcomes are folded into one
//! [`Stats`] on the driving task as they complete. Once the interrupt fires
//! no further item is dispatched; items already in flight give up at their
//! next blocking point and contribute nothing. The call then fails with
//! `Error::Cancelled` after the in-flight items have drained.

use futures_util::{StreamExt, future, stream};
use systable_core::{Durability, Env, ReturnChanges, RowFunction, RowFunctionRef};
use systable_type::{Error, Result, Row, Value};
use tracing::{debug, instrument, trace, warn};

use super::{VirtualTable, update::WriteOp};
use crate::{
	conflict::ConflictBehavior,
	insert::validate_inserts,
	stats::{Outcome, RowOutcome, Stats},
};

struct BatchItem<'a> {
	key: Value,
	autogenerated: bool,
	op: WriteOp<'a>,
}

impl VirtualTable {
	/// Replaces each row under `keys` by `func(old_row)`. The requested
	/// durability is accepted and ignored.
	#[instrument(name = "engine::table::batched_replace", level = "debug", skip_all, fields(table = %self.name, keys = keys.len()))]
	pub async fn batched_replace(
		&self,
		env: &Env,
		keys: Vec<Value>,
		func: RowFunctionRef,
		return_changes: impl Into<ReturnChanges>,
		_durability: Durability,
	) -> Result<Value> {
		self.check_permissions(env)?;
		debug!(deterministic = func.is_deterministic(), "replacing rows");

		let func: &dyn RowFunction = &*func;
		let items = keys.into_iter().map(move |key| BatchItem {
			key,
			autogenerated: false,
			op: WriteOp::Replace(func),
		});

		let stats = self.run_batch(env, items, return_changes.into()).await?;
		Ok(stats.to_datum())
	}

	/// Inserts `rows`, resolving primary key collisions with `conflict`.
	/// `autogenerated[i]` tells whether the key of `rows[i]` was synthesized.
	/// The requested durability is accepted and ignored.
	#[instrument(name = "engine::table::batched_insert", level = "debug", skip_all, fields(table = %self.name, rows = rows.len(), conflict = ?conflict))]
	pub async fn batched_insert(
		&self,
		env: &Env,
		rows: Vec<Row>,
		autogenerated: Vec<bool>,
		conflict: ConflictBehavior,
		return_changes: impl Into<ReturnChanges>,
		_durability: Durability,
	) -> Result<Value> {
		self.check_permissions(env)?;
		validate_inserts(&self.primary_key, &rows, &autogenerated)?;

		let mut items = Vec::with_capacity(rows.len());
		for (row, autogenerated) in rows.iter().zip(autogenerated) {
			let Some(key) = row.get_field(&self.primary_key) else {
				return Err(Error::Internal("insert row lost its primary key".to_string()));
			};
			items.push(BatchItem {
				key: key.clone(),
				autogenerated,
				op: WriteOp::Insert {
					row,
					conflict: &conflict,
				},
			});
		}

		let stats = self.run_batch(env, items, return_changes.into()).await?;
		Ok(stats.to_datum())
	}

	/// Flushing a system table is not supported, whatever durability is asked for.
	pub async fn sync(&self, _env: &Env, _durability: Durability) -> Result<()> {
		Err(Error::OperationUnsupported("System tables don't support `sync()`.".to_string()))
	}

	pub fn supports_sync(&self) -> bool {
		false
	}

	async fn run_batch<'a, I>(&self, env: &Env, items: I, return_changes: ReturnChanges) -> Result<Stats>
	where
		I: IntoIterator<Item = BatchItem<'a>>,
	{
		let interrupt = &env.interrupt;
		let mut stats = Stats::new(return_changes, env.limits);

		let mut outcomes = stream::iter(items)
			.take_while(|_| future::ready(!interrupt.is_cancelled()))
			.map(move |item| async move {
				match self.do_single_update(env, &item.key, item.autogenerated, item.op).await {
					Ok(outcome) => Some(outcome),
					Err(err) if err.is_cancelled() => {
						// a cancelled row contributes nothing; the batch reports the cancellation
						trace!(key = %item.key, "row abandoned");
						None
					}
					Err(err) => Some(RowOutcome::errored(Value::Null, &err)),
				}
			})
			.buffer_unordered(self.config.max_parallel_ops);

		while let Some(outcome) = outcomes.next().await {
			if let Some(outcome) = outcome {
				stats.merge(outcome);
			}
		}

		if interrupt.is_cancelled() {
			warn!(table = %self.name, completed = stats.total(), "batch interrupted");
			return Err(Error::Cancelled);
		}

		debug!(
			table = %self.name,
			inserted = stats.count(Outcome::Inserted),
			replaced = stats.count(Outcome::Replaced),
			unchanged = stats.count(Outcome::Unchanged),
			deleted = stats.count(Outcome::Deleted),
			errored = stats.count(Outcome::Errored),
			"batch complete"
		);
		Ok(stats)
	}
}
