// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! The capability a system dataset must provide to be exposed as a table.
//!
//! A backend owns the actual data (cluster configuration, job lists,
//! statistics, ...). It is consulted one row at a time for point access and
//! writes, and as a stream for scans and change feeds. Every call receives
//! the request's [`CancellationToken`] and should return `Error::Cancelled`
//! promptly once it fires.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use systable_type::{Result, Row, Value};

use crate::{
	change::{ChangeEvent, ChangeSpec},
	exclusive::{ExclusiveGuard, ExclusiveSection},
	interrupt::CancellationToken,
	scan::{ScanSpec, Sorting},
};

/// Lazy sequence of rows produced by a full-table read.
pub type RowStream = BoxStream<'static, Result<Row>>;

/// Lazy sequence of change events.
pub type ChangeStream = BoxStream<'static, Result<ChangeEvent>>;

#[async_trait]
pub trait Backend: Send + Sync {
	/// Name of the field that identifies rows.
	fn primary_key_name(&self) -> &str;

	/// Returns the row stored under `key`, if any. A returned row must carry
	/// `key` in its primary-key field.
	async fn read_row(&self, key: &Value, interrupt: &CancellationToken) -> Result<Option<Row>>;

	/// Stores `row` under `key`, or removes the row when `row` is `None`.
	/// `autogenerated` tells whether the key was synthesized for an insert.
	async fn write_row(
		&self,
		key: &Value,
		autogenerated: bool,
		row: Option<&Row>,
		interrupt: &CancellationToken,
	) -> Result<()>;

	async fn read_all_rows_as_stream(
		&self,
		spec: &ScanSpec,
		sorting: Sorting,
		interrupt: &CancellationToken,
	) -> Result<RowStream>;

	async fn read_changes(&self, spec: &ChangeSpec, interrupt: &CancellationToken) -> Result<ChangeStream>;

	/// The mutual-exclusion point all writes to this dataset go through.
	fn exclusive_section(&self) -> &ExclusiveSection;

	async fn acquire_exclusive_section(&self, interrupt: &CancellationToken) -> Result<ExclusiveGuard> {
		self.exclusive_section().acquire(interrupt).await
	}
}
