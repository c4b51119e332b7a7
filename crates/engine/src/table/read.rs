// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use futures_util::StreamExt;
use systable_core::{CancellationToken, ChangeSpec, ChangeStream, Env, RowStream, ScanSpec, Sorting};
use systable_type::{Error, Result, Row, Value};
use tracing::{instrument, warn};

use super::VirtualTable;

/// Parameters of a nearest-neighbour geospatial query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestQuery {
	/// Longitude and latitude of the query point
	pub center: (f64, f64),
	pub max_dist: f64,
	pub max_results: u64,
}

impl VirtualTable {
	/// The row stored under `key`, or `Value::Null` when there is none.
	#[instrument(name = "engine::table::read_row", level = "trace", skip(self, env))]
	pub async fn read_row(&self, env: &Env, key: &Value) -> Result<Row> {
		self.check_permissions(env)?;
		let row = self.checked_read_row(key, &env.interrupt).await?;
		Ok(row.unwrap_or(Value::Null))
	}

	/// Lazily streams the rows covered by `spec`. Only the primary index exists.
	#[instrument(name = "engine::table::read_all", level = "debug", skip(self, env, spec))]
	pub async fn read_all(&self, env: &Env, index: &str, spec: &ScanSpec, sorting: Sorting) -> Result<RowStream> {
		self.check_permissions(env)?;

		if index != self.primary_key {
			return Err(Error::index_not_found(index, &self.name));
		}

		let interrupt = env.interrupt.clone();
		let stream = interrupt
			.run_until_cancelled(self.backend.read_all_rows_as_stream(spec, sorting, &interrupt))
			.await
			.inspect_err(|err| warn!(table = %self.name, %err, "full-table read failed"))?;

		Ok(stream.map(move |row| interrupt.check().and(row)).boxed())
	}

	/// Same rows as [`VirtualTable::read_all`], drained into memory for callers
	/// that need random access.
	#[instrument(name = "engine::table::read_all_materialized", level = "debug", skip(self, env, spec))]
	pub async fn read_all_materialized(
		&self,
		env: &Env,
		index: &str,
		spec: &ScanSpec,
		sorting: Sorting,
	) -> Result<Vec<Row>> {
		let mut stream = self.read_all(env, index, spec, sorting).await?;

		let mut rows = Vec::new();
		while let Some(row) = stream.next().await {
			rows.push(row?);
		}
		Ok(rows)
	}

	#[instrument(name = "engine::table::read_changes", level = "debug", skip(self, env))]
	pub async fn read_changes(&self, env: &Env, spec: &ChangeSpec) -> Result<ChangeStream> {
		self.check_permissions(env)?;
		env.interrupt.run_until_cancelled(self.backend.read_changes(spec, &env.interrupt)).await
	}

	/// Geospatial intersection needs a secondary index, which system tables
	/// never have.
	pub async fn read_intersecting(&self, _env: &Env, index: &str, _geometry: &Value) -> Result<RowStream> {
		if index == self.primary_key {
			return Err(Error::Internal(
				"read_intersecting() should never be called with the primary index".to_string(),
			));
		}
		Err(Error::index_not_found(index, &self.name))
	}

	/// Nearest-neighbour queries need a geospatial index, which system tables
	/// never have.
	pub async fn read_nearest(&self, _env: &Env, index: &str, _query: &NearestQuery) -> Result<Value> {
		if index == self.primary_key {
			return Err(Error::Internal("read_nearest() should never be called with the primary index".to_string()));
		}
		Err(Error::index_not_found(index, &self.name))
	}

	/// Point read with a sanity check on what the backend returned.
	pub(crate) async fn checked_read_row(&self, key: &Value, interrupt: &CancellationToken) -> Result<Option<Row>> {
		let row = interrupt.run_until_cancelled(self.backend.read_row(key, interrupt)).await?;

		if let Some(row) = &row {
			debug_assert!(
				row.get_field(&self.primary_key) == Some(key),
				"backend of `{}` returned {row} for key {key}",
				self.name
			);
		}

		Ok(row)
	}
}
