// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! An in-memory [`Backend`] for exercising tables without a real dataset.
//!
//! Rows live in a `BTreeMap` keyed by primary key. Every successful write is
//! recorded as a [`ChangeEvent`]. Reads and writes of chosen keys, and chosen
//! acquisitions of the exclusive section, can be made to fail with a backend
//! error.

use std::{
	collections::BTreeMap,
	sync::atomic::{AtomicUsize, Ordering},
	time::Duration,
};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use parking_lot::RwLock;
use systable_core::{
	Backend, CancellationToken, ChangeEvent, ChangeSpec, ChangeStream, ExclusiveGuard, ExclusiveSection, RowStream,
	ScanSpec, Sorting,
};
use systable_type::{Error, Result, Row, Value};
use tokio::time::sleep;
use tracing::trace;

pub struct MemoryBackend {
	primary_key: String,
	rows: RwLock<BTreeMap<Value, Row>>,
	history: RwLock<Vec<(Value, ChangeEvent)>>,
	read_failures: RwLock<BTreeMap<Value, String>>,
	write_failures: RwLock<BTreeMap<Value, String>>,
	acquire_failures: RwLock<BTreeMap<usize, String>>,
	written: RwLock<Vec<(Value, bool)>>,
	read_delay: Option<Duration>,
	reads: AtomicUsize,
	writes: AtomicUsize,
	acquires: AtomicUsize,
	exclusive: ExclusiveSection,
}

impl MemoryBackend {
	pub fn new(primary_key: impl Into<String>) -> Self {
		Self {
			primary_key: primary_key.into(),
			rows: RwLock::new(BTreeMap::new()),
			history: RwLock::new(Vec::new()),
			read_failures: RwLock::new(BTreeMap::new()),
			write_failures: RwLock::new(BTreeMap::new()),
			acquire_failures: RwLock::new(BTreeMap::new()),
			written: RwLock::new(Vec::new()),
			read_delay: None,
			reads: AtomicUsize::new(0),
			writes: AtomicUsize::new(0),
			acquires: AtomicUsize::new(0),
			exclusive: ExclusiveSection::new(),
		}
	}

	/// Seeds the dataset. Rows without the primary key are skipped.
	pub fn with_rows(self, rows: impl IntoIterator<Item = Row>) -> Self {
		{
			let mut stored = self.rows.write();
			for row in rows {
				if let Some(key) = row.get_field(&self.primary_key).cloned() {
					stored.insert(key, row);
				}
			}
		}
		self
	}

	/// Makes every point read sleep first, so that concurrent writers pile up
	/// in the exclusive section.
	pub fn with_read_delay(mut self, delay: Duration) -> Self {
		self.read_delay = Some(delay);
		self
	}

	pub fn fail_reads_of(&self, key: Value, message: impl Into<String>) {
		self.read_failures.write().insert(key, message.into());
	}

	pub fn fail_writes_of(&self, key: Value, message: impl Into<String>) {
		self.write_failures.write().insert(key, message.into());
	}

	/// Fails the `nth` acquisition of the exclusive section, counting from 1.
	pub fn fail_acquire(&self, nth: usize, message: impl Into<String>) {
		self.acquire_failures.write().insert(nth, message.into());
	}

	/// Stores `row` under `key` as is, even when its primary key says otherwise.
	pub fn put_raw(&self, key: Value, row: Row) {
		self.rows.write().insert(key, row);
	}

	pub fn get(&self, key: &Value) -> Option<Row> {
		self.rows.read().get(key).cloned()
	}

	/// All stored rows in primary key order.
	pub fn rows(&self) -> Vec<Row> {
		self.rows.read().values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}

	pub fn exclusive(&self) -> &ExclusiveSection {
		&self.exclusive
	}

	/// Point reads served, failed ones included.
	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}

	/// Writes applied to the dataset.
	pub fn write_count(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	/// Key and autogenerated flag of every applied write, in write order.
	pub fn written(&self) -> Vec<(Value, bool)> {
		self.written.read().clone()
	}

	fn squash(events: Vec<(Value, ChangeEvent)>) -> Vec<ChangeEvent> {
		let mut order = Vec::new();
		let mut by_key: BTreeMap<Value, ChangeEvent> = BTreeMap::new();
		for (key, event) in events {
			match by_key.get_mut(&key) {
				Some(squashed) => squashed.new_val = event.new_val,
				None => {
					order.push(key.clone());
					by_key.insert(key, event);
				}
			}
		}
		order.into_iter().filter_map(|key| by_key.remove(&key)).filter(|event| event.old_val != event.new_val).collect()
	}
}

#[async_trait]
impl Backend for MemoryBackend {
	fn primary_key_name(&self) -> &str {
		&self.primary_key
	}

	async fn read_row(&self, key: &Value, interrupt: &CancellationToken) -> Result<Option<Row>> {
		self.reads.fetch_add(1, Ordering::SeqCst);

		if let Some(delay) = self.read_delay {
			interrupt
				.run_until_cancelled(async {
					sleep(delay).await;
					Ok(())
				})
				.await?;
		}

		if let Some(message) = self.read_failures.read().get(key) {
			return Err(Error::backend(message.clone()));
		}
		Ok(self.get(key))
	}

	async fn write_row(
		&self,
		key: &Value,
		autogenerated: bool,
		row: Option<&Row>,
		interrupt: &CancellationToken,
	) -> Result<()> {
		interrupt.check()?;

		if let Some(message) = self.write_failures.read().get(key) {
			return Err(Error::backend(message.clone()));
		}

		let old_val = match row {
			Some(row) => self.rows.write().insert(key.clone(), row.clone()),
			None => self.rows.write().remove(key),
		};
		self.writes.fetch_add(1, Ordering::SeqCst);
		self.written.write().push((key.clone(), autogenerated));
		trace!(%key, autogenerated, deleted = row.is_none(), "memory write");

		self.history.write().push((key.clone(), ChangeEvent::new(old_val, row.cloned())));
		Ok(())
	}

	async fn read_all_rows_as_stream(
		&self,
		spec: &ScanSpec,
		sorting: Sorting,
		interrupt: &CancellationToken,
	) -> Result<RowStream> {
		interrupt.check()?;

		let mut rows: Vec<Row> =
			self.rows.read().iter().filter(|(key, _)| spec.covers(key)).map(|(_, row)| row.clone()).collect();
		sorting.sort_rows(&self.primary_key, &mut rows);

		Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
	}

	async fn read_changes(&self, spec: &ChangeSpec, interrupt: &CancellationToken) -> Result<ChangeStream> {
		interrupt.check()?;

		let mut events = Vec::new();
		if spec.include_initial {
			if spec.include_states {
				events.push(ChangeEvent::state("initializing"));
			}
			events.extend(self.rows.read().values().map(|row| ChangeEvent::new(None, Some(row.clone()))));
			if spec.include_states {
				events.push(ChangeEvent::state("ready"));
			}
		}

		let history = self.history.read().clone();
		if spec.squash {
			events.extend(Self::squash(history));
		} else {
			events.extend(history.into_iter().map(|(_, event)| event));
		}

		Ok(stream::iter(events.into_iter().map(Ok)).boxed())
	}

	fn exclusive_section(&self) -> &ExclusiveSection {
		&self.exclusive
	}

	async fn acquire_exclusive_section(&self, interrupt: &CancellationToken) -> Result<ExclusiveGuard> {
		let nth = self.acquires.fetch_add(1, Ordering::SeqCst) + 1;
		if let Some(message) = self.acquire_failures.read().get(&nth) {
			return Err(Error::backend(message.clone()));
		}
		self.exclusive.acquire(interrupt).await
	}
}

#[cfg(test)]
mod tests {
	use futures_util::TryStreamExt;

	use super::*;

	fn row(id: i64) -> Row {
		Value::object([("id", Value::from(id))])
	}

	#[tokio::test]
	async fn test_write_then_read() {
		let backend = MemoryBackend::new("id");
		let interrupt = CancellationToken::new();

		backend.write_row(&Value::from(1), false, Some(&row(1)), &interrupt).await.unwrap();
		assert_eq!(backend.read_row(&Value::from(1), &interrupt).await.unwrap(), Some(row(1)));

		backend.write_row(&Value::from(1), false, None, &interrupt).await.unwrap();
		assert_eq!(backend.read_row(&Value::from(1), &interrupt).await.unwrap(), None);
		assert_eq!(backend.write_count(), 2);
		assert_eq!(backend.read_count(), 2);
		assert_eq!(backend.written(), vec![(Value::from(1), false), (Value::from(1), false)]);
	}

	#[tokio::test]
	async fn test_injected_failures() {
		let backend = MemoryBackend::new("id").with_rows([row(1)]);
		backend.fail_reads_of(Value::from(1), "unreadable");
		backend.fail_writes_of(Value::from(2), "unwritable");
		let interrupt = CancellationToken::new();

		let err = backend.read_row(&Value::from(1), &interrupt).await.unwrap_err();
		assert_eq!(err, Error::Backend("unreadable".to_string()));

		let err = backend.write_row(&Value::from(2), false, Some(&row(2)), &interrupt).await.unwrap_err();
		assert_eq!(err.to_string(), "unwritable");
		assert_eq!(backend.write_count(), 0);
	}

	#[tokio::test]
	async fn test_injected_acquire_failure() {
		let backend = MemoryBackend::new("id");
		backend.fail_acquire(2, "lock service unavailable");
		let interrupt = CancellationToken::new();

		drop(backend.acquire_exclusive_section(&interrupt).await.unwrap());
		let err = backend.acquire_exclusive_section(&interrupt).await.err();
		assert_eq!(err, Some(Error::Backend("lock service unavailable".to_string())));
		drop(backend.acquire_exclusive_section(&interrupt).await.unwrap());
		assert_eq!(backend.exclusive().held(), 0);
	}

	#[tokio::test]
	async fn test_scan_filters_and_sorts() {
		let backend = MemoryBackend::new("id").with_rows([row(3), row(1), row(2)]);
		let interrupt = CancellationToken::new();

		let rows: Vec<Row> = backend
			.read_all_rows_as_stream(&ScanSpec::Keys(vec![Value::from(1), Value::from(3)]), Sorting::Descending, &interrupt)
			.await
			.unwrap()
			.try_collect()
			.await
			.unwrap();

		assert_eq!(rows, vec![row(3), row(1)]);
	}

	#[tokio::test]
	async fn test_changes_with_initial_states_and_squash() {
		let backend = MemoryBackend::new("id").with_rows([row(1)]);
		let interrupt = CancellationToken::new();
		let updated = Value::object([("id", Value::from(1)), ("x", Value::from(1))]);
		backend.write_row(&Value::from(2), false, Some(&row(2)), &interrupt).await.unwrap();
		backend.write_row(&Value::from(2), false, None, &interrupt).await.unwrap();
		backend.write_row(&Value::from(1), false, Some(&updated), &interrupt).await.unwrap();

		let spec = ChangeSpec {
			include_initial: true,
			include_states: true,
			squash: true,
		};
		let events: Vec<ChangeEvent> =
			backend.read_changes(&spec, &interrupt).await.unwrap().try_collect().await.unwrap();

		assert_eq!(
			events,
			vec![
				ChangeEvent::state("initializing"),
				ChangeEvent::new(None, Some(updated.clone())),
				ChangeEvent::state("ready"),
				ChangeEvent::new(Some(row(1)), Some(updated)),
			]
		);
	}

	#[tokio::test]
	async fn test_cancelled_scan() {
		let backend = MemoryBackend::new("id").with_rows([row(1)]);
		let interrupt = CancellationToken::new();
		interrupt.cancel();

		let result = backend.read_all_rows_as_stream(&ScanSpec::All, Sorting::Unordered, &interrupt).await;
		assert!(matches!(result, Err(Error::Cancelled)));
	}
}
