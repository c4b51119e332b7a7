// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

use systable_type::Result;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

use crate::interrupt::CancellationToken;

struct Inner {
	lock: Arc<Mutex<()>>,
	pending: AtomicUsize,
	peak_pending: AtomicUsize,
	held: AtomicUsize,
}

/// Table-wide mutual exclusion for read-modify-write cycles.
///
/// Every write against a dataset runs its read, transform and write while
/// holding the section, so writes are serialized relative to each other.
/// `pending` counts callers that are queued for or holding the section.
#[derive(Clone)]
pub struct ExclusiveSection {
	inner: Arc<Inner>,
}

impl ExclusiveSection {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				lock: Arc::new(Mutex::new(())),
				pending: AtomicUsize::new(0),
				peak_pending: AtomicUsize::new(0),
				held: AtomicUsize::new(0),
			}),
		}
	}

	/// Waits for the section, giving up with `Error::Cancelled` if the token
	/// fires while queued.
	pub async fn acquire(&self, interrupt: &CancellationToken) -> Result<ExclusiveGuard> {
		let ticket = PendingTicket::new(self.inner.clone());
		let lock = self.inner.lock.clone();
		let guard = interrupt.run_until_cancelled(async move { Ok(lock.lock_owned().await) }).await?;

		self.inner.held.fetch_add(1, Ordering::SeqCst);
		trace!(pending = self.pending(), "exclusive section acquired");

		Ok(ExclusiveGuard {
			_guard: guard,
			_ticket: ticket,
			section: self.inner.clone(),
		})
	}

	/// Callers currently queued for or holding the section.
	pub fn pending(&self) -> usize {
		self.inner.pending.load(Ordering::SeqCst)
	}

	/// Highest value `pending` has reached.
	pub fn peak_pending(&self) -> usize {
		self.inner.peak_pending.load(Ordering::SeqCst)
	}

	/// 1 while some caller holds the section, 0 otherwise.
	pub fn held(&self) -> usize {
		self.inner.held.load(Ordering::SeqCst)
	}
}

impl Default for ExclusiveSection {
	fn default() -> Self {
		Self::new()
	}
}

struct PendingTicket {
	section: Arc<Inner>,
}

impl PendingTicket {
	fn new(section: Arc<Inner>) -> Self {
		let now = section.pending.fetch_add(1, Ordering::SeqCst) + 1;
		section.peak_pending.fetch_max(now, Ordering::SeqCst);
		Self {
			section,
		}
	}
}

impl Drop for PendingTicket {
	fn drop(&mut self) {
		self.section.pending.fetch_sub(1, Ordering::SeqCst);
	}
}

/// Scoped ownership of an [`ExclusiveSection`]; released when dropped.
pub struct ExclusiveGuard {
	_guard: OwnedMutexGuard<()>,
	_ticket: PendingTicket,
	section: Arc<Inner>,
}

impl Drop for ExclusiveGuard {
	fn drop(&mut self) {
		self.section.held.fetch_sub(1, Ordering::SeqCst);
	}
}
