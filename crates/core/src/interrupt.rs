// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is shared by everything working on behalf of one
//! request. Blocking points (lock acquisition, backend calls) race their work
//! against [`CancellationToken::cancelled`] and bail out with
//! [`Error::Cancelled`] once the token fires.

use std::future::Future;

use systable_type::{Error, Result};
use tokio_util::sync;

/// A cancellation token for signaling interruption of a request.
#[derive(Clone, Default)]
pub struct CancellationToken {
	token: sync::CancellationToken,
}

impl CancellationToken {
	/// Create a new cancellation token.
	pub fn new() -> Self {
		Self {
			token: sync::CancellationToken::new(),
		}
	}

	/// Signal cancellation. Idempotent.
	pub fn cancel(&self) {
		self.token.cancel();
	}

	/// Check if cancellation was requested.
	pub fn is_cancelled(&self) -> bool {
		self.token.is_cancelled()
	}

	/// Fails with [`Error::Cancelled`] if cancellation was requested.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			Err(Error::Cancelled)
		} else {
			Ok(())
		}
	}

	/// Completes once the token has been cancelled.
	pub async fn cancelled(&self) {
		self.token.cancelled().await
	}

	/// Runs `fut` unless or until the token fires. A token that already fired
	/// never polls `fut`.
	pub async fn run_until_cancelled<T, F>(&self, fut: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		self.check()?;
		self.token.run_until_cancelled(fut).await.unwrap_or(Err(Error::Cancelled))
	}
}

impl std::fmt::Debug for CancellationToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CancellationToken").field("cancelled", &self.is_cancelled()).finish()
	}
}
