// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use crate::interrupt::CancellationToken;

/// Default bound on arrays built for callers, such as the `changes` list of a
/// write summary.
pub const DEFAULT_ARRAY_SIZE_LIMIT: usize = 100_000;

/// Identity of the caller, as resolved by the permission layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserContext {
	admin: bool,
}

impl UserContext {
	pub fn admin() -> Self {
		Self {
			admin: true,
		}
	}

	pub fn user() -> Self {
		Self {
			admin: false,
		}
	}

	pub fn is_admin(&self) -> bool {
		self.admin
	}
}

/// Size limits configured by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
	pub array_size_limit: usize,
}

impl Default for Limits {
	fn default() -> Self {
		Self {
			array_size_limit: DEFAULT_ARRAY_SIZE_LIMIT,
		}
	}
}

/// Per-request context: who is asking, how to interrupt them, and what size
/// limits apply to their results.
#[derive(Debug, Clone, Default)]
pub struct Env {
	pub user: UserContext,
	pub interrupt: CancellationToken,
	pub limits: Limits,
}

impl Env {
	pub fn new(user: UserContext) -> Self {
		Self {
			user,
			interrupt: CancellationToken::new(),
			limits: Limits::default(),
		}
	}

	pub fn with_limits(mut self, limits: Limits) -> Self {
		self.limits = limits;
		self
	}

	pub fn is_admin(&self) -> bool {
		self.user.is_admin()
	}
}
