// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use systable_type::{Error, Result};

/// Default number of row operations a batched write keeps in flight.
pub const MAX_PARALLEL_OPS: usize = 10;

/// Construction-time configuration of a virtual table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
	/// Restrict every access to administrators
	pub check_permissions: bool,
	/// Width of the worker pool used by batched writes
	pub max_parallel_ops: usize,
}

impl TableConfig {
	pub fn with_check_permissions(mut self, check_permissions: bool) -> Self {
		self.check_permissions = check_permissions;
		self
	}

	pub fn with_max_parallel_ops(mut self, max_parallel_ops: usize) -> Self {
		self.max_parallel_ops = max_parallel_ops;
		self
	}

	pub fn validate(&self) -> Result<()> {
		if self.max_parallel_ops == 0 {
			return Err(Error::InvalidInput("max_parallel_ops must be at least 1".to_string()));
		}
		Ok(())
	}
}

impl Default for TableConfig {
	fn default() -> Self {
		Self {
			check_permissions: true,
			max_parallel_ops: MAX_PARALLEL_OPS,
		}
	}
}
