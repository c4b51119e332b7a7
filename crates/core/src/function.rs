// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{fmt, sync::Arc};

use systable_type::{Result, Value};

/// A compiled user function applied to rows.
///
/// Errors returned from `call` are domain errors of the function and become
/// per-row outcomes; they never abort a batch.
pub trait RowFunction: Send + Sync {
	fn call(&self, args: &[Value]) -> Result<Value>;

	fn is_deterministic(&self) -> bool {
		true
	}
}

/// Shared handle to a [`RowFunction`], owned by the request that carries it.
pub type RowFunctionRef = Arc<dyn RowFunction>;

/// Closure-backed [`RowFunction`].
pub struct Function<F> {
	f: F,
	deterministic: bool,
}

impl<F> Function<F>
where
	F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
{
	pub fn new(f: F) -> RowFunctionRef {
		Arc::new(Self {
			f,
			deterministic: true,
		})
	}

	pub fn non_deterministic(f: F) -> RowFunctionRef {
		Arc::new(Self {
			f,
			deterministic: false,
		})
	}
}

impl<F> RowFunction for Function<F>
where
	F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
	fn call(&self, args: &[Value]) -> Result<Value> {
		(self.f)(args)
	}

	fn is_deterministic(&self) -> bool {
		self.deterministic
	}
}

impl<F> fmt::Debug for Function<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Function").field("deterministic", &self.deterministic).finish()
	}
}
