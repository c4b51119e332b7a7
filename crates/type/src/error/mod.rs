// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Error taxonomy for system table access.
//!
//! Every variant maps to a stable diagnostic code. Whether an error aborts a
//! whole call or becomes a single row's `errored` outcome is decided by the
//! engine, not here.

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
	/// The caller lacks the privilege the operation requires
	#[error("{0}")]
	Permission(String),

	/// A secondary or geospatial index was requested on a primary-key-only table
	#[error("Index `{index}` was not found on table `{table}`.")]
	IndexNotFound {
		index: String,
		table: String,
	},

	/// Reported by the backend that owns the data
	#[error("{0}")]
	Backend(String),

	/// A replacement changed the primary key or produced a row of the wrong shape
	#[error("{0}")]
	ReplacementSafety(String),

	/// The cancellation signal was observed
	#[error("Query interrupted.")]
	Cancelled,

	/// Insert collided with an existing row under the `error` conflict policy
	#[error("Duplicate primary key `{primary_key}`:\n{old}\n{new}")]
	Conflict {
		primary_key: String,
		old: Value,
		new: Value,
	},

	#[error("{0}")]
	OperationUnsupported(String),

	/// Raised by a row transform while it was evaluated
	#[error("{0}")]
	Function(String),

	/// Malformed request input, rejected before any row is touched
	#[error("{0}")]
	InvalidInput(String),

	/// An internal consistency check failed
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// Stable diagnostic code.
	pub fn code(&self) -> &'static str {
		match self {
			Error::Permission(_) => "VT_001",
			Error::IndexNotFound {
				..
			} => "VT_002",
			Error::Backend(_) => "VT_003",
			Error::ReplacementSafety(_) => "VT_004",
			Error::Cancelled => "VT_005",
			Error::Conflict {
				..
			} => "VT_006",
			Error::OperationUnsupported(_) => "VT_007",
			Error::Function(_) => "VT_008",
			Error::InvalidInput(_) => "VT_009",
			Error::Internal(_) => "VT_010",
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}

	pub fn permission(msg: impl Into<String>) -> Self {
		Error::Permission(msg.into())
	}

	pub fn backend(msg: impl Into<String>) -> Self {
		Error::Backend(msg.into())
	}

	pub fn function(msg: impl Into<String>) -> Self {
		Error::Function(msg.into())
	}

	pub fn index_not_found(index: impl Into<String>, table: impl Into<String>) -> Self {
		Error::IndexNotFound {
			index: index.into(),
			table: table.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns early with an [`Error`] built from the given expression.
#[macro_export]
macro_rules! return_error {
	($err:expr) => {
		return Err($err.into())
	};
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_index_not_found_message() {
		let err = Error::index_not_found("name", "server_config");
		assert_eq!(err.to_string(), "Index `name` was not found on table `server_config`.");
		assert_eq!(err.code(), "VT_002");
	}

	#[test]
	fn test_conflict_message() {
		let err = Error::Conflict {
			primary_key: "id".to_string(),
			old: Value::object([("id", Value::from(1))]),
			new: Value::object([("id", Value::from(1)), ("x", Value::from(2))]),
		};
		assert_eq!(err.to_string(), "Duplicate primary key `id`:\n{\"id\":1}\n{\"id\":1,\"x\":2}");
	}

	#[test]
	fn test_codes_are_distinct() {
		let errors = [
			Error::permission("p"),
			Error::index_not_found("i", "t"),
			Error::backend("b"),
			Error::ReplacementSafety("r".to_string()),
			Error::Cancelled,
			Error::Conflict {
				primary_key: "id".to_string(),
				old: Value::Null,
				new: Value::Null,
			},
			Error::OperationUnsupported("o".to_string()),
			Error::function("f"),
			Error::InvalidInput("v".to_string()),
			Error::Internal("x".to_string()),
		];
		let mut codes: Vec<_> = errors.iter().map(Error::code).collect();
		codes.sort();
		codes.dedup();
		assert_eq!(codes.len(), errors.len());
		assert!(Error::Cancelled.is_cancelled());
	}
}
