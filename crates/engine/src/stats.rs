// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Summary of a batched write.
//!
//! Row outcomes are folded into [`Stats`] as they complete. Counters and
//! conditions merge commutatively, so the final totals do not depend on the
//! order in which rows finished. Only the order of `changes` and which error
//! becomes `first_error` follow completion order.

use std::{
	collections::BTreeSet,
	fmt::{Display, Formatter},
};

use systable_core::{Limits, ReturnChanges};
use systable_type::{Error, Value};

/// Effect of a write on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Outcome {
	Inserted,
	Replaced,
	Unchanged,
	Deleted,
	Errored,
}

impl Outcome {
	pub const ALL: [Outcome; 5] =
		[Outcome::Inserted, Outcome::Replaced, Outcome::Unchanged, Outcome::Deleted, Outcome::Errored];

	pub fn as_str(&self) -> &'static str {
		match self {
			Outcome::Inserted => "inserted",
			Outcome::Replaced => "replaced",
			Outcome::Unchanged => "unchanged",
			Outcome::Deleted => "deleted",
			Outcome::Errored => "errored",
		}
	}

	/// Derives the outcome of a successful write from the row before and after.
	/// `Null` stands for "no row".
	pub fn classify(old_row: &Value, new_row: &Value) -> Self {
		match (old_row.is_null(), new_row.is_null()) {
			(true, true) => Outcome::Unchanged,
			(true, false) => Outcome::Inserted,
			(false, true) => Outcome::Deleted,
			(false, false) if old_row == new_row => Outcome::Unchanged,
			(false, false) => Outcome::Replaced,
		}
	}

	fn index(&self) -> usize {
		*self as usize
	}
}

impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Result of one row's read-modify-write cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RowOutcome {
	pub kind: Outcome,
	pub old_val: Value,
	pub new_val: Value,
	pub error: Option<String>,
}

impl RowOutcome {
	pub fn completed(old_val: Value, new_val: Value) -> Self {
		Self {
			kind: Outcome::classify(&old_val, &new_val),
			old_val,
			new_val,
			error: None,
		}
	}

	/// Nothing was written, so the row is reported as it was before.
	pub fn errored(old_val: Value, error: &Error) -> Self {
		Self {
			kind: Outcome::Errored,
			new_val: old_val.clone(),
			old_val,
			error: Some(error.to_string()),
		}
	}

	fn change_record(&self, return_changes: ReturnChanges) -> Option<Value> {
		let wanted = match return_changes {
			ReturnChanges::No => false,
			ReturnChanges::Yes => matches!(self.kind, Outcome::Inserted | Outcome::Replaced | Outcome::Deleted),
			ReturnChanges::Always => true,
		};
		if !wanted {
			return None;
		}

		let mut fields = vec![("new_val", self.new_val.clone()), ("old_val", self.old_val.clone())];
		if let Some(error) = &self.error {
			fields.push(("error", Value::from(error.as_str())));
		}
		Some(Value::object(fields))
	}
}

/// Aggregate statistics of a batched write.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
	counts: [u64; 5],
	changes: Vec<Value>,
	first_error: Option<String>,
	conditions: BTreeSet<String>,
	return_changes: ReturnChanges,
	limits: Limits,
}

impl Stats {
	pub fn new(return_changes: ReturnChanges, limits: Limits) -> Self {
		Self {
			counts: [0; 5],
			changes: Vec::new(),
			first_error: None,
			conditions: BTreeSet::new(),
			return_changes,
			limits,
		}
	}

	pub fn merge(&mut self, outcome: RowOutcome) {
		self.counts[outcome.kind.index()] += 1;

		if let Some(change) = outcome.change_record(self.return_changes) {
			self.push_change(change);
		}

		if let Some(error) = outcome.error {
			if self.first_error.is_none() {
				self.first_error = Some(error);
			}
		}
	}

	/// Folds another aggregate, built from a disjoint set of rows, into this one.
	pub fn absorb(&mut self, other: Stats) {
		for outcome in Outcome::ALL {
			self.counts[outcome.index()] += other.counts[outcome.index()];
		}
		for change in other.changes {
			self.push_change(change);
		}
		if self.first_error.is_none() {
			self.first_error = other.first_error;
		}
		self.conditions.extend(other.conditions);
	}

	/// Records a warning condition. Repeated conditions are reported once.
	pub fn add_condition(&mut self, condition: impl Into<String>) {
		self.conditions.insert(condition.into());
	}

	pub fn count(&self, outcome: Outcome) -> u64 {
		self.counts[outcome.index()]
	}

	pub fn total(&self) -> u64 {
		self.counts.iter().sum()
	}

	pub fn first_error(&self) -> Option<&str> {
		self.first_error.as_deref()
	}

	pub fn changes(&self) -> &[Value] {
		&self.changes
	}

	/// Deduplicated conditions, cut to the caller's array size limit.
	pub fn warnings(&self) -> Vec<String> {
		self.conditions.iter().take(self.limits.array_size_limit).cloned().collect()
	}

	/// Renders the summary datum handed back to the caller.
	pub fn to_datum(&self) -> Value {
		let mut fields: Vec<(&str, Value)> =
			Outcome::ALL.iter().map(|outcome| (outcome.as_str(), Value::from(self.count(*outcome)))).collect();

		if let Some(error) = &self.first_error {
			fields.push(("first_error", Value::from(error.as_str())));
		}
		if self.return_changes.is_requested() {
			fields.push(("changes", Value::Array(self.changes.clone())));
		}
		let warnings = self.warnings();
		if !warnings.is_empty() {
			fields.push(("warnings", Value::array(warnings.into_iter().map(Value::from))));
		}

		Value::object(fields)
	}

	fn push_change(&mut self, change: Value) {
		let limit = self.limits.array_size_limit;
		if self.changes.len() < limit {
			self.changes.push(change);
		} else {
			self.add_condition(format!("Too many changes, array truncated to {limit}."));
		}
	}
}
