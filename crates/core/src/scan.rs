// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cmp::Ordering, ops::Bound};

use systable_type::{Row, Value};

/// Which primary keys a full-table read covers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanSpec {
	#[default]
	All,
	/// Exactly these keys
	Keys(Vec<Value>),
	/// Keys between two bounds, by primary key ordering
	Range {
		left: Bound<Value>,
		right: Bound<Value>,
	},
}

impl ScanSpec {
	pub fn covers(&self, key: &Value) -> bool {
		match self {
			ScanSpec::All => true,
			ScanSpec::Keys(keys) => keys.contains(key),
			ScanSpec::Range {
				left,
				right,
			} => {
				let above = match left {
					Bound::Included(l) => key >= l,
					Bound::Excluded(l) => key > l,
					Bound::Unbounded => true,
				};
				let below = match right {
					Bound::Included(r) => key <= r,
					Bound::Excluded(r) => key < r,
					Bound::Unbounded => true,
				};
				above && below
			}
		}
	}
}

/// Order of a full-table read, by primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sorting {
	#[default]
	Unordered,
	Ascending,
	Descending,
}

impl Sorting {
	/// Sorts rows by the value of `primary_key`. Rows lacking the key sort as null.
	pub fn sort_rows(&self, primary_key: &str, rows: &mut [Row]) {
		let by_key = |l: &Row, r: &Row| -> Ordering {
			let null = Value::Null;
			let lk = l.get_field(primary_key).unwrap_or(&null);
			let rk = r.get_field(primary_key).unwrap_or(&null);
			lk.cmp(rk)
		};
		match self {
			Sorting::Unordered => {}
			Sorting::Ascending => rows.sort_by(by_key),
			Sorting::Descending => rows.sort_by(|l, r| by_key(r, l)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_covers_keys() {
		let spec = ScanSpec::Keys(vec![Value::from(1), Value::from("a")]);
		assert!(spec.covers(&Value::from(1)));
		assert!(spec.covers(&Value::from("a")));
		assert!(!spec.covers(&Value::from(2)));
	}

	#[test]
	fn test_covers_range() {
		let spec = ScanSpec::Range {
			left: Bound::Included(Value::from(2)),
			right: Bound::Excluded(Value::from(5)),
		};
		assert!(!spec.covers(&Value::from(1)));
		assert!(spec.covers(&Value::from(2)));
		assert!(spec.covers(&Value::from(4)));
		assert!(!spec.covers(&Value::from(5)));
		assert!(!spec.covers(&Value::from("3")));
	}

	#[test]
	fn test_sort_rows() {
		let row = |id: i64| Value::object([("id", Value::from(id))]);
		let mut rows = vec![row(3), row(1), row(2)];

		Sorting::Ascending.sort_rows("id", &mut rows);
		assert_eq!(rows, vec![row(1), row(2), row(3)]);

		Sorting::Descending.sort_rows("id", &mut rows);
		assert_eq!(rows, vec![row(3), row(2), row(1)]);
	}
}
