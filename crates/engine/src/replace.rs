// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Checks a replacement row must pass before it is written.

use systable_type::{Error, Result, Value};

/// Field through which a row is assigned to a database.
pub const DB_FIELD: &str = "db";

/// A replacement must be an object carrying the unchanged primary key, or null
/// to delete the row.
pub(crate) fn check_row_replacement(primary_key: &str, key: &Value, new_row: &Value) -> Result<()> {
	match new_row {
		Value::Null => Ok(()),
		Value::Object(_) => {
			let Some(new_key) = new_row.get_field(primary_key) else {
				return Err(Error::ReplacementSafety(format!(
					"Inserted object must have primary key `{primary_key}`:\n{new_row}"
				)));
			};
			if new_key != key {
				return Err(Error::ReplacementSafety(format!(
					"Primary key `{primary_key}` cannot be changed (`{}` -> `{}`).",
					key.print_primary(),
					new_key.print_primary()
				)));
			}
			Ok(())
		}
		other => Err(Error::ReplacementSafety(format!(
			"Inserted value must be an OBJECT (got {}):\n{other}",
			other.type_name()
		))),
	}
}

/// Non-administrators may keep but not change the database a row belongs to.
pub(crate) fn check_database_move(old_row: &Value, new_row: &Value) -> Result<()> {
	let Some(new_db) = new_row.get_field(DB_FIELD) else {
		return Ok(());
	};
	if old_row.get_field(DB_FIELD) == Some(new_db) {
		return Ok(());
	}
	Err(Error::permission("Only administrators may move a table to a different database."))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(id: i64) -> Value {
		Value::object([("id", Value::from(id)), ("x", Value::from(0))])
	}

	#[test]
	fn test_same_key_passes() {
		assert!(check_row_replacement("id", &Value::from(1), &row(1)).is_ok());
		assert!(check_row_replacement("id", &Value::from(1), &Value::Null).is_ok());
	}

	#[test]
	fn test_changed_key_rejected() {
		let err = check_row_replacement("id", &Value::from(1), &row(2)).unwrap_err();
		assert_eq!(err, Error::ReplacementSafety("Primary key `id` cannot be changed (`1` -> `2`).".to_string()));
	}

	#[test]
	fn test_missing_key_rejected() {
		let err = check_row_replacement("id", &Value::from(1), &Value::object([("x", Value::from(1))]))
			.unwrap_err();
		assert_eq!(err.code(), "VT_004");
		assert!(err.to_string().starts_with("Inserted object must have primary key `id`"));
	}

	#[test]
	fn test_non_object_rejected() {
		let err = check_row_replacement("id", &Value::from(1), &Value::from("nope")).unwrap_err();
		assert_eq!(err.to_string(), "Inserted value must be an OBJECT (got STRING):\n\"nope\"");
	}

	#[test]
	fn test_database_move() {
		let in_db = |db: &str| Value::object([("id", Value::from(1)), (DB_FIELD, Value::from(db))]);

		assert!(check_database_move(&in_db("a"), &in_db("a")).is_ok());
		assert!(check_database_move(&in_db("a"), &row(1)).is_ok());
		assert_eq!(check_database_move(&in_db("a"), &in_db("b")).unwrap_err().code(), "VT_001");
		assert_eq!(check_database_move(&Value::Null, &in_db("b")).unwrap_err().code(), "VT_001");
		assert_eq!(check_database_move(&row(1), &in_db("b")).unwrap_err().code(), "VT_001");
	}
}
