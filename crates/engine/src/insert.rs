// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use systable_type::{Error, Result, Row, Value};
use uuid::Uuid;

/// Insert rows whose primary keys are all present, with a record of which
/// keys were synthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedInserts {
	pub rows: Vec<Row>,
	pub autogenerated: Vec<bool>,
	pub generated_keys: Vec<Value>,
}

/// Gives every row lacking `primary_key` a fresh UUID key.
pub fn prepare_inserts(primary_key: &str, rows: Vec<Row>) -> Result<PreparedInserts> {
	let mut prepared = PreparedInserts {
		rows: Vec::with_capacity(rows.len()),
		autogenerated: Vec::with_capacity(rows.len()),
		generated_keys: Vec::new(),
	};

	for row in rows {
		let mut fields = match row {
			Value::Object(fields) => fields,
			other => {
				return Err(Error::InvalidInput(format!(
					"Inserted value must be an OBJECT (got {}):\n{other}",
					other.type_name()
				)));
			}
		};

		let generated = !fields.contains_key(primary_key);
		if generated {
			let key = Value::from(Uuid::new_v4().to_string());
			fields.insert(primary_key.to_string(), key.clone());
			prepared.generated_keys.push(key);
		}

		prepared.rows.push(Value::Object(fields));
		prepared.autogenerated.push(generated);
	}

	Ok(prepared)
}

/// Rejects batches the write path must never see: keyless rows, non-objects,
/// or a flag per row missing.
pub(crate) fn validate_inserts(primary_key: &str, rows: &[Row], autogenerated: &[bool]) -> Result<()> {
	if rows.len() != autogenerated.len() {
		return Err(Error::InvalidInput(format!(
			"expected one autogenerated flag per row ({} rows, {} flags)",
			rows.len(),
			autogenerated.len()
		)));
	}
	for row in rows {
		if !row.is_object() {
			return Err(Error::InvalidInput(format!(
				"Inserted value must be an OBJECT (got {}):\n{row}",
				row.type_name()
			)));
		}
		if row.get_field(primary_key).is_none() {
			return Err(Error::InvalidInput(format!(
				"Inserted object must have primary key `{primary_key}`:\n{row}"
			)));
		}
	}
	Ok(())
}
