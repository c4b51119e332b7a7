// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cmp::Ordering,
	collections::BTreeMap,
	fmt::{Display, Formatter},
};

mod json;
mod ordered_f64;

pub use ordered_f64::{OrderedF64, OrderedFloatError};

/// One record of a system table. Always an object in well-formed tables; a
/// `Null` row stands for "no row".
pub type Row = Value;

/// A dynamically typed value, as exchanged with system table backends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Value {
	/// Absence of a value; also the row returned for a missing key
	#[default]
	Null,
	Boolean(bool),
	/// A finite 8-byte floating point
	Number(OrderedF64),
	String(String),
	Array(Vec<Value>),
	/// Fields ordered by name
	Object(BTreeMap<String, Value>),
}

impl Value {
	pub fn bool(v: impl Into<bool>) -> Self {
		Value::Boolean(v.into())
	}

	/// Non-finite numbers collapse to `Null`.
	pub fn number(v: impl Into<f64>) -> Self {
		OrderedF64::try_from(v.into()).map(Value::Number).unwrap_or(Value::Null)
	}

	pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
		Value::Array(items.into_iter().collect())
	}

	pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
		Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn is_object(&self) -> bool {
		matches!(self, Value::Object(_))
	}

	pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
		match self {
			Value::Object(fields) => Some(fields),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Value::Array(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Number(n) => Some(n.value()),
			_ => None,
		}
	}

	/// Field lookup on objects; `None` for missing fields and non-objects.
	pub fn get_field(&self, name: &str) -> Option<&Value> {
		self.as_object().and_then(|fields| fields.get(name))
	}

	/// Type name as shown in user-facing messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::Null => "NULL",
			Value::Boolean(_) => "BOOL",
			Value::Number(_) => "NUMBER",
			Value::String(_) => "STRING",
			Value::Array(_) => "ARRAY",
			Value::Object(_) => "OBJECT",
		}
	}

	/// Shallow merge: top-level fields of `other` override fields of `self`.
	/// A non-object on either side yields `other`.
	pub fn merge(&self, other: &Value) -> Value {
		match (self, other) {
			(Value::Object(base), Value::Object(patch)) => {
				let mut merged = base.clone();
				for (name, value) in patch {
					merged.insert(name.clone(), value.clone());
				}
				Value::Object(merged)
			}
			_ => other.clone(),
		}
	}

	/// Renders a primary key value for messages.
	pub fn print_primary(&self) -> String {
		match self {
			Value::String(s) => s.clone(),
			other => other.to_string(),
		}
	}

	// Alphabetical by type name, the ordering primary keys sort by.
	fn type_rank(&self) -> u8 {
		match self {
			Value::Array(_) => 0,
			Value::Boolean(_) => 1,
			Value::Null => 2,
			Value::Number(_) => 3,
			Value::Object(_) => 4,
			Value::String(_) => 5,
		}
	}
}

impl PartialOrd for Value {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Value {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Value::Null, Value::Null) => Ordering::Equal,
			(Value::Boolean(l), Value::Boolean(r)) => l.cmp(r),
			(Value::Number(l), Value::Number(r)) => l.cmp(r),
			(Value::String(l), Value::String(r)) => l.cmp(r),
			(Value::Array(l), Value::Array(r)) => l.cmp(r),
			(Value::Object(l), Value::Object(r)) => l.cmp(r),
			(l, r) => l.type_rank().cmp(&r.type_rank()),
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => f.write_str("null"),
			Value::Boolean(b) => write!(f, "{b}"),
			Value::Number(n) => write!(f, "{n}"),
			Value::String(s) => write!(f, "{}", serde_json::Value::String(s.clone())),
			Value::Array(items) => {
				f.write_str("[")?;
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(",")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Value::Object(fields) => {
				f.write_str("{")?;
				for (idx, (name, value)) in fields.iter().enumerate() {
					if idx > 0 {
						f.write_str(",")?;
					}
					write!(f, "{}:{value}", serde_json::Value::String(name.clone()))?;
				}
				f.write_str("}")
			}
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Boolean(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::number(v as f64)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::number(v)
	}
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		Value::number(v as f64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::number(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::String(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::String(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Array(v)
	}
}
