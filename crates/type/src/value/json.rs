// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Value;

impl From<serde_json::Value> for Value {
	fn from(json: serde_json::Value) -> Self {
		match json {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Boolean(b),
			serde_json::Value::Number(n) => n.as_f64().map(Value::number).unwrap_or(Value::Null),
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(fields) => {
				Value::Object(fields.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

impl From<&Value> for serde_json::Value {
	fn from(value: &Value) -> Self {
		match value {
			Value::Null => serde_json::Value::Null,
			Value::Boolean(b) => serde_json::Value::Bool(*b),
			Value::Number(n) => {
				let n = n.value();
				if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
					serde_json::Value::from(n as i64)
				} else {
					serde_json::Number::from_f64(n)
						.map(serde_json::Value::Number)
						.unwrap_or(serde_json::Value::Null)
				}
			}
			Value::String(s) => serde_json::Value::String(s.clone()),
			Value::Array(items) => serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect()),
			Value::Object(fields) => serde_json::Value::Object(
				fields.iter().map(|(k, v)| (k.clone(), serde_json::Value::from(v))).collect(),
			),
		}
	}
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		serde_json::Value::from(&value)
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serde_json::Value::from(self).serialize(serializer)
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		serde_json::Value::deserialize(deserializer).map(Value::from)
	}
}
