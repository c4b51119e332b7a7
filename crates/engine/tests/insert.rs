// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::sync::Arc;

use systable_core::{Durability, Env, Function, ReturnChanges, UserContext};
use systable_engine::{ConflictBehavior, Error, TableConfig, VirtualTable, prepare_inserts};
use systable_testing::MemoryBackend;
use systable_type::Value;

fn existing() -> Value {
	Value::object([("id", Value::from(1)), ("x", Value::from(1))])
}

fn table(backend: &Arc<MemoryBackend>) -> VirtualTable {
	VirtualTable::new("stats", backend.clone(), TableConfig::default()).unwrap()
}

fn admin() -> Env {
	Env::new(UserContext::admin())
}

fn field(datum: &Value, name: &str) -> Value {
	datum.get_field(name).cloned().unwrap_or(Value::Null)
}

async fn insert_one(backend: &Arc<MemoryBackend>, row: Value, conflict: ConflictBehavior) -> Value {
	table(backend)
		.batched_insert(&admin(), vec![row], vec![false], conflict, ReturnChanges::No, Durability::Soft)
		.await
		.unwrap()
}

#[tokio::test]
async fn test_conflict_error_policy() {
	let backend = Arc::new(MemoryBackend::new("id").with_rows([existing()]));
	let insert = Value::object([("id", Value::from(1)), ("x", Value::from(2))]);

	let datum = insert_one(&backend, insert.clone(), ConflictBehavior::Error).await;

	assert_eq!(field(&datum, "errored"), Value::from(1));
	let expected = Error::Conflict {
		primary_key: "id".to_string(),
		old: existing(),
		new: insert,
	};
	assert_eq!(field(&datum, "first_error"), Value::from(expected.to_string()));
	assert_eq!(backend.write_count(), 0);
	assert_eq!(backend.get(&Value::from(1)), Some(existing()));
}

#[tokio::test]
async fn test_conflict_replace_policy() {
	let backend = Arc::new(MemoryBackend::new("id").with_rows([existing()]));
	let insert = Value::object([("id", Value::from(1)), ("x", Value::from(2))]);

	let datum = insert_one(&backend, insert.clone(), ConflictBehavior::Replace).await;

	assert_eq!(field(&datum, "replaced"), Value::from(1));
	assert_eq!(backend.get(&Value::from(1)), Some(insert));
}

#[tokio::test]
async fn test_conflict_update_policy_merges() {
	let backend = Arc::new(MemoryBackend::new("id").with_rows([existing()]));
	let insert = Value::object([("id", Value::from(1)), ("y", Value::from(3))]);

	let datum = insert_one(&backend, insert, ConflictBehavior::Update).await;

	assert_eq!(field(&datum, "replaced"), Value::from(1));
	assert_eq!(
		backend.get(&Value::from(1)),
		Some(Value::object([("id", Value::from(1)), ("x", Value::from(1)), ("y", Value::from(3))]))
	);
}

#[tokio::test]
async fn test_conflict_custom_policy() {
	let backend = Arc::new(MemoryBackend::new("id").with_rows([existing()]));
	let insert = Value::object([("id", Value::from(1)), ("x", Value::from(5))]);
	let keep_larger = Function::new(|args| {
		let x = |row: &Value| row.get_field("x").and_then(Value::as_f64).unwrap_or(0.0);
		if x(&args[2]) > x(&args[1]) {
			Ok(args[2].clone())
		} else {
			Ok(args[1].clone())
		}
	});

	let datum = insert_one(&backend, insert.clone(), ConflictBehavior::Custom(keep_larger.clone())).await;
	assert_eq!(field(&datum, "replaced"), Value::from(1));
	assert_eq!(backend.get(&Value::from(1)), Some(insert.clone()));

	let smaller = Value::object([("id", Value::from(1)), ("x", Value::from(0))]);
	let datum = insert_one(&backend, smaller, ConflictBehavior::Custom(keep_larger)).await;
	assert_eq!(field(&datum, "unchanged"), Value::from(1));
	assert_eq!(backend.get(&Value::from(1)), Some(insert));
}

#[tokio::test]
async fn test_custom_policy_cannot_change_key() {
	let backend = Arc::new(MemoryBackend::new("id").with_rows([existing()]));
	let rekey = Function::new(|_| Ok(Value::object([("id", Value::from(2))])));

	let datum = insert_one(&backend, existing(), ConflictBehavior::Custom(rekey)).await;

	assert_eq!(field(&datum, "errored"), Value::from(1));
	assert_eq!(backend.write_count(), 0);
}

#[tokio::test]
async fn test_insert_without_collision() {
	let backend = Arc::new(MemoryBackend::new("id"));

	let datum = insert_one(&backend, existing(), ConflictBehavior::Error).await;

	assert_eq!(field(&datum, "inserted"), Value::from(1));
	assert_eq!(backend.get(&Value::from(1)), Some(existing()));
}

#[tokio::test]
async fn test_prepared_inserts_with_generated_keys() {
	let backend = Arc::new(MemoryBackend::new("id"));
	let table = table(&backend);
	let rows = vec![
		Value::object([("x", Value::from(1))]),
		Value::object([("id", Value::from("given")), ("x", Value::from(2))]),
		Value::object([("x", Value::from(3))]),
	];

	let prepared = prepare_inserts(table.primary_key(), rows).unwrap();
	assert_eq!(prepared.autogenerated, vec![true, false, true]);

	let datum = table
		.batched_insert(
			&admin(),
			prepared.rows,
			prepared.autogenerated,
			ConflictBehavior::Error,
			ReturnChanges::No,
			Durability::Hard,
		)
		.await
		.unwrap();

	assert_eq!(field(&datum, "inserted"), Value::from(3));
	assert_eq!(backend.len(), 3);
	for key in &prepared.generated_keys {
		let stored = backend.get(key).unwrap();
		assert_eq!(stored.get_field("id"), Some(key));
	}
	assert!(backend.get(&Value::from("given")).is_some());

	let mut written = backend.written();
	written.sort();
	let mut expected: Vec<(Value, bool)> = prepared.generated_keys.iter().map(|key| (key.clone(), true)).collect();
	expected.push((Value::from("given"), false));
	expected.sort();
	assert_eq!(written, expected);
}

#[tokio::test]
async fn test_malformed_batch_rejected_up_front() {
	let backend = Arc::new(MemoryBackend::new("id"));
	let table = table(&backend);
	let keyed = Value::object([("id", Value::from(1))]);
	let keyless = Value::object([("x", Value::from(1))]);

	let err = table
		.batched_insert(
			&admin(),
			vec![keyed.clone(), keyless],
			vec![false, false],
			ConflictBehavior::Error,
			false,
			Durability::Soft,
		)
		.await
		.unwrap_err();
	assert_eq!(err.code(), "VT_009");

	let err = table
		.batched_insert(&admin(), vec![keyed.clone()], vec![], ConflictBehavior::Error, false, Durability::Soft)
		.await
		.unwrap_err();
	assert_eq!(err.code(), "VT_009");

	let err = table
		.batched_insert(&admin(), vec![Value::from(1)], vec![false], ConflictBehavior::Error, false, Durability::Soft)
		.await
		.unwrap_err();
	assert_eq!(err.code(), "VT_009");

	assert_eq!(backend.read_count(), 0);
	assert!(backend.is_empty());
}

#[tokio::test]
async fn test_insert_requires_admin() {
	let backend = Arc::new(MemoryBackend::new("id"));
	let table = table(&backend);

	let err = table
		.batched_insert(
			&Env::new(UserContext::user()),
			vec![existing()],
			vec![false],
			ConflictBehavior::Replace,
			false,
			Durability::Soft,
		)
		.await
		.unwrap_err();

	assert_eq!(err.code(), "VT_001");
	assert!(backend.is_empty());
}
