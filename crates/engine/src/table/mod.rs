// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! A system dataset exposed through the row-oriented table interface.
//!
//! [`VirtualTable`] owns no data. Point reads, scans and change feeds are
//! delegated to the [`Backend`] after access checks; writes run a guarded
//! read-modify-write cycle per row (see `update`) fanned out by the batched
//! orchestrator (see `write`).

use std::sync::Arc;

use systable_core::{Backend, Env};
use systable_type::{Error, Result, return_error};
use uuid::Uuid;

use crate::config::TableConfig;

mod read;
mod update;
mod write;

pub use read::NearestQuery;

const ADMIN_ONLY: &str = "Only administrators may access system tables.";

pub struct VirtualTable {
	name: String,
	primary_key: String,
	backend: Arc<dyn Backend>,
	config: TableConfig,
}

impl VirtualTable {
	pub fn new(name: impl Into<String>, backend: Arc<dyn Backend>, config: TableConfig) -> Result<Self> {
		config.validate()?;
		let primary_key = backend.primary_key_name().to_string();
		Ok(Self {
			name: name.into(),
			primary_key,
			backend,
			config,
		})
	}

	/// System tables have no stored identity.
	pub fn id(&self) -> Uuid {
		Uuid::nil()
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn primary_key(&self) -> &str {
		&self.primary_key
	}

	pub fn config(&self) -> &TableConfig {
		&self.config
	}

	pub(crate) fn check_permissions(&self, env: &Env) -> Result<()> {
		if self.config.check_permissions && !env.is_admin() {
			return_error!(Error::permission(ADMIN_ONLY));
		}
		Ok(())
	}
}

impl std::fmt::Debug for VirtualTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VirtualTable")
			.field("name", &self.name)
			.field("primary_key", &self.primary_key)
			.field("config", &self.config)
			.finish()
	}
}
