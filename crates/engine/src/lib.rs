// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use conflict::ConflictBehavior;
pub use config::{MAX_PARALLEL_OPS, TableConfig};
pub use insert::{PreparedInserts, prepare_inserts};
pub use replace::DB_FIELD;
pub use stats::{Outcome, RowOutcome, Stats};
pub use systable_type::{Error, Result};
pub use table::{NearestQuery, VirtualTable};

mod config;
mod conflict;
mod insert;
mod replace;
mod stats;
mod table;
