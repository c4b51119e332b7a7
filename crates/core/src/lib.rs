// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod backend;
pub mod change;
pub mod env;
pub mod exclusive;
pub mod function;
pub mod interrupt;
pub mod options;
pub mod scan;

pub use backend::{Backend, ChangeStream, RowStream};
pub use change::{ChangeEvent, ChangeSpec};
pub use env::{Env, Limits, UserContext};
pub use exclusive::{ExclusiveGuard, ExclusiveSection};
pub use function::{Function, RowFunction, RowFunctionRef};
pub use interrupt::CancellationToken;
pub use options::{Durability, ReturnChanges};
pub use scan::{ScanSpec, Sorting};
pub use systable_type::{Error, Result, Row, Value};
