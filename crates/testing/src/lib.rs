// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

pub mod memory;
pub mod util;

pub use memory::MemoryBackend;
pub use util::{
	trace::init_tracing,
	wait::{wait_for, wait_for_condition},
};
