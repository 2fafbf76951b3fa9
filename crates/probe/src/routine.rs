// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use querystack_core::Region;

use crate::{
	probe::QueryStackProbe,
	reader::{QueryStackRows, read_stack},
};

/// SQL name the set-returning routine is registered under.
pub const ROUTINE_NAME: &str = "pg_query_stack";

/// Column types appearing in the routine's signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
	Int4,
	Text,
}

/// Catalog registration record for the read surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineDef {
	pub name: &'static str,
	pub args: &'static [(&'static str, ColumnType)],
	pub columns: &'static [(&'static str, ColumnType)],
}

/// Definition of `pg_query_stack(skip_tail int4)` returning
/// `(frame_number int4, query_text text)`.
pub fn routine_def() -> RoutineDef {
	RoutineDef {
		name: ROUTINE_NAME,
		args: &[("skip_tail", ColumnType::Int4)],
		columns: &[("frame_number", ColumnType::Int4), ("query_text", ColumnType::Text)],
	}
}

/// `pg_query_stack(skip_tail int)`, the SQL adapter over [`read_stack`].
/// A null `skip_tail` defaults to 0; the host supplies the call-scoped
/// region it will reclaim when the routine finishes emitting rows.
pub fn pg_query_stack<'r>(
	probe: &QueryStackProbe,
	skip_tail: Option<i32>,
	call_region: &'r Region,
) -> QueryStackRows<'r> {
	read_stack(probe, skip_tail.unwrap_or(0), call_region)
}
