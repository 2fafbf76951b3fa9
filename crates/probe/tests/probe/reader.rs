// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use querystack_core::{MAX_DEPTH, Region};
use querystack_probe::{ColumnType, ROUTINE_NAME, pg_query_stack, read_stack, routine_def};

use crate::{fixture, rows};

#[test]
fn test_skip_tail_trims_deepest_frames() {
	let (engine, probe) = fixture();

	for text in [b"A" as &[u8], b"B", b"C"] {
		engine.begin(text).unwrap();
	}

	assert_eq!(rows(&probe, 1), [(0, "A".to_string()), (1, "B".to_string())]);
	assert!(rows(&probe, 5).is_empty());
	assert_eq!(rows(&probe, -2), [(0, "A".to_string()), (1, "B".to_string()), (2, "C".to_string())]);
	assert!(rows(&probe, MAX_DEPTH as i32 + 100).is_empty());

	for text in [b"C" as &[u8], b"B", b"A"] {
		engine.end(text).unwrap();
	}
}

#[test]
fn test_empty_stack_reads_empty() {
	let (_engine, probe) = fixture();
	assert!(rows(&probe, 0).is_empty());
	assert!(rows(&probe, -1).is_empty());
}

#[test]
fn test_snapshot_is_point_in_time() {
	let (engine, probe) = fixture();

	engine.begin(b"A").unwrap();
	engine.begin(b"B").unwrap();

	let region = Region::new();
	let stream = read_stack(&probe, 0, &region);

	// The stack moves on; the captured stream must not.
	engine.end(b"B").unwrap();
	engine.begin(b"C").unwrap();

	let collected: Vec<_> = stream.map(|row| (row.frame_number, row.query_text.to_string())).collect();
	assert_eq!(collected, [(0, "A".to_string()), (1, "B".to_string())]);

	engine.end(b"C").unwrap();
	engine.end(b"A").unwrap();
}

#[test]
fn test_row_stream_is_exact_size() {
	let (engine, probe) = fixture();

	engine.begin(b"A").unwrap();
	engine.begin(b"B").unwrap();

	let region = Region::new();
	let mut stream = read_stack(&probe, 0, &region);
	assert_eq!(stream.len(), 2);
	stream.next();
	assert_eq!(stream.len(), 1);
	stream.next();
	assert_eq!(stream.len(), 0);
	assert!(stream.next().is_none());

	engine.end(b"B").unwrap();
	engine.end(b"A").unwrap();
}

#[test]
fn test_sql_adapter_defaults_null_to_zero() {
	let (engine, probe) = fixture();

	engine.begin(b"A").unwrap();

	let region = Region::new();
	let collected: Vec<_> = pg_query_stack(&probe, None, &region).map(|row| row.frame_number).collect();
	assert_eq!(collected, [0]);

	let region = Region::new();
	assert_eq!(pg_query_stack(&probe, Some(1), &region).count(), 0);

	engine.end(b"A").unwrap();
}

#[test]
fn test_routine_definition() {
	let def = routine_def();
	assert_eq!(def.name, ROUTINE_NAME);
	assert_eq!(def.args, [("skip_tail", ColumnType::Int4)]);
	assert_eq!(def.columns, [("frame_number", ColumnType::Int4), ("query_text", ColumnType::Text)]);
}
