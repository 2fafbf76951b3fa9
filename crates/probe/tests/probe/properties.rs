// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::rc::Rc;

use proptest::prelude::*;
use querystack_core::{MAX_DEPTH, Result, TRUNCATE_LIMIT, XactEvent};
use querystack_probe::QueryStackProbe;
use querystack_testing::TestEngine;

use crate::rows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailMode {
	None,
	Begin,
	End,
}

/// One node of a random execution tree.
#[derive(Debug, Clone)]
struct Stmt {
	fail: FailMode,
	children: Vec<Stmt>,
}

fn arb_fail() -> impl Strategy<Value = FailMode> {
	prop_oneof![
		8 => Just(FailMode::None),
		1 => Just(FailMode::Begin),
		1 => Just(FailMode::End),
	]
}

fn arb_stmt(with_failures: bool) -> impl Strategy<Value = Stmt> {
	let fail = if with_failures {
		arb_fail().boxed()
	} else {
		Just(FailMode::None).boxed()
	};
	let leaf = fail.clone().prop_map(|fail| Stmt {
		fail,
		children: vec![],
	});
	leaf.prop_recursive(4, 32, 4, move |inner| {
		(fail.clone(), prop::collection::vec(inner, 0..4)).prop_map(|(fail, children)| Stmt {
			fail,
			children,
		})
	})
}

fn node_count(stmts: &[Stmt]) -> usize {
	stmts.iter().map(|stmt| 1 + node_count(&stmt.children)).sum()
}

fn collect_failures(stmts: &[Stmt], texts: &[String], next: &mut usize, engine: &mut TestEngine) {
	for stmt in stmts {
		let text = texts[*next].clone();
		*next += 1;
		match stmt.fail {
			FailMode::Begin => engine.inject_begin_failure(text),
			FailMode::End => engine.inject_end_failure(text),
			FailMode::None => {}
		}
		collect_failures(&stmt.children, texts, next, engine);
	}
}

fn execute(engine: &TestEngine, stmts: &[Stmt], texts: &[String], next: &mut usize) -> Result<()> {
	for stmt in stmts {
		let text = &texts[*next];
		*next += 1;
		engine.run(text.as_bytes(), |engine| execute(engine, &stmt.children, texts, &mut *next))?;
	}
	Ok(())
}

fn setup(tree: &[Stmt], texts: &[String]) -> (TestEngine, Rc<QueryStackProbe>) {
	let mut engine = TestEngine::new();
	collect_failures(tree, texts, &mut 0, &mut engine);
	let probe = QueryStackProbe::new(engine.backend().clone());
	QueryStackProbe::install(&probe, &mut engine.hooks, &engine.xact).unwrap();
	(engine, probe)
}

fn statement_texts(count: usize) -> Vec<String> {
	(0..count).map(|i| format!("SELECT q{i}")).collect()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn prop_matched_events_drain_the_stack(tree in prop::collection::vec(arb_stmt(false), 0..4)) {
		let texts = statement_texts(node_count(&tree));
		let (engine, probe) = setup(&tree, &texts);

		let outcome = execute(&engine, &tree, &texts, &mut 0);
		prop_assert!(outcome.is_ok());
		prop_assert_eq!(probe.depth(), 0);
		prop_assert!(rows(&probe, 0).is_empty());
	}

	#[test]
	fn prop_error_unwind_reconciles_to_empty(tree in prop::collection::vec(arb_stmt(true), 0..4)) {
		let texts = statement_texts(node_count(&tree));
		let (mut engine, probe) = setup(&tree, &texts);

		// Failures may or may not fire depending on where they sit.
		let outcome = execute(&engine, &tree, &texts, &mut 0);
		if outcome.is_ok() {
			prop_assert_eq!(probe.depth(), 0);
		}

		// Whatever happened, the terminal event restores the invariant.
		engine.end_transaction(XactEvent::Abort);
		prop_assert_eq!(probe.depth(), 0);
		prop_assert!(rows(&probe, 0).is_empty());
	}

	#[test]
	fn prop_snapshot_skip_algebra(depth in 0usize..120, skip in -10i32..150) {
		let texts = statement_texts(depth);
		let (engine, probe) = setup(&[], &texts);

		for text in &texts {
			engine.begin(text.as_bytes()).unwrap();
		}

		let recorded = depth.min(MAX_DEPTH);
		let clamped = skip.clamp(0, MAX_DEPTH as i32) as usize;
		let snapshot = rows(&probe, skip);
		prop_assert_eq!(snapshot.len(), recorded.saturating_sub(clamped));
		for (i, (frame_number, text)) in snapshot.iter().enumerate() {
			prop_assert_eq!(*frame_number as usize, i);
			prop_assert_eq!(text, &texts[i]);
		}

		for text in texts.iter().rev() {
			engine.end(text.as_bytes()).unwrap();
		}
		prop_assert_eq!(probe.depth(), 0);
	}

	#[test]
	fn prop_truncation_boundary(extra in 0usize..2048) {
		let texts = Vec::new();
		let (mut engine, probe) = setup(&[], &texts);

		let len = TRUNCATE_LIMIT - 1024 + extra;
		let text = vec![b'v'; len];
		engine.begin(&text).unwrap();

		let snapshot = rows(&probe, 0);
		let recorded = snapshot[0].1.as_bytes();
		if len <= TRUNCATE_LIMIT {
			prop_assert_eq!(recorded, &text[..]);
		} else {
			prop_assert_eq!(recorded.len(), TRUNCATE_LIMIT + "... truncated".len());
			prop_assert_eq!(&recorded[..TRUNCATE_LIMIT], &text[..TRUNCATE_LIMIT]);
			prop_assert!(recorded.ends_with(b"... truncated"));
		}

		engine.end(&text).unwrap();
		engine.end_transaction(XactEvent::Commit);
		prop_assert_eq!(probe.depth(), 0);
	}
}
