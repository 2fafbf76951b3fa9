// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cell::RefCell, rc::Rc};

use querystack_core::{
	BeginHandler, EndHandler, Error, ExecContext, ExecutorHooks, Region, Result, XactCallbacks, XactEvent,
};

use crate::backend::MockBackend;

/// Invocation counts of the standard executor entry points at the bottom of
/// the advice chain. Transparent handlers must keep these moving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardCalls {
	pub begin: usize,
	pub end: usize,
}

/// A miniature host engine driving the advice slots the way a backend would.
///
/// Statement texts passed to [`begin`](Self::begin) must stay alive until the
/// matching [`end`](Self::end) or the next terminal event, mirroring the
/// host's guarantee for execution-owned memory; [`run`](Self::run) gets this
/// right by construction.
pub struct TestEngine {
	backend: Rc<MockBackend>,
	pub hooks: ExecutorHooks,
	pub xact: XactCallbacks,
	txn_region: Region,
	calls: Rc<RefCell<StandardCalls>>,
}

impl TestEngine {
	pub fn new() -> Self {
		let calls = Rc::new(RefCell::new(StandardCalls::default()));
		let standard_begin: BeginHandler = {
			let calls = Rc::clone(&calls);
			Rc::new(move |_| {
				calls.borrow_mut().begin += 1;
				Ok(())
			})
		};
		let standard_end: EndHandler = {
			let calls = Rc::clone(&calls);
			Rc::new(move |_| {
				calls.borrow_mut().end += 1;
				Ok(())
			})
		};
		Self {
			backend: Rc::new(MockBackend::new()),
			hooks: ExecutorHooks::new(standard_begin, standard_end),
			xact: XactCallbacks::new(),
			txn_region: Region::new(),
			calls,
		}
	}

	pub fn backend(&self) -> &Rc<MockBackend> {
		&self.backend
	}

	pub fn standard_calls(&self) -> StandardCalls {
		*self.calls.borrow()
	}

	pub fn txn_region(&self) -> &Region {
		&self.txn_region
	}

	/// Fire the begin advice for one statement.
	pub fn begin(&self, text: &[u8]) -> Result<()> {
		self.hooks.dispatch_begin(&self.exec(text))
	}

	/// Fire the end advice for one statement.
	pub fn end(&self, text: &[u8]) -> Result<()> {
		self.hooks.dispatch_end(&self.exec(text))
	}

	/// Execute one statement: begin advice, nested body, end advice.
	///
	/// An error from any of the three unwinds immediately, the way a host
	/// error aborts the whole nest; the caller is then expected to deliver
	/// [`XactEvent::Abort`] via [`end_transaction`](Self::end_transaction).
	pub fn run(&self, text: &[u8], body: impl FnOnce(&Self) -> Result<()>) -> Result<()> {
		self.begin(text)?;
		body(self)?;
		self.end(text)
	}

	/// Execute one leaf statement with no nested calls.
	pub fn statement(&self, text: &[u8]) -> Result<()> {
		self.run(text, |_| Ok(()))
	}

	/// Deliver a non-terminal lifecycle event.
	pub fn fire_xact(&self, event: XactEvent) {
		self.xact.fire(event);
	}

	/// Deliver a transaction terminal event, then reclaim the transaction
	/// region the way the host does once subscribers have run.
	pub fn end_transaction(&mut self, event: XactEvent) {
		debug_assert!(event.is_terminal());
		tracing::trace!(?event, "delivering terminal event");
		self.xact.fire(event);
		self.txn_region.reset();
	}

	/// Chain a begin handler that fails for statements whose text equals
	/// `needle`. Install these before the probe so they sit downstream of
	/// it, where another probe's error would originate.
	pub fn inject_begin_failure(&mut self, needle: impl Into<Vec<u8>>) {
		let needle = needle.into();
		let prev: Rc<RefCell<Option<BeginHandler>>> = Rc::new(RefCell::new(None));
		let handler: BeginHandler = {
			let prev = Rc::clone(&prev);
			Rc::new(move |exec| {
				if exec.source_text == needle.as_slice() {
					return Err(injected("begin", &needle));
				}
				chain(&prev, exec)
			})
		};
		*prev.borrow_mut() = Some(self.hooks.install_begin(handler));
	}

	/// Chain an end handler that fails for statements whose text equals
	/// `needle`.
	pub fn inject_end_failure(&mut self, needle: impl Into<Vec<u8>>) {
		let needle = needle.into();
		let prev: Rc<RefCell<Option<EndHandler>>> = Rc::new(RefCell::new(None));
		let handler: EndHandler = {
			let prev = Rc::clone(&prev);
			Rc::new(move |exec| {
				if exec.source_text == needle.as_slice() {
					return Err(injected("end", &needle));
				}
				chain(&prev, exec)
			})
		};
		*prev.borrow_mut() = Some(self.hooks.install_end(handler));
	}

	/// Chain a begin handler that panics for statements whose text equals
	/// `needle`.
	pub fn inject_begin_panic(&mut self, needle: impl Into<Vec<u8>>) {
		let needle = needle.into();
		let prev: Rc<RefCell<Option<BeginHandler>>> = Rc::new(RefCell::new(None));
		let handler: BeginHandler = {
			let prev = Rc::clone(&prev);
			Rc::new(move |exec| {
				if exec.source_text == needle.as_slice() {
					panic!("injected begin panic for {}", String::from_utf8_lossy(&needle));
				}
				chain(&prev, exec)
			})
		};
		*prev.borrow_mut() = Some(self.hooks.install_begin(handler));
	}

	fn exec<'a>(&'a self, text: &'a [u8]) -> ExecContext<'a> {
		ExecContext {
			source_text: text,
			flags: 0,
			txn_region: &self.txn_region,
		}
	}
}

impl Default for TestEngine {
	fn default() -> Self {
		Self::new()
	}
}

fn injected(advice: &str, needle: &[u8]) -> Error {
	Error::host(format!("injected {advice} failure for {}", String::from_utf8_lossy(needle)))
}

// BeginHandler and EndHandler share one underlying type, so one helper
// serves both chains.
fn chain(prev: &Rc<RefCell<Option<BeginHandler>>>, exec: &ExecContext<'_>) -> Result<()> {
	let chained = prev.borrow().clone();
	match chained {
		Some(handler) => (*handler)(exec),
		None => Ok(()),
	}
}
