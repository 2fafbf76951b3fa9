// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

/// Transaction lifecycle event tags delivered to subscribers.
///
/// The host fires these on its own schedule; the probe only reacts to the
/// two terminal tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XactEvent {
	/// Commit processing is about to start. Not terminal.
	PreCommit,
	/// The transaction committed. Terminal.
	Commit,
	/// The transaction was prepared for two-phase commit. Not terminal.
	Prepare,
	/// The transaction aborted. Terminal.
	Abort,
}

impl XactEvent {
	/// Commit and abort are delivered exactly once per transaction, after
	/// every owed end event either fired or was skipped by an error.
	pub fn is_terminal(self) -> bool {
		matches!(self, XactEvent::Commit | XactEvent::Abort)
	}
}

/// Callback registered on the lifecycle channel. Must not fail; the host
/// gives subscribers no way to veto or signal from a terminal event.
pub type XactCallback = Rc<dyn Fn(XactEvent)>;

/// Handle returned by [`XactCallbacks::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XactToken(u64);

/// Per-backend registrar for transaction lifecycle callbacks.
pub struct XactCallbacks {
	callbacks: RefCell<Vec<(XactToken, XactCallback)>>,
	next_token: Cell<u64>,
}

impl XactCallbacks {
	pub fn new() -> Self {
		Self {
			callbacks: RefCell::new(Vec::new()),
			next_token: Cell::new(0),
		}
	}

	pub fn register(&self, callback: XactCallback) -> XactToken {
		let token = XactToken(self.next_token.get());
		self.next_token.set(token.0 + 1);
		self.callbacks.borrow_mut().push((token, callback));
		token
	}

	pub fn unregister(&self, token: XactToken) {
		self.callbacks.borrow_mut().retain(|(t, _)| *t != token);
	}

	/// Deliver one lifecycle event to every subscriber in registration
	/// order. The subscriber list is sampled up front so callbacks may
	/// register or unregister while the event is being delivered.
	pub fn fire(&self, event: XactEvent) {
		let callbacks: Vec<XactCallback> =
			self.callbacks.borrow().iter().map(|(_, callback)| Rc::clone(callback)).collect();
		for callback in callbacks {
			(*callback)(event);
		}
	}
}

impl Default for XactCallbacks {
	fn default() -> Self {
		Self::new()
	}
}
