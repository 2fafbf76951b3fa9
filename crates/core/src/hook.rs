// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{mem, rc::Rc};

use crate::{error::Result, region::Region};

/// Execution handle the host passes to both advice points of one statement
/// execution.
///
/// `source_text` stays valid until the matching end event fires;
/// `txn_region` outlives the enclosing transaction. Both guarantees come
/// from the host and are what lets frames borrow instead of copy.
pub struct ExecContext<'exec> {
	pub source_text: &'exec [u8],
	pub flags: u32,
	pub txn_region: &'exec Region,
}

/// Handler installed at the execution-begin advice point.
pub type BeginHandler = Rc<dyn Fn(&ExecContext<'_>) -> Result<()>>;

/// Handler installed at the execution-end advice point.
pub type EndHandler = Rc<dyn Fn(&ExecContext<'_>) -> Result<()>>;

/// The backend's two executor advice slots.
///
/// Each slot always holds a head handler; the chain bottoms out at the
/// host's standard executor entry points supplied at construction. Installing
/// a probe swaps the head and hands back the previous one, which the probe
/// must delegate to from its own handler.
pub struct ExecutorHooks {
	begin: BeginHandler,
	end: EndHandler,
}

impl ExecutorHooks {
	pub fn new(standard_begin: BeginHandler, standard_end: EndHandler) -> Self {
		Self {
			begin: standard_begin,
			end: standard_end,
		}
	}

	/// Invoke the begin advice chain for one execution.
	pub fn dispatch_begin(&self, exec: &ExecContext<'_>) -> Result<()> {
		(*self.begin)(exec)
	}

	/// Invoke the end advice chain for one execution.
	pub fn dispatch_end(&self, exec: &ExecContext<'_>) -> Result<()> {
		(*self.end)(exec)
	}

	/// Swap in a new begin head, returning the previous head so the caller
	/// can chain to it.
	pub fn install_begin(&mut self, handler: BeginHandler) -> BeginHandler {
		mem::replace(&mut self.begin, handler)
	}

	/// Swap in a new end head, returning the previous head.
	pub fn install_end(&mut self, handler: EndHandler) -> EndHandler {
		mem::replace(&mut self.end, handler)
	}

	/// Put a previously returned begin head back (probe unload).
	pub fn restore_begin(&mut self, handler: BeginHandler) {
		self.begin = handler;
	}

	/// Put a previously returned end head back (probe unload).
	pub fn restore_end(&mut self, handler: EndHandler) {
		self.end = handler;
	}
}
