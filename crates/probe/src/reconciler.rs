// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use querystack_core::XactEvent;

use crate::probe::QueryStackProbe;

impl QueryStackProbe {
	/// Transaction lifecycle callback.
	///
	/// Terminal events clear the whole stack. This is the safety net for
	/// executions that began but never reached their end event, e.g. a
	/// nested call failing during parse or plan: their frames sit on the
	/// stack until the host unwinds to transaction end and fires abort.
	/// Owned texts live in the transaction-scoped region the host is about
	/// to reclaim, and borrowed texts may already be gone, so the clear
	/// only drops references and resets the depth. It cannot fail.
	pub(crate) fn on_xact(&self, event: XactEvent) {
		if !event.is_terminal() {
			return;
		}
		let mut state = self.state.borrow_mut();
		let depth = state.stack.depth();
		if depth > 0 {
			if event == XactEvent::Commit {
				// Leftover frames on the abort path are routine; on
				// commit they mean end events went missing.
				tracing::warn!(depth, "query frames still recorded at commit");
			} else {
				tracing::debug!(depth, "clearing in-flight query frames at transaction abort");
			}
		}
		state.stack.clear();
	}
}
