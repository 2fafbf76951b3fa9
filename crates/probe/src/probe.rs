// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{cell::RefCell, marker::PhantomData, rc::Rc};

use querystack_core::{
	Backend, BeginHandler, EndHandler, Error, ExecContext, ExecutorHooks, HOST_ABI_VERSION, PROBE_MAGIC,
	QueryStack, Region, Result, XactCallbacks, XactToken,
};

use crate::settings::Settings;

/// The per-backend query stack probe.
///
/// One probe serves one backend. All state lives behind a `RefCell` and is
/// only ever touched from that backend's thread; handler delegation happens
/// with no borrow held, so nested executions re-enter cleanly.
pub struct QueryStackProbe {
	pub(crate) backend: Rc<dyn Backend>,
	settings: Settings,
	pub(crate) state: RefCell<ProbeState>,
	// Marker to prevent Send and Sync
	_not_send_sync: PhantomData<*const ()>,
}

pub(crate) struct ProbeState {
	pub(crate) stack: QueryStack,
	pub(crate) prev_begin: Option<BeginHandler>,
	pub(crate) prev_end: Option<EndHandler>,
	pub(crate) xact_token: Option<XactToken>,
}

impl QueryStackProbe {
	/// Create a probe for `backend`. Nothing is recorded until
	/// [`install`](Self::install) wires it into the advice slots.
	pub fn new(backend: Rc<dyn Backend>) -> Rc<Self> {
		Rc::new(Self {
			backend,
			settings: Settings::new(),
			state: RefCell::new(ProbeState {
				stack: QueryStack::new(),
				prev_begin: None,
				prev_end: None,
				xact_token: None,
			}),
			_not_send_sync: PhantomData,
		})
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Recorded nesting depth right now.
	pub fn depth(&self) -> usize {
		self.state.borrow().stack.depth()
	}

	/// Chain `probe` into both advice slots and subscribe it to the
	/// transaction lifecycle. The previous heads are saved and delegated
	/// to on every event. Refuses a second install and hosts built against
	/// a different advice-point ABI.
	pub fn install(probe: &Rc<Self>, hooks: &mut ExecutorHooks, xact: &XactCallbacks) -> Result<()> {
		if probe.state.borrow().prev_begin.is_some() {
			return Err(Error::AlreadyInstalled);
		}
		let host = probe.backend.abi_version();
		if host != HOST_ABI_VERSION {
			return Err(Error::AbiMismatch {
				host,
				probe: HOST_ABI_VERSION,
			});
		}

		let begin: BeginHandler = {
			let probe = Rc::clone(probe);
			Rc::new(move |exec: &ExecContext<'_>| probe.on_begin(exec))
		};
		let end: EndHandler = {
			let probe = Rc::clone(probe);
			Rc::new(move |exec: &ExecContext<'_>| probe.on_end(exec))
		};
		let reconcile = {
			let probe = Rc::clone(probe);
			Rc::new(move |event| probe.on_xact(event))
		};

		let mut state = probe.state.borrow_mut();
		state.prev_begin = Some(hooks.install_begin(begin));
		state.prev_end = Some(hooks.install_end(end));
		state.xact_token = Some(xact.register(reconcile));

		tracing::debug!(magic = PROBE_MAGIC, abi = HOST_ABI_VERSION, "query stack probe installed");
		Ok(())
	}

	/// Restore the previous advice heads and drop the lifecycle
	/// subscription. Any frames still recorded are discarded.
	pub fn uninstall(&self, hooks: &mut ExecutorHooks, xact: &XactCallbacks) {
		let mut state = self.state.borrow_mut();
		if let Some(prev) = state.prev_begin.take() {
			hooks.restore_begin(prev);
		}
		if let Some(prev) = state.prev_end.take() {
			hooks.restore_end(prev);
		}
		if let Some(token) = state.xact_token.take() {
			xact.unregister(token);
		}
		state.stack.clear();
		tracing::debug!("query stack probe uninstalled");
	}

	/// Copy the current stack, minus the deepest `skip_tail` frames, into
	/// `region`.
	pub(crate) fn snapshot<'r>(
		&self,
		skip_tail: usize,
		region: &'r Region,
	) -> bumpalo::collections::Vec<'r, &'r str> {
		self.state.borrow().stack.snapshot(skip_tail, region)
	}
}
