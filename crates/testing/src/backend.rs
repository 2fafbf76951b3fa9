// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cell::Cell;

use querystack_core::{Backend, HOST_ABI_VERSION};

/// Backend stand-in with toggleable parallel-worker state and a forgeable
/// ABI version.
pub struct MockBackend {
	parallel_worker: Cell<bool>,
	abi_version: Cell<u32>,
}

impl MockBackend {
	pub fn new() -> Self {
		Self {
			parallel_worker: Cell::new(false),
			abi_version: Cell::new(HOST_ABI_VERSION),
		}
	}

	pub fn set_parallel_worker(&self, parallel: bool) {
		self.parallel_worker.set(parallel);
	}

	/// Pretend the host was built against a different advice-point ABI.
	pub fn set_abi_version(&self, version: u32) {
		self.abi_version.set(version);
	}
}

impl Backend for MockBackend {
	fn is_parallel_worker(&self) -> bool {
		self.parallel_worker.get()
	}

	fn abi_version(&self) -> u32 {
		self.abi_version.get()
	}
}

impl Default for MockBackend {
	fn default() -> Self {
		Self::new()
	}
}
