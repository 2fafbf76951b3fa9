// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{alloc::Layout, ptr::NonNull, str};

use bumpalo::Bump;

use crate::error::{Error, Result};

/// An arena-backed memory region.
///
/// The host owns two kinds of regions the probe cares about: a
/// transaction-scoped region that outlives every execution of the enclosing
/// transaction (truncated statement copies go there), and call-scoped regions
/// reclaimed when the current call returns (snapshot payloads go there).
/// Allocation takes `&self`; only [`reset`](Region::reset) requires exclusive
/// access, which is exactly when the region's scope ends.
pub struct Region {
	bump: Bump,
}

impl Region {
	pub fn new() -> Self {
		Self {
			bump: Bump::new(),
		}
	}

	/// Fallible raw allocation. Exhaustion is reported, not aborted on,
	/// because oversize statement texts can request copies of arbitrary
	/// size.
	pub(crate) fn try_alloc_raw(&self, len: usize) -> Result<NonNull<u8>> {
		let layout = Layout::array::<u8>(len).map_err(|_| Error::AllocationFailed {
			requested: len,
		})?;
		self.bump.try_alloc_layout(layout).map_err(|_| Error::AllocationFailed {
			requested: len,
		})
	}

	/// Copy `bytes` into the region as text. Statement text is stored as
	/// raw bytes and may have been clipped mid code point, so the copy is
	/// lossy where the input is not valid UTF-8.
	pub fn alloc_text_lossy(&self, bytes: &[u8]) -> &str {
		match str::from_utf8(bytes) {
			Ok(text) => self.bump.alloc_str(text),
			Err(_) => self.bump.alloc_str(&String::from_utf8_lossy(bytes)),
		}
	}

	/// Bytes handed out by this region so far.
	pub fn allocated_bytes(&self) -> usize {
		self.bump.allocated_bytes()
	}

	/// Reclaim every allocation at once. The host calls this when the
	/// region's scope ends; anything still pointing into the region must
	/// have been dropped first.
	pub fn reset(&mut self) {
		self.bump.reset();
	}

	pub(crate) fn bump(&self) -> &Bump {
		&self.bump
	}
}

impl Default for Region {
	fn default() -> Self {
		Self::new()
	}
}
