// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::cell::Cell;

use querystack_core::{Error, Result};

/// Name of the session setting controlling whether the tracer observes
/// executions.
pub const SETTING_ENABLED: &str = "pg_query_stack.enabled";

/// Runtime-togglable probe settings, session scoped.
///
/// With tracing disabled both advice handlers reduce to pure delegation: no
/// frame is recorded, no memory is touched, and snapshots come back empty.
/// The toggle takes effect immediately, no restart involved.
pub struct Settings {
	enabled: Cell<bool>,
}

impl Settings {
	pub fn new() -> Self {
		Self {
			enabled: Cell::new(true),
		}
	}

	pub fn enabled(&self) -> bool {
		self.enabled.get()
	}

	pub fn set_enabled(&self, enabled: bool) {
		if self.enabled.get() != enabled {
			tracing::debug!(enabled, "query stack tracing toggled");
		}
		self.enabled.set(enabled);
	}

	/// Apply a host `SET` of one of this probe's settings.
	pub fn apply(&self, name: &str, value: &str) -> Result<()> {
		if name != SETTING_ENABLED {
			return Err(Error::UnknownSetting {
				name: name.into(),
			});
		}
		match value.to_ascii_lowercase().as_str() {
			"on" | "true" | "yes" | "1" => {
				self.set_enabled(true);
				Ok(())
			}
			"off" | "false" | "no" | "0" => {
				self.set_enabled(false);
				Ok(())
			}
			_ => Err(Error::InvalidSetting {
				name: name.into(),
				value: value.into(),
			}),
		}
	}
}

impl Default for Settings {
	fn default() -> Self {
		Self::new()
	}
}
