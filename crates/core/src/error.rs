// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The truncated copy of an oversize statement text could not be
	/// allocated. The stack is unchanged when this is returned.
	#[error("failed to allocate {requested} bytes for a truncated query text copy")]
	AllocationFailed {
		requested: usize,
	},

	#[error("query stack advice points are already installed in this backend")]
	AlreadyInstalled,

	#[error("host ABI version {host} does not match probe ABI version {probe}")]
	AbiMismatch {
		host: u32,
		probe: u32,
	},

	#[error("unrecognized setting `{name}`")]
	UnknownSetting {
		name: String,
	},

	#[error("setting `{name}` expects a boolean, got `{value}`")]
	InvalidSetting {
		name: String,
		value: String,
	},

	/// An error raised by a downstream handler in the advice chain. The
	/// probe re-propagates these without modification.
	#[error("{0}")]
	Host(Box<dyn error::Error + 'static>),
}

impl Error {
	/// Wrap a host-originated failure for transport through the chain.
	pub fn host<E>(err: E) -> Self
	where
		E: Into<Box<dyn error::Error + 'static>>,
	{
		Error::Host(err.into())
	}
}
