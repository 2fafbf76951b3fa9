// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Core data structures and host contracts for the query stack probe.
//!
//! This crate provides:
//! - [`QueryStack`]: the per-backend stack of in-flight statement frames
//! - [`Region`]: arena-backed memory regions with transaction or call scope
//! - [`ExecutorHooks`]: the executor advice slots with previous-handler chaining
//! - [`XactCallbacks`]: the transaction lifecycle channel
//!
//! Everything in here is per-backend and single-threaded. None of the types
//! are `Send` or `Sync`; a backend owns its stack, its advice slots, and its
//! lifecycle registrar, and no other thread ever touches them. The probe in
//! `querystack-probe` wires these pieces into a host.

pub mod backend;
pub mod error;
pub mod event;
pub mod frame;
pub mod hook;
pub mod region;
pub mod stack;

pub use backend::{Backend, HOST_ABI_VERSION, PROBE_MAGIC};
pub use error::{Error, Result};
pub use event::{XactCallback, XactCallbacks, XactEvent, XactToken};
pub use frame::{Frame, MAX_DEPTH, TRUNCATE_LIMIT, TRUNCATED_SUFFIX, UNNAMED_QUERY};
pub use hook::{BeginHandler, EndHandler, ExecContext, ExecutorHooks};
pub use region::Region;
pub use stack::{PushOutcome, QueryStack};
