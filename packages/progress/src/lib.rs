#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Progress reporting for the long-running pipeline steps.
//!
//! Matching listings and enriching neighborhoods both walk every record
//! once. They report through [`ProgressCallback`] so the library crates
//! never depend on a terminal rendering backend; the CLI plugs in
//! `indicatif` bars and tests use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a pipeline step.
///
/// A step calls [`set_total`](Self::set_total) once it knows how many
/// listings or neighborhoods it will visit, then [`inc`](Self::inc) per
/// record, then [`finish`](Self::finish). Steps that cannot count their
/// work (the Overpass fetch) only set a message and clear at the end.
pub trait ProgressCallback: Send + Sync {
    /// Number of records the step will visit.
    fn set_total(&self, total: u64);

    /// Marks `delta` more records as visited.
    fn inc(&self, delta: u64);

    /// Replaces the label describing what the step is doing.
    fn set_message(&self, msg: String);

    /// Ends the step, leaving `msg` as its final status line.
    fn finish(&self, msg: String);

    /// Ends the step without leaving a status line behind.
    fn finish_and_clear(&self);
}

/// Discards every update; used by tests and non-interactive callers.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}

/// A [`NullProgress`] behind the shared handle the library steps take.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
