#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Viewport-aware, two-tier aggregation and ranking engine.
//!
//! Given a map viewport and a viewer role, the engine decides whether to
//! show consolidated city bubbles or individual location pins, applies
//! role-aware visibility rules, orders results by community votes, and
//! paginates them. It holds no durable state: city bubbles and ranked
//! pages are recomputed from the last fetched location set on every
//! viewport or filter change.
//!
//! The engine is single-threaded and sans-IO. External fetches and vote
//! mutations go through the [`source`] boundary traits; [`session::MapSession`]
//! tags each outbound fetch with a generation so superseded results are
//! discarded on arrival (last-viewport-wins) instead of applied out of
//! order.

pub mod config;
pub mod page;
pub mod rank;
pub mod session;
pub mod source;
pub mod tier;
pub mod visibility;

use thiserror::Error;

/// Errors produced by the engine itself.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A boundary fetch or mutation failed.
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),

    /// A vote was requested for a location the engine has not fetched.
    #[error("Unknown location: {id}")]
    UnknownLocation {
        /// The unrecognized location id.
        id: String,
    },
}
