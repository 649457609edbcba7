//! Smoothed profit recognition for yield-bearing vault balances.
//!
//! An external (possibly rebasing) asset can change a vault's balance in
//! sudden steps. This crate turns those steps into a smoothly increasing
//! reported balance: profit observed since the last commit is released
//! gradually over a configurable window, losses are passed through
//! immediately.
//!
//! # Components
//!
//! - [`observe`] - Unrecognized profit above the committed baseline
//! - [`compute_smoothed`] - Pure smoothing calculator with window rollover
//! - [`AccountingState`] - Persistent bookkeeping with commit and view
//! - [`SmoothingArgs`] / [`SmoothingConfig`] - Configuration
//!
//! The vault component wiring these to an asset source lives in a sibling
//! crate.

mod args;
mod config;
mod constants;
mod error;
mod observer;
mod smoothing;
mod state;

pub use args::SmoothingArgs;
pub use config::{DefaultSmoothingConfig, SmoothingConfig};
pub use error::AccountingError;
pub use observer::observe;
pub use smoothing::{SmoothingOutcome, compute_smoothed};
pub use state::{AccountingSnapshot, AccountingState, SyncOutcome};
