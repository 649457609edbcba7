//! Test utilities and mocks for sluice crates.
//!
//! - [`MockAsset`] - In-memory rebasing asset with shared balances
//! - [`ReentrantAsset`] - Asset that calls back into the caller while answering
//! - [`RecordingEvents`] - Event sink that keeps everything it receives
//! - [`ReentrantEvents`] - Recording sink that calls back into the caller
//! - [`fixtures`] - Addresses, timestamps and vault builders

mod asset;
mod events;
pub mod fixtures;

pub use asset::{MockAsset, ReentrantAsset};
pub use events::{RecordingEvents, ReentrantEvents};
