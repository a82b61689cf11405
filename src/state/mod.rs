//! State module for tracking lookup progress
//!
//! This module provides the per-certificate state machine driven by the item
//! worker.
//!
//! # Components
//!
//! - `ItemPhase`: The phase of a single lookup (pending, attempting, retry wait, terminal)
//! - `AttemptState`: Attempt counter and last failure for the lookup in progress

mod item_state;

// Re-export main types
pub use item_state::{AttemptState, ItemPhase};
