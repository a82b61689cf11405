//! Per-certificate lookup state
//!
//! This module defines the phases a single certificate passes through while
//! it is being looked up, and the transient attempt bookkeeping owned by the
//! item worker.

use crate::crawler::FailureKind;
use std::fmt;

/// Represents the current phase of one certificate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemPhase {
    // ===== Active Phases =====
    /// Certificate has been dispatched but no fetch has started
    Pending,

    /// A fetch attempt is in flight
    Attempting,

    /// The last attempt failed and the worker is sleeping before the next one
    RetryWait,

    // ===== Terminal Phases =====
    /// Fields were extracted successfully
    Succeeded,

    /// Retries were exhausted; a diagnostic snapshot was attempted
    Failed,
}

impl ItemPhase {
    /// Returns true if this is a terminal phase (a record has been produced)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Returns true if this is an active phase
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from this phase to `next` is a legal transition
    ///
    /// ```text
    /// Pending -> Attempting -> Succeeded
    ///                       -> RetryWait -> Attempting
    ///                       -> Failed
    /// ```
    pub fn can_transition_to(&self, next: ItemPhase) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Attempting)
                | (Self::Attempting, Self::Succeeded)
                | (Self::Attempting, Self::RetryWait)
                | (Self::Attempting, Self::Failed)
                | (Self::RetryWait, Self::Attempting)
        )
    }

    /// Returns a short lowercase label for log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Attempting => "attempting",
            Self::RetryWait => "retry_wait",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ItemPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attempt bookkeeping for one certificate
///
/// Owned by the item worker for the duration of a single lookup and dropped
/// once the certificate reaches a terminal phase. Attempt numbering starts
/// at 1 for the first try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    attempt_number: u32,
    last_failure: Option<FailureKind>,
    phase: ItemPhase,
}

impl AttemptState {
    /// Creates the state for a freshly dispatched certificate
    pub fn new() -> Self {
        Self {
            attempt_number: 1,
            last_failure: None,
            phase: ItemPhase::Pending,
        }
    }

    /// The number of the current (or most recent) attempt
    pub fn attempt_number(&self) -> u32 {
        self.attempt_number
    }

    /// The failure kind of the most recent failed attempt
    pub fn last_failure(&self) -> Option<FailureKind> {
        self.last_failure
    }

    /// The current phase
    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    /// Marks the first attempt as started
    pub fn start(&mut self) {
        self.transition(ItemPhase::Attempting);
    }

    /// Records the failure kind of the attempt in flight
    pub fn record_failure(&mut self, kind: FailureKind) {
        self.last_failure = Some(kind);
    }

    /// Enters the backoff wait before the next attempt
    pub fn wait_for_retry(&mut self) {
        self.transition(ItemPhase::RetryWait);
    }

    /// Leaves the backoff wait and starts the next attempt
    pub fn retry(&mut self) {
        self.transition(ItemPhase::Attempting);
        self.attempt_number += 1;
    }

    /// Marks the lookup as successful
    pub fn succeed(&mut self) {
        self.transition(ItemPhase::Succeeded);
    }

    /// Marks the lookup as failed after retries were exhausted
    pub fn exhaust(&mut self) {
        self.transition(ItemPhase::Failed);
    }

    fn transition(&mut self, next: ItemPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "invalid phase transition: {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }
}

impl Default for AttemptState {
    fn default() -> Self {
        Self::new()
    }
}
