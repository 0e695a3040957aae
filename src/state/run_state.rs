//! Lifecycle states of a single frontier run
//!
//! A run moves strictly forward through these states; `Terminated` is reached exactly
//! once, whether the run finished its depth budget, ran out of links, or was cancelled.

use std::fmt;

/// Represents the current phase of a frontier run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Channels are created and the seed batch is being injected
    Initializing,

    /// Workers are running and breadth levels are being dispatched
    Dispatching,

    /// No further jobs will be dispatched; workers are being shut down and joined
    Draining,

    /// Every worker has exited and the run's channels are closed
    Terminated,
}

impl RunState {
    /// Returns true if the run may move from `self` to `next`
    ///
    /// Initializing may skip straight to Draining when cancellation fires before the
    /// first level is dispatched.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Initializing, Self::Dispatching)
                | (Self::Initializing, Self::Draining)
                | (Self::Dispatching, Self::Draining)
                | (Self::Draining, Self::Terminated)
        )
    }

    /// Returns true once the run has fully shut down
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Dispatching => "dispatching",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
