//! Page-load state machine for the city list.
//!
//! Ensures only one page request is outstanding at a time. Used by the
//! city list state container.

/// Load state for serializing page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    /// A page request starting at this offset is in flight.
    Loading { offset: usize },
}

impl LoadState {
    /// True if a new page request can be started.
    pub fn can_start(self) -> bool {
        matches!(self, LoadState::Idle)
    }

    /// True while a request is outstanding.
    pub fn is_loading(self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    /// State after issuing a request for `offset`.
    pub fn on_start(self, offset: usize) -> Self {
        LoadState::Loading { offset }
    }

    /// State after processing a PageDone message (success or failure).
    pub fn on_done(self) -> Self {
        LoadState::Idle
    }

    /// Offset of the in-flight request, if any.
    pub fn pending_offset(self) -> Option<usize> {
        match self {
            LoadState::Loading { offset } => Some(offset),
            LoadState::Idle => None,
        }
    }
}
