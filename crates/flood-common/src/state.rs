//! Viewer UI state.

use serde::Serialize;

use crate::layer::ViewMode;
use crate::time::TimeStep;

/// Everything the request resolver needs to know about user choices.
///
/// Created with the viewer session and discarded with it. Only the
/// selection controller mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiState {
    pub active_mode: ViewMode,
    pub time_step: TimeStep,
    pub selected_dynamic_layer: Option<String>,
    pub is_loading: bool,
}

impl UiState {
    /// A state with the given mode and step and nothing picked.
    pub fn with_mode(active_mode: ViewMode, time_step: TimeStep) -> Self {
        Self {
            active_mode,
            time_step,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = UiState::default();
        assert_eq!(state.active_mode, ViewMode::MaxDepth);
        assert_eq!(state.time_step.get(), 1);
        assert_eq!(state.selected_dynamic_layer, None);
        assert!(!state.is_loading);
    }
}
