//! Selection controller: the only writer of [`UiState`].
//!
//! User actions change what should be displayed and ask for a new overlay.
//! Load events from the renderer only toggle the loading flag, and only for
//! the overlay currently attached.

use std::fmt;

use flood_common::{classify, TimeStep, UiState, ViewMode, ViewerError, ViewerResult};
use tracing::{debug, info, warn};

/// Identifies one overlay handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SelectMode(ViewMode),
    SetTimeStep(u32),
    PickLayer(String),
}

/// Image lifecycle notifications from the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Start(OverlayId),
    End(OverlayId),
    Error(OverlayId, String),
}

impl LoadEvent {
    pub fn overlay(&self) -> OverlayId {
        match self {
            LoadEvent::Start(id) | LoadEvent::End(id) | LoadEvent::Error(id, _) => *id,
        }
    }
}

/// Controller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    User(UserAction),
    Lifecycle(LoadEvent),
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State that feeds the resolver changed; resolve and re-render.
    Resolve,
    /// Only the loading flag may have changed.
    StateOnly,
}

impl Transition {
    pub fn needs_resolve(&self) -> bool {
        matches!(self, Transition::Resolve)
    }
}

#[derive(Debug, Clone)]
pub struct SelectionController {
    state: UiState,
    max_time_step: u32,
    attached: Option<OverlayId>,
}

impl SelectionController {
    /// Start from the initial state with steps limited to `1..=max_time_step`.
    pub fn new(max_time_step: u32) -> Self {
        Self {
            state: UiState::default(),
            max_time_step,
            attached: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn max_time_step(&self) -> u32 {
        self.max_time_step
    }

    /// Overlay whose lifecycle events are currently accepted.
    pub fn attached(&self) -> Option<OverlayId> {
        self.attached
    }

    pub fn attach_overlay(&mut self, id: OverlayId) {
        debug!(overlay = %id, "Attached overlay");
        self.attached = Some(id);
    }

    /// Apply one input. Invalid time steps are rejected without touching
    /// state.
    pub fn apply(&mut self, input: Input) -> ViewerResult<Transition> {
        match input {
            Input::User(UserAction::SelectMode(mode)) => {
                self.select_mode(mode);
                Ok(Transition::Resolve)
            }
            Input::User(UserAction::SetTimeStep(step)) => {
                self.set_time_step(step)?;
                Ok(Transition::Resolve)
            }
            Input::User(UserAction::PickLayer(id)) => {
                self.pick_catalog_layer(id);
                Ok(Transition::Resolve)
            }
            Input::Lifecycle(event) => {
                self.on_load_event(event);
                Ok(Transition::StateOnly)
            }
        }
    }

    pub fn select_mode(&mut self, mode: ViewMode) {
        info!(mode = %mode, "Mode selected");
        self.state.active_mode = mode;
        self.state.time_step = TimeStep::FIRST;
        self.state.selected_dynamic_layer = None;
    }

    /// Store a new step. Accepted in any mode; a later mode switch resets it
    /// to 1.
    pub fn set_time_step(&mut self, step: u32) -> ViewerResult<()> {
        if step > self.max_time_step {
            return Err(ViewerError::InvalidTimeStep {
                step,
                max: self.max_time_step,
            });
        }
        let step = TimeStep::new(step).map_err(|_| ViewerError::InvalidTimeStep {
            step,
            max: self.max_time_step,
        })?;
        debug!(step = step.get(), "Time step set");
        self.state.time_step = step;
        Ok(())
    }

    /// Select a catalog layer. A classifiable name switches to its mode and
    /// resets the step; an unclassifiable one keeps the current mode.
    pub fn pick_catalog_layer(&mut self, id: impl Into<String>) {
        let id = id.into();
        let category = classify(&id);
        info!(layer = %id, category = %category, "Catalog layer picked");

        if let Some(mode) = ViewMode::from_category(category) {
            self.state.active_mode = mode;
            self.state.time_step = TimeStep::FIRST;
        }
        self.state.selected_dynamic_layer = Some(id);
    }

    pub fn on_load_event(&mut self, event: LoadEvent) {
        let id = event.overlay();
        if self.attached != Some(id) {
            debug!(overlay = %id, attached = ?self.attached, "Ignoring event for detached overlay");
            return;
        }

        match event {
            LoadEvent::Start(_) => self.state.is_loading = true,
            LoadEvent::End(_) => self.state.is_loading = false,
            LoadEvent::Error(_, message) => {
                warn!(overlay = %id, error = %message, "Overlay failed to load");
                self.state.is_loading = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SelectionController {
        SelectionController::new(25)
    }

    #[test]
    fn test_select_mode_resets() {
        let mut c = controller();
        c.pick_catalog_layer("x_max_depth");
        c.set_time_step(9).unwrap();

        c.select_mode(ViewMode::TimeSeries);
        assert_eq!(c.state().active_mode, ViewMode::TimeSeries);
        assert_eq!(c.state().time_step, TimeStep::FIRST);
        assert_eq!(c.state().selected_dynamic_layer, None);
    }

    #[test]
    fn test_set_time_step_in_any_mode() {
        let mut c = controller();
        c.set_time_step(12).unwrap();
        assert_eq!(c.state().active_mode, ViewMode::MaxDepth);
        assert_eq!(c.state().time_step.get(), 12);
    }

    #[test]
    fn test_set_time_step_rejects_out_of_range() {
        let mut c = controller();
        c.set_time_step(4).unwrap();

        assert!(matches!(
            c.set_time_step(0),
            Err(ViewerError::InvalidTimeStep { step: 0, max: 25 })
        ));
        assert!(matches!(
            c.set_time_step(26),
            Err(ViewerError::InvalidTimeStep { step: 26, max: 25 })
        ));
        assert_eq!(c.state().time_step.get(), 4);
    }

    #[test]
    fn test_pick_switches_mode() {
        let mut c = controller();
        c.set_time_step(7).unwrap();
        c.pick_catalog_layer("flood_event_a_timeseries");
        assert_eq!(c.state().active_mode, ViewMode::TimeSeries);
        assert_eq!(c.state().time_step, TimeStep::FIRST);
        assert_eq!(
            c.state().selected_dynamic_layer.as_deref(),
            Some("flood_event_a_timeseries")
        );

        c.pick_catalog_layer("mahanadi_dam_release_max_depth");
        assert_eq!(c.state().active_mode, ViewMode::MaxDepth);
    }

    #[test]
    fn test_pick_unknown_keeps_mode_and_step() {
        let mut c = controller();
        c.select_mode(ViewMode::TimeSeries);
        c.set_time_step(5).unwrap();

        c.pick_catalog_layer("dem");
        assert_eq!(c.state().active_mode, ViewMode::TimeSeries);
        assert_eq!(c.state().time_step.get(), 5);
        assert_eq!(c.state().selected_dynamic_layer.as_deref(), Some("dem"));
    }

    #[test]
    fn test_load_events_for_attached_overlay() {
        let mut c = controller();
        let id = OverlayId::new(1);
        c.attach_overlay(id);

        c.on_load_event(LoadEvent::Start(id));
        assert!(c.state().is_loading);
        c.on_load_event(LoadEvent::End(id));
        assert!(!c.state().is_loading);

        c.on_load_event(LoadEvent::Start(id));
        c.on_load_event(LoadEvent::Error(id, "boom".into()));
        assert!(!c.state().is_loading);
    }

    #[test]
    fn test_late_event_is_ignored() {
        let mut c = controller();
        let old = OverlayId::new(1);
        let current = old.next();

        c.attach_overlay(old);
        c.on_load_event(LoadEvent::Start(old));
        c.attach_overlay(current);
        c.on_load_event(LoadEvent::Start(current));

        c.on_load_event(LoadEvent::End(old));
        assert!(c.state().is_loading);

        c.on_load_event(LoadEvent::End(current));
        assert!(!c.state().is_loading);
    }

    #[test]
    fn test_apply_transitions() {
        let mut c = controller();
        let t = c
            .apply(Input::User(UserAction::SelectMode(ViewMode::TimeSeries)))
            .unwrap();
        assert!(t.needs_resolve());

        let t = c
            .apply(Input::Lifecycle(LoadEvent::Start(OverlayId::new(3))))
            .unwrap();
        assert_eq!(t, Transition::StateOnly);

        assert!(c.apply(Input::User(UserAction::SetTimeStep(99))).is_err());
    }
}
