//! Viewer session: owns the UI state and serializes every input.
//!
//! User commands, renderer lifecycle events and the discovery result all
//! arrive on one channel and are handled to completion in arrival order.

use std::io::Write;
use std::ops::ControlFlow;

use flood_common::{LayerCatalog, UiState, ViewerConfig};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use wms_client::{resolve, ResolverConfig};

use crate::commands::{layers_table, status_line, Command, PickTarget, HELP};
use crate::controller::{Input, LoadEvent, OverlayId, SelectionController, UserAction};
use crate::renderer::OverlayRenderer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerEvent {
    User(UserAction),
    Command(Command),
    Lifecycle(LoadEvent),
    CatalogLoaded(Vec<String>),
    Shutdown,
}

pub struct ViewerSession {
    controller: SelectionController,
    catalog: LayerCatalog,
    resolver: ResolverConfig,
    renderer: Box<dyn OverlayRenderer>,
    events: UnboundedReceiver<ViewerEvent>,
    out: Box<dyn Write + Send>,
    next_overlay: OverlayId,
}

impl ViewerSession {
    pub fn new(
        config: &ViewerConfig,
        renderer: Box<dyn OverlayRenderer>,
        events: UnboundedReceiver<ViewerEvent>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            controller: SelectionController::new(config.max_time_step()),
            catalog: LayerCatalog::default(),
            resolver: ResolverConfig::from(config),
            renderer,
            events,
            out,
            next_overlay: OverlayId::new(1),
        }
    }

    pub fn state(&self) -> &UiState {
        self.controller.state()
    }

    pub fn catalog(&self) -> &LayerCatalog {
        &self.catalog
    }

    /// Id of the overlay currently on display.
    pub fn current_overlay(&self) -> Option<OverlayId> {
        self.controller.attached()
    }

    /// Render the initial state, then handle events until shutdown or until
    /// every sender is gone.
    pub async fn run(&mut self) {
        self.start();
        while let Some(event) = self.events.recv().await {
            if self.handle(event).is_break() {
                break;
            }
        }
        info!("Viewer session finished");
    }

    /// Render the initial state.
    pub fn start(&mut self) {
        info!(mode = %self.state().active_mode, "Starting viewer session");
        self.render();
    }

    pub fn handle(&mut self, event: ViewerEvent) -> ControlFlow<()> {
        match event {
            ViewerEvent::User(action) => self.apply_user(action),
            ViewerEvent::Command(command) => return self.execute(command),
            ViewerEvent::Lifecycle(load) => {
                if let Err(e) = self.controller.apply(Input::Lifecycle(load)) {
                    debug!(error = %e, "Lifecycle event rejected");
                }
            }
            ViewerEvent::CatalogLoaded(entries) => {
                self.catalog.replace(entries);
                info!(
                    count = self.catalog.len(),
                    listed = self.catalog.partition().len(),
                    "Layer catalog loaded"
                );
            }
            ViewerEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn apply_user(&mut self, action: UserAction) {
        match self.controller.apply(Input::User(action)) {
            Ok(transition) if transition.needs_resolve() => self.render(),
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Rejected user action");
                self.say(&e.to_string());
            }
        }
    }

    fn execute(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Mode(mode) => self.apply_user(UserAction::SelectMode(mode)),
            Command::Step(step) => self.apply_user(UserAction::SetTimeStep(step)),
            Command::Pick(PickTarget::Name(name)) => {
                if !self.catalog.contains(&name) {
                    debug!(layer = %name, "Picked layer is not in the catalog");
                }
                self.apply_user(UserAction::PickLayer(name));
            }
            Command::Pick(PickTarget::Index(number)) => {
                let layers = self.catalog.partition();
                let picked = number
                    .checked_sub(1)
                    .and_then(|i| layers.menu_entry(i))
                    .map(str::to_string);
                match picked {
                    Some(name) => self.apply_user(UserAction::PickLayer(name)),
                    None if layers.is_empty() => self.say("Layer list is empty or still loading"),
                    None => self.say(&format!(
                        "No layer #{} (menu has {} entries)",
                        number,
                        layers.len()
                    )),
                }
            }
            Command::Layers => {
                let table = layers_table(
                    &self.catalog.partition(),
                    self.state().selected_dynamic_layer.as_deref(),
                );
                self.say(&table);
            }
            Command::Status => {
                let line = status_line(self.state(), self.controller.max_time_step());
                self.say(&line);
            }
            Command::Help => self.say(HELP),
            Command::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Resolve the current state and swap the displayed overlay.
    fn render(&mut self) {
        let overlay = resolve(self.controller.state(), &self.resolver);
        let id = self.next_overlay;
        self.next_overlay = id.next();

        debug!(
            overlay = %id,
            layer = %overlay.server_layer_name,
            time = overlay.has_time_param,
            "Rendering overlay"
        );
        self.controller.attach_overlay(id);
        self.renderer.remove_overlay();
        self.renderer.add_overlay(id, &overlay);
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            debug!(error = %e, "Failed to write command output");
        }
    }
}
