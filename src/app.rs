//! Application shell: config, the canvas engine, the add-dish flow, and the
//! viewport feed wired together the way the host UI drives them.

use canvas::engine::{Action, EngineCore};
use canvas::store::DishId;

use crate::config::Config;
use crate::form::{AddDishFlow, ValidationError};
use crate::mode::{DeviceClass, EntryError, ViewMode, resolve_mode};
use crate::pipeline::UploadPipeline;
use crate::seed;
use crate::viewport::{ViewportFeed, ViewportSubscription};

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub engine: EngineCore,
    pub add_flow: AddDishFlow,
    viewport: ViewportFeed,
}

impl App {
    /// Build the shell and seed the catalog when configured to.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut engine = EngineCore::new(config.background);
        if config.seed_defaults {
            seed::initialize_with_defaults(&mut engine.store);
        }
        Self { config, engine, add_flow: AddDishFlow::new(), viewport: ViewportFeed::new() }
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportFeed {
        &self.viewport
    }

    /// Open the canvas for the current selection.
    ///
    /// The session holds the viewport subscription; dropping it (or passing it
    /// to [`Self::leave_canvas`]) stops listening for resizes.
    ///
    /// # Errors
    ///
    /// [`EntryError::NothingSelected`] when no dish is selected.
    pub fn enter_canvas(&mut self, device: DeviceClass) -> Result<CanvasSession, EntryError> {
        if self.engine.store.selection().is_empty() {
            tracing::debug!("canvas entry refused: empty selection");
            return Err(EntryError::NothingSelected);
        }
        let mode = resolve_mode(self.config.requested_mode, device);
        let mut viewport = self.viewport.subscribe();
        viewport.apply_current(&mut self.engine);
        tracing::info!(mode = mode.as_str(), ?device, selected = self.engine.store.selection().len(), "canvas opened");
        Ok(CanvasSession { mode, viewport })
    }

    /// Close the canvas: release the subscription and abandon any drag.
    pub fn leave_canvas(&mut self, session: CanvasSession) -> Vec<Action> {
        drop(session);
        self.engine.on_pointer_leave()
    }

    /// Run a picked photo through the pipeline and apply the result to the form.
    ///
    /// Returns false when the result was stale (the flow was cancelled or a
    /// newer upload started meanwhile).
    pub async fn upload_photo(&mut self, pipeline: &UploadPipeline, source: String) -> bool {
        let ticket = self.add_flow.start_upload();
        let result = pipeline.process(source).await;
        self.add_flow.finish_upload(ticket, result)
    }

    /// Register the drafted dish.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the catalog is unchanged.
    pub fn submit_dish(&mut self) -> Result<DishId, ValidationError> {
        self.add_flow.submit(&mut self.engine.store, self.config.min_dimension_cm)
    }
}

/// An open canvas.
#[derive(Debug)]
pub struct CanvasSession {
    mode: ViewMode,
    viewport: ViewportSubscription,
}

impl CanvasSession {
    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Apply a resize that happened since the last call.
    pub fn sync_viewport(&mut self, engine: &mut EngineCore) -> Vec<Action> {
        self.viewport.sync(engine)
    }
}
