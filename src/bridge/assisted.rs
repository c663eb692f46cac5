//! Client-side state for assisted segmentation.

use crate::bridge::error::BridgeError;
use crate::bridge::service::{ClickRequest, SegmentationService, ServiceResponse};
use crate::editor::AssistedRequest;

/// Tracks readiness, the latest overlay mask and the last error of a
/// [`SegmentationService`].
///
/// The bridge never touches the annotation store. Failures leave the previous
/// mask in place and are kept in [`last_error`](Self::last_error) until the
/// next success or an explicit dismiss.
pub struct AssistedBridge {
    service: Box<dyn SegmentationService>,
    ready: bool,
    mask: Option<String>,
    last_error: Option<String>,
}

impl AssistedBridge {
    pub fn new(service: Box<dyn SegmentationService>) -> Self {
        Self {
            service,
            ready: false,
            mask: None,
            last_error: None,
        }
    }

    /// Whether clicks can be sent for the current image.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn mask(&self) -> Option<&str> {
        self.mask.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Load a new image into the service. Clicks are refused until this
    /// succeeds.
    pub fn load_image(&mut self, file_name: &str) -> Result<(), BridgeError> {
        self.ready = false;
        log::info!(
            "Loading {} into segmentation service {}",
            file_name,
            self.service.display_name()
        );
        match self.service.load_image(file_name) {
            Ok(response) if response.success && response.image.is_some() => {
                self.mask = response.image;
                self.last_error = None;
                self.ready = true;
                Ok(())
            }
            Ok(response) => Err(self.fail(BridgeError::Rejected(
                response.error_message("Failed to load image"),
            ))),
            Err(BridgeError::Transport(message)) => Err(self.fail(BridgeError::Transport(
                format!("Error loading image from service: {}", message),
            ))),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Forward an editor request to the service.
    pub fn handle(&mut self, request: &AssistedRequest) -> Result<(), BridgeError> {
        match *request {
            AssistedRequest::Click { point, positive } => {
                if !self.ready {
                    log::warn!("Click ignored, segmentation service is not ready");
                    return Err(self.fail(BridgeError::NotReady));
                }
                let click = ClickRequest {
                    x: point.x,
                    y: point.y,
                    is_positive: positive,
                };
                log::debug!("Sending click {:?}", click);
                let result = self.service.add_click(click);
                self.apply(result, "Failed to add click")
            }
            AssistedRequest::FinishObject => {
                let result = self.service.finish_object();
                self.apply(result, "Failed to finish object")
            }
            AssistedRequest::UndoClick => {
                let result = self.service.undo_click();
                self.apply(result, "Failed to undo click")
            }
            AssistedRequest::ResetClicks => {
                let result = self.service.reset_clicks();
                self.apply(result, "Failed to reset clicks")
            }
            AssistedRequest::Commit => {
                log::info!("Committing segmentation results");
                self.service.commit().map_err(|err| self.fail(err))
            }
        }
    }

    fn apply(
        &mut self,
        result: Result<ServiceResponse, BridgeError>,
        fallback: &str,
    ) -> Result<(), BridgeError> {
        match result {
            Ok(response) if response.success => {
                if response.image.is_some() {
                    self.mask = response.image;
                }
                self.last_error = None;
                Ok(())
            }
            Ok(response) => Err(self.fail(BridgeError::Rejected(response.error_message(fallback)))),
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&mut self, err: BridgeError) -> BridgeError {
        log::error!("Segmentation service error: {}", err);
        self.last_error = Some(err.to_string());
        err
    }
}
