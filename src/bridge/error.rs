//! Error types for the external segmentation and frame services.

use thiserror::Error;

/// Errors reported while talking to an external model service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// No service is configured
    #[error("Segmentation service is not available")]
    Unavailable,

    /// Clicks arrived before the current image finished loading
    #[error("Segmentation service is not ready. Please wait for the image to load.")]
    NotReady,

    /// The request never got a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a failure payload
    #[error("{0}")]
    Rejected(String),
}
