//! Bridges to external model services.
//!
//! - [`AssistedBridge`]: interactive click-based segmentation
//! - [`FrameService`]: batch processing of a whole frame

mod assisted;
mod error;
mod service;

#[cfg(test)]
pub(crate) mod fake;

pub use assisted::AssistedBridge;
pub use error::BridgeError;
pub use service::{ClickRequest, FrameService, SegmentationService, ServiceResponse};
