//! Service contracts for assisted segmentation and frame processing.

use serde::{Deserialize, Serialize};

use crate::bridge::error::BridgeError;

/// A point prompt in image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickRequest {
    pub x: f64,
    pub y: f64,
    /// False for clicks that exclude a region
    pub is_positive: bool,
}

/// Response payload shared by every segmentation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceResponse {
    pub success: bool,
    /// Updated overlay mask, typically a base64-encoded PNG
    pub image: Option<String>,
    pub error: Option<String>,
    pub debug: Option<String>,
    pub trace: Option<String>,
}

impl ServiceResponse {
    /// A successful response carrying a mask.
    pub fn with_mask(image: impl Into<String>) -> Self {
        Self {
            success: true,
            image: Some(image.into()),
            ..Self::default()
        }
    }

    /// A failure response with an error description.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Multi-line failure description built from the `error`, `debug` and
    /// `trace` fields, e.g. `"Error: bad click\nTrace: ..."`.
    ///
    /// Returns `fallback` when the service gave no details.
    pub fn error_message(&self, fallback: &str) -> String {
        let mut lines = Vec::new();
        if let Some(error) = &self.error {
            lines.push(format!("Error: {}", error));
        }
        if let Some(debug) = &self.debug {
            lines.push(format!("Debug: {}", debug));
        }
        if let Some(trace) = &self.trace {
            lines.push(format!("Trace: {}", trace));
        }
        if lines.is_empty() {
            fallback.to_string()
        } else {
            lines.join("\n")
        }
    }
}

/// External interactive segmentation model.
///
/// The service owns the click history; every call returns the full,
/// updated overlay mask on success.
pub trait SegmentationService {
    /// Human-readable name for logs.
    fn display_name(&self) -> &'static str;

    /// Prepare the service for a new image, identified by file name.
    fn load_image(&mut self, file_name: &str) -> Result<ServiceResponse, BridgeError>;

    fn add_click(&mut self, click: ClickRequest) -> Result<ServiceResponse, BridgeError>;

    /// Accept the current object and start a new one.
    fn finish_object(&mut self) -> Result<ServiceResponse, BridgeError>;

    fn undo_click(&mut self) -> Result<ServiceResponse, BridgeError>;

    fn reset_clicks(&mut self) -> Result<ServiceResponse, BridgeError>;

    /// Flush accepted objects to persistent storage.
    fn commit(&mut self) -> Result<(), BridgeError>;
}

/// External batch model that writes annotation documents for a frame.
pub trait FrameService {
    fn display_name(&self) -> &'static str;

    /// Start processing one frame. Results show up later as new documents in
    /// the persistence service.
    fn run_frame(&mut self, frame: u32) -> Result<(), BridgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_joins_present_fields() {
        let response = ServiceResponse {
            success: false,
            error: Some("no image".to_string()),
            trace: Some("at line 3".to_string()),
            ..ServiceResponse::default()
        };
        assert_eq!(
            response.error_message("failed"),
            "Error: no image\nTrace: at line 3"
        );
        assert_eq!(ServiceResponse::default().error_message("failed"), "failed");
    }

    #[test]
    fn test_response_parses_partial_json() {
        let response: ServiceResponse =
            serde_json::from_str(r#"{"success": true, "image": "data:image/png;base64,AAA"}"#)
                .unwrap();
        assert!(response.success);
        assert_eq!(response.image.as_deref(), Some("data:image/png;base64,AAA"));
        assert!(response.error.is_none());
    }

    #[test]
    fn test_click_request_wire_shape() {
        let click = ClickRequest {
            x: 12.0,
            y: 7.5,
            is_positive: false,
        };
        let json = serde_json::to_value(click).unwrap();
        assert_eq!(json["is_positive"], serde_json::Value::Bool(false));
        assert_eq!(json["y"], serde_json::json!(7.5));
    }
}
