//! In-process service doubles shared by bridge and session tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bridge::error::BridgeError;
use crate::bridge::service::{ClickRequest, FrameService, SegmentationService, ServiceResponse};

/// Everything a [`FakeSegmentation`] was asked to do.
#[derive(Debug, Default)]
pub struct SegmentationCalls {
    pub loaded: Vec<String>,
    pub clicks: Vec<ClickRequest>,
    pub commits: usize,
    /// Returned (once) instead of the next successful response
    pub fail_next: Option<ServiceResponse>,
    responses: usize,
}

pub type SegmentationLog = Rc<RefCell<SegmentationCalls>>;

/// Segmentation service that answers every request with a numbered mask.
#[derive(Default)]
pub struct FakeSegmentation {
    log: SegmentationLog,
}

impl FakeSegmentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> SegmentationLog {
        Rc::clone(&self.log)
    }

    fn respond(&mut self) -> Result<ServiceResponse, BridgeError> {
        let mut log = self.log.borrow_mut();
        if let Some(failure) = log.fail_next.take() {
            return Ok(failure);
        }
        let mask = format!("mask-{}", log.responses);
        log.responses += 1;
        Ok(ServiceResponse::with_mask(mask))
    }
}

impl SegmentationService for FakeSegmentation {
    fn display_name(&self) -> &'static str {
        "fake"
    }

    fn load_image(&mut self, file_name: &str) -> Result<ServiceResponse, BridgeError> {
        self.log.borrow_mut().loaded.push(file_name.to_string());
        self.respond()
    }

    fn add_click(&mut self, click: ClickRequest) -> Result<ServiceResponse, BridgeError> {
        self.log.borrow_mut().clicks.push(click);
        self.respond()
    }

    fn finish_object(&mut self) -> Result<ServiceResponse, BridgeError> {
        self.respond()
    }

    fn undo_click(&mut self) -> Result<ServiceResponse, BridgeError> {
        self.respond()
    }

    fn reset_clicks(&mut self) -> Result<ServiceResponse, BridgeError> {
        self.respond()
    }

    fn commit(&mut self) -> Result<(), BridgeError> {
        self.log.borrow_mut().commits += 1;
        Ok(())
    }
}

/// Frame service that records requested frame numbers.
#[derive(Default)]
pub struct FakeFrames {
    pub frames: Rc<RefCell<Vec<u32>>>,
    pub fail: bool,
}

impl FrameService for FakeFrames {
    fn display_name(&self) -> &'static str {
        "fake-frames"
    }

    fn run_frame(&mut self, frame: u32) -> Result<(), BridgeError> {
        if self.fail {
            return Err(BridgeError::Transport("connection refused".to_string()));
        }
        self.frames.borrow_mut().push(frame);
        Ok(())
    }
}
