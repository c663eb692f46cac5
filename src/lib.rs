//! polyedit - polygon annotation editing core
//!
//! Geometry, coordinate mapping, the interactive editing state machine and
//! the persistence codec behind a polygon annotation tool. Rendering and UI
//! layout are left to the host: the editor consumes pointer messages and
//! produces display lists, documents and service requests.

pub mod bridge;
pub mod color_utils;
pub mod config;
pub mod constants;
pub mod editor;
pub mod files;
pub mod format;
pub mod geometry;
pub mod handlers;
pub mod message;
pub mod model;
pub mod render;
pub mod session;
pub mod store;
pub mod transform;

pub use editor::{Editor, Outcome};
pub use session::Session;
