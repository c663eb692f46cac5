//! Annotation document encoding and persistence.
//!
//! This module converts store polygons to the on-disk document shape and back,
//! renders the fixed text dump, and provides the persistence side: the
//! `DocumentStore` service trait with in-memory and JSON-directory
//! implementations, debounced per-image saving, and completion polling.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polyedit::format::{encode, decode, to_text, DocumentStore, JsonDirectory};
//!
//! let document = encode("cat.png", store.get_polygons(&key));
//! println!("{}", to_text(&document));
//!
//! let mut dir = JsonDirectory::create("json")?;
//! dir.save("cat", &document)?;
//! let polygons = decode(&dir.fetch("cat")?.unwrap(), &key)?;
//! ```

mod auto_save;
mod codec;
mod document;
mod error;
mod json_dir;
mod memory;
mod normalize;
mod poller;
mod text;
mod traits;

#[cfg(test)]
mod tests;

pub use auto_save::{PendingSave, SaveScheduler};
pub use codec::{decode, encode};
pub use document::{ClassEntry, Document, InstanceEntry, round_half_up};
pub use error::{FormatError, PersistenceError};
pub use json_dir::JsonDirectory;
pub use memory::MemoryStore;
pub use normalize::{PolygonRecord, apply_records, normalize_polygons};
pub use poller::{ChangePoller, PollStatus};
pub use text::to_text;
pub use traits::DocumentStore;
