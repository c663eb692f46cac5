//! On-disk document shape.
//!
//! One document per image, grouped by class and then by instance:
//!
//! ```json
//! {
//!   "imageName": "cat.png",
//!   "classes": [
//!     {
//!       "className": "1",
//!       "instances": [
//!         { "instanceId": "Rectangle-1", "name": "Rectangle", "coordinates": [[10, 10], [50, 10], [50, 50]] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize, Serializer};

/// Annotation document for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub image_name: String,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

impl Document {
    pub fn new(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            classes: Vec::new(),
        }
    }

    /// Total number of instances across all classes.
    pub fn instance_count(&self) -> usize {
        self.classes.iter().map(|c| c.instances.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// All instances of one class (polygon group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub class_name: String,
    #[serde(default)]
    pub instances: Vec<InstanceEntry>,
}

/// One physical polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceEntry {
    #[serde(default)]
    pub instance_id: String,
    pub name: String,
    /// Vertex list. Written as whole numbers.
    #[serde(serialize_with = "serialize_coordinates")]
    pub coordinates: Vec<[f64; 2]>,
}

impl InstanceEntry {
    /// Ordinal shown in the text dump: the part of `instance_id` after its
    /// last `-`, or the whole id when it has none.
    pub fn ordinal(&self) -> &str {
        match self.instance_id.rsplit_once('-') {
            Some((_, ordinal)) => ordinal,
            None => &self.instance_id,
        }
    }
}

/// Round half up, the way the saved documents have always been rounded.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn serialize_coordinates<S: Serializer>(coords: &[[f64; 2]], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(
        coords
            .iter()
            .map(|[x, y]| [round_half_up(*x) as i64, round_half_up(*y) as i64]),
    )
}
