//! File identity lookup.
//!
//! Images are usually loaded through opaque object URLs; saved documents are
//! keyed by the original file's base name. [`FileRegistry`] owns that mapping so
//! the codec and the segmentation bridge always receive a resolved file name.

use std::collections::HashMap;

/// Maps image URLs (or other opaque image keys) to their original file names.
#[derive(Debug, Clone, Default)]
pub struct FileRegistry {
    names: HashMap<String, String>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the file name behind `url`, replacing any previous mapping.
    pub fn map(&mut self, url: impl Into<String>, name: impl Into<String>) {
        let url = url.into();
        let name = name.into();
        log::trace!("File registry: {} -> {}", url, name);
        self.names.insert(url, name);
    }

    /// Record several mappings at once.
    pub fn map_all<I, U, N>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (U, N)>,
        U: Into<String>,
        N: Into<String>,
    {
        for (url, name) in entries {
            self.map(url, name);
        }
    }

    pub fn lookup(&self, url: &str) -> Option<&str> {
        self.names.get(url).map(String::as_str)
    }

    /// Find the URL registered for a file whose base name is `base`.
    pub fn url_for_base_name(&self, base: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, name)| base_name(name) == base)
            .map(|(url, _)| url.as_str())
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Strip any directory components and everything from the first `.`.
///
/// `"frames/frame_0007.final.png"` becomes `"frame_0007"`.
pub fn base_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.find('.') {
        Some(dot) => &file[..dot],
        None => file,
    }
}

/// Frame number embedded in a name like `frame_0042.png`, or 0 when absent.
pub fn frame_number(name: &str) -> u32 {
    let Some(start) = name.find("frame_") else {
        return 0;
    };
    let digits: String = name[start + "frame_".len()..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse().unwrap_or(0)
}
