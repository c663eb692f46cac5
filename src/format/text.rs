//! Human-readable text dump of a document.
//!
//! The layout is consumed by downstream tooling and must not change:
//!
//! ```text
//! Image name: cat.png
//!
//! Class name: 1
//! - instance 1 (Rectangle)
//!       Point coordinates:
//!       [10, 10]
//!       [50, 10]
//!
//!
//! ```

use std::fmt::Write;

use crate::format::document::{Document, round_half_up};

/// Render `document` in the fixed text layout.
pub fn to_text(document: &Document) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_text(&mut out, document);
    out
}

fn write_text(out: &mut String, document: &Document) -> std::fmt::Result {
    write!(out, "Image name: {}\n\n", document.image_name)?;

    for class in document.classes.iter() {
        writeln!(out, "Class name: {}", class.class_name)?;

        for instance in class.instances.iter() {
            writeln!(out, "- instance {} ({})", instance.ordinal(), instance.name)?;
            out.push_str("      Point coordinates:\n");
            for [x, y] in instance.coordinates.iter() {
                writeln!(
                    out,
                    "      [{}, {}]",
                    round_half_up(*x) as i64,
                    round_half_up(*y) as i64
                )?;
            }
            out.push('\n');
        }

        out.push('\n');
    }

    Ok(())
}
