//! Unit tests for document encoding and the text dump.
//!
//! These tests pin down the lossy parts of the conversion (ids, rounding,
//! resampling basis) and the exact text layout.
