//! Incremental stroke filtering by watermark.

use crate::models::Stroke;

/// Watermark sentinel meaning "send everything".
pub const NO_WATERMARK: i64 = 0;

/// Strokes appended after `watermark`, in log order.
///
/// A watermark of `NO_WATERMARK` (or below) returns the whole log. The
/// result is a pure function of its inputs, so re-polling with the same
/// watermark is always safe.
pub fn since(watermark: i64, strokes: &[Stroke]) -> impl Iterator<Item = &Stroke> {
    strokes
        .iter()
        .filter(move |stroke| watermark <= NO_WATERMARK || stroke.timestamp > watermark)
}
