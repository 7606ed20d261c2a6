//! Markup sanitization boundary.
//!
//! # Invariants
//! - Output is safe for direct rendering.
//! - `sanitize(sanitize(x)) == sanitize(x)` for every implementation used by
//!   core.

use crate::model::rich_text::RichText;

/// Turns arbitrary markup into markup safe to render and store.
pub trait MarkupSanitizer {
    fn sanitize(&self, markup: &str) -> String;
}

/// Default sanitizer: round-trips markup through the rich-text document model.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextSanitizer;

impl MarkupSanitizer for RichTextSanitizer {
    fn sanitize(&self, markup: &str) -> String {
        RichText::from_markup(markup).to_markup()
    }
}

impl<F> MarkupSanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, markup: &str) -> String {
        self(markup)
    }
}
