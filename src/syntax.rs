//! Syntax provider seam
//!
//! Highlighting is produced behind a trait so the renderer works the
//! same whether a real highlighter (tree-sitter, an LSP, anything) is
//! plugged in or nothing is. The core ships the no-op provider.

use std::ops::Range;

use crate::color::Style;
use crate::rope::Rope;

/// A styled byte range within the requested window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

pub trait SyntaxProvider {
    /// Highlight tokens intersecting `range`, given the buffer's
    /// language tag (derived from its file extension, `None` when
    /// unknown). Spans must be non-overlapping and ordered by start.
    fn highlights(
        &self,
        rope: &Rope,
        language: Option<&str>,
        range: Range<usize>,
    ) -> Vec<HighlightSpan>;
}

/// The stub provider: no tokens, ever
pub struct NoHighlight;

impl SyntaxProvider for NoHighlight {
    fn highlights(
        &self,
        _rope: &Rope,
        _language: Option<&str>,
        _range: Range<usize>,
    ) -> Vec<HighlightSpan> {
        Vec::new()
    }
}

/// Language tag from a file extension
pub fn language_for_path(path: &std::path::Path) -> Option<&'static str> {
    match path.extension()?.to_str()? {
        "rs" => Some("rust"),
        "c" | "h" => Some("c"),
        "py" => Some("python"),
        "js" => Some("javascript"),
        "md" => Some("markdown"),
        "toml" => Some("toml"),
        "json" => Some("json"),
        "sh" => Some("shell"),
        _ => None,
    }
}
