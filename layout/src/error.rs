//! Error types for text layout.

use thiserror::Error;

/// Errors raised while configuring or rendering layout sections.
///
/// All of these are configuration errors: they signal that a section was
/// built with impossible parameters or that the available width cannot
/// accommodate the requested indentation. None of them is recoverable at
/// render time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The width budget (after indentation) is zero or negative.
    #[error("The console is too narrow. Increase its width by {increase_by}.")]
    TooNarrow {
        /// Minimum number of columns that would make the layout possible.
        increase_by: usize,
    },

    /// An empty section was requested with zero lines.
    #[error("expected the number of empty lines to be at least 1")]
    NoLines,

    /// A header section was given empty or whitespace-only text.
    #[error("section header cannot be empty")]
    EmptyHeader,

    /// A paragraph section was given no paragraphs at all.
    #[error("cannot construct a section body from an empty list of paragraphs")]
    NoParagraphs,

    /// A two-column section was given a zero-width first column.
    #[error("first column width has to be at least 1")]
    FirstColumnTooNarrow,
}

/// Convenience alias for results with [`LayoutError`].
pub type Result<T> = std::result::Result<T, LayoutError>;
