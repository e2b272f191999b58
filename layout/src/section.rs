//! Composable layout sections.
//!
//! A [`Section`] is a recipe that lowers to a sequence of lines once a
//! width budget is known. Sections are validated when constructed, so a
//! section that exists can only fail to build if the width is too small
//! for its indentation.
//!
//! # Examples
//!
//! ```
//! use command_tree_layout::{Section, TextBlock};
//!
//! let mut block = TextBlock::new(40).unwrap();
//! block.append(&Section::header("Usage:").unwrap()).unwrap();
//! block.append(&Section::empty(1).unwrap()).unwrap();
//! block.append(&Section::paragraph(["mycli <child command>"]).unwrap()).unwrap();
//!
//! assert_eq!(
//!     block.to_string(),
//!     "    Usage:\n\n        mycli <child command>\n"
//! );
//! ```

use std::fmt;

use crate::error::{LayoutError, Result};
use crate::wrap::{center, indent, overlay_columns};

/// Indentation of section headers.
pub const HEADER_INDENT: usize = 4;

/// Indentation of paragraph bodies and of the first column of two-column
/// paragraphs.
pub const BODY_INDENT: usize = 8;

/// Gap between the two columns of a two-column paragraph.
pub const COLUMN_SEPARATOR: usize = 4;

/// A block of help text that can be laid out for a given width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section(Kind);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Empty(usize),
    Centered(String),
    Header(String),
    Paragraph(String),
    TwoColumn(TwoColumnParagraph),
    Composite(Vec<Section>),
}

impl Section {
    /// Creates a section of `lines` blank lines.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoLines`] if `lines` is zero.
    pub fn empty(lines: usize) -> Result<Self> {
        if lines == 0 {
            return Err(LayoutError::NoLines);
        }
        Ok(Self(Kind::Empty(lines)))
    }

    /// Creates a section that centers `text` within the width.
    pub fn centered(text: impl Into<String>) -> Self {
        Self(Kind::Centered(text.into()))
    }

    /// Creates a header indented by [`HEADER_INDENT`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyHeader`] if `text` is empty or whitespace.
    pub fn header(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(LayoutError::EmptyHeader);
        }
        Ok(Self(Kind::Header(text)))
    }

    /// Creates a paragraph body indented by [`BODY_INDENT`], with one blank
    /// line between consecutive paragraphs.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NoParagraphs`] if `paragraphs` is empty.
    pub fn paragraph<I, S>(paragraphs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::paragraph_with_spacing(paragraphs, 1)
    }

    /// Like [`paragraph`](Self::paragraph), with `empty_lines` blank lines
    /// between consecutive paragraphs.
    pub fn paragraph_with_spacing<I, S>(paragraphs: I, empty_lines: usize) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paragraphs: Vec<S> = paragraphs.into_iter().collect();
        if paragraphs.is_empty() {
            return Err(LayoutError::NoParagraphs);
        }
        Ok(Self(Kind::Paragraph(join_paragraphs(
            &paragraphs,
            empty_lines,
        ))))
    }

    /// Wraps a [`TwoColumnParagraph`] as a section.
    pub fn two_column(paragraph: TwoColumnParagraph) -> Self {
        Self(Kind::TwoColumn(paragraph))
    }

    /// Concatenates several sections into one.
    pub fn composite(sections: Vec<Section>) -> Self {
        Self(Kind::Composite(sections))
    }

    /// Lays the section out for `width` columns.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::TooNarrow`] if the section's indentation does
    /// not leave at least one column for text.
    pub fn build(&self, width: usize) -> Result<Vec<String>> {
        match &self.0 {
            Kind::Empty(lines) => Ok(vec![String::new(); *lines]),
            Kind::Centered(text) => center(text, width),
            Kind::Header(text) => indent(text, HEADER_INDENT, width),
            Kind::Paragraph(body) => indent(body, BODY_INDENT, width),
            Kind::TwoColumn(paragraph) => paragraph.build(width),
            Kind::Composite(sections) => {
                let mut lines = Vec::new();
                for section in sections {
                    lines.extend(section.build(width)?);
                }
                Ok(lines)
            }
        }
    }
}

/// A paragraph laid out as a narrow label column next to a description
/// column.
///
/// The description column starts at
/// `first_column_indent + first_column_width + column_separator`. Callers
/// rendering a list of rows should compute `first_column_width` once, from
/// the widest label, so that all rows align.
///
/// # Examples
///
/// ```
/// use command_tree_layout::TwoColumnParagraph;
///
/// let row = TwoColumnParagraph::new(6, ["--name"], ["The name to print."]).unwrap();
/// assert_eq!(
///     row.build(40).unwrap(),
///     vec!["        --name    The name to print."]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoColumnParagraph {
    first_column_width: usize,
    first_column: Vec<String>,
    second_column: Vec<String>,
    first_column_indent: usize,
    column_separator: usize,
    empty_lines_between_paragraphs: usize,
}

impl TwoColumnParagraph {
    /// Creates a two-column paragraph with default indentation.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::FirstColumnTooNarrow`] if
    /// `first_column_width` is zero.
    pub fn new<A, B, S, T>(first_column_width: usize, first: A, second: B) -> Result<Self>
    where
        A: IntoIterator<Item = S>,
        B: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        if first_column_width == 0 {
            return Err(LayoutError::FirstColumnTooNarrow);
        }

        Ok(Self {
            first_column_width,
            first_column: first.into_iter().map(Into::into).collect(),
            second_column: second.into_iter().map(Into::into).collect(),
            first_column_indent: BODY_INDENT,
            column_separator: COLUMN_SEPARATOR,
            empty_lines_between_paragraphs: 1,
        })
    }

    /// Sets the indentation of the first column.
    pub fn with_first_column_indent(mut self, indent: usize) -> Self {
        self.first_column_indent = indent;
        self
    }

    /// Sets the gap between the columns.
    pub fn with_column_separator(mut self, separator: usize) -> Self {
        self.column_separator = separator;
        self
    }

    /// Sets the number of blank lines between paragraphs in each column.
    pub fn with_empty_lines_between_paragraphs(mut self, lines: usize) -> Self {
        self.empty_lines_between_paragraphs = lines;
        self
    }

    /// Column at which the description text starts.
    pub fn second_column_indent(&self) -> usize {
        self.first_column_indent + self.first_column_width + self.column_separator
    }

    /// Lays both columns out for `width` and overlays the first onto the
    /// second.
    pub fn build(&self, width: usize) -> Result<Vec<String>> {
        let first = join_paragraphs(&self.first_column, self.empty_lines_between_paragraphs);
        let second = join_paragraphs(&self.second_column, self.empty_lines_between_paragraphs);

        let first_lines = indent(&first, self.first_column_indent, width)?;
        let second_lines = indent(&second, self.second_column_indent(), width)?;

        Ok(overlay_columns(&second_lines, &first_lines))
    }
}

/// Lines of text built section by section under a fixed width.
///
/// Rendering terminates every line with `\n`.
#[derive(Debug, Clone)]
pub struct TextBlock {
    width: usize,
    lines: Vec<String>,
}

impl TextBlock {
    /// Creates an empty block for `width` columns.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::TooNarrow`] if `width` is zero.
    pub fn new(width: usize) -> Result<Self> {
        if width == 0 {
            return Err(LayoutError::TooNarrow { increase_by: 1 });
        }
        Ok(Self {
            width,
            lines: Vec::new(),
        })
    }

    /// The width every appended section is laid out for.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Lays out `section` and appends its lines.
    pub fn append(&mut self, section: &Section) -> Result<()> {
        let lines = section.build(self.width)?;
        self.lines.extend(lines);
        Ok(())
    }

    /// Appends a single pre-formatted line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The lines collected so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S], empty_lines: usize) -> String {
    let separator = "\n".repeat(empty_lines + 1);
    paragraphs
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&separator)
}
