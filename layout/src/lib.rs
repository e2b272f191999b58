//! Width-aware text layout for command-line help screens.
//!
//! This crate provides the formatting primitives used to render help and
//! error output:
//!
//! - [`wrap`]: greedy word wrapping that honors hard line breaks and
//!   splits only words longer than the line.
//! - [`indent`], [`center`]: wrapping with a left margin or centered.
//! - [`overlay_columns`]: line-by-line merge used for label/description
//!   rows.
//! - [`Section`] and [`TwoColumnParagraph`]: validated building blocks that
//!   lower to lines for a given width.
//! - [`TextBlock`]: accumulates sections under one width limit.
//!
//! Every line produced by this crate fits within the width it was built
//! for. A width that cannot accommodate a section's indentation is reported
//! as [`LayoutError::TooNarrow`] rather than clamped.
//!
//! # Example
//!
//! ```
//! use command_tree_layout::*;
//!
//! let mut block = TextBlock::new(32).unwrap();
//! block.append(&Section::header("Options:").unwrap()).unwrap();
//! block.append(&Section::empty(1).unwrap()).unwrap();
//! block
//!     .append(&Section::two_column(
//!         TwoColumnParagraph::new(6, ["--name"], ["Name of the dog."]).unwrap(),
//!     ))
//!     .unwrap();
//!
//! let lines = block.lines();
//! assert_eq!(lines[0], "    Options:");
//! assert_eq!(lines[2], "        --name    Name of the");
//! assert_eq!(lines[3], "                  dog.");
//! assert!(lines.iter().all(|line| line.chars().count() <= 32));
//! ```

mod error;
mod section;
mod wrap;

pub use error::{LayoutError, Result};
pub use section::{
    BODY_INDENT, COLUMN_SEPARATOR, HEADER_INDENT, Section, TextBlock, TwoColumnParagraph,
};
pub use wrap::{center, indent, overlay_columns, wrap};
