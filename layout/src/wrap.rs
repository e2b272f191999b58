//! Greedy word wrapping.
//!
//! [`wrap`] is the single formatting primitive the rest of the crate builds
//! on. It packs space-separated words into lines of at most `width`
//! characters, honors embedded `\n` as forced breaks, and hard-splits only
//! those words that could never fit a line on their own.
//!
//! Widths are measured in `char`s.
//!
//! # Examples
//!
//! ```
//! use command_tree_layout::wrap;
//!
//! let lines = wrap("the quick brown fox", 9).unwrap();
//! assert_eq!(lines, vec!["the quick", "brown fox"]);
//!
//! let lines = wrap("first\nsecond", 20).unwrap();
//! assert_eq!(lines, vec!["first", "second"]);
//! ```

use crate::error::{LayoutError, Result};

/// A unit of pending input: either a word or a forced line break.
enum Token {
    Word(String),
    Break,
}

/// The line currently being filled, with its length tracked in `char`s.
#[derive(Default)]
struct LineBuffer {
    text: String,
    len: usize,
}

impl LineBuffer {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push_word(&mut self, word: &str, with_space: bool) {
        if with_space {
            self.text.push(' ');
            self.len += 1;
        }
        self.text.push_str(word);
        self.len += word.chars().count();
    }

    fn take(&mut self) -> String {
        self.len = 0;
        std::mem::take(&mut self.text)
    }
}

/// Wraps `text` into lines no longer than `width` characters.
///
/// Words are separated by single spaces; consecutive spaces produce empty
/// words, which are kept so that no input character is dropped. A `\n`
/// inside a word ends the current line. A word longer than `width` is split
/// across lines, filling whatever room is left on the current one first.
///
/// # Errors
///
/// Returns [`LayoutError::TooNarrow`] if `width` is zero.
///
/// # Examples
///
/// ```
/// use command_tree_layout::wrap;
///
/// // Over-long words are split, everything else moves to the next line.
/// let lines = wrap("ab abcdefgh", 5).unwrap();
/// assert_eq!(lines, vec!["ab ab", "cdefg", "h"]);
///
/// assert!(wrap("anything", 0).is_err());
/// ```
pub fn wrap(text: &str, width: usize) -> Result<Vec<String>> {
    if width == 0 {
        return Err(LayoutError::TooNarrow { increase_by: 1 });
    }

    let mut pending: Vec<Token> = text
        .split(' ')
        .rev()
        .map(|word| Token::Word(word.to_string()))
        .collect();
    let mut line = LineBuffer::default();
    let mut lines = Vec::new();

    while let Some(token) = pending.pop() {
        let word = match token {
            Token::Break => {
                lines.push(line.take());
                continue;
            }
            Token::Word(word) => word,
        };

        if let Some(index) = word.find('\n') {
            let before = &word[..index];
            let after = &word[index + 1..];
            if !after.is_empty() {
                pending.push(Token::Word(after.to_string()));
            }
            pending.push(Token::Break);
            pending.push(Token::Word(before.to_string()));
            continue;
        }

        let with_space = !line.is_empty();
        let space = usize::from(with_space);
        let word_len = word.chars().count();

        if line.len + space + word_len <= width {
            line.push_word(&word, with_space);
            if line.len == width {
                lines.push(line.take());
            }
            continue;
        }

        if word_len > width {
            let room = width.saturating_sub(line.len + space);
            if room == 0 {
                lines.push(line.take());
                pending.push(Token::Word(word));
                continue;
            }

            let (head, tail) = split_at_char(&word, room);
            line.push_word(head, with_space);
            pending.push(Token::Word(tail.to_string()));
            continue;
        }

        lines.push(line.take());
        line.push_word(&word, false);
    }

    if !line.is_empty() {
        lines.push(line.take());
    }

    Ok(lines)
}

/// Wraps `text` into `width - indent` columns and prefixes every line with
/// `indent` spaces.
///
/// # Errors
///
/// Returns [`LayoutError::TooNarrow`] if `indent` leaves no room for text.
///
/// # Examples
///
/// ```
/// use command_tree_layout::indent;
///
/// let lines = indent("one two three", 4, 12).unwrap();
/// assert_eq!(lines, vec!["    one two", "    three"]);
/// ```
pub fn indent(text: &str, indent: usize, width: usize) -> Result<Vec<String>> {
    if indent >= width {
        return Err(LayoutError::TooNarrow {
            increase_by: indent - width + 1,
        });
    }

    let padding = " ".repeat(indent);
    Ok(wrap(text, width - indent)?
        .into_iter()
        .map(|line| format!("{padding}{line}"))
        .collect())
}

/// Wraps `text` and centers each resulting line within `width` columns.
///
/// A line is shifted right by half of its free space, but only when at
/// least two columns are free.
///
/// # Examples
///
/// ```
/// use command_tree_layout::center;
///
/// assert_eq!(center("abc", 9).unwrap(), vec!["   abc"]);
/// assert_eq!(center("abcdefgh", 9).unwrap(), vec!["abcdefgh"]);
/// ```
pub fn center(text: &str, width: usize) -> Result<Vec<String>> {
    Ok(wrap(text, width)?
        .into_iter()
        .map(|line| {
            let free = width - line.chars().count();
            if free >= 2 {
                format!("{}{line}", " ".repeat(free / 2))
            } else {
                line
            }
        })
        .collect())
}

/// Overlays `overlay` onto the start of each corresponding `base` line.
///
/// For every index present in both sequences the result is the overlay line
/// followed by the base line's remainder after the overlay's length. Lines
/// beyond the shorter sequence are taken unchanged from the longer one.
///
/// # Examples
///
/// ```
/// use command_tree_layout::overlay_columns;
///
/// let base = vec!["           desc".to_string(), "           more".to_string()];
/// let overlay = vec!["  label".to_string()];
/// assert_eq!(
///     overlay_columns(&base, &overlay),
///     vec!["  label    desc", "           more"]
/// );
/// ```
pub fn overlay_columns(base: &[String], overlay: &[String]) -> Vec<String> {
    let shared = base.len().min(overlay.len());
    let mut merged: Vec<String> = base
        .iter()
        .zip(overlay)
        .map(|(under, over)| {
            let skip = over.chars().count();
            let rest: String = under.chars().skip(skip).collect();
            format!("{over}{rest}")
        })
        .collect();

    let longer = if base.len() >= overlay.len() {
        base
    } else {
        overlay
    };
    merged.extend(longer[shared..].iter().cloned());
    merged
}

fn split_at_char(word: &str, chars: usize) -> (&str, &str) {
    let byte = word
        .char_indices()
        .nth(chars)
        .map_or(word.len(), |(index, _)| index);
    word.split_at(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_packs_words_greedily() {
        let lines = wrap("aa bb cc dd", 5).unwrap();
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn test_wrap_flushes_exactly_filled_line() {
        let lines = wrap("abcde fg", 5).unwrap();
        assert_eq!(lines, vec!["abcde", "fg"]);
    }

    #[test]
    fn test_wrap_hard_splits_long_word_after_partial_line() {
        let lines = wrap("ab abcdefgh", 5).unwrap();
        assert_eq!(lines, vec!["ab ab", "cdefg", "h"]);
    }

    #[test]
    fn test_wrap_hard_splits_long_word_on_empty_line() {
        let lines = wrap("abcdefghijk", 4).unwrap();
        assert_eq!(lines, vec!["abcd", "efgh", "ijk"]);
    }

    #[test]
    fn test_wrap_long_word_with_no_room_left_starts_new_line() {
        // "abcd" leaves no room for a space plus a character.
        let lines = wrap("abcd efghijk", 5).unwrap();
        assert_eq!(lines, vec!["abcd", "efghi", "jk"]);
    }

    #[test]
    fn test_wrap_honors_hard_breaks() {
        let lines = wrap("one\ntwo three", 20).unwrap();
        assert_eq!(lines, vec!["one", "two three"]);
    }

    #[test]
    fn test_wrap_double_break_yields_blank_line() {
        let lines = wrap("first\n\nsecond", 20).unwrap();
        assert_eq!(lines, vec!["first", "", "second"]);
    }

    #[test]
    fn test_wrap_trailing_break_adds_nothing() {
        let lines = wrap("first\n", 20).unwrap();
        assert_eq!(lines, vec!["first"]);
    }

    #[test]
    fn test_wrap_empty_text_yields_no_lines() {
        assert!(wrap("", 10).unwrap().is_empty());
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let lines = wrap("ééé ééé", 3).unwrap();
        assert_eq!(lines, vec!["ééé", "ééé"]);
    }

    #[test]
    fn test_wrap_rejects_zero_width() {
        assert_eq!(
            wrap("text", 0),
            Err(LayoutError::TooNarrow { increase_by: 1 })
        );
    }

    #[test]
    fn test_indent_reports_missing_columns() {
        assert_eq!(
            indent("text", 8, 6),
            Err(LayoutError::TooNarrow { increase_by: 3 })
        );
    }

    #[test]
    fn test_center_pads_by_half_of_free_space() {
        assert_eq!(center("ab", 7).unwrap(), vec!["  ab"]);
        assert_eq!(center("abcde", 6).unwrap(), vec!["abcde"]);
    }

    #[test]
    fn test_overlay_keeps_longer_overlay_tail() {
        let base = vec!["      x".to_string()];
        let overlay = vec!["  a".to_string(), "  b".to_string()];
        assert_eq!(overlay_columns(&base, &overlay), vec!["  a   x", "  b"]);
    }

    #[test]
    fn test_overlay_with_short_base_line() {
        let base = vec!["".to_string()];
        let overlay = vec!["  label".to_string()];
        assert_eq!(overlay_columns(&base, &overlay), vec!["  label"]);
    }

    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        fn sentence(max_word: usize) -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec(
                prop::string::string_regex(&format!("[a-z]{{1,{max_word}}}"))
                    .expect("valid regex"),
                0..30,
            )
        }

        proptest! {
            #[test]
            fn lines_never_exceed_width(
                text in "[a-z \\n]{0,120}",
                width in 1usize..40,
            ) {
                for line in wrap(&text, width).unwrap() {
                    prop_assert!(line.chars().count() <= width, "{line:?} exceeds {width}");
                }
            }

            #[test]
            fn joining_lines_restores_text(words in sentence(10), width in 10usize..40) {
                let text = words.join(" ");
                let rejoined = wrap(&text, width).unwrap().join(" ");
                prop_assert_eq!(rejoined, text);
            }

            #[test]
            fn no_characters_are_dropped(text in "[a-z]{0,20}( [a-z]{0,30}){0,10}", width in 1usize..12) {
                let kept: usize = wrap(&text, width)
                    .unwrap()
                    .iter()
                    .map(|line| line.chars().filter(|c| *c != ' ').count())
                    .sum();
                let original = text.chars().filter(|c| *c != ' ').count();
                prop_assert_eq!(kept, original);
            }
        }
    }
}
