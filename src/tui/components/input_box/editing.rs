//! Byte-offset and column helpers for a single-line text field.
//!
//! The buffer is edited by byte offset but laid out by display column, so
//! wide characters (CJK, emoji) take two cells. Everything here is pure.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Byte offset of the character before `pos` (0 at the start).
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

/// Byte offset just past the character at `pos` (`text.len()` at the end).
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

/// Start of the word before `pos`: skip whitespace backwards, then the word.
pub(super) fn prev_word_start(text: &str, pos: usize) -> usize {
    let mut start = pos;
    let mut seen_word = false;
    for (i, c) in text[..pos].char_indices().rev() {
        if c.is_whitespace() {
            if seen_word {
                break;
            }
        } else {
            seen_word = true;
        }
        start = i;
    }
    if seen_word { start } else { 0 }
}

/// End of the word after `pos`: skip whitespace forwards, then the word.
pub(super) fn next_word_end(text: &str, pos: usize) -> usize {
    let mut seen_word = false;
    for (i, c) in text[pos..].char_indices() {
        if c.is_whitespace() {
            if seen_word {
                return pos + i;
            }
        } else {
            seen_word = true;
        }
    }
    text.len()
}

/// Display columns taken by `text[..pos]`.
pub(super) fn column_at(text: &str, pos: usize) -> usize {
    text[..pos].width()
}

/// The part of `text` that fits in `width` columns after skipping `skip` columns.
pub(super) fn visible_slice(text: &str, skip: usize, width: usize) -> &str {
    let mut col = 0;
    let mut start = text.len();
    let mut end = text.len();
    for (i, c) in text.char_indices() {
        let w = c.width().unwrap_or(0);
        if col >= skip && start == text.len() {
            start = i;
        }
        if col + w > skip + width {
            end = i;
            break;
        }
        col += w;
    }
    if start > end { &text[end..end] } else { &text[start..end] }
}

/// Flattens pasted text onto one line.
pub(super) fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
