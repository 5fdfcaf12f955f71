// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy word wrapping with long-word splitting.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// One laid-out line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// The text of the line, without the separator that ended it.
    pub text: String,
    /// Measured width of `text`.
    pub width: f64,
    /// Char index of the first character of the line in the source text.
    pub start: usize,
}

impl Line {
    fn new(text: String, start: usize, measure: &impl Fn(&str) -> f64) -> Self {
        let width = measure(&text);
        Self { text, width, start }
    }

    /// Number of chars in the line.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Char index one past the last character of the line in the source text.
    pub fn end(&self) -> usize {
        self.start + self.char_len()
    }
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Paragraphs (separated by `\n`) always start a new line. Inside a paragraph
/// words (separated by single spaces) are added to the current line while the
/// line still fits. The bound is inclusive: a line measuring exactly
/// `max_width` fits, matching the fragments of [`split_word`]. A word that is wider than `max_width` on its own is split
/// with [`split_word`]; the line built so far is closed first.
///
/// A `NaN` or infinite width disables wrapping, leaving only paragraph breaks.
/// An empty text yields one empty line.
pub fn wrap(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    for paragraph in text.split('\n') {
        if max_width.is_nan() || max_width == f64::INFINITY {
            lines.push(Line::new(paragraph.to_string(), start, &measure));
        } else {
            wrap_paragraph(paragraph, start, max_width, &measure, &mut lines);
        }
        start += paragraph.chars().count() + 1;
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    start: usize,
    max_width: f64,
    measure: &impl Fn(&str) -> f64,
    lines: &mut Vec<Line>,
) {
    let mut current = String::new();
    let mut current_start = start;
    let mut word_start = start;
    for (i, word) in paragraph.split(' ').enumerate() {
        let word_len = word.chars().count();
        if measure(word) > max_width {
            if !current.is_empty() {
                lines.push(Line::new(core::mem::take(&mut current), current_start, measure));
            }
            let mut fragments = split_word(word, max_width, measure);
            let last = fragments.pop().unwrap_or_default();
            let mut offset = word_start;
            for fragment in fragments {
                let len = fragment.chars().count();
                lines.push(Line::new(fragment, offset, measure));
                offset += len;
            }
            current = last;
            current_start = offset;
        } else if i == 0 {
            current.push_str(word);
        } else {
            let mut candidate = String::with_capacity(current.len() + 1 + word.len());
            candidate.push_str(&current);
            candidate.push(' ');
            candidate.push_str(word);
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(Line::new(core::mem::take(&mut current), current_start, measure));
                current.push_str(word);
                current_start = word_start;
            }
        }
        word_start += word_len + 1;
    }
    lines.push(Line::new(current, current_start, measure));
}

/// Split a single word into fragments that each measure at most `max_width`.
///
/// Each fragment is the longest prefix of the remainder that fits, found by
/// binary search, and holds at least one char even if that char alone is too
/// wide. Concatenating the fragments reproduces `word`.
pub fn split_word(word: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut rest = word;
    while !rest.is_empty() {
        let boundaries: Vec<usize> = rest
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(core::iter::once(rest.len()))
            .collect();
        // `boundaries[k]` is the byte end of the prefix with `k + 1` chars.
        let (mut lo, mut hi) = (0, boundaries.len() - 1);
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            if measure(&rest[..boundaries[mid]]) <= max_width {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        let (head, tail) = rest.split_at(boundaries[lo]);
        fragments.push(head.to_string());
        rest = tail;
    }
    if fragments.is_empty() {
        fragments.push(String::new());
    }
    fragments
}

/// Split `text` on explicit line breaks only.
pub fn split_lines(text: &str, measure: impl Fn(&str) -> f64) -> Vec<Line> {
    wrap(text, f64::NAN, measure)
}
