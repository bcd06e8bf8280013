//! ANSI-preserving clipping and padding.

use unicode_segmentation::UnicodeSegmentation;

use super::ansi::extract_ansi_code;
use super::width::{grapheme_width, visible_width};

const ANSI_RESET: &str = "\x1b[0m";
const ELLIPSIS: &str = "...";

/// Clip `text` to at most `max_width` visible columns, appending `...` when
/// anything was cut.
///
/// Escape sequences are carried through untouched so a clipped colored line
/// keeps its styling, and a reset is emitted before the ellipsis so the
/// marker itself is never styled.
pub fn clip_to_width(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if visible_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = visible_width(ELLIPSIS);
    let target_width = max_width.saturating_sub(ellipsis_width);
    if target_width == 0 {
        return ELLIPSIS.chars().take(max_width).collect();
    }

    let mut clipped = String::new();
    let mut current_width = 0;
    let mut idx = 0;
    while idx < text.len() {
        if let Some(ansi) = extract_ansi_code(text, idx) {
            clipped.push_str(&ansi.code);
            idx += ansi.length;
            continue;
        }

        let run_end = next_escape_or_end(text, idx);
        for grapheme in text[idx..run_end].graphemes(true) {
            let width = grapheme_width(grapheme);
            if current_width + width > target_width {
                clipped.push_str(ANSI_RESET);
                clipped.push_str(ELLIPSIS);
                return clipped;
            }
            clipped.push_str(grapheme);
            current_width += width;
        }
        idx = run_end;
    }

    clipped.push_str(ANSI_RESET);
    clipped.push_str(ELLIPSIS);
    clipped
}

/// Pad `text` with trailing spaces to exactly `width` visible columns.
pub fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(text));
    let mut out = String::with_capacity(text.len() + pad);
    out.push_str(text);
    out.extend(std::iter::repeat(' ').take(pad));
    out
}

fn next_escape_or_end(input: &str, mut idx: usize) -> usize {
    while idx < input.len() {
        if extract_ansi_code(input, idx).is_some() {
            break;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        idx += ch.len_utf8();
    }
    idx
}
