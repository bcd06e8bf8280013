//! Visible width measurement that ignores escape sequences.
//!
//! Box borders are aligned by visible column count, so width must be measured
//! on grapheme clusters with escape sequences skipped. RGI emoji report width
//! 2 regardless of what their individual scalars claim.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

use super::ansi::extract_ansi_code;

/// Terminal column width of a single grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if emoji_get(grapheme).is_some() {
        return 2;
    }
    grapheme
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

/// Terminal column width of `input` with all escape sequences skipped.
pub fn visible_width(input: &str) -> usize {
    if input.is_empty() {
        return 0;
    }

    let mut clean = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(ansi) = extract_ansi_code(input, idx) {
            idx += ansi.length;
            continue;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        clean.push(ch);
        idx += ch.len_utf8();
    }

    clean.graphemes(true).map(grapheme_width).sum()
}

#[cfg(test)]
mod tests {
    use super::visible_width;

    #[test]
    fn plain_ascii() {
        assert_eq!(visible_width("hello"), 5);
    }

    #[test]
    fn csi_codes_do_not_count() {
        assert_eq!(visible_width("hi\x1b[31m!!\x1b[0m"), 4);
    }

    #[test]
    fn osc8_links_do_not_count() {
        let input = "\x1b]8;;https://example.com\x07link\x1b]8;;\x07";
        assert_eq!(visible_width(input), 4);
    }

    #[test]
    fn cjk_is_double_width() {
        assert_eq!(visible_width("你好"), 4);
    }

    #[test]
    fn rgi_emoji_is_double_width() {
        assert_eq!(visible_width("😀"), 2);
    }

    #[test]
    fn status_glyphs_are_single_width() {
        assert_eq!(visible_width("✔"), 1);
        assert_eq!(visible_width("✖"), 1);
        assert_eq!(visible_width("⠋"), 1);
    }
}
