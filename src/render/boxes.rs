//! Bordered-box drawing primitive.
//!
//! A box is a title row plus one or more body sections, framed by a
//! configurable border character set. Nested boxes are produced by feeding a
//! rendered child box back in as a body section of its parent.

use crate::text::truncate::pad_to_width;
use crate::text::width::visible_width;

/// Border character set used when drawing boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Unicode line-drawing characters.
    #[default]
    Unicode,
    /// Plain `+`/`-`/`|`, safe for transcripts and dumb terminals.
    Ascii,
}

struct BorderChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
    left_tee: char,
    right_tee: char,
}

const UNICODE_CHARS: BorderChars = BorderChars {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
    left_tee: '├',
    right_tee: '┤',
};

const ASCII_CHARS: BorderChars = BorderChars {
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    horizontal: '-',
    vertical: '|',
    left_tee: '+',
    right_tee: '+',
};

impl BorderStyle {
    fn chars(self) -> &'static BorderChars {
        match self {
            BorderStyle::Unicode => &UNICODE_CHARS,
            BorderStyle::Ascii => &ASCII_CHARS,
        }
    }
}

/// Draw a box with `title` and body `sections`, one line per returned entry.
///
/// Sections are separated by tee rules; an empty section renders as a single
/// blank body row, so a box always has a body. Width adapts to the widest
/// line (ANSI-aware), with one space of horizontal padding.
pub fn draw_box(title: &str, sections: &[Vec<String>], style: BorderStyle) -> Vec<String> {
    let chars = style.chars();

    let mut inner_width = visible_width(title);
    for section in sections {
        for line in section {
            inner_width = inner_width.max(visible_width(line));
        }
    }

    let rule: String = std::iter::repeat(chars.horizontal)
        .take(inner_width + 2)
        .collect();
    let body_row = |line: &str| {
        format!(
            "{} {} {}",
            chars.vertical,
            pad_to_width(line, inner_width),
            chars.vertical
        )
    };

    let mut out = Vec::new();
    out.push(format!("{}{}{}", chars.top_left, rule, chars.top_right));
    out.push(body_row(title));

    let render_section = |out: &mut Vec<String>, section: &[String]| {
        out.push(format!("{}{}{}", chars.left_tee, rule, chars.right_tee));
        if section.is_empty() {
            out.push(body_row(""));
        } else {
            for line in section {
                out.push(body_row(line));
            }
        }
    };

    if sections.is_empty() {
        render_section(&mut out, &[]);
    } else {
        for section in sections {
            render_section(&mut out, section);
        }
    }

    out.push(format!(
        "{}{}{}",
        chars.bottom_left, rule, chars.bottom_right
    ));
    out
}
