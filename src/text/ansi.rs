//! ANSI escape sequence extraction, stripping, and color helpers.

/// A recognized escape sequence found inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiCode {
    pub code: String,
    pub length: usize,
}

/// Extract the escape sequence starting at byte offset `pos`, if any.
///
/// Recognizes CSI (`ESC [`), string-terminated OSC/APC/DCS (`ESC ]`, `ESC _`,
/// `ESC P`), and SS3 (`ESC O`) sequences. Returns `None` when `pos` does not
/// point at an escape byte or the sequence is unterminated.
pub fn extract_ansi_code(input: &str, pos: usize) -> Option<AnsiCode> {
    let bytes = input.as_bytes();
    if pos + 1 >= bytes.len() || bytes[pos] != 0x1b {
        return None;
    }

    let end = match bytes[pos + 1] {
        b'[' => csi_end(bytes, pos + 2)?,
        b']' | b'_' | b'P' => string_end(bytes, pos + 2)?,
        b'O' => {
            if pos + 2 >= bytes.len() {
                return None;
            }
            pos + 3
        }
        _ => return None,
    };

    Some(AnsiCode {
        code: input[pos..end].to_string(),
        length: end - pos,
    })
}

// CSI sequences end at the first byte in 0x40..=0x7e.
fn csi_end(bytes: &[u8], mut idx: usize) -> Option<usize> {
    while idx < bytes.len() {
        if (0x40..=0x7e).contains(&bytes[idx]) {
            return Some(idx + 1);
        }
        idx += 1;
    }
    None
}

// String sequences end at BEL or ST (`ESC \`).
fn string_end(bytes: &[u8], mut idx: usize) -> Option<usize> {
    while idx < bytes.len() {
        if bytes[idx] == 0x07 {
            return Some(idx + 1);
        }
        if bytes[idx] == 0x1b && idx + 1 < bytes.len() && bytes[idx + 1] == b'\\' {
            return Some(idx + 2);
        }
        idx += 1;
    }
    None
}

/// Remove every recognized escape sequence, leaving only printable text.
///
/// Unterminated sequences keep their raw bytes rather than eating the rest of
/// the line.
pub fn strip_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut idx = 0;
    while idx < input.len() {
        if let Some(ansi) = extract_ansi_code(input, idx) {
            idx += ansi.length;
            continue;
        }
        let Some(ch) = input[idx..].chars().next() else {
            break;
        };
        out.push(ch);
        idx += ch.len_utf8();
    }
    out
}

pub fn yellow(text: &str) -> String {
    format!("\x1b[33m{text}\x1b[39m")
}

pub fn red(text: &str) -> String {
    format!("\x1b[31m{text}\x1b[39m")
}

pub fn green(text: &str) -> String {
    format!("\x1b[32m{text}\x1b[39m")
}

#[cfg(test)]
mod tests {
    use super::{extract_ansi_code, strip_ansi, yellow};

    #[test]
    fn extracts_csi_sequence() {
        let ansi = extract_ansi_code("\x1b[31mred", 0).expect("csi");
        assert_eq!(ansi.code, "\x1b[31m");
        assert_eq!(ansi.length, 5);
    }

    #[test]
    fn extracts_osc_hyperlink() {
        let input = "\x1b]8;;https://example.com\x07link";
        let ansi = extract_ansi_code(input, 0).expect("osc");
        assert_eq!(ansi.length, input.len() - "link".len());
    }

    #[test]
    fn non_escape_position_returns_none() {
        assert!(extract_ansi_code("plain", 0).is_none());
    }

    #[test]
    fn strip_removes_color_codes() {
        assert_eq!(strip_ansi(&yellow("warn")), "warn");
        assert_eq!(strip_ansi("a\x1b[1mb\x1b[0mc"), "abc");
    }

    #[test]
    fn strip_keeps_unterminated_escape_bytes() {
        assert_eq!(strip_ansi("x\x1b["), "x\x1b[");
    }

    #[test]
    fn strip_preserves_unicode() {
        assert_eq!(strip_ansi("\x1b[32mπ你好\x1b[39m"), "π你好");
    }
}
