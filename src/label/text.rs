//! Multi-line text shaping for label fields.

use tracing::debug;

/// ZPL field-data line break (used inside `^FB` field blocks)
pub const ZPL_LINE_BREAK: &str = r"\&";

/// Collapse free text into at most `max_lines` lines joined by the ZPL
/// line break.
///
/// Lines are trimmed and blank lines dropped. Lines beyond the cap are
/// discarded; nothing else is escaped or removed.
///
/// ```
/// use labelprint::label::format_textbox;
///
/// assert_eq!(format_textbox(Some("a\n\nb \n c"), 2), r"a\&b");
/// assert_eq!(format_textbox(None, 3), "");
/// ```
pub fn format_textbox(text: Option<&str>, max_lines: usize) -> String {
    format_textbox_with(text, max_lines, ZPL_LINE_BREAK)
}

/// [`format_textbox`] with a custom line separator.
pub fn format_textbox_with(text: Option<&str>, max_lines: usize, separator: &str) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() > max_lines {
        debug!(
            lines = lines.len(),
            max_lines, "Text box truncated"
        );
    }

    lines
        .into_iter()
        .take(max_lines)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Greedy word wrap at `width` characters.
///
/// Whitespace (including newlines) separates words and is collapsed.
/// Words longer than `width` are broken across lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        // Break words that can never fit on a line of their own
        while chars.len() > width {
            let room = if current_len == 0 {
                width
            } else {
                width.saturating_sub(current_len + 1)
            };
            if room == 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }
            let head: String = chars.drain(..room).collect();
            if current_len > 0 {
                current.push(' ');
            }
            current.push_str(&head);
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if chars.is_empty() {
            continue;
        }

        let word_len = chars.len();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }

    if current_len > 0 {
        lines.push(current);
    }

    lines
}

/// Make a value safe for a ZPL `^FD` field.
///
/// `^` and `~` start ZPL commands; inside field data they would terminate
/// the field early. Line breaks are flattened to spaces.
pub fn sanitize_zpl(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '^' | '~' | '\n' | '\r' => ' ',
            other => other,
        })
        .collect()
}
