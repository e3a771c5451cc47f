//! Tab / Shift+Tab handling for outline editors.
//!
//! Cursors are byte offsets into the text. Offsets past the end are clamped, and offsets that
//! fall inside a multi-byte character are moved back to the previous boundary.

/// Result of an indentation edit: the new text and where the cursor ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// Inserts one tab at the start of the line containing `cursor`.
pub fn indent_line(text: &str, cursor: usize) -> Edit {
    let cursor = clamp_cursor(text, cursor);
    let start = line_start(text, cursor);

    let mut out = String::with_capacity(text.len() + 1);
    out.push_str(&text[..start]);
    out.push('\t');
    out.push_str(&text[start..]);
    Edit {
        text: out,
        cursor: cursor + 1,
    }
}

/// Removes one leading tab from the line containing `cursor`, if there is one.
pub fn outdent_line(text: &str, cursor: usize) -> Edit {
    let cursor = clamp_cursor(text, cursor);
    let start = line_start(text, cursor);

    if !text[start..].starts_with('\t') {
        return Edit {
            text: text.to_string(),
            cursor,
        };
    }

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..start]);
    out.push_str(&text[start + 1..]);
    Edit {
        text: out,
        cursor: cursor.saturating_sub(1).max(start),
    }
}

fn clamp_cursor(text: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(text.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
}
