//! Error report rendering
//!
//! ```text
//! addr:
//!     zip:
//!         value must be non-empty
//! age:
//!     value type is incorrect, number is expected
//! ```

use super::errors::FieldError;

/// One indentation level
pub const INDENT: &str = "    ";

/// Renders the error tree as an indented multi-line report.
pub fn render(errors: &[FieldError]) -> String {
    render_lines(errors).join("\n")
}

/// Same as [`render`], one entry per line.
pub fn render_lines(errors: &[FieldError]) -> Vec<String> {
    let mut lines = Vec::new();
    for error in errors {
        push_field(error, 0, &mut lines);
    }
    lines
}

fn push_field(error: &FieldError, depth: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}:", INDENT.repeat(depth), error.field()));

    for child in error.children() {
        push_field(child, depth + 1, lines);
    }
    for message in error.messages() {
        lines.push(format!("{}{}", INDENT.repeat(depth + 1), message));
    }
}
