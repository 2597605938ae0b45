//! Plain-text table rendering.
//!
//! Both tables left-justify their first column to the longest label. The
//! error ratio table pads the label column by two extra characters and uses
//! fixed six-digit decimals; the liveness table sizes the column to at least
//! the width of its `Namespace` header. Widths are UTF-8 byte lengths while
//! padding counts characters, so non-ASCII labels get extra spaces.

use crate::report::{ErrorRatioRow, UpRow};

pub const ERROR_RATIO_HEADER: &str = "Requests/s  Errors/s  Error ratio";
pub const NAMESPACE_HEADER: &str = "Namespace";
pub const UP_HEADER: &str = "min(up)";

/// Extra spaces after the longest name in the error ratio table.
const NAME_PADDING: usize = 2;

/// Formats a float with six fractional digits, `%f` style. Special values
/// render as `+Inf`, `-Inf` and `NaN`.
pub fn format_fixed(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:.6}", value)
    }
}

fn label_width<'a>(labels: impl Iterator<Item = &'a str>) -> usize {
    labels.map(str::len).max().unwrap_or(0)
}

/// Width of the name column of the error ratio table.
pub fn error_ratio_name_width(rows: &[ErrorRatioRow]) -> usize {
    label_width(rows.iter().map(|r| r.name.as_str())) + NAME_PADDING
}

/// Width of the namespace column of the liveness table.
pub fn up_namespace_width(rows: &[UpRow]) -> usize {
    label_width(rows.iter().map(|r| r.namespace.as_str())).max(NAMESPACE_HEADER.len())
}

/// Renders the error ratio table, lines joined by `\n` without a trailing
/// newline.
pub fn render_error_ratio_table(rows: &[ErrorRatioRow]) -> String {
    let width = error_ratio_name_width(rows);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{}{}", " ".repeat(width), ERROR_RATIO_HEADER));

    for row in rows {
        lines.push(format!(
            "{:<width$}{}    {}  {}",
            row.name,
            format_fixed(row.total_rate),
            format_fixed(row.error_rate),
            format_fixed(row.error_ratio),
            width = width
        ));
    }

    lines.join("\n")
}

/// Renders the liveness table, lines joined by `\n` without a trailing
/// newline.
pub fn render_up_table(rows: &[UpRow]) -> String {
    let width = up_namespace_width(rows);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format!("{:<width$}  {}", NAMESPACE_HEADER, UP_HEADER, width = width));

    for row in rows {
        lines.push(format!(
            "{:<width$}  {}",
            row.namespace,
            row.value,
            width = width
        ));
    }

    lines.join("\n")
}
