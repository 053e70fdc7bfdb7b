use super::ValueKind;

pub const UNDEFINED_LABEL: &str = "N/A";

/// Fixed-point with thousands separators, e.g. `1,234,567.89`. Non-finite
/// values render as `N/A`.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNDEFINED_LABEL.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    if value < 0.0 && !is_zero {
        grouped.push('-');
    }
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

pub fn format_cell(value: f64, kind: ValueKind) -> String {
    format_grouped(value, kind.decimals())
}

/// `0.0364` -> `3.64%`
pub fn format_percent(rate: f64) -> String {
    if !rate.is_finite() {
        return UNDEFINED_LABEL.to_string();
    }
    format!("{:.2}%", rate * 100.0)
}
