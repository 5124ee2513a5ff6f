/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let fixed = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Abbreviate large values for chart axes: `950`, `1.2k`, `3.4M`, `5.0G`.
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_compact;
///
/// assert_eq!(format_compact(950.0), "950");
/// assert_eq!(format_compact(1_200.0), "1.2k");
/// assert_eq!(format_compact(3_400_000.0), "3.4M");
/// ```
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "k")];
    let abs = value.abs();
    for (scale, suffix) in UNITS {
        if abs >= scale {
            return format!("{:.1}{}", value / scale, suffix);
        }
    }
    format!("{:.0}", value)
}

/// Format a duration in minutes: `"45m"`, `"3h"`, `"3h 45m"`, `"2d 4h"`.
///
/// Negative durations keep their sign; they occur in accounting data when a
/// job has not started (`time_start` = 0).
///
/// # Examples
///
/// ```
/// use report_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(45.0), "45m");
/// assert_eq!(format_minutes(180.0), "3h");
/// assert_eq!(format_minutes(225.0), "3h 45m");
/// assert_eq!(format_minutes(3120.0), "2d 4h");
/// assert_eq!(format_minutes(-30.0), "-30m");
/// ```
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();

    let days = total / (24 * 60);
    let hours = (total % (24 * 60)) / 60;
    let mins = total % 60;

    let body = if days > 0 {
        if hours == 0 {
            format!("{}d", days)
        } else {
            format!("{}d {}h", days, hours)
        }
    } else if hours > 0 {
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    } else {
        format!("{}m", mins)
    };
    format!("{}{}", sign, body)
}

/// Truncate `s` to at most `max` characters, ending with `…` when cut.
pub fn truncate_label(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
