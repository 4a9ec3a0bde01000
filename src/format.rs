// Display formatting for widget metrics

use chrono::{DateTime, Local};

/// Shown in place of any metric that has no valid value.
pub const PLACEHOLDER: &str = "—";

const SECS_PER_DAY: f64 = 86_400.0;
const SECS_PER_HOUR: f64 = 3_600.0;
const SECS_PER_MINUTE: f64 = 60.0;

/// Formats total uptime seconds as `"{d}d {h}h {m}m"`, `"{h}h {m}m"` or `"{m}m"`,
/// dropping leading zero units. Negative, non-finite, or day counts past `u64::MAX`
/// yield [`PLACEHOLDER`].
pub fn format_uptime(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return PLACEHOLDER.to_string();
    }
    let days = (secs / SECS_PER_DAY).floor();
    if days >= u64::MAX as f64 {
        return PLACEHOLDER.to_string();
    }
    let days = days as u64;
    let hours = ((secs % SECS_PER_DAY) / SECS_PER_HOUR).floor() as u64;
    let minutes = ((secs % SECS_PER_HOUR) / SECS_PER_MINUTE).floor() as u64;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats a percentage with one decimal and a trailing `%`.
///
/// Rounds half away from zero on the scaled value (`12.25` -> `12.3%`), unlike
/// `{:.1}` alone which rounds exact ties to even.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let rounded = (value * 10.0).round() / 10.0;
    if !rounded.is_finite() {
        return PLACEHOLDER.to_string();
    }
    // -0.04 rounds to -0.0; show it as 0.0.
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}%")
}

/// Short local wall-clock label for the "last updated" display.
pub fn last_updated_label(at: DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}
