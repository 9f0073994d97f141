//! Text helpers shared by the renderer and the summary line.

use std::time::Duration;

/// Round a duration to the nearest millisecond.
pub fn round_ms(d: Duration) -> Duration {
    let micros = d.as_micros();
    Duration::from_millis(((micros + 500) / 1000) as u64)
}

/// Human-readable duration: `0s`, `750ms`, `1.25s`, `2m3.5s`, `1h0m2s`.
///
/// Millisecond precision at most; sub-millisecond values fall back to
/// microseconds.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use progmeter_core::format::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1250)), "1.25s");
/// assert_eq!(format_duration(Duration::from_millis(62_500)), "1m2.5s");
/// ```
pub fn format_duration(d: Duration) -> String {
    if d.is_zero() {
        return "0s".to_string();
    }
    let total_ms = d.as_millis();
    if total_ms == 0 {
        return format!("{}µs", d.as_micros());
    }
    if total_ms < 1000 {
        return format!("{total_ms}ms");
    }

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let frac = total_ms % 1000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&secs.to_string());
    if frac > 0 {
        let digits = format!("{frac:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('s');
    out
}

/// Flatten `s` onto one terminal line: every control character (newline,
/// carriage return, tab, escape...) becomes a space.
///
/// Row addressing counts one line per item, so nothing that reaches a row
/// may move the cursor on its own.
pub fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Pad `s` with spaces on the right up to `width` characters.
pub fn right_pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}
