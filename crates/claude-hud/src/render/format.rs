//! Number, duration and sparkline formatting for dashboard text.

use chrono::TimeDelta;

/// Compact token count: `1.2M`, `12k`, `950`.
pub fn format_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.0}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Token count with one decimal in the thousands: `12.3k`.
pub fn format_tokens_precise(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Tokens-per-minute text; `--` when idle. Negative rates keep their sign.
pub fn format_burn_rate(rate: i64) -> String {
    if rate == 0 {
        return "--".to_string();
    }
    let sign = if rate < 0 { "-" } else { "" };
    format!("{sign}{}/min", format_tokens(rate.unsigned_abs()))
}

/// Short elapsed time: `<1s`, `42s`, `3m5s`.
pub fn format_elapsed(ms: i64) -> String {
    if ms < 1_000 {
        return "<1s".to_string();
    }
    if ms < 60_000 {
        return format!("{}s", (ms as f64 / 1_000.0).round() as i64);
    }
    let mins = ms / 60_000;
    let secs = ((ms % 60_000) as f64 / 1_000.0).round() as i64;
    format!("{mins}m{secs}s")
}

/// Session length: `<1m`, `12m`, `1h 5m`.
pub fn format_session_duration(ms: i64) -> String {
    let elapsed = TimeDelta::milliseconds(ms.max(0));
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() % 60;
    match (hours, minutes) {
        (0, 0) => "<1m".to_string(),
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Scale the last `width` values onto eight bar heights between their own
/// minimum and maximum. A flat series renders at the lowest level.
pub fn sparkline(values: &[u64], width: usize) -> String {
    let values = &values[values.len().saturating_sub(width)..];
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let range = (max - min) as f64;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    values
        .iter()
        .map(|&v| {
            if range == 0.0 {
                return SPARK_LEVELS[0];
            }
            let level = ((v - min) as f64 / range * top).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_counts() {
        assert_eq!(format_tokens(950), "950");
        assert_eq!(format_tokens(12_400), "12k");
        assert_eq!(format_tokens(1_240_000), "1.2M");
        assert_eq!(format_tokens_precise(12_340), "12.3k");
        assert_eq!(format_tokens_precise(999), "999");
    }

    #[test]
    fn burn_rates() {
        assert_eq!(format_burn_rate(0), "--");
        assert_eq!(format_burn_rate(4_200), "4k/min");
        assert_eq!(format_burn_rate(-15_000), "-15k/min");
    }

    #[test]
    fn elapsed() {
        assert_eq!(format_elapsed(0), "<1s");
        assert_eq!(format_elapsed(999), "<1s");
        assert_eq!(format_elapsed(42_000), "42s");
        assert_eq!(format_elapsed(185_000), "3m5s");
    }

    #[test]
    fn session_duration() {
        assert_eq!(format_session_duration(30_000), "<1m");
        assert_eq!(format_session_duration(12 * 60_000), "12m");
        assert_eq!(format_session_duration(65 * 60_000), "1h 5m");
        assert_eq!(format_session_duration(-1), "<1m");
    }

    #[test]
    fn sparkline_scales_to_range() {
        assert_eq!(sparkline(&[], 10), "");
        assert_eq!(sparkline(&[5, 5, 5], 10), "▁▁▁");
        assert_eq!(sparkline(&[0, 7, 14], 10), "▁▅█");
        // Only the trailing window is drawn.
        assert_eq!(sparkline(&[100, 0, 1], 2), "▁█");
    }
}
