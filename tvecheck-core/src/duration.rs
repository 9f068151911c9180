//! Human-readable failure durations.

use chrono::TimeDelta;

/// Renders how long a channel has been failing, at the coarsest unit.
///
/// Days if at least one day has passed, otherwise hours, otherwise
/// minutes, otherwise `"just now"`. Negative spans (clock moved backwards)
/// also read as `"just now"`.
pub fn format_failure_duration(elapsed: TimeDelta) -> String {
    let days = elapsed.num_days();
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes();

    if days > 0 {
        plural(days, "day")
    } else if hours > 0 {
        plural(hours, "hour")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "just now".to_string()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days() {
        assert_eq!(format_failure_duration(TimeDelta::days(1)), "1 day");
        assert_eq!(format_failure_duration(TimeDelta::days(2)), "2 days");
        assert_eq!(
            format_failure_duration(TimeDelta::days(1) + TimeDelta::hours(23)),
            "1 day"
        );
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_failure_duration(TimeDelta::hours(1)), "1 hour");
        assert_eq!(
            format_failure_duration(TimeDelta::hours(23) + TimeDelta::minutes(59)),
            "23 hours"
        );
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_failure_duration(TimeDelta::minutes(1)), "1 minute");
        assert_eq!(format_failure_duration(TimeDelta::minutes(59)), "59 minutes");
    }

    #[test]
    fn test_just_now() {
        assert_eq!(format_failure_duration(TimeDelta::zero()), "just now");
        assert_eq!(format_failure_duration(TimeDelta::seconds(59)), "just now");
        assert_eq!(format_failure_duration(TimeDelta::seconds(-30)), "just now");
        assert_eq!(format_failure_duration(TimeDelta::days(-3)), "just now");
    }
}
