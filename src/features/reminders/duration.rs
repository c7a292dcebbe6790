//! Human-friendly reminder durations (`30m`, `1h30m`, `2д`).

/// Seconds per unit letter. Latin and Cyrillic letters share a table so
/// `1h` and `1ч` mean the same thing.
fn unit_seconds(unit: char) -> Option<i64> {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    match unit {
        's' | 'с' => Some(1),
        'm' | 'м' => Some(MINUTE),
        'h' | 'ч' => Some(HOUR),
        'd' | 'д' => Some(DAY),
        'w' | 'н' => Some(7 * DAY),
        'y' | 'л' => Some(365 * DAY),
        _ => None,
    }
}

/// Parse a compound duration into seconds.
///
/// Returns `None` for empty input, unknown units, a number with no unit, or
/// a total of zero.
pub fn parse_duration(time_str: &str) -> Option<i64> {
    let time_str = time_str.trim().to_lowercase();
    let mut total_seconds: i64 = 0;
    let mut current_number = String::new();

    for c in time_str.chars() {
        if c.is_ascii_digit() {
            current_number.push(c);
        } else if c.is_whitespace() {
            continue;
        } else {
            if current_number.is_empty() {
                return None;
            }
            let value: i64 = current_number.parse().ok()?;
            current_number.clear();

            let seconds = value.checked_mul(unit_seconds(c)?)?;
            total_seconds = total_seconds.checked_add(seconds)?;
        }
    }

    if !current_number.is_empty() {
        return None;
    }

    if total_seconds > 0 {
        Some(total_seconds)
    } else {
        None
    }
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

/// Format a duration in seconds into a human-readable string
pub fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        plural(seconds, "second")
    } else if seconds < 3600 {
        plural(seconds / 60, "minute")
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!("{} {}", plural(hours, "hour"), plural(mins, "minute"))
        } else {
            plural(hours, "hour")
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!("{} {}", plural(days, "day"), plural(hours, "hour"))
        } else {
            plural(days, "day")
        }
    }
}

/// Short Russian name for a unit letter (`h` and `ч` both give `час`).
pub fn unit_name(unit: char) -> Option<&'static str> {
    match unit {
        's' | 'с' => Some("сек"),
        'm' | 'м' => Some("мин"),
        'h' | 'ч' => Some("час"),
        'd' | 'д' => Some("дн"),
        'w' | 'н' => Some("нед"),
        'y' | 'л' => Some("г."),
        _ => None,
    }
}

/// Compact form with short unit names, largest unit first: `1 дн 2 час`.
/// Zero parts are left out.
pub fn format_duration_short(seconds: i64) -> String {
    let mut remaining = seconds.max(0);
    let mut parts = Vec::new();

    for unit in ['y', 'w', 'd', 'h', 'm', 's'] {
        let (Some(size), Some(name)) = (unit_seconds(unit), unit_name(unit)) else {
            continue;
        };
        let count = remaining / size;
        if count > 0 {
            parts.push(format!("{count} {name}"));
            remaining %= size;
        }
    }

    if parts.is_empty() {
        return format!("0 {}", unit_name('s').unwrap_or("s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Some(30));
        assert_eq!(parse_duration("30m"), Some(1800));
        assert_eq!(parse_duration("2h"), Some(7200));
        assert_eq!(parse_duration("1d"), Some(86400));
        assert_eq!(parse_duration("1w"), Some(604800));
        assert_eq!(parse_duration("1y"), Some(31_536_000));
        assert_eq!(parse_duration("1h30m"), Some(5400));
        assert_eq!(parse_duration("1h 30m"), Some(5400));
        assert_eq!(parse_duration("invalid"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("0m"), None);
        assert_eq!(parse_duration("15"), None);
    }

    #[test]
    fn test_parse_duration_cyrillic_units() {
        assert_eq!(parse_duration("10м"), Some(600));
        assert_eq!(parse_duration("2Ч"), Some(7200));
        assert_eq!(parse_duration("1д12ч"), Some(129_600));
        assert_eq!(parse_duration("1н"), Some(604800));
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(parse_duration("99999999999999999999y"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(30), "30 seconds");
        assert_eq!(format_duration(1), "1 second");
        assert_eq!(format_duration(60), "1 minute");
        assert_eq!(format_duration(120), "2 minutes");
        assert_eq!(format_duration(3600), "1 hour");
        assert_eq!(format_duration(3660), "1 hour 1 minute");
        assert_eq!(format_duration(86400), "1 day");
        assert_eq!(format_duration(90000), "1 day 1 hour");
    }

    #[test]
    fn test_unit_names_share_letters() {
        assert_eq!(unit_name('h'), Some("час"));
        assert_eq!(unit_name('ч'), Some("час"));
        assert_eq!(unit_name('y'), unit_name('л'));
        assert_eq!(unit_name('x'), None);
    }

    #[test]
    fn test_format_duration_short() {
        assert_eq!(format_duration_short(0), "0 сек");
        assert_eq!(format_duration_short(45), "45 сек");
        assert_eq!(format_duration_short(5400), "1 час 30 мин");
        assert_eq!(format_duration_short(93_600), "1 дн 2 час");
        assert_eq!(format_duration_short(691_200), "1 нед 1 дн");
        assert_eq!(format_duration_short(31_536_061), "1 г. 1 мин 1 сек");
        assert_eq!(
            format_duration_short(parse_duration("2д3ч").unwrap()),
            "2 дн 3 час"
        );
    }
}
