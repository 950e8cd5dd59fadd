use chrono::{DateTime, Utc};

/// Format a timestamp for display (day/month/year, 24h clock)
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

/// Short date without the time component
pub fn format_day(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Human-readable age of a timestamp, rounding half-units up
pub fn relative_age(when: &DateTime<Utc>) -> String {
    let minutes = (Utc::now() - *when).num_minutes();
    if minutes < 1 {
        // Negative covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_date() {
        let dt = DateTime::parse_from_rfc3339("2025-03-09T14:05:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_date(&dt), "09/03/2025 14:05");
        assert_eq!(format_day(&dt), "09/03/2025");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Éternel retour", 10), "Éternel...");
    }

    #[test]
    fn test_relative_age() {
        assert_eq!(relative_age(&(Utc::now() + Duration::minutes(2))), "just now");
        assert_eq!(relative_age(&(Utc::now() - Duration::minutes(5))), "5m ago");
        // 1h 45m rounds up to 2h
        assert_eq!(relative_age(&(Utc::now() - Duration::minutes(105))), "2h ago");
        assert_eq!(relative_age(&(Utc::now() - Duration::minutes(70))), "1h ago");
        // 1d 13h rounds up to 2d
        assert_eq!(relative_age(&(Utc::now() - Duration::hours(37))), "2d ago");
        assert_eq!(relative_age(&(Utc::now() - Duration::hours(26))), "1d ago");
    }
}
