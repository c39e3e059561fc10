use chrono::{DateTime, Utc};

fn plural(n: i64, singular: &str, plural: &str) -> String {
    format!("há {} {}", n, if n == 1 { singular } else { plural })
}

/// Human-readable age of `timestamp` relative to `now`.
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();
    if seconds < 60 {
        return "agora mesmo".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minuto", "minutos");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hora", "horas");
    }

    plural(hours / 24, "dia", "dias")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(d: Duration) -> String {
        let now: DateTime<Utc> = "2025-01-22T12:00:00Z".parse().unwrap();
        format_time_ago(now - d, now)
    }

    #[test]
    fn test_just_now() {
        assert_eq!(ago(Duration::seconds(0)), "agora mesmo");
        assert_eq!(ago(Duration::seconds(59)), "agora mesmo");
        assert_eq!(ago(Duration::seconds(-30)), "agora mesmo");
    }

    #[test]
    fn test_units_and_plurals() {
        assert_eq!(ago(Duration::seconds(60)), "há 1 minuto");
        assert_eq!(ago(Duration::minutes(59)), "há 59 minutos");
        assert_eq!(ago(Duration::hours(1)), "há 1 hora");
        assert_eq!(ago(Duration::hours(5)), "há 5 horas");
        assert_eq!(ago(Duration::hours(24)), "há 1 dia");
        assert_eq!(ago(Duration::days(3)), "há 3 dias");
    }
}
