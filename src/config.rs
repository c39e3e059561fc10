use std::time::Duration;

use crate::errors::AppError;
use crate::notification::bus::{BusConfig, DEFAULT_EMIT_PROBABILITY, DEFAULT_TICK_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between bus ticks.
    /// Set via NEXFLOOR_TICK_SECS env var. Default: 30.
    pub tick_secs: u64,
    /// Chance that a tick produces a notification.
    /// Set via NEXFLOOR_EMIT_PROBABILITY env var. Default: 0.3.
    pub emit_probability: f64,
    /// Fixed RNG seed for reproducible feeds (NEXFLOOR_SEED).
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_secs: DEFAULT_TICK_INTERVAL.as_secs(),
            emit_probability: DEFAULT_EMIT_PROBABILITY,
            seed: None,
        }
    }
}

impl Config {
    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            tick_interval: Duration::from_secs(self.tick_secs),
            emit_probability: self.emit_probability,
            seed: self.seed,
            ..BusConfig::default()
        }
    }
}

/// Parse `raw`, falling back to `default` (with a warning) when it is unset
/// or malformed.
fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(var = name, value = %v, fallback = %default, "unparseable config value");
            default
        }),
    }
}

/// Parse NEXFLOOR_LOG_FORMAT. Anything other than `json` means text. Read
/// by the binary before the subscriber is installed, so it cannot log.
pub fn log_format(raw: Option<&str>) -> LogFormat {
    match raw.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let defaults = Config::default();

    let emit_probability = parse_or(
        "NEXFLOOR_EMIT_PROBABILITY",
        get("NEXFLOOR_EMIT_PROBABILITY"),
        defaults.emit_probability,
    );
    if !(0.0..=1.0).contains(&emit_probability) {
        return Err(AppError::Config(format!(
            "NEXFLOOR_EMIT_PROBABILITY must be between 0 and 1, got {}",
            emit_probability
        ))
        .into());
    }

    let tick_secs = parse_or("NEXFLOOR_TICK_SECS", get("NEXFLOOR_TICK_SECS"), defaults.tick_secs);
    if tick_secs == 0 {
        return Err(
            AppError::Config("NEXFLOOR_TICK_SECS must be greater than zero".to_string()).into(),
        );
    }

    Ok(Config {
        tick_secs,
        emit_probability,
        seed: get("NEXFLOOR_SEED").and_then(|v| v.trim().parse().ok()),
    })
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();
    from_lookup(|name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.tick_secs, 30);
        assert_eq!(cfg.emit_probability, 0.3);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_overrides() {
        let cfg = from_lookup(lookup(&[
            ("NEXFLOOR_TICK_SECS", "5"),
            ("NEXFLOOR_EMIT_PROBABILITY", "1"),
            ("NEXFLOOR_SEED", "99"),
        ]))
        .unwrap();
        assert_eq!(cfg.tick_secs, 5);
        assert_eq!(cfg.emit_probability, 1.0);
        assert_eq!(cfg.seed, Some(99));

        let bus = cfg.bus_config();
        assert_eq!(bus.tick_interval, Duration::from_secs(5));
        assert!(bus.validate().is_ok());
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let cfg = from_lookup(lookup(&[("NEXFLOOR_TICK_SECS", "soon")])).unwrap();
        assert_eq!(cfg.tick_secs, 30);
    }

    #[test]
    fn test_out_of_range_values_are_config_errors() {
        for pairs in [
            [("NEXFLOOR_EMIT_PROBABILITY", "1.5")],
            [("NEXFLOOR_TICK_SECS", "0")],
        ] {
            let err = from_lookup(lookup(&pairs)).unwrap_err();
            let app = err.downcast_ref::<AppError>().expect("AppError");
            assert!(matches!(app, AppError::Config(_)));
            assert_eq!(app.code(), "invalid_config");
        }
    }

    #[test]
    fn test_log_format() {
        assert_eq!(log_format(None), LogFormat::Text);
        assert_eq!(log_format(Some(" JSON ")), LogFormat::Json);
        assert_eq!(log_format(Some("pretty")), LogFormat::Text);
    }
}
