use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const ESPN_API_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";
pub const ESPN_SITE_BASE: &str = "https://www.espn.com";

/// Settings shared by the adapters, the venue resolver and the normalizer
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub source_tz: Tz,
    pub display_tz: Tz,
    pub schedule_interval: Duration, // per-day schedule page channel
    pub api_interval: Duration,      // scoreboard API channel
    pub venue_interval: Duration,    // venue lookups, both strategies
    pub timeout: Duration,
    pub user_agent: String,
    pub api_base: String,
    pub site_base: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            source_tz: chrono_tz::America::New_York,
            display_tz: chrono_tz::Europe::Berlin,
            schedule_interval: Duration::from_millis(1200),
            api_interval: Duration::from_millis(250),
            venue_interval: Duration::from_millis(300),
            timeout: Duration::from_secs(20),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_base: ESPN_API_BASE.to_string(),
            site_base: ESPN_SITE_BASE.to_string(),
        }
    }
}

impl CollectorConfig {
    /// Defaults overridden by `FIXTURES_*` variables from the process
    /// environment or a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(tz) = lookup("FIXTURES_SOURCE_TZ") {
            config.source_tz = parse_tz(&tz).context("FIXTURES_SOURCE_TZ")?;
        }
        if let Some(tz) = lookup("FIXTURES_DISPLAY_TZ") {
            config.display_tz = parse_tz(&tz).context("FIXTURES_DISPLAY_TZ")?;
        }
        if let Some(ms) = lookup("FIXTURES_SCHEDULE_DELAY_MS") {
            config.schedule_interval = parse_millis(&ms).context("FIXTURES_SCHEDULE_DELAY_MS")?;
        }
        if let Some(ms) = lookup("FIXTURES_API_DELAY_MS") {
            config.api_interval = parse_millis(&ms).context("FIXTURES_API_DELAY_MS")?;
        }
        if let Some(ms) = lookup("FIXTURES_VENUE_DELAY_MS") {
            config.venue_interval = parse_millis(&ms).context("FIXTURES_VENUE_DELAY_MS")?;
        }
        if let Some(secs) = lookup("FIXTURES_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .context("FIXTURES_TIMEOUT_SECS must be a whole number of seconds")?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = lookup("FIXTURES_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }
}

pub fn parse_tz(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("unknown time zone `{}`: {}", name, e))
}

fn parse_millis(value: &str) -> Result<Duration> {
    let ms: u64 = value
        .trim()
        .parse()
        .context("expected a delay in milliseconds")?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.source_tz, chrono_tz::America::New_York);
        assert_eq!(config.display_tz, chrono_tz::Europe::Berlin);
        assert_eq!(config.schedule_interval, Duration::from_millis(1200));
    }

    #[test]
    fn test_env_overrides() {
        let config = CollectorConfig::from_lookup(lookup_from(&[
            ("FIXTURES_DISPLAY_TZ", "Europe/London"),
            ("FIXTURES_SCHEDULE_DELAY_MS", "50"),
            ("FIXTURES_USER_AGENT", "test-agent"),
        ]))
        .unwrap();
        assert_eq!(config.display_tz, chrono_tz::Europe::London);
        assert_eq!(config.schedule_interval, Duration::from_millis(50));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.venue_interval, Duration::from_millis(300));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(CollectorConfig::from_lookup(lookup_from(&[("FIXTURES_SOURCE_TZ", "Mars/Base")])).is_err());
        assert!(CollectorConfig::from_lookup(lookup_from(&[("FIXTURES_API_DELAY_MS", "soon")])).is_err());
    }
}
