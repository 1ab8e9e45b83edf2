//! Runtime configuration resolved from the environment

use std::path::PathBuf;
use std::time::Duration;

use crate::app::actor::ActorSettings;
use crate::constants::{ENV_HOME, ENV_TICK_MS, NOTIFICATION_TTL, SIMULATION_TICK};
use crate::storage::PreferenceCache;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the cached preferences
    pub cache_dir: Option<PathBuf>,
    pub notification_ttl: Duration,
    /// `None` disables the progress simulation
    pub simulation_tick: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_dir: None,
            notification_ttl: NOTIFICATION_TTL,
            simulation_tick: Some(SIMULATION_TICK),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through `lookup`, ignoring values that do not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(home) = lookup(ENV_HOME).filter(|v| !v.trim().is_empty()) {
            config.cache_dir = Some(PathBuf::from(home));
        }
        if let Some(raw) = lookup(ENV_TICK_MS) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.simulation_tick = None,
                Ok(ms) => config.simulation_tick = Some(Duration::from_millis(ms)),
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_TICK_MS),
            }
        }
        config
    }

    pub fn cache(&self) -> PreferenceCache {
        match &self.cache_dir {
            Some(dir) => PreferenceCache::new(dir),
            None => PreferenceCache::in_home(),
        }
    }

    pub fn actor_settings(&self) -> ActorSettings {
        ActorSettings {
            notification_ttl: self.notification_ttl,
            simulation_tick: self.simulation_tick,
        }
    }
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[(ENV_HOME, "/tmp/tr"), (ENV_TICK_MS, "250")]));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/tr")));
        assert_eq!(config.simulation_tick, Some(Duration::from_millis(250)));
        assert_eq!(config.cache().dir(), PathBuf::from("/tmp/tr").as_path());
    }

    #[test]
    fn test_zero_tick_disables_simulation() {
        let config = Config::from_lookup(lookup(&[(ENV_TICK_MS, "0")]));
        assert_eq!(config.simulation_tick, None);

        let config = Config::from_lookup(lookup(&[(ENV_TICK_MS, "soon")]));
        assert_eq!(config.simulation_tick, Some(SIMULATION_TICK));
    }
}
