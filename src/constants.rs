//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Torrentium";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key of the single cached preferences entry
pub const CACHE_KEY: &str = "torrentium-state";

/// Directory (under the home directory) holding the cache entry
pub const CACHE_DIR_NAME: &str = ".torrentium";

/// Log file written next to the working directory
pub const LOG_FILE_NAME: &str = "torrentium.log";

/// How long a notification stays visible before it expires
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

/// Default interval of the transfer progress simulation
pub const SIMULATION_TICK: Duration = Duration::from_millis(500);

/// Environment variable overriding the cache directory
pub const ENV_HOME: &str = "TORRENTIUM_HOME";

/// Environment variable overriding the simulation tick (milliseconds, 0 disables)
pub const ENV_TICK_MS: &str = "TORRENTIUM_TICK_MS";

/// Upper bound of trust scores
pub const MAX_TRUST_SCORE: u8 = 100;
