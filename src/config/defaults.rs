/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Backend defaults
pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_COMMENTARY_ENDPOINT: &str = "live-commentary";
pub const DEFAULT_CONNECT_TIMEOUT: &str = "10s";

// Engine defaults
pub const DEFAULT_UPDATE_INTERVAL: &str = "5s";
pub const DEFAULT_TICK_INTERVAL: &str = "1s";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub const DEFAULT_WINDOW_SIZE: f64 = 5.0;
pub const DEFAULT_HISTORY_CAP: usize = 10;

// Environment
pub const ENV_PREFIX: &str = "LIVE_COMMENTARY_";
