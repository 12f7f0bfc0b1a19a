use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Placeholder S3 output location used when `ATHENA_OUTPUT_LOCATION` is unset.
pub const DEFAULT_OUTPUT_LOCATION: &str = "s3://your-bucket/athena-results/";

const DEFAULT_DATABASE: &str = "nyc_tlc";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_MAX_WAIT_SECONDS: u64 = 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

// ── Env helpers ──────────────────────────────────────────────────

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries `{PROFILE}_{KEY}` first, falls back to `{KEY}`.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => matches!(v.as_str(), "true" | "1"),
        None => default,
    }
}

// ── AthenaConfig ─────────────────────────────────────────────────

/// Connection and polling settings for the Athena-backed query executor.
///
/// Reads from environment variables with optional profile prefix.
/// When `TLC_PROFILE=PROD`, checks `PROD_ATHENA_DATABASE` before `ATHENA_DATABASE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthenaConfig {
    /// AWS region for Athena queries.
    pub region: String,
    /// Logical database queries run against.
    pub database: String,
    /// Athena workgroup; `None` uses the account default.
    pub workgroup: Option<String>,
    /// S3 path where Athena persists raw results.
    pub output_location: String,
    /// Default local wait budget per query, in seconds.
    pub max_wait_seconds: u64,
    /// Delay between status polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Send a stop request when the local wait expires before a terminal state.
    pub cancel_on_timeout: bool,
    /// Optional TOML file replacing the built-in table catalog.
    pub schema_file: Option<PathBuf>,
}

impl Default for AthenaConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            workgroup: None,
            output_location: DEFAULT_OUTPUT_LOCATION.to_string(),
            max_wait_seconds: DEFAULT_MAX_WAIT_SECONDS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            cancel_on_timeout: false,
            schema_file: None,
        }
    }
}

impl AthenaConfig {
    /// Build config from environment variables (call [`load_dotenv`] first).
    ///
    /// Reads `TLC_PROFILE` to determine the profile prefix.
    /// `ATHENA_REGION` falls back to `AWS_REGION` before using the default.
    pub fn from_env() -> Self {
        let profile = env_opt("TLC_PROFILE")
            .map(|s| s.to_uppercase())
            .unwrap_or_default();
        Self::from_env_profiled(&profile)
    }

    /// Build config for a specific named profile.
    pub fn from_env_profiled(profile: &str) -> Self {
        let region = profiled_env_opt(profile, "ATHENA_REGION")
            .or_else(|| profiled_env_opt(profile, "AWS_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            region,
            database: profiled_env_or(profile, "ATHENA_DATABASE", DEFAULT_DATABASE),
            workgroup: profiled_env_opt(profile, "ATHENA_WORKGROUP"),
            output_location: profiled_env_or(
                profile,
                "ATHENA_OUTPUT_LOCATION",
                DEFAULT_OUTPUT_LOCATION,
            ),
            max_wait_seconds: profiled_env_u64(
                profile,
                "ATHENA_MAX_WAIT_SECONDS",
                DEFAULT_MAX_WAIT_SECONDS,
            ),
            poll_interval_ms: profiled_env_u64(
                profile,
                "ATHENA_POLL_INTERVAL_MS",
                DEFAULT_POLL_INTERVAL_MS,
            ),
            cancel_on_timeout: profiled_env_bool(profile, "ATHENA_CANCEL_ON_TIMEOUT", false),
            schema_file: profiled_env_opt(profile, "TLC_SCHEMA_FILE").map(PathBuf::from),
        }
    }

    /// Returns `true` when the output location has been explicitly configured
    /// (differs from the placeholder default).
    pub fn is_configured(&self) -> bool {
        self.output_location != DEFAULT_OUTPUT_LOCATION
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_seconds)
    }

    /// Poll interval, never shorter than one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

// ── Tests ────────────────────────────────────────────────────────
