use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub inquiry: InquiryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file standing in for browser local storage
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_login_delay")]
    pub login_delay_ms: u64,
    #[serde(default = "default_signup_delay")]
    pub signup_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: default_login_delay(),
            signup_delay_ms: default_signup_delay(),
        }
    }
}

impl AuthConfig {
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn signup_delay(&self) -> Duration {
        Duration::from_millis(self.signup_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InquiryConfig {
    pub contact_delay_ms: u64,
    pub newsletter_delay_ms: u64,
}

impl Default for InquiryConfig {
    fn default() -> Self {
        Self {
            contact_delay_ms: 2000,
            newsletter_delay_ms: 2000,
        }
    }
}

impl InquiryConfig {
    pub fn contact_delay(&self) -> Duration {
        Duration::from_millis(self.contact_delay_ms)
    }

    pub fn newsletter_delay(&self) -> Duration {
        Duration::from_millis(self.newsletter_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// Directory with fixture JSON; the embedded catalog is used when unset
    pub fixtures_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    /// Seconds a draft may sit without edits before it is dropped
    #[serde(default = "default_draft_ttl")]
    pub draft_ttl_secs: i64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            draft_ttl_secs: default_draft_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl BookingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

fn default_draft_ttl() -> i64 { 30 * 60 }
fn default_sweep_interval() -> u64 { 60 }
fn default_login_delay() -> u64 { 1500 }
fn default_signup_delay() -> u64 { 2000 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::from(dir.join("default")))
            // Environment overlay, optional
            .add_source(config::File::from(dir.join(&run_mode)).required(false))
            // Untracked developer overrides
            .add_source(config::File::from(dir.join("local")).required(false))
            // e.g. `WANDERLUST__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("WANDERLUST").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 8080\n\n[storage]\npath = \"data/session.json\"\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.login_delay(), Duration::from_millis(1500));
        assert_eq!(config.auth.signup_delay(), Duration::from_millis(2000));
        assert_eq!(config.inquiry.contact_delay_ms, 2000);
        assert!(config.catalog.fixtures_dir.is_none());
        assert_eq!(config.booking.draft_ttl_secs, 1800);
        assert_eq!(config.booking.sweep_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_booking_section_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 8080\n\n[storage]\npath = \"s.json\"\n\n[booking]\ndraft_ttl_secs = 90\nsweep_interval_secs = 0\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.booking.draft_ttl_secs, 90);
        // A zero interval would spin the sweeper
        assert_eq!(config.booking.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_missing_default_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
