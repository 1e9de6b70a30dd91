//! User settings for LedgerPulse
//!
//! Display preferences, the onboarding flag, and the timing and capacity
//! knobs of the realtime store and the payment simulation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::analytics::TimeRange;
use crate::error::LedgerError;
use crate::models::money::DEFAULT_CURRENCY_SYMBOL;

/// Upper bound on every configured delay or interval (24 hours)
pub const MAX_DELAY_MS: u64 = 86_400_000;

/// Timing and capacity of the realtime store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeSettings {
    /// Delay between `connect` and the simulated handshake completing
    pub handshake_delay_ms: u64,
    pub transaction_interval_ms: u64,
    pub notification_interval_ms: u64,
    /// How long `refresh` keeps the analytics hook in its loading state
    pub refresh_delay_ms: u64,
    /// Cap on the live transaction list
    pub max_transactions: usize,
    /// Cap on the notification list
    pub max_notifications: usize,
}

impl Default for RealtimeSettings {
    fn default() -> Self {
        Self {
            handshake_delay_ms: 1_000,
            transaction_interval_ms: 5_000,
            notification_interval_ms: 15_000,
            refresh_delay_ms: 500,
            max_transactions: 50,
            max_notifications: 20,
        }
    }
}

impl RealtimeSettings {
    pub fn handshake_delay(&self) -> Duration {
        millis(self.handshake_delay_ms)
    }

    pub fn transaction_interval(&self) -> Duration {
        millis(self.transaction_interval_ms)
    }

    pub fn notification_interval(&self) -> Duration {
        millis(self.notification_interval_ms)
    }

    pub fn refresh_delay(&self) -> Duration {
        millis(self.refresh_delay_ms)
    }

    /// Reject zero intervals, delays over a day and zero capacities
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.transaction_interval_ms == 0 || self.notification_interval_ms == 0 {
            return Err(LedgerError::Config(
                "Realtime tick intervals must be greater than zero".into(),
            ));
        }
        check_delay("realtime.handshake_delay_ms", self.handshake_delay_ms)?;
        check_delay("realtime.transaction_interval_ms", self.transaction_interval_ms)?;
        check_delay("realtime.notification_interval_ms", self.notification_interval_ms)?;
        check_delay("realtime.refresh_delay_ms", self.refresh_delay_ms)?;
        if self.max_transactions == 0 || self.max_notifications == 0 {
            return Err(LedgerError::Config(
                "Realtime list capacities must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Payment simulation knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettings {
    /// Probability in `[0, 1]` that a charge is declined
    pub decline_probability: f64,
    pub processing_delay_ms: u64,
    /// Simulate an unreachable gateway
    pub offline: bool,
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            decline_probability: 0.2,
            processing_delay_ms: 2_000,
            offline: false,
        }
    }
}

impl PaymentSettings {
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !(0.0..=1.0).contains(&self.decline_probability) {
            return Err(LedgerError::Config(format!(
                "decline_probability must be between 0 and 1, got {}",
                self.decline_probability
            )));
        }
        check_delay("payments.processing_delay_ms", self.processing_delay_ms)
    }

    pub fn processing_delay(&self) -> Duration {
        millis(self.processing_delay_ms)
    }
}

/// User settings for LedgerPulse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Range the dashboard opens on
    #[serde(default)]
    pub default_time_range: TimeRange,

    /// Whether the onboarding flow has been completed
    #[serde(default)]
    pub onboarding_completed: bool,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub realtime: RealtimeSettings,

    #[serde(default)]
    pub payments: PaymentSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_time_range: TimeRange::default(),
            onboarding_completed: false,
            log_level: default_log_level(),
            realtime: RealtimeSettings::default(),
            payments: PaymentSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| LedgerError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        self.realtime.validate()?;
        self.payments.validate()
    }
}

fn check_delay(field: &str, ms: u64) -> Result<(), LedgerError> {
    if ms > MAX_DELAY_MS {
        return Err(LedgerError::Config(format!(
            "{} must be at most {} ms, got {}",
            field, MAX_DELAY_MS, ms
        )));
    }
    Ok(())
}

fn millis(ms: u64) -> Duration {
    Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₦");
        assert_eq!(settings.default_time_range, TimeRange::Month);
        assert!(!settings.onboarding_completed);
        assert_eq!(settings.realtime.max_transactions, 50);
        assert_eq!(settings.realtime.max_notifications, 20);
        assert_eq!(settings.realtime.transaction_interval(), Duration::seconds(5));
        assert_eq!(settings.realtime.notification_interval(), Duration::seconds(15));
        assert_eq!(settings.realtime.refresh_delay(), Duration::milliseconds(500));
        assert_eq!(settings.payments.decline_probability, 0.2);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_time_range = TimeRange::Quarter;
        settings.onboarding_completed = true;
        settings.realtime.transaction_interval_ms = 1_000;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"onboarding_completed": true, "realtime": {"max_transactions": 10}}"#,
        )
        .unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.onboarding_completed);
        assert_eq!(loaded.realtime.max_transactions, 10);
        assert_eq!(loaded.realtime.max_notifications, 20);
        assert_eq!(loaded.currency_symbol, "₦");
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            r#"{"realtime": {"transaction_interval_ms": 0}}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));

        let mut settings = Settings::default();
        settings.payments.decline_probability = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_delays_are_bounded() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(
            paths.settings_file(),
            format!(r#"{{"realtime": {{"handshake_delay_ms": {}}}}}"#, u64::MAX),
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, LedgerError::Config(ref msg) if msg.contains("handshake_delay_ms")));

        let mut realtime = RealtimeSettings::default();
        realtime.refresh_delay_ms = MAX_DELAY_MS;
        assert!(realtime.validate().is_ok());
        realtime.refresh_delay_ms = MAX_DELAY_MS + 1;
        assert!(realtime.validate().is_err());

        let mut realtime = RealtimeSettings::default();
        realtime.transaction_interval_ms = MAX_DELAY_MS + 1;
        assert!(realtime.validate().is_err());
        let mut realtime = RealtimeSettings::default();
        realtime.notification_interval_ms = MAX_DELAY_MS + 1;
        assert!(realtime.validate().is_err());

        let payments = PaymentSettings {
            processing_delay_ms: u64::MAX,
            ..PaymentSettings::default()
        };
        assert!(payments.validate().is_err());
    }
}
