use std::path::Path;

use chrono::Duration;
use vocab_data::DEFAULT_EXCLUDED_CATEGORIES;

use crate::error::PracticeError;

/// Longest reveal or resolve delay a config may ask for.
pub const MAX_DELAY_MS: i64 = 60_000;

/// Tunables for a practice session. Every field has a default, so a config file only needs the
/// fields it changes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Wrong answers after which a card leaves the active deck until the review pass.
    pub max_wrong_attempts: u32,
    /// Delay between focusing a card and revealing it.
    pub reveal_delay_ms: i64,
    /// Delay between answering a card and the answer taking effect.
    pub resolve_delay_ms: i64,
    /// Deck size for the "random" practice size.
    pub random_size: usize,
    /// Deck size used when a custom count doesn't parse to a positive number.
    pub default_custom_count: usize,
    pub excluded_categories: Vec<String>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            max_wrong_attempts: 3,
            reveal_delay_ms: 300,
            resolve_delay_ms: 200,
            random_size: 50,
            default_custom_count: 100,
            excluded_categories: DEFAULT_EXCLUDED_CATEGORIES
                .iter()
                .map(|category| category.to_string())
                .collect(),
        }
    }
}

impl PracticeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PracticeError> {
        let config: Self = serde_json::from_str(json).map_err(PracticeError::Config)?;
        config.validated()
    }

    pub fn from_path(path: &Path) -> Result<Self, PracticeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validated(self) -> Result<Self, PracticeError> {
        if self.max_wrong_attempts == 0 {
            return Err(PracticeError::InvalidConfig(
                "max_wrong_attempts must be at least 1".to_string(),
            ));
        }
        if self.reveal_delay_ms < 0 || self.resolve_delay_ms < 0 {
            return Err(PracticeError::InvalidConfig(
                "delays cannot be negative".to_string(),
            ));
        }
        if self.reveal_delay_ms > MAX_DELAY_MS || self.resolve_delay_ms > MAX_DELAY_MS {
            return Err(PracticeError::InvalidConfig(format!(
                "delays cannot be longer than {MAX_DELAY_MS} ms"
            )));
        }
        if self.default_custom_count == 0 {
            return Err(PracticeError::InvalidConfig(
                "default_custom_count must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    // Clamped so a hand-built config can't push a due time past what `DateTime` can hold.
    pub fn reveal_delay(&self) -> Duration {
        Duration::milliseconds(self.reveal_delay_ms.clamp(0, MAX_DELAY_MS))
    }

    pub fn resolve_delay(&self) -> Duration {
        Duration::milliseconds(self.resolve_delay_ms.clamp(0, MAX_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = PracticeConfig::from_json_str(r#"{"max_wrong_attempts": 5}"#).unwrap();
        assert_eq!(config.max_wrong_attempts, 5);
        assert_eq!(config.reveal_delay_ms, 300);
        assert_eq!(config.resolve_delay_ms, 200);
        assert_eq!(config.default_custom_count, 100);
        assert!(config.excluded_categories.contains(&"Names".to_string()));
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{"max_wrong_attempts": 0}"#),
            Err(PracticeError::InvalidConfig(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{"reveal_delay_ms": -1}"#),
            Err(PracticeError::InvalidConfig(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{"reveal_delay_ms": 9223372036854775807}"#),
            Err(PracticeError::InvalidConfig(_))
        ));
        assert!(matches!(
            PracticeConfig::from_json_str(r#"{"resolve_delay_ms": 60001}"#),
            Err(PracticeError::InvalidConfig(_))
        ));
        assert!(PracticeConfig::from_json_str(r#"{"resolve_delay_ms": 60000}"#).is_ok());
        assert!(matches!(
            PracticeConfig::from_json_str("not json"),
            Err(PracticeError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"reveal_delay_ms": 0, "resolve_delay_ms": 0}"#).unwrap();
        let config = PracticeConfig::from_path(file.path()).unwrap();
        assert_eq!(config.reveal_delay(), Duration::zero());
        assert_eq!(config.resolve_delay(), Duration::zero());
    }

    #[test]
    fn test_hand_built_delays_are_clamped() {
        let config = PracticeConfig {
            reveal_delay_ms: i64::MAX,
            resolve_delay_ms: i64::MIN,
            ..PracticeConfig::default()
        };
        assert_eq!(config.reveal_delay(), Duration::milliseconds(MAX_DELAY_MS));
        assert_eq!(config.resolve_delay(), Duration::zero());
    }
}
