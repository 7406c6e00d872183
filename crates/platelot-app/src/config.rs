//! Configuration management for platelot
//!
//! Config stored at: ~/.config/platelot/config.json

use platelot_domain::model::DEFAULT_SLOT_COUNT;
use platelot_types::{ConfigError, OutputFormat, Result};
use platelot_vision::{LocalizerConfig, TesseractReader, DEFAULT_OCR_COMMAND};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "platelot";
const DATABASE_FILE: &str = "car_database.db";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Ledger database file override
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Slots created the first time the database is opened
    #[serde(default = "default_slot_count")]
    pub slot_count: u32,

    /// Seconds to wait for the database lock
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// Number of recent exits shown
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// OCR command line; `{image}` is replaced by the crop path
    #[serde(default = "default_ocr_command")]
    pub ocr_command: String,

    #[serde(default = "default_canny_low")]
    pub canny_low: f32,

    #[serde(default = "default_canny_high")]
    pub canny_high: f32,

    /// Largest contours tried when looking for the plate
    #[serde(default = "default_contour_candidates")]
    pub contour_candidates: usize,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_slot_count() -> u32 {
    DEFAULT_SLOT_COUNT
}

fn default_busy_timeout_secs() -> u64 {
    10
}

fn default_history_limit() -> usize {
    10
}

fn default_ocr_command() -> String {
    DEFAULT_OCR_COMMAND.to_string()
}

fn default_canny_low() -> f32 {
    170.0
}

fn default_canny_high() -> f32 {
    200.0
}

fn default_contour_candidates() -> usize {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            slot_count: default_slot_count(),
            busy_timeout_secs: default_busy_timeout_secs(),
            history_limit: default_history_limit(),
            ocr_command: default_ocr_command(),
            canny_low: default_canny_low(),
            canny_high: default_canny_high(),
            contour_candidates: default_contour_candidates(),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the ledger database path
    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR);
        Ok(data_dir.join(DATABASE_FILE))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }

    pub fn localizer_config(&self) -> LocalizerConfig {
        LocalizerConfig::default()
            .with_canny(self.canny_low, self.canny_high)
            .with_max_candidates(self.contour_candidates)
    }

    pub fn text_reader(&self) -> TesseractReader {
        TesseractReader::new(self.ocr_command.clone())
    }

    /// Load config from file, or use defaults
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_json(&content)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the detection pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(ConfigError::ParseError(format!(
                "canny_low ({}) must be between 0 and canny_high ({})",
                self.canny_low, self.canny_high
            ))
            .into());
        }
        if self.slot_count == 0 {
            return Err(ConfigError::ParseError("slot_count must be at least 1".to_string()).into());
        }
        Ok(())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Platelot Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Database:        {}",
            self.database_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Slots:           {}", self.slot_count)?;
        writeln!(f, "Busy timeout:    {}s", self.busy_timeout_secs)?;
        writeln!(f, "History shown:   {}", self.history_limit)?;
        writeln!(f, "OCR command:     {}", self.ocr_command)?;
        writeln!(f, "Canny:           {} / {}", self.canny_low, self.canny_high)?;
        writeln!(f, "Contours tried:  {}", self.contour_candidates)?;
        writeln!(f, "Output format:   {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platelot_types::Error;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.slot_count, 20);
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.busy_timeout(), Duration::from_secs(10));
        assert_eq!(config.localizer_config(), LocalizerConfig::default());
        assert_eq!(config.text_reader().command(), "tesseract {image} stdout");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"slot_count": 8, "output_format": "json"}"#).unwrap();
        assert_eq!(config.slot_count, 8);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.contour_candidates, 30);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = Config::from_json("{slot_count: ").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_inverted_canny_thresholds_are_rejected() {
        let err = Config::from_json(r#"{"canny_low": 250, "canny_high": 100}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));

        let equal = Config::from_json(r#"{"canny_low": 120, "canny_high": 120}"#).unwrap();
        assert_eq!(equal.localizer_config().canny_high, 120.0);
    }

    #[test]
    fn test_zero_slots_are_rejected() {
        assert!(Config::from_json(r#"{"slot_count": 0}"#).is_err());
    }

    #[test]
    fn test_database_path_override() {
        let config = Config {
            database_path: Some(PathBuf::from("/tmp/lot.db")),
            ..Default::default()
        };
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/lot.db"));
    }
}
