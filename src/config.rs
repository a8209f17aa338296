// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the autopilot

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::grid::Grid;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub board: BoardConfig,
    pub policy: PolicyConfig,
    pub session: SessionConfig,
    pub debug: DebugConfig,
}

/// Board dimensions and the starting snake
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub cols: i32,
    pub rows: i32,
    pub start_len: usize,
}

impl BoardConfig {
    pub fn grid(&self) -> Grid {
        Grid::new(self.cols, self.rows)
    }
}

/// Decision policy thresholds
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PolicyConfig {
    // Finisher tier
    pub finisher_empty_cells: usize,
    pub small_board_cells: usize,
    pub small_board_finisher_empty_cells: usize,

    // Starving once ticks without scoring exceed factor * cell count
    pub starvation_factor: u64,

    // Fill ratio above which food pursuit yields to circulation
    pub endgame_fill_ratio: f64,
}

/// Headless session settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    pub seed: u64,
    pub games: usize,
    pub max_ticks: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed and validated configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            board: BoardConfig {
                cols: 10,
                rows: 10,
                start_len: 4,
            },
            policy: PolicyConfig {
                finisher_empty_cells: 3,
                small_board_cells: 50,
                small_board_finisher_empty_cells: 8,
                starvation_factor: 2,
                endgame_fill_ratio: 0.80,
            },
            session: SessionConfig {
                seed: 0xBEEF,
                games: 1,
                max_ticks: 100_000,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_autopilot_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects boards the session layout cannot start on
    pub fn validate(&self) -> Result<(), String> {
        let board = &self.board;
        if board.cols < 1 || board.rows < 1 {
            return Err(format!(
                "Board must be at least 1x1, got {}x{}",
                board.cols, board.rows
            ));
        }
        // the starting snake extends left from the centre column
        let max_start_len = (board.cols / 2 + 1) as usize;
        if board.start_len < 1 || board.start_len > max_start_len {
            return Err(format!(
                "start_len must be between 1 and {} on a board {} cells wide, got {}",
                max_start_len, board.cols, board.start_len
            ));
        }
        if !(0.0..=1.0).contains(&self.policy.endgame_fill_ratio) {
            return Err(format!(
                "endgame_fill_ratio must be within [0, 1], got {}",
                self.policy.endgame_fill_ratio
            ));
        }
        Ok(())
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Config::default_hardcoded().policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.board.cols, 10);
        assert_eq!(config.session.seed, 48879);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_snake_toml_can_be_parsed() {
        // This test ensures Snake.toml is valid and can be parsed
        let result = Config::from_file("Snake.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Snake.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_snake_toml_matches_hardcoded_defaults() {
        let file_config = Config::from_file("Snake.toml").expect("Snake.toml should be parseable");
        assert_eq!(file_config, Config::default_hardcoded());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        // Test with a non-existent file
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());

        let result = Config::from_toml_str("[board]\ncols = \"ten\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_oversized_start() {
        let mut config = Config::default_hardcoded();
        config.board.start_len = 7;
        assert!(config.validate().is_err());

        config.board.start_len = 6;
        assert!(config.validate().is_ok());

        config.board.cols = 0;
        assert!(config.validate().is_err());
    }
}
