// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Declarative logger settings.
//!
//! JSON5 format supporting:
//! - Global mode, color, timestamp, line trace and JSON output
//! - A log file attached as writer to every level
//! - Custom levels with their own mode, color and standard stream
//! - Comments and trailing commas

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::{file_sink, LineTrace, Logger, Mode, Stream};

/// Logger settings (JSON5 file format)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Settings {
    /// Mode applied to every predefined level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,

    /// Color flag applied to every predefined level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<bool>,

    #[serde(default)]
    pub json: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_trace: Option<LineTrace>,

    /// Lowest level left enabled, by tag or alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,

    /// Line buffers allocated up front
    #[serde(default)]
    pub pool_prewarm: usize,

    /// Log file added as writer to every level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Custom levels
    #[serde(default)]
    pub levels: Vec<LevelSpec>,
}

/// Custom level as stored in the settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelSpec {
    pub tag: String,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub color: bool,

    /// Standard stream used in `std` and `both` modes
    #[serde(default)]
    pub stream: Stream,
}

impl Settings {
    /// Load settings from a JSON5 file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse settings from a JSON5 string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize settings (JSON is valid JSON5)
    pub fn to_json5(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, spec) in self.levels.iter().enumerate() {
            let tag = spec.tag.trim().to_uppercase();
            if tag.is_empty() {
                return Err(ConfigError::EmptyTag { index });
            }
            if crate::logging::Level::from_alias(&tag).is_some() {
                return Err(ConfigError::ReservedTag { tag });
            }
            if !seen.insert(tag.clone()) {
                return Err(ConfigError::DuplicateTag { tag });
            }
        }

        if let Some(threshold) = &self.threshold {
            let tag = threshold.trim().to_uppercase();
            if crate::logging::Level::from_alias(&tag).is_none() && !seen.contains(&tag) {
                return Err(ConfigError::UnknownThreshold {
                    tag: threshold.clone(),
                });
            }
        }

        Ok(())
    }

    /// Apply the settings to `logger`. On error the logger is left unchanged.
    pub fn apply(&self, logger: &Logger) -> Result<(), ConfigError> {
        self.validate()?;
        let file = match &self.file {
            Some(path) => Some(
                file_sink(path).map_err(|e| ConfigError::IoError(path.clone(), e.to_string()))?,
            ),
            None => None,
        };

        if let Some(mode) = self.mode {
            logger.set_mode(mode);
        }
        match self.color {
            Some(true) => {
                logger.enable_color();
            }
            Some(false) => {
                logger.disable_color();
            }
            None => {}
        }

        for spec in &self.levels {
            let level = match spec.stream {
                Stream::Stdout => logger.add_std_level(&spec.tag, spec.mode, spec.color),
                Stream::Stderr => logger.add_err_level(&spec.tag, spec.mode, spec.color),
            };
            tracing::debug!(tag = %spec.tag, level = level.as_u32(), "configured custom level");
        }

        match self.timestamp {
            Some(true) => {
                logger.enable_timestamp();
            }
            Some(false) => {
                logger.disable_timestamp();
            }
            None => {}
        }
        if let Some(trace) = self.line_trace {
            logger.set_line_trace_mode(trace);
        }
        if let Some(sink) = file {
            logger.add_writer(sink);
        }
        if let Some(threshold) = &self.threshold {
            logger.set_level(logger.tag_to_level(threshold));
        }
        if self.json {
            logger.enable_json();
        }
        if self.pool_prewarm > 0 {
            logger.enable_pool_buffer(self.pool_prewarm);
        }

        Ok(())
    }
}

impl Logger {
    /// Build a logger configured by `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let logger = Logger::new();
        settings.apply(&logger)?;
        Ok(logger)
    }
}

/// Settings errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("failed to access '{}': {}", .0.display(), .1)]
    IoError(PathBuf, String),

    #[error("failed to parse settings: {0}")]
    ParseError(String),

    #[error("level {index} has an empty tag")]
    EmptyTag { index: usize },

    #[error("level tag '{tag}' is defined more than once")]
    DuplicateTag { tag: String },

    #[error("level tag '{tag}' collides with a built-in level")]
    ReservedTag { tag: String },

    #[error("threshold '{tag}' does not name a level")]
    UnknownThreshold { tag: String },
}
