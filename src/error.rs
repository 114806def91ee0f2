// SPDX-License-Identifier: Apache-2.0 OR MIT
// Errors returned by the emission path

use crate::logging::Level;
use std::io;
use thiserror::Error;

/// Errors returned by an emission
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log level {0} not found")]
    UnknownLevel(Level),

    /// A sink rejected the line. When several sinks were written, this is
    /// the first failure; the remaining sinks were still attempted.
    #[error("failed to write {level} line: {source}")]
    WriteFailure {
        level: Level,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode {level} line as JSON: {source}")]
    Encode {
        level: Level,
        #[source]
        source: serde_json::Error,
    },

    /// A `Display` implementation in the message returned an error
    #[error("failed to format {0} line")]
    Format(Level),
}

impl LogError {
    /// Level the failed emission was addressed to
    pub fn level(&self) -> Level {
        match self {
            LogError::UnknownLevel(level) | LogError::Format(level) => *level,
            LogError::WriteFailure { level, .. } | LogError::Encode { level, .. } => *level,
        }
    }
}
