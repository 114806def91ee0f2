// SPDX-License-Identifier: Apache-2.0 OR MIT
// Level identifiers and tag-name aliases

use serde::{Deserialize, Serialize};

/// Log level id.
///
/// Predefined levels are ordered by threshold (`DEBG` lowest, `FATAL`
/// highest). Custom levels are allocated above `FATAL` and are never reused
/// within one table generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    /// Debug output
    pub const DEBG: Level = Level(1);
    /// Trace output
    pub const TRACE: Level = Level(2);
    /// Plain print output
    pub const PRINT: Level = Level(3);
    /// General log output
    pub const LOG: Level = Level(4);
    /// Informational
    pub const INFO: Level = Level(5);
    /// Success notification
    pub const OK: Level = Level(6);
    /// Warning conditions
    pub const WARN: Level = Level(7);
    /// Error conditions
    pub const ERR: Level = Level(8);
    /// Failed operations
    pub const FAIL: Level = Level(9);
    /// Fatal error, followed by the exit hook
    pub const FATAL: Level = Level(10);

    /// Sentinel returned for tags that resolve to nothing
    pub const UNKNOWN: Level = Level(u32::MAX);

    /// All predefined levels in threshold order
    pub const PREDEFINED: [Level; 10] = [
        Level::DEBG,
        Level::TRACE,
        Level::PRINT,
        Level::LOG,
        Level::INFO,
        Level::OK,
        Level::WARN,
        Level::ERR,
        Level::FAIL,
        Level::FATAL,
    ];

    /// Create a level from a raw id
    #[inline]
    pub const fn from_u32(id: u32) -> Self {
        Level(id)
    }

    /// Raw id
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is one of the predefined levels
    pub const fn is_predefined(self) -> bool {
        self.0 >= Level::DEBG.0 && self.0 <= Level::FATAL.0
    }

    /// Tag text of a predefined level, empty for custom levels
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::DEBG => "DEBG",
            Level::TRACE => "TRACE",
            Level::PRINT => "PRINT",
            Level::LOG => "LOG",
            Level::INFO => "INFO",
            Level::OK => "OK",
            Level::WARN => "WARN",
            Level::ERR => "ERR",
            Level::FAIL => "FAIL",
            Level::FATAL => "FATAL",
            _ => "",
        }
    }

    /// Resolve a built-in tag or one of its aliases.
    ///
    /// `tag` must already be trimmed and upper-cased.
    pub fn from_alias(tag: &str) -> Option<Self> {
        let level = match tag {
            "DEBG" | "DBG" | "DEBUG" | "D" => Level::DEBG,
            "TRACE" | "TRC" | "TRA" | "TR" | "T" => Level::TRACE,
            "PRINT" | "PNT" | "P" => Level::PRINT,
            "LOG" | "LO" | "LG" | "L" => Level::LOG,
            "INFO" | "IFO" | "INF" | "I" => Level::INFO,
            "OK" | "O" | "K" | "SUCCESS" => Level::OK,
            "WARN" | "WARNING" | "WRN" | "W" => Level::WARN,
            "ERR" | "ERROR" | "ER" | "E" => Level::ERR,
            "FAIL" | "FAILED" | "FI" => Level::FAIL,
            "FATAL" | "FAT" | "FL" | "F" => Level::FATAL,
            _ => return None,
        };
        Some(level)
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.as_str() {
            "" if *self == Level::UNKNOWN => f.write_str("UNKNOWN"),
            "" => write!(f, "LEVEL({})", self.0),
            name => f.write_str(name),
        }
    }
}

/// Normalize a tag the way it is stored in the tag registry
pub(crate) fn normalize_tag(tag: &str) -> String {
    tag.trim().to_uppercase()
}
