// SPDX-License-Identifier: Apache-2.0 OR MIT
// Level tables: tag registry, config registry and id allocation

use super::color::Color;
use super::config::{LineTrace, LoggerConfig, Mode};
use super::level::{normalize_tag, Level};
use super::sink::Stream;
use crate::registry::ConcurrentRegistry;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// One generation of level state.
///
/// Both registries are written config-first, so every level reachable from
/// the tag registry already has a config.
pub(crate) struct LevelTable {
    configs: ConcurrentRegistry<Level, Arc<LoggerConfig>>,
    tags: ConcurrentRegistry<String, Level>,
    /// Last id handed out
    last_id: AtomicU32,
}

impl LevelTable {
    /// Table holding only the predefined levels
    pub fn new() -> Self {
        let table = Self {
            configs: ConcurrentRegistry::new(),
            tags: ConcurrentRegistry::new(),
            last_id: AtomicU32::new(Level::FATAL.as_u32()),
        };
        for level in Level::PREDEFINED {
            table.configs.store(level, Arc::new(predefined_config(level)));
        }
        table
    }

    /// Register `tag` under a fresh id.
    ///
    /// Registering a tag again allocates another id and rebinds the tag; the
    /// config of the old id stays reachable by id only.
    ///
    /// Ids stop below `Level::UNKNOWN`. Once they are exhausted nothing is
    /// registered and `Level::UNKNOWN` is returned.
    pub fn add_level(&self, tag: &str, mode: Mode, color_enabled: bool, stream: Stream) -> Level {
        let tag = normalize_tag(tag);
        let Some(level) = self.next_id() else {
            tracing::warn!(tag = %tag, "log level ids exhausted");
            return Level::UNKNOWN;
        };

        let config = LoggerConfig::new(
            tag.as_str(),
            stream.sink(),
            Color::COLORLESS,
            color_enabled,
            mode,
        );
        self.configs.store(level, Arc::new(config));
        self.tags.store(tag.clone(), level);

        tracing::debug!(level = level.as_u32(), tag = %tag, ?mode, ?stream, "registered log level");
        level
    }

    fn next_id(&self) -> Option<Level> {
        self.last_id
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                last.checked_add(1).filter(|id| *id < Level::UNKNOWN.as_u32())
            })
            .ok()
            .map(|last| Level::from_u32(last + 1))
    }

    /// Resolve a tag: custom levels first, then built-in aliases
    pub fn resolve(&self, tag: &str) -> Level {
        let tag = normalize_tag(tag);
        self.tags
            .load(tag.as_str())
            .or_else(|| Level::from_alias(&tag))
            .unwrap_or(Level::UNKNOWN)
    }

    #[inline]
    pub fn config(&self, level: Level) -> Option<Arc<LoggerConfig>> {
        self.configs.load(&level)
    }

    /// Replace the config of `level`. Returns false if the level is unknown.
    pub fn update<F>(&self, level: Level, f: F) -> bool
    where
        F: FnOnce(LoggerConfig) -> LoggerConfig,
    {
        match self.configs.load(&level) {
            Some(current) => {
                self.configs.store(level, Arc::new(f(LoggerConfig::clone(&current))));
                true
            }
            None => false,
        }
    }

    /// Replace the config of every level
    pub fn update_all<F>(&self, mut f: F)
    where
        F: FnMut(Level, LoggerConfig) -> LoggerConfig,
    {
        self.configs.range(|level, current| {
            self.configs.store(*level, Arc::new(f(*level, LoggerConfig::clone(&current))));
            true
        });
    }

    /// Number of configured levels, orphans included
    pub fn len(&self) -> usize {
        self.configs.len()
    }
}

fn predefined_config(level: Level) -> LoggerConfig {
    let (color, stream, trace) = match level {
        Level::DEBG => (Color::PURPLE, Stream::Stdout, LineTrace::Off),
        Level::TRACE => (Color::YELLOW, Stream::Stdout, LineTrace::Off),
        Level::INFO => (Color::GREEN, Stream::Stdout, LineTrace::Off),
        Level::OK => (Color::CYAN, Stream::Stdout, LineTrace::Off),
        Level::WARN => (Color::ORANGE, Stream::Stdout, LineTrace::Off),
        Level::ERR | Level::FAIL => (Color::RED, Stream::Stderr, LineTrace::Short),
        Level::FATAL => (Color::RED, Stream::Stderr, LineTrace::Long),
        _ => (Color::COLORLESS, Stream::Stdout, LineTrace::Off),
    };
    LoggerConfig::new(level.as_str(), stream.sink(), color, true, Mode::Std).with_line_trace(trace)
}
