// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Leveled logging for highly concurrent programs.
//!
//! Every level (the predefined `DEBG` through `FATAL`, plus custom levels
//! registered at runtime) has its own configuration: destination sinks,
//! color, mode and a precomputed write strategy. Configurations live in a
//! read-mostly [`registry::ConcurrentRegistry`], so emitting a line is a
//! lock-free lookup followed by formatting into a pooled buffer.
//!
//! ```
//! use levelog::{Logger, MemorySink, Mode};
//!
//! let logger = Logger::new();
//! let out = MemorySink::new();
//! let audit = logger.add_std_level("AUDIT", Mode::Writer, false);
//! logger.set_level_writer(audit, out.sink()).disable_level_timestamp(audit);
//!
//! levelog::log_custom!(logger, "AUDIT", "user={} action={}", "bob", "login").unwrap();
//! assert_eq!(out.contents_string(), "[AUDIT]:\tuser=bob action=login\n");
//! ```

pub mod buffer_pool;
pub mod error;
pub mod logging;
pub mod registry;
pub mod settings;

pub use buffer_pool::{BufferPool, PoolStats, PooledBuffer};
pub use error::LogError;
pub use logging::{
    file_sink, Color, Fanout, Level, LineTrace, Logger, LoggerConfig, MemorySink, Mode, SharedSink,
    Sink, Stream, WriteStrategy,
};
pub use registry::ConcurrentRegistry;
pub use settings::{ConfigError, LevelSpec, Settings};
