// SPDX-License-Identifier: Apache-2.0 OR MIT
// Leveled logging engine
//
// Emission resolves a level's configuration through a read-mostly registry
// and writes the formatted line to the sinks chosen by a cached strategy.

mod color;
mod config;
mod dispatch;
mod instrument;
mod level;
mod logger;
#[macro_use]
mod macros;
mod sink;
mod table;

// Public exports
pub use color::Color;
pub use config::{LineTrace, LoggerConfig, Mode, WriteStrategy};
pub use dispatch::TIME_FORMAT;
pub use level::Level;
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use sink::{file_sink, Fanout, MemorySink, SharedSink, Sink, StderrSink, StdoutSink, Stream};
