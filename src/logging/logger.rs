// SPDX-License-Identifier: Apache-2.0 OR MIT
// Logger handle: emission and configuration surface

use super::color::Color;
use super::config::{LineTrace, LoggerConfig, Mode};
use super::dispatch::Engine;
use super::level::Level;
use super::sink::{SharedSink, Stream};
use crate::buffer_pool::PoolStats;
use crate::error::LogError;
use arc_swap::ArcSwap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Separator between the tag and the message in a rendered line
const TAG_SEPARATOR: &str = "]:\t";

/// Exit code passed to the exit hook after a FATAL emission
pub const FATAL_EXIT_CODE: i32 = 1;

struct ExitHook(Box<dyn Fn(i32) + Send + Sync>);

fn exit_process(code: i32) {
    std::process::exit(code)
}

struct Shared {
    engine: ArcSwap<Engine>,
    exit: ArcSwap<ExitHook>,
}

/// Runs the exit hook when dropped, including while unwinding
struct ExitOnDrop<'a>(&'a Shared);

impl Drop for ExitOnDrop<'_> {
    fn drop(&mut self) {
        (self.0.exit.load().0)(FATAL_EXIT_CODE);
    }
}

/// Joins values with single spaces
struct Spaced<'a>(&'a [&'a dyn fmt::Display]);

impl fmt::Display for Spaced<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            value.fmt(f)?;
        }
        Ok(())
    }
}

/// Handle to a leveled logger.
///
/// This is a lightweight handle that can be cloned and passed around; clones
/// share the same level tables. Emission never takes a lock unless a level
/// was registered after the last registry promotion.
///
/// Configuration methods return `&Self` so calls can be chained:
///
/// ```
/// use levelog::{Logger, Mode};
///
/// let logger = Logger::new();
/// logger.set_mode(Mode::None).disable_color();
/// assert!(!logger.is_enabled(levelog::Level::INFO));
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
}

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $formatted:ident, $lazy:ident;)*) => {$(
        #[doc = concat!("Emit `msg` at `", stringify!($level), "`")]
        #[track_caller]
        pub fn $plain(&self, msg: impl fmt::Display) -> Result<(), LogError> {
            self.emit(Level::$level, format_args!("{}", msg))
        }

        #[doc = concat!("Emit preformatted arguments at `", stringify!($level), "`")]
        #[track_caller]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
            self.emit(Level::$level, args)
        }

        #[doc = concat!("Lazily built emission at `", stringify!($level), "`")]
        #[track_caller]
        pub fn $lazy<F, T>(&self, f: F) -> Result<(), LogError>
        where
            F: FnOnce() -> T,
            T: fmt::Display,
        {
            self.emit_with(Level::$level, f)
        }
    )*};
}

impl Logger {
    /// Logger with the predefined levels, writing to stdout and stderr
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                engine: ArcSwap::from_pointee(Engine::new()),
                exit: ArcSwap::from_pointee(ExitHook(Box::new(exit_process))),
            }),
        }
    }

    // ===== Emission =====

    /// Emit preformatted arguments at `level`
    #[track_caller]
    pub fn emit(&self, level: Level, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        let location = Location::caller();
        self.shared.engine.load().emit(level, args, location)
    }

    /// Emit at `level`, calling `f` only if the level is enabled
    #[track_caller]
    pub fn emit_with<F, T>(&self, level: Level, f: F) -> Result<(), LogError>
    where
        F: FnOnce() -> T,
        T: fmt::Display,
    {
        if !self.is_enabled(level) {
            return Ok(());
        }
        let value = f();
        self.emit(level, format_args!("{}", value))
    }

    /// Emit `values` separated by single spaces
    #[track_caller]
    pub fn values(&self, level: Level, values: &[&dyn fmt::Display]) -> Result<(), LogError> {
        self.emit(level, format_args!("{}", Spaced(values)))
    }

    level_methods! {
        LOG => log, log_fmt, log_with;
        PRINT => print, print_fmt, print_with;
        INFO => info, info_fmt, info_with;
        DEBG => debug, debug_fmt, debug_with;
        TRACE => trace, trace_fmt, trace_with;
        OK => success, success_fmt, success_with;
        WARN => warn, warn_fmt, warn_with;
        ERR => error, error_fmt, error_with;
        FAIL => fail, fail_fmt, fail_with;
    }

    /// Emit at the level registered under `tag`.
    ///
    /// An unregistered tag resolves to `Level::UNKNOWN` and fails with
    /// `LogError::UnknownLevel`.
    #[track_caller]
    pub fn custom_log(&self, tag: &str, msg: impl fmt::Display) -> Result<(), LogError> {
        self.emit(self.tag_to_level(tag), format_args!("{}", msg))
    }

    #[track_caller]
    pub fn custom_log_fmt(&self, tag: &str, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        self.emit(self.tag_to_level(tag), args)
    }

    #[track_caller]
    pub fn custom_log_with<F, T>(&self, tag: &str, f: F) -> Result<(), LogError>
    where
        F: FnOnce() -> T,
        T: fmt::Display,
    {
        self.emit_with(self.tag_to_level(tag), f)
    }

    /// Emit `msg` at `FATAL`, then run the exit hook
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) {
        self.fatal_fmt(format_args!("{}", msg))
    }

    /// Emit at `FATAL`, then run the exit hook.
    ///
    /// The hook runs whatever the emission returns. A failed emission is
    /// reported once at `ERR` first; if that fails too, this panics and the
    /// hook still runs during unwinding.
    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        let _exit = ExitOnDrop(&self.shared);
        if let Err(err) = self.emit(Level::FATAL, args) {
            if let Err(report_err) = self.emit(Level::ERR, format_args!("{}", err)) {
                panic!("fatal log failed ({err}) and could not be reported: {report_err}");
            }
        }
    }

    // ===== Levels =====

    /// Register a custom level writing to stdout.
    /// Returns `Level::UNKNOWN` once level ids are exhausted.
    pub fn add_std_level(&self, tag: &str, mode: Mode, color: bool) -> Level {
        self.shared.engine.load().table.add_level(tag, mode, color, Stream::Stdout)
    }

    /// Register a custom level writing to stderr
    pub fn add_err_level(&self, tag: &str, mode: Mode, color: bool) -> Level {
        self.shared.engine.load().table.add_level(tag, mode, color, Stream::Stderr)
    }

    /// Resolve a tag or built-in alias; `Level::UNKNOWN` if nothing matches
    pub fn tag_to_level(&self, tag: &str) -> Level {
        self.shared.engine.load().table.resolve(tag)
    }

    /// Short form of `tag_to_level`
    pub fn atol(&self, tag: &str) -> Level {
        self.tag_to_level(tag)
    }

    /// Snapshot of the current config of `level`
    pub fn config(&self, level: Level) -> Option<Arc<LoggerConfig>> {
        self.shared.engine.load().table.config(level)
    }

    /// Mode of `level`, `Mode::None` for unknown levels
    pub fn current_mode(&self, level: Level) -> Mode {
        self.config(level).map_or(Mode::None, |config| config.mode())
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.current_mode(level) != Mode::None
    }

    // ===== Modes =====

    /// Set the mode of every level
    pub fn set_mode(&self, mode: Mode) -> &Self {
        self.update_all(|_, config| config.with_mode(mode))
    }

    pub fn set_level_mode(&self, level: Level, mode: Mode) -> &Self {
        self.update(level, |config| config.with_mode(mode))
    }

    /// Disable every level below `threshold` and restore the rest.
    ///
    /// Disabled levels keep their mode and get it back when a later
    /// threshold includes them again.
    pub fn set_level(&self, threshold: Level) -> &Self {
        self.update_all(|level, config| {
            if level < threshold {
                config.suppressed()
            } else {
                config.restored()
            }
        })
    }

    /// Replace the tag text of `level`
    pub fn set_prefix(&self, level: Level, tag: &str) -> &Self {
        self.update(level, |config| config.with_tag(tag))
    }

    // ===== Writers =====

    /// Detach the writer of every level
    pub fn init_writer(&self) -> &Self {
        self.update_all(|_, config| config.with_secondary(None))
    }

    /// Replace the writer of every level. `None` is ignored.
    pub fn set_writer(&self, sink: impl Into<Option<SharedSink>>) -> &Self {
        match sink.into() {
            Some(sink) => {
                self.update_all(|_, config| config.with_secondary(Some(Arc::clone(&sink))))
            }
            None => self,
        }
    }

    /// Add a writer to every level. `None` is ignored.
    pub fn add_writer(&self, sink: impl Into<Option<SharedSink>>) -> &Self {
        match sink.into() {
            Some(sink) => {
                self.update_all(|_, config| config.with_added_secondary(Arc::clone(&sink)))
            }
            None => self,
        }
    }

    /// Replace the writer of `level`. `None` is ignored.
    pub fn set_level_writer(&self, level: Level, sink: impl Into<Option<SharedSink>>) -> &Self {
        match sink.into() {
            Some(sink) => self.update(level, |config| config.with_secondary(Some(sink))),
            None => self,
        }
    }

    /// Add a writer to `level`. `None` is ignored.
    pub fn add_level_writer(&self, level: Level, sink: impl Into<Option<SharedSink>>) -> &Self {
        match sink.into() {
            Some(sink) => self.update(level, |config| config.with_added_secondary(sink)),
            None => self,
        }
    }

    /// Replace the standard stream a level writes to in `Std` and `Both` modes
    pub fn set_level_primary(&self, level: Level, sink: SharedSink) -> &Self {
        self.update(level, |config| config.with_primary(sink))
    }

    // ===== Presentation =====

    pub fn set_level_color(&self, level: Level, color: Color) -> &Self {
        self.update(level, |config| config.with_color(color))
    }

    pub fn enable_color(&self) -> &Self {
        self.update_all(|_, config| config.with_color_enabled(true))
    }

    pub fn disable_color(&self) -> &Self {
        self.update_all(|_, config| config.with_color_enabled(false))
    }

    pub fn enable_level_color(&self, level: Level) -> &Self {
        self.update(level, |config| config.with_color_enabled(true))
    }

    pub fn disable_level_color(&self, level: Level) -> &Self {
        self.update(level, |config| config.with_color_enabled(false))
    }

    /// Write every line as a JSON object instead of tagged text
    pub fn enable_json(&self) -> &Self {
        self.shared.engine.load().set_json(true);
        self
    }

    pub fn disable_json(&self) -> &Self {
        self.shared.engine.load().set_json(false);
        self
    }

    pub fn enable_timestamp(&self) -> &Self {
        self.update_all(|_, config| config.with_timestamp(true))
    }

    pub fn disable_timestamp(&self) -> &Self {
        self.update_all(|_, config| config.with_timestamp(false))
    }

    pub fn enable_level_timestamp(&self, level: Level) -> &Self {
        self.update(level, |config| config.with_timestamp(true))
    }

    pub fn disable_level_timestamp(&self, level: Level) -> &Self {
        self.update(level, |config| config.with_timestamp(false))
    }

    pub fn set_line_trace_mode(&self, trace: LineTrace) -> &Self {
        self.update_all(|_, config| config.with_line_trace(trace))
    }

    pub fn set_level_line_trace_mode(&self, level: Level, trace: LineTrace) -> &Self {
        self.update(level, |config| config.with_line_trace(trace))
    }

    // ===== Lifecycle =====

    /// Pre-allocate `count` line buffers
    pub fn enable_pool_buffer(&self, count: usize) -> &Self {
        self.shared.engine.load().pool.prewarm(count);
        self
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.shared.engine.load().pool.stats()
    }

    /// Replace the hook run after every FATAL emission.
    /// The default hook exits the process.
    pub fn replace_exit_hook<F>(&self, hook: F) -> &Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.shared.exit.store(Arc::new(ExitHook(Box::new(hook))));
        self
    }

    /// Discard every level table and start over with the predefined levels.
    ///
    /// Custom tags registered before the reset resolve to `Level::UNKNOWN`
    /// afterwards. The exit hook is kept.
    pub fn reset(&self) -> &Self {
        self.shared.engine.store(Arc::new(Engine::new()));
        tracing::debug!("log tables reset");
        self
    }

    /// Message part of a rendered text line: everything after the tag (and
    /// location, if any), without the trailing newline
    pub fn raw_string(line: &str) -> &str {
        let line = line.strip_suffix('\n').unwrap_or(line);
        match line.find(TAG_SEPARATOR) {
            Some(pos) => &line[pos + TAG_SEPARATOR.len()..],
            None => line,
        }
    }

    fn update<F>(&self, level: Level, f: F) -> &Self
    where
        F: FnOnce(LoggerConfig) -> LoggerConfig,
    {
        self.shared.engine.load().table.update(level, f);
        self
    }

    fn update_all<F>(&self, f: F) -> &Self
    where
        F: FnMut(Level, LoggerConfig) -> LoggerConfig,
    {
        self.shared.engine.load().table.update_all(f);
        self
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.shared.engine.load();
        f.debug_struct("Logger")
            .field("levels", &engine.table.len())
            .field("json", &engine.json())
            .finish()
    }
}
