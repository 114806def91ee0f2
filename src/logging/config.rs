// SPDX-License-Identifier: Apache-2.0 OR MIT
// Per-level logger configuration and write-strategy resolution

use super::color::Color;
use super::sink::{Fanout, SharedSink};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output mode of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Drop everything
    None,
    /// Standard stream only
    #[default]
    Std,
    /// Attached writer only
    Writer,
    /// Standard stream and attached writer
    Both,
}

/// Where the caller location is rendered in a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTrace {
    #[default]
    Off,
    /// File name and line
    Short,
    /// Full path and line
    Long,
}

/// Precomputed description of which sinks an emission writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteStrategy {
    ColoredPrimary,
    Primary,
    Secondary,
    ColoredBoth,
    Both,
    Disabled,
}

impl WriteStrategy {
    /// Resolve the strategy for a `(mode, color, secondary present)` triple.
    ///
    /// Pure: the hot path only ever reads the cached result.
    pub const fn resolve(mode: Mode, color: bool, has_secondary: bool) -> Self {
        match (mode, color, has_secondary) {
            (Mode::Writer, _, true) => WriteStrategy::Secondary,
            (Mode::Both, true, true) => WriteStrategy::ColoredBoth,
            (Mode::Both, false, true) => WriteStrategy::Both,
            (Mode::Std | Mode::Both, true, _) => WriteStrategy::ColoredPrimary,
            (Mode::Std | Mode::Both, false, _) => WriteStrategy::Primary,
            _ => WriteStrategy::Disabled,
        }
    }

    #[inline]
    pub const fn is_disabled(self) -> bool {
        matches!(self, WriteStrategy::Disabled)
    }
}

/// Configuration of one level.
///
/// Values are never mutated once shared: every `with_*` method consumes the
/// config and returns a replacement with the write strategy recomputed, and
/// the replacement is stored as a whole.
#[derive(Clone)]
pub struct LoggerConfig {
    tag: String,
    raw_tag: String,
    primary: SharedSink,
    secondary: Option<SharedSink>,
    color: Color,
    color_enabled: bool,
    mode: Mode,
    prev_mode: Mode,
    timestamp: bool,
    line_trace: LineTrace,
    strategy: WriteStrategy,
}

impl LoggerConfig {
    pub fn new(
        tag: impl Into<String>,
        primary: SharedSink,
        color: Color,
        color_enabled: bool,
        mode: Mode,
    ) -> Self {
        let tag = tag.into();
        Self {
            raw_tag: render_tag(&tag),
            tag,
            primary,
            secondary: None,
            color,
            color_enabled,
            mode,
            prev_mode: mode,
            timestamp: true,
            line_trace: LineTrace::Off,
            strategy: WriteStrategy::resolve(mode, color_enabled, false),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Tag as rendered in a line: `"\t[TAG]:\t"`
    pub fn raw_tag(&self) -> &str {
        &self.raw_tag
    }

    pub fn primary(&self) -> &SharedSink {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&SharedSink> {
        self.secondary.as_ref()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mode restored when a threshold re-enables this level
    pub fn prev_mode(&self) -> Mode {
        self.prev_mode
    }

    pub fn timestamp(&self) -> bool {
        self.timestamp
    }

    pub fn line_trace(&self) -> LineTrace {
        self.line_trace
    }

    #[inline]
    pub fn strategy(&self) -> WriteStrategy {
        self.strategy
    }

    /// Set the mode, also remembering it as the mode to restore
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self.prev_mode = mode;
        self.refresh()
    }

    /// Disable the level, keeping the current mode for a later restore
    pub(crate) fn suppressed(mut self) -> Self {
        if self.mode != Mode::None {
            self.prev_mode = self.mode;
        }
        self.mode = Mode::None;
        self.refresh()
    }

    /// Restore the mode saved by `suppressed`
    pub(crate) fn restored(mut self) -> Self {
        self.mode = self.prev_mode;
        self.refresh()
    }

    pub fn with_color_enabled(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self.refresh()
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self.raw_tag = render_tag(&self.tag);
        self
    }

    pub fn with_primary(mut self, sink: SharedSink) -> Self {
        self.primary = sink;
        self
    }

    /// Replace the secondary sink; `None` detaches it
    pub fn with_secondary(mut self, sink: Option<SharedSink>) -> Self {
        self.secondary = sink;
        self.refresh()
    }

    /// Add a sink next to the current secondary one
    pub fn with_added_secondary(mut self, sink: SharedSink) -> Self {
        self.secondary = Some(Fanout::join(self.secondary.as_ref(), sink));
        self.refresh()
    }

    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.timestamp = enabled;
        self
    }

    pub fn with_line_trace(mut self, trace: LineTrace) -> Self {
        self.line_trace = trace;
        self
    }

    fn refresh(mut self) -> Self {
        self.strategy =
            WriteStrategy::resolve(self.mode, self.color_enabled, self.secondary.is_some());
        self
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerConfig")
            .field("tag", &self.tag)
            .field("has_secondary", &self.secondary.is_some())
            .field("color", &self.color)
            .field("color_enabled", &self.color_enabled)
            .field("mode", &self.mode)
            .field("prev_mode", &self.prev_mode)
            .field("timestamp", &self.timestamp)
            .field("line_trace", &self.line_trace)
            .field("strategy", &self.strategy)
            .finish()
    }
}

fn render_tag(tag: &str) -> String {
    format!("\t[{tag}]:\t")
}
