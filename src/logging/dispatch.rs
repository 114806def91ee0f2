// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Emission path
//!
//! An emission resolves the level's config with one registry load, returns
//! immediately if the cached strategy is `Disabled`, and otherwise renders
//! the line into a pooled buffer. When the strategy asks for color, the
//! painted copy is appended to the same buffer so both variants are written
//! from one allocation.
//!
//! Writes to several sinks are all attempted; the first failure is reported.

use super::config::{LineTrace, LoggerConfig, WriteStrategy};
use super::level::Level;
use super::sink::SharedSink;
use super::table::LevelTable;
use crate::buffer_pool::BufferPool;
use crate::error::LogError;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write as _};
use std::ops::Range;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Timestamp layout of every line
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Timestamp plus the tag separators
const INITIAL_LINE_HINT: usize = "2006-01-02 15:04:05".len() + "\t[".len() + "]:\t".len();

/// One generation of engine state, replaced as a whole by a reset
pub(crate) struct Engine {
    pub table: LevelTable,
    pub pool: Arc<BufferPool>,
    json: AtomicBool,
}

/// Byte ranges of the rendered variants inside the line buffer
struct Lines {
    plain: Range<usize>,
    colored: Range<usize>,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    date: &'a str,
    level: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    file: &'a str,
    detail: &'a str,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            table: LevelTable::new(),
            pool: BufferPool::new(INITIAL_LINE_HINT),
            json: AtomicBool::new(false),
        }
    }

    pub fn set_json(&self, enabled: bool) {
        self.json.store(enabled, Ordering::Relaxed);
    }

    pub fn json(&self) -> bool {
        self.json.load(Ordering::Relaxed)
    }

    /// Format and write one line at `level`
    pub fn emit(
        &self,
        level: Level,
        args: fmt::Arguments<'_>,
        location: &Location<'_>,
    ) -> Result<(), LogError> {
        let config = self.table.config(level).ok_or(LogError::UnknownLevel(level))?;
        if config.strategy().is_disabled() {
            return Ok(());
        }

        let mut buf = self.pool.acquire();
        let lines = if self.json() {
            let mut fields = self.pool.acquire();
            render_json(&mut buf, &mut fields, level, &config, args, location)?
        } else {
            render_line(&mut buf, level, &config, args, location)?
        };
        self.pool.record(buf.len());

        write_lines(&config, &buf[lines.plain], &buf[lines.colored])
            .map_err(|source| LogError::WriteFailure { level, source })
    }
}

fn render_line(
    buf: &mut Vec<u8>,
    level: Level,
    config: &LoggerConfig,
    args: fmt::Arguments<'_>,
    location: &Location<'_>,
) -> Result<Lines, LogError> {
    let raw_tag = config.raw_tag();
    if config.timestamp() {
        write_timestamp(buf).map_err(|_| LogError::Format(level))?;
        buf.extend_from_slice(raw_tag.as_bytes());
    } else {
        buf.extend_from_slice(raw_tag.strip_prefix('\t').unwrap_or(raw_tag).as_bytes());
    }
    if config.line_trace() != LineTrace::Off {
        buf.push(b'(');
        write_location(buf, config.line_trace(), location).map_err(|_| LogError::Format(level))?;
        buf.extend_from_slice(b"):\t");
    }
    buf.write_fmt(args).map_err(|_| LogError::Format(level))?;

    let body = buf.len();
    buf.push(b'\n');
    let plain = 0..buf.len();

    let colored = match config.strategy() {
        WriteStrategy::ColoredPrimary | WriteStrategy::ColoredBoth => {
            let start = buf.len();
            config.color().paint_within(buf, 0..body);
            buf.push(b'\n');
            start..buf.len()
        }
        _ => plain.clone(),
    };
    Ok(Lines { plain, colored })
}

/// Render one JSON object into `buf`. The field texts are staged in
/// `fields`, a second pooled buffer, before being escaped into `buf`.
fn render_json(
    buf: &mut Vec<u8>,
    fields: &mut Vec<u8>,
    level: Level,
    config: &LoggerConfig,
    args: fmt::Arguments<'_>,
    location: &Location<'_>,
) -> Result<Lines, LogError> {
    if config.timestamp() {
        write_timestamp(fields).map_err(|_| LogError::Format(level))?;
    }
    let date_end = fields.len();
    write_location(fields, config.line_trace(), location).map_err(|_| LogError::Format(level))?;
    let file_end = fields.len();
    fields.write_fmt(args).map_err(|_| LogError::Format(level))?;

    let text = std::str::from_utf8(fields).map_err(|_| LogError::Format(level))?;
    let line = JsonLine {
        date: &text[..date_end],
        level: config.tag(),
        file: &text[date_end..file_end],
        detail: &text[file_end..],
    };
    serde_json::to_writer(&mut *buf, &line).map_err(|source| LogError::Encode { level, source })?;
    buf.push(b'\n');

    let plain = 0..buf.len();
    Ok(Lines {
        colored: plain.clone(),
        plain,
    })
}

fn write_timestamp(buf: &mut Vec<u8>) -> io::Result<()> {
    write!(buf, "{}", chrono::Local::now().format(TIME_FORMAT))
}

/// Append the caller location as rendered for the given trace mode
fn write_location(buf: &mut Vec<u8>, trace: LineTrace, location: &Location<'_>) -> io::Result<()> {
    let file = match trace {
        LineTrace::Off => return Ok(()),
        LineTrace::Short => {
            let file = location.file();
            file.rsplit(['/', '\\']).next().unwrap_or(file)
        }
        LineTrace::Long => location.file(),
    };
    write!(buf, "{}:{}", file, location.line())
}

fn write_lines(config: &LoggerConfig, plain: &[u8], colored: &[u8]) -> io::Result<()> {
    match config.strategy() {
        WriteStrategy::ColoredPrimary => config.primary().write_all(colored),
        WriteStrategy::Primary => config.primary().write_all(plain),
        WriteStrategy::Secondary => match config.secondary() {
            Some(sink) => sink.write_all(plain),
            None => Ok(()),
        },
        WriteStrategy::ColoredBoth => {
            write_both(config.primary(), colored, config.secondary(), plain)
        }
        WriteStrategy::Both => write_both(config.primary(), plain, config.secondary(), plain),
        WriteStrategy::Disabled => Ok(()),
    }
}

/// Write to both sinks; the second write happens even if the first fails
fn write_both(
    primary: &SharedSink,
    first: &[u8],
    secondary: Option<&SharedSink>,
    second: &[u8],
) -> io::Result<()> {
    let primary_result = primary.write_all(first);
    let secondary_result = secondary.map_or(Ok(()), |sink| sink.write_all(second));
    primary_result.and(secondary_result)
}
