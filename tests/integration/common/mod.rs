// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Shared helpers for the integration tests

#![allow(dead_code)]

use levelog::{Level, LineTrace, Logger, MemorySink, Sink};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Sink that rejects every write
pub struct FailingSink;

impl Sink for FailingSink {
    fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

/// Sink that counts writes and bytes without keeping them
#[derive(Default)]
pub struct CountingSink {
    pub writes: AtomicUsize,
    pub bytes: AtomicUsize,
}

impl CountingSink {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn bytes(&self) -> usize {
        self.bytes.load(Ordering::SeqCst)
    }
}

impl Sink for CountingSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(buf.len(), Ordering::SeqCst);
        Ok(())
    }
}

/// Logger whose predefined levels write uncolored, untimestamped lines
/// without location to `primary`
pub fn captured_logger(primary: &MemorySink) -> Logger {
    let logger = Logger::new();
    for level in Level::PREDEFINED {
        logger.set_level_primary(level, primary.sink());
    }
    logger
        .disable_color()
        .disable_timestamp()
        .set_line_trace_mode(LineTrace::Off);
    logger
}

/// Route every predefined level's standard stream to `sink`
pub fn route_primary(logger: &Logger, sink: Arc<dyn Sink>) {
    for level in Level::PREDEFINED {
        logger.set_level_primary(level, Arc::clone(&sink));
    }
}
