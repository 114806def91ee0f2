// SPDX-License-Identifier: Apache-2.0 OR MIT
// Output sinks for formatted log lines

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Destination for formatted log lines.
///
/// Sinks are shared between levels and written from many threads at once.
/// The engine takes no lock around a write: a sink that needs whole-line
/// atomicity must provide it itself (see the `Mutex<W>` impl).
pub trait Sink: Send + Sync {
    /// Write the whole buffer
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;
}

/// Shared handle to a sink
pub type SharedSink = Arc<dyn Sink>;

/// Standard output sink
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().write_all(buf)
    }
}

/// Standard error sink
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stderr().write_all(buf)
    }
}

/// Standard stream used as the primary sink of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
}

impl Stream {
    pub fn sink(self) -> SharedSink {
        match self {
            Stream::Stdout => Arc::new(StdoutSink),
            Stream::Stderr => Arc::new(StderrSink),
        }
    }
}

impl Sink for File {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        // `&File` implements Write, so appends need no extra lock
        Write::write_all(&mut &*self, buf)
    }
}

impl<W: Write + Send> Sink for Mutex<W> {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        Write::write_all(&mut *self.lock(), buf)
    }
}

/// Sink writing to several sinks in turn.
///
/// Every inner sink is attempted even after a failure; the first error is
/// returned.
#[derive(Clone, Default)]
pub struct Fanout {
    sinks: Vec<SharedSink>,
}

impl Fanout {
    pub fn new(sinks: Vec<SharedSink>) -> Self {
        Self { sinks }
    }

    /// Combine `existing` (if any) with `added`
    pub(crate) fn join(existing: Option<&SharedSink>, added: SharedSink) -> SharedSink {
        match existing {
            None => added,
            Some(existing) => Arc::new(Fanout::new(vec![Arc::clone(existing), added])),
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for Fanout {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.write_all(buf) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// In-memory sink, mostly for capturing output in tests.
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared sink handle backed by this buffer
    pub fn sink(&self) -> SharedSink {
        Arc::new(self.clone())
    }

    /// Copy of everything written so far
    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Contents as (lossy) UTF-8
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }
}

/// Open `path` for appending, creating it and its parent directories.
pub fn file_sink(path: impl AsRef<Path>) -> io::Result<SharedSink> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Arc::new(file))
}
