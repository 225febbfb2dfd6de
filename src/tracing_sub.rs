use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// Writes to the shared log file when one is configured, otherwise to
/// stderr. The terminal host owns stdout, so logs never go there.
pub struct DelegatingWriter {
    inner: DelegatingInner,
}

enum DelegatingInner {
    File(Arc<Mutex<File>>),
    Stderr(io::Stderr),
}

impl Write for DelegatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .write(buf),
            DelegatingInner::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            DelegatingInner::File(file) => file
                .lock()
                .map_err(|_| io::Error::other("log file lock poisoned"))?
                .flush(),
            DelegatingInner::Stderr(s) => s.flush(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    file: Option<Arc<Mutex<File>>>,
}

impl SubscriberMakeWriter {
    /// Appends to `path`, creating it if needed.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }

    pub fn stderr() -> Self {
        Self::default()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = DelegatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        let inner = match &self.file {
            Some(file) => DelegatingInner::File(Arc::clone(file)),
            None => DelegatingInner::Stderr(io::stderr()),
        };
        DelegatingWriter { inner }
    }
}

/// Initialize the tracing subscriber, writing to `log_file` when given and
/// stderr otherwise. A log file that cannot be opened falls back to stderr.
/// Safe to call multiple times; subsequent calls are no-ops for the global
/// subscriber.
pub fn init_default(log_file: Option<&Path>) {
    let (writer, open_error) = match log_file.map(SubscriberMakeWriter::to_file) {
        Some(Ok(writer)) => (writer, None),
        Some(Err(err)) => (SubscriberMakeWriter::stderr(), Some(err)),
        None => (SubscriberMakeWriter::stderr(), None),
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .with_ansi(false)
        .try_init();
    if let Some(err) = open_error {
        tracing::warn!(error = %err, "log file unavailable, logging to stderr");
    }
}
