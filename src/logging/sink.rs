//! Output destinations.
//!
//! A destination is `stdout`, `stderr`, a `file://` URL, or a plain file
//! path. Files are opened in append mode and created when missing; they stay
//! open until the owning logger is dropped.
//!
//! Writing goes through `tracing_subscriber`'s [`MakeWriter`]: each
//! destination becomes a boxed writer and a destination list is joined with
//! [`MakeWriterExt::and`].

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::Metadata;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::fmt::MakeWriter;
use url::Url;

use crate::logging::error::BuildError;

/// A single resolved destination.
#[derive(Debug)]
pub enum Sink {
    Stdout,
    Stderr,
    File { path: PathBuf, file: Arc<File> },
}

impl Sink {
    /// Resolve a destination identifier, opening files as needed.
    pub fn open(target: &str) -> Result<Self, BuildError> {
        match target {
            "stdout" => return Ok(Self::Stdout),
            "stderr" => return Ok(Self::Stderr),
            _ => {}
        }

        let path = if target.contains("://") {
            file_url_path(target)?
        } else {
            PathBuf::from(target)
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| BuildError::OpenSink {
                path: target.to_string(),
                source,
            })?;

        Ok(Self::File {
            path,
            file: Arc::new(file),
        })
    }

    fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(io::stdout),
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::File { file, .. } => BoxMakeWriter::new(Arc::clone(file)),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self {
            Self::Stdout => io::stdout().flush(),
            Self::Stderr => io::stderr().flush(),
            Self::File { file, .. } => file.sync_all(),
        }
    }
}

/// Extract the local path from a `file://` URL.
fn file_url_path(target: &str) -> Result<PathBuf, BuildError> {
    let invalid = |reason| BuildError::InvalidFileUrl {
        path: target.to_string(),
        reason,
    };

    let url = Url::parse(target).map_err(|_| invalid("malformed URL"))?;
    if url.scheme() != "file" {
        return Err(BuildError::UnsupportedScheme {
            scheme: url.scheme().to_string(),
            path: target.to_string(),
        });
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("user and password not allowed with file URLs"));
    }
    if url.fragment().is_some() {
        return Err(invalid("fragments not allowed with file URLs"));
    }
    if url.query().is_some() {
        return Err(invalid("query parameters not allowed with file URLs"));
    }
    match url.host_str() {
        None | Some("") | Some("localhost") => {}
        Some(_) => return Err(invalid("file URLs must leave host empty or use localhost")),
    }

    url.to_file_path().map_err(|_| invalid("not a local path"))
}

/// An ordered set of destinations written as one.
#[derive(Debug, Default)]
pub struct Sinks {
    sinks: Vec<Sink>,
}

impl Sinks {
    /// Open every destination, failing on the first that cannot be resolved.
    pub fn open(targets: &[String]) -> Result<Self, BuildError> {
        let sinks = targets
            .iter()
            .map(|target| Sink::open(target))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sinks })
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// One writer that tees into every destination.
    ///
    /// Every destination is attempted on each write; the first error is
    /// returned. An empty set discards.
    pub fn make_writer(&self) -> BoxMakeWriter {
        self.sinks
            .iter()
            .map(Sink::make_writer)
            .reduce(|all, next| BoxMakeWriter::new(all.and(next)))
            .unwrap_or_else(|| BoxMakeWriter::new(io::sink))
    }

    /// Flush every destination.
    pub fn flush(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Entry writer of a logger.
///
/// Writes go to the outputs; a failed write is reported to the error
/// outputs as `<time> write error: <err>`.
#[derive(Clone)]
pub struct Output {
    outputs: Arc<BoxMakeWriter>,
    errors: Arc<BoxMakeWriter>,
}

impl Output {
    pub fn new(outputs: &Sinks, error_outputs: &Sinks) -> Self {
        Self {
            outputs: Arc::new(outputs.make_writer()),
            errors: Arc::new(error_outputs.make_writer()),
        }
    }
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

impl<'a> MakeWriter<'a> for Output {
    type Writer = OutputWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        OutputWriter {
            inner: MakeWriter::make_writer(&*self.outputs),
            errors: &self.errors,
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        OutputWriter {
            inner: MakeWriter::make_writer_for(&*self.outputs, meta),
            errors: &self.errors,
        }
    }
}

/// Writer handed out by [`Output`] for a single entry.
pub struct OutputWriter<'a> {
    inner: Box<dyn Write + 'a>,
    errors: &'a BoxMakeWriter,
}

impl OutputWriter<'_> {
    fn report(&self, err: &io::Error) {
        let line = format!("{} write error: {}\n", Local::now().to_rfc3339(), err);
        let _ = MakeWriter::make_writer(self.errors).write_all(line.as_bytes());
    }
}

impl Write for OutputWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let result = self.inner.write_all(buf);
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
