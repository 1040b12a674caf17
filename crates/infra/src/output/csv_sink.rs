use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use harvest_core::domain::{EntityKind, Projection};
use tracing::info;

use crate::output::SinkError;

/// CSV output for one entity kind. The header is written on creation and
/// every row is flushed as soon as it is written.
pub struct CsvSink<W: Write> {
    entity: EntityKind,
    width: usize,
    writer: csv::Writer<W>,
    rows: usize,
}

impl<W: Write> CsvSink<W> {
    pub fn new(entity: EntityKind, inner: W) -> Result<Self, SinkError> {
        let header = entity.header();
        let mut writer = csv::WriterBuilder::new().from_writer(inner);
        writer.write_record(&header)?;
        writer.flush()?;
        Ok(Self {
            entity,
            width: header.len(),
            writer,
            rows: 0,
        })
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn write(&mut self, projection: &Projection) -> Result<(), SinkError> {
        if projection.entity() != self.entity {
            return Err(SinkError::WrongSink {
                expected: self.entity,
                found: projection.entity(),
            });
        }
        let cells = projection.cells();
        if cells.len() != self.width {
            return Err(SinkError::Width {
                entity: self.entity,
                expected: self.width,
                found: cells.len(),
            });
        }
        self.writer.write_record(&cells)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|err| SinkError::Io(err.into_error()))
    }
}

impl CsvSink<File> {
    pub fn create(entity: EntityKind, path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Self::new(entity, file)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SinkCounts {
    pub threads: usize,
    pub messages: usize,
    pub authors: usize,
}

/// The three output files of a run, held open until `close`.
pub struct OutputSinks {
    dir: PathBuf,
    threads: CsvSink<File>,
    messages: CsvSink<File>,
    authors: CsvSink<File>,
}

impl OutputSinks {
    pub fn create(dir: &Path) -> Result<Self, SinkError> {
        fs::create_dir_all(dir)?;
        let open = |entity: EntityKind| CsvSink::create(entity, &dir.join(entity.file_name()));
        Ok(Self {
            dir: dir.to_path_buf(),
            threads: open(EntityKind::Thread)?,
            messages: open(EntityKind::Message)?,
            authors: open(EntityKind::Author)?,
        })
    }

    pub fn write(&mut self, projection: &Projection) -> Result<(), SinkError> {
        match projection.entity() {
            EntityKind::Thread => self.threads.write(projection),
            EntityKind::Message => self.messages.write(projection),
            EntityKind::Author => self.authors.write(projection),
        }
    }

    pub fn counts(&self) -> SinkCounts {
        SinkCounts {
            threads: self.threads.rows(),
            messages: self.messages.rows(),
            authors: self.authors.rows(),
        }
    }

    pub fn close(self) -> Result<SinkCounts, SinkError> {
        let counts = self.counts();
        self.threads.finish()?;
        self.messages.finish()?;
        self.authors.finish()?;
        info!(
            dir = %self.dir.display(),
            threads = counts.threads,
            messages = counts.messages,
            authors = counts.authors,
            "output sinks closed"
        );
        Ok(counts)
    }
}
