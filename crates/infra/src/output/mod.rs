pub mod csv_sink;
pub mod error_log;

use harvest_core::domain::EntityKind;
use thiserror::Error;

pub use csv_sink::{CsvSink, OutputSinks, SinkCounts};
pub use error_log::ErrorLog;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{entity} row has {found} cells, header has {expected}")]
    Width {
        entity: EntityKind,
        expected: usize,
        found: usize,
    },
    #[error("{found} row written to the {expected} sink")]
    WrongSink {
        expected: EntityKind,
        found: EntityKind,
    },
}
