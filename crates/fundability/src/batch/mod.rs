//! CSV batch import, chunked batch scoring and report export.

mod export;
mod import;
mod runner;

pub use export::write_report;
pub use import::{records_from_path, records_from_reader, BatchImportError};
pub use runner::{
    BatchFailure, BatchReport, BatchRunner, BatchSuccess, DEFAULT_CHUNK_DELAY, DEFAULT_CHUNK_SIZE,
};
