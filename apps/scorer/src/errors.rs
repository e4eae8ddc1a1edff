use thiserror::Error;

/// Application-level error type for the batch pipeline.
///
/// Only conditions that actually abort a row or the run live here; document
/// reads and model failures are absorbed where they happen and never surface
/// as an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("candidate row {0} has no name")]
    MissingName(usize),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
