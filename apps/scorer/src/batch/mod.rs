// Batch processing of the candidate table: read, evaluate row by row,
// checkpoint, sort, summarize.

pub mod table;

mod processor;

pub use processor::BatchProcessor;
