//! The sequential batch loop: evaluate, persist, pace, repeat.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::batch::table::{self, CandidateRecord, ProcessingStatus};
use crate::clock::Clock;
use crate::errors::AppError;
use crate::pdf;
use crate::scoring::CandidateScorer;

/// Pause between candidates so sequential calls stay under the service's
/// rate limits. Skipped after the last row.
const INTER_ROW_DELAY: Duration = Duration::from_secs(5);

/// Drives the whole run: one candidate at a time, checkpoint after each.
pub struct BatchProcessor {
    scorer: CandidateScorer,
    candidates_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl BatchProcessor {
    pub fn new(scorer: CandidateScorer, candidates_dir: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            scorer,
            candidates_dir,
            clock,
        }
    }

    /// Processes every row of `input_csv` to completion or documented
    /// failure and writes the sorted result to `output_csv`.
    ///
    /// One failing row never aborts the run. An error escaping the loop is
    /// the critical path: whatever was processed is flushed before the
    /// error propagates.
    pub async fn run(&self, input_csv: &Path, output_csv: &Path) -> anyhow::Result<()> {
        let mut rows = table::read_table(input_csv)?;

        if let Err(e) = self.process_all(&mut rows, output_csv).await {
            error!("Critical error in processing: {e}");
            if table::write_table(output_csv, &rows).is_ok() {
                info!("Partial results saved to {}", output_csv.display());
            }
            return Err(e.into());
        }
        Ok(())
    }

    async fn process_all(
        &self,
        rows: &mut Vec<CandidateRecord>,
        output_csv: &Path,
    ) -> Result<(), AppError> {
        let total = rows.len();
        let mut failed: Vec<(String, String)> = Vec::new();
        info!("Starting to process {total} candidates");

        for index in 0..total {
            let current = index + 1;
            let name = rows[index].name.clone();
            info!("Processing candidate {current}/{total}: {name}");

            match self.process_row(&mut rows[index], index).await {
                Ok(()) => {
                    rows[index].status = ProcessingStatus::Success;
                    info!(
                        "Scored candidate {current}/{total}: {}",
                        rows[index].overall_score
                    );
                }
                Err(e) => {
                    error!("Failed to process candidate {name}: {e}");
                    rows[index].status = ProcessingStatus::Failed(e.to_string());
                    failed.push((name, e.to_string()));
                }
            }

            // Durable checkpoint: a crash mid-run keeps every prior row.
            table::write_table(output_csv, rows)?;

            if current < total {
                self.clock.sleep(INTER_ROW_DELAY).await;
            }
        }

        table::sort_rows(rows);
        table::write_table(output_csv, rows)?;
        log_summary(total, &failed);
        info!("Results saved to {}", output_csv.display());
        Ok(())
    }

    /// Everything that can fail for one candidate, isolated from the rest of
    /// the batch.
    async fn process_row(
        &self,
        row: &mut CandidateRecord,
        index: usize,
    ) -> Result<(), AppError> {
        if row.name.trim().is_empty() {
            return Err(AppError::MissingName(index + 1));
        }

        let resume_text = self.read_resume(row);
        let result = self
            .scorer
            .evaluate(&row.name, &resume_text, &row.experiences, &row.screening)
            .await;
        row.apply(&result);
        Ok(())
    }

    /// Resolves and extracts the row's resume. Absence is tolerated: a row
    /// without a readable resume is still evaluated on its text fields.
    fn read_resume(&self, row: &CandidateRecord) -> String {
        let reference = row.resume_file.trim();
        if reference.is_empty() {
            return String::new();
        }
        let path = self.candidates_dir.join(reference);
        if path.exists() {
            pdf::extract_text(&path)
        } else {
            warn!("Resume file not found for {}", row.name);
            String::new()
        }
    }
}

fn log_summary(total: usize, failed: &[(String, String)]) {
    let successful = total - failed.len();
    info!("Processing summary:");
    info!("Successfully processed: {successful}/{total} candidates");
    if !failed.is_empty() {
        info!("Failed to process {} candidates:", failed.len());
        for (name, reason) in failed {
            info!("- {name}: {reason}");
        }
    }
}
