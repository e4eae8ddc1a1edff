//! The candidate table: CSV schema, checkpointed persistence, final sort.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AppError;
use crate::scoring::models::EvaluationResult;

/// Per-row outcome of a processing pass.
///
/// Sorting uses `rank()`, not the serialized label, so Success orders before
/// every failure regardless of how the reason string compares.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProcessingStatus {
    #[default]
    NotProcessed,
    Success,
    Failed(String),
}

impl ProcessingStatus {
    /// Successful rows first, everything else after.
    pub fn rank(&self) -> u8 {
        match self {
            ProcessingStatus::Success => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingStatus::NotProcessed => write!(f, "Not Processed"),
            ProcessingStatus::Success => write!(f, "Success"),
            ProcessingStatus::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

impl Serialize for ProcessingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProcessingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(match label.as_str() {
            "" | "Not Processed" => ProcessingStatus::NotProcessed,
            "Success" => ProcessingStatus::Success,
            other => {
                let reason = other.strip_prefix("Failed: ").unwrap_or(other);
                ProcessingStatus::Failed(reason.to_string())
            }
        })
    }
}

/// One row of the candidate table.
///
/// Input columns are optional except the name; a table missing an optional
/// column deserializes with empty defaults. Result columns are written back
/// after processing and default to zero scores, empty notes, and
/// `Not Processed` status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "ResumeFile", default)]
    pub resume_file: String,
    #[serde(rename = "Experiences", default)]
    pub experiences: String,
    #[serde(rename = "Screening", default)]
    pub screening: String,
    #[serde(rename = "Domain_Knowledge_Score", default)]
    pub domain_knowledge_score: f64,
    #[serde(rename = "Technical_Skills_Score", default)]
    pub technical_skills_score: f64,
    #[serde(rename = "Experience_Score", default)]
    pub experience_score: f64,
    #[serde(rename = "Cultural_Fit_Score", default)]
    pub cultural_fit_score: f64,
    #[serde(rename = "Overall_Score", default)]
    pub overall_score: f64,
    #[serde(rename = "Domain_Knowledge_Notes", default)]
    pub domain_knowledge_notes: String,
    #[serde(rename = "Technical_Notes", default)]
    pub technical_notes: String,
    #[serde(rename = "Experience_Notes", default)]
    pub experience_notes: String,
    #[serde(rename = "Cultural_Notes", default)]
    pub cultural_notes: String,
    #[serde(rename = "Overall_Explanation", default)]
    pub overall_explanation: String,
    #[serde(rename = "Processing_Status", default)]
    pub status: ProcessingStatus,
}

impl CandidateRecord {
    /// Copies every field of an evaluation into this row's result columns.
    pub fn apply(&mut self, result: &EvaluationResult) {
        self.domain_knowledge_score = result.domain_knowledge;
        self.technical_skills_score = result.technical_skills;
        self.experience_score = result.experience_relevance;
        self.cultural_fit_score = result.cultural_fit;
        self.overall_score = result.overall_score;
        self.domain_knowledge_notes = result.domain_knowledge_notes.clone();
        self.technical_notes = result.technical_notes.clone();
        self.experience_notes = result.experience_notes.clone();
        self.cultural_notes = result.cultural_notes.clone();
        self.overall_explanation = result.overall_explanation.clone();
    }
}

/// Reads the whole candidate table. A table that cannot be read at all is
/// fatal to the run; there is nothing to degrade to.
pub fn read_table(path: &Path) -> Result<Vec<CandidateRecord>, AppError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Rewrites the whole table. Called after every processed row, so a crash
/// loses at most the in-flight row.
pub fn write_table(path: &Path, rows: &[CandidateRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Final ordering: successful rows first, best scores on top, failures at
/// the end. Stable, so equal keys keep their input order.
pub fn sort_rows(rows: &mut [CandidateRecord]) {
    rows.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| b.overall_score.total_cmp(&a.overall_score))
    });
}
