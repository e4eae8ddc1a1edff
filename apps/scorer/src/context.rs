//! Position-context aggregation.
//!
//! Every PDF in the context folder (job description, culture docs, team
//! notes) is flattened into one text blob that every evaluation prompt
//! embeds. The blob is built on first access and cached for the lifetime of
//! the run.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::info;

use crate::pdf;

/// Lazily loaded, cached position context. Pass one instance to the
/// evaluation layer — there is no global.
pub struct ProjectContext {
    folder: PathBuf,
    cache: OnceLock<String>,
}

impl ProjectContext {
    pub fn new(folder: PathBuf) -> Self {
        Self {
            folder,
            cache: OnceLock::new(),
        }
    }

    /// Returns the combined text of every PDF directly inside the context
    /// folder, each section headed by its source filename.
    ///
    /// A missing folder or a folder with no PDFs yields an empty string —
    /// evaluations still run, just without position grounding. The first
    /// call scans the folder; later calls return the cached blob without
    /// touching the filesystem.
    pub fn load(&self) -> &str {
        self.cache.get_or_init(|| {
            let mut names: Vec<String> = match std::fs::read_dir(&self.folder) {
                Ok(entries) => entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.path().is_file())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .filter(|name| name.to_lowercase().ends_with(".pdf"))
                    .collect(),
                Err(_) => Vec::new(),
            };
            // Directory order is platform-dependent; sort for stable output.
            names.sort();

            let sections: Vec<String> = names
                .iter()
                .map(|name| {
                    let text = pdf::extract_text(&self.folder.join(name));
                    format!("Content from {name}:\n{text}")
                })
                .collect();

            info!("Loaded position context from {}", self.folder.display());
            sections.join("\n\n")
        })
    }
}
