use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-file outcome record produced by the conversion engine.
///
/// One record exists for every file discovered in the staging area, whether or
/// not it was converted. `processed == false` always carries a `skip_reason`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_name: String,
    pub relative_path: String,
    pub file_type: String,
    pub file_size_bytes: u64,
    pub file_size_human: String,
    pub sha512: Option<String>,
    pub processed: bool,
    pub skip_reason: Option<String>,
    pub last_modified: String,
    pub created_time: String,
}

impl FileRecord {
    pub fn new(
        file_name: String,
        relative_path: String,
        file_type: String,
        file_size_bytes: u64,
        last_modified: String,
        created_time: String,
    ) -> Self {
        let file_size_human = format_file_size(file_size_bytes);
        Self {
            file_name,
            relative_path,
            file_type,
            file_size_bytes,
            file_size_human,
            sha512: None,
            processed: false,
            skip_reason: None,
            last_modified,
            created_time,
        }
    }
}

/// Structured result of a completed conversion job.
///
/// The three output locations point at the staging copy of the input, the
/// converted output tree, and the generated report file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub entries: Vec<FileRecord>,
    pub staging_path: String,
    pub output_path: String,
    pub report_path: String,
}

impl ConversionOutcome {
    /// Number of entries the engine actually converted.
    pub fn processed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.processed).count()
    }

    /// Status line for the shell: "7 of 10 files processed".
    pub fn summary(&self) -> String {
        format!(
            "{} of {} files processed",
            self.processed_count(),
            self.entries.len()
        )
    }

    /// Tally of file types in first-seen order, for the results card.
    pub fn type_tally(&self) -> IndexMap<String, usize> {
        let mut tally: IndexMap<String, usize> = IndexMap::new();
        for entry in &self.entries {
            *tally.entry(entry.file_type.clone()).or_insert(0) += 1;
        }
        tally
    }
}

/// Format a byte count as a human-readable size string.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
