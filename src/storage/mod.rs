// src/storage/mod.rs
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use crate::extractors::BlockTermination;
use crate::record::Record;
use crate::utils::error::StorageError;
use crate::view::RecordView;

/// Writes `Field,Value` followed by one fully quoted row per entry.
/// Embedded double quotes are doubled.
pub fn write_csv<W, I, F, V>(mut writer: W, rows: I) -> Result<(), StorageError>
where
    W: Write,
    I: IntoIterator<Item = (F, V)>,
    F: AsRef<str>,
    V: AsRef<str>,
{
    // The header line is written bare; every data cell is quoted.
    writer.write_all(b"Field,Value\n")?;

    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for (field, value) in rows {
        csv_writer.write_record([field.as_ref(), value.as_ref()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub struct StorageManager {
    base_dir: PathBuf,
    // Output stems already handed out in this run
    used_stems: HashSet<String>,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path, used_stems: HashSet::new() })
    }

    /// Reserves a file stem for a source document, unique within this run.
    /// `/a/note.txt` becomes `note_txt`; a second `note.txt` becomes `note_txt_2`.
    pub fn document_stem(&mut self, source: &Path) -> String {
        let base = source
            .file_name()
            .map(|s| s.to_string_lossy().replace('.', "_"))
            .unwrap_or_else(|| "document".to_string());

        let mut stem = base.clone();
        let mut index = 1;
        while !self.used_stems.insert(stem.clone()) {
            index += 1;
            stem = format!("{}_{}", base, index);
        }
        if index > 1 {
            tracing::warn!("Output name '{}' already used, writing {} as '{}'", base, source.display(), stem);
        }
        stem
    }

    fn target_path(&self, stem: &str, suffix: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", stem, suffix))
    }

    /// Writes CSV, summary and metadata for one document under a fresh stem.
    pub fn save_document(
        &mut self,
        source: &Path,
        view: &RecordView,
        termination: BlockTermination,
    ) -> Result<Vec<PathBuf>, StorageError> {
        let stem = self.document_stem(source);
        Ok(vec![
            self.save_csv(&stem, view)?,
            self.save_summary(&stem, view.record())?,
            self.save_metadata(&stem, source, view.record(), termination)?,
        ])
    }

    /// Saves the visible rows of the view as CSV
    pub fn save_csv(&self, stem: &str, view: &RecordView) -> Result<PathBuf, StorageError> {
        let file_path = self.target_path(stem, "_fields.csv");
        let file = fs::File::create(&file_path)?;
        write_csv(file, view.visible_rows())?;

        tracing::info!("Saved CSV to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the plain-text summary of the record
    pub fn save_summary(&self, stem: &str, record: &Record) -> Result<PathBuf, StorageError> {
        let file_path = self.target_path(stem, "_summary.txt");
        fs::write(&file_path, record.to_summary_text())?;

        tracing::info!("Saved summary to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the record together with extraction metadata in JSON format
    pub fn save_metadata(
        &self,
        stem: &str,
        source: &Path,
        record: &Record,
        termination: BlockTermination,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.target_path(stem, "_meta.json");

        let metadata = serde_json::json!({
            "source": source.display().to_string(),
            "field_count": record.len(),
            "fields_found": record.found_count(),
            "block_termination": termination,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
            "fields": record,
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, metadata_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved metadata to {}", file_path.display());
        Ok(file_path)
    }
}
