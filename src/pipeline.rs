// src/pipeline.rs
use crate::extractors::RecordAssembler;
use crate::loader;
use crate::record::Record;
use crate::utils::error::LoadError;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of loading and extracting one document.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub result: Result<Record, LoadError>,
}

/// Loads and assembles every document on the blocking pool so large PDFs do
/// not stall the runtime. Outcomes come back in the order of `paths`.
pub async fn process_documents(paths: Vec<PathBuf>, assembler: Arc<RecordAssembler>) -> Vec<DocumentOutcome> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let assembler = Arc::clone(&assembler);
            let task_path = path.clone();
            let handle = tokio::task::spawn_blocking(move || -> Result<Record, LoadError> {
                let text = loader::load(&task_path)?;
                Ok(assembler.assemble(&text))
            });
            (path, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(LoadError::Task(e.to_string())),
        };

        match &result {
            Ok(record) => tracing::info!(
                "Extracted {}/{} fields from {}",
                record.found_count(),
                record.len(),
                path.display()
            ),
            Err(e) => tracing::error!("Failed to load {}: {}", path.display(), e),
        }
        outcomes.push(DocumentOutcome { path, result });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::AssemblerConfig;
    use std::fs;

    #[test]
    fn test_outcomes_follow_input_order_and_isolate_failures() {
        let dir = std::env::temp_dir().join(format!("chart_extract_pipeline_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.txt");
        let missing = dir.join("missing.txt");
        let last = dir.join("last.txt");
        fs::write(&first, "Name: Ann Lee\nMRN: Q77").unwrap();
        fs::write(&last, "Age: 80\nAllergies:\nlatex").unwrap();

        let assembler = Arc::new(RecordAssembler::new(AssemblerConfig::default()).unwrap());
        let outcomes = tokio_test::block_on(process_documents(
            vec![first.clone(), missing.clone(), last.clone()],
            assembler,
        ));

        let paths: Vec<_> = outcomes.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, [first, missing, last]);

        let record = outcomes[0].result.as_ref().unwrap();
        assert_eq!(record.get("Patient Name"), Some("Ann Lee"));
        assert_eq!(record.get("MRN"), Some("Q77"));
        assert!(matches!(outcomes[1].result, Err(LoadError::Io { .. })));
        let record = outcomes[2].result.as_ref().unwrap();
        assert_eq!(record.get("Allergies"), Some("latex"));

        fs::remove_dir_all(dir).ok();
    }
}
