// src/extractors/assembler.rs

// --- Imports ---
use crate::extractors::block::{block_regex, extract_block, extract_block_until, header_marker_regex};
use crate::extractors::field::{extract_field, field_regex};
use crate::extractors::specs::{FieldKind, FieldSpec, FIELD_SPECS};
use crate::record::Record;
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Where a block excerpt ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTermination {
    /// Plain character window up to the cap; may run into the next section.
    #[default]
    Window,
    /// Window cut at the first header of any block field found inside it.
    NextHeader,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblerConfig {
    pub termination: BlockTermination,
}

// --- Compiled table ---
#[derive(Debug)]
enum Matcher {
    Scalar(Regex),
    Block(Regex),
}

#[derive(Debug)]
struct CompiledSpec {
    name: &'static str,
    matcher: Matcher,
}

impl CompiledSpec {
    fn compile(spec: &FieldSpec) -> Result<Self, ExtractError> {
        let matcher = match spec.kind {
            FieldKind::Scalar { pattern } => Matcher::Scalar(field_regex(spec.name, pattern)?),
            FieldKind::Block { header, max_len } => {
                Matcher::Block(block_regex(spec.name, header, max_len)?)
            }
        };
        Ok(Self { name: spec.name, matcher })
    }
}

static DEFAULT_ASSEMBLER: Lazy<RecordAssembler> = Lazy::new(|| {
    RecordAssembler::new(AssemblerConfig::default())
        .expect("Failed to compile the canonical field table")
});

/// Runs the canonical table against document text and builds a [`Record`].
#[derive(Debug)]
pub struct RecordAssembler {
    config: AssemblerConfig,
    specs: Vec<CompiledSpec>,
    // Header markers of every block field, used by `BlockTermination::NextHeader`.
    markers: Vec<Regex>,
}

impl RecordAssembler {
    /// Compiles the canonical table.
    pub fn new(config: AssemblerConfig) -> Result<Self, ExtractError> {
        Self::from_specs(FIELD_SPECS, config)
    }

    /// Compiles an arbitrary table. The record produced follows its order.
    pub fn from_specs(table: &[FieldSpec], config: AssemblerConfig) -> Result<Self, ExtractError> {
        let specs = table
            .iter()
            .map(CompiledSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let markers = table
            .iter()
            .filter_map(|spec| match spec.kind {
                FieldKind::Block { header, .. } => Some(header_marker_regex(spec.name, header)),
                FieldKind::Scalar { .. } => None,
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Compiled {} field specs ({} block headers), termination {:?}",
            specs.len(),
            markers.len(),
            config.termination
        );
        Ok(Self { config, specs, markers })
    }

    pub fn config(&self) -> AssemblerConfig {
        self.config
    }

    /// Extracts every field of the table from `text`. Never fails: a field
    /// that is not found is left empty.
    pub fn assemble(&self, text: &str) -> Record {
        let fields = self
            .specs
            .iter()
            .map(|spec| {
                let value = match &spec.matcher {
                    Matcher::Scalar(re) => extract_field(text, re),
                    Matcher::Block(re) => match self.config.termination {
                        BlockTermination::Window => extract_block(text, re),
                        BlockTermination::NextHeader => extract_block_until(text, re, &self.markers),
                    },
                };
                if value.is_empty() {
                    tracing::trace!("Field '{}' not found", spec.name);
                } else {
                    tracing::trace!("Field '{}' = '{}'", spec.name, value);
                }
                (spec.name, value)
            })
            .collect();

        let record = Record::from_pairs(fields);
        tracing::debug!("Assembled record: {}/{} fields found", record.found_count(), record.len());
        record
    }
}

/// Assembles a record with the canonical table and the default window policy.
pub fn assemble(text: &str) -> Record {
    DEFAULT_ASSEMBLER.assemble(text)
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::specs::canonical_names;

    fn next_header() -> RecordAssembler {
        RecordAssembler::new(AssemblerConfig { termination: BlockTermination::NextHeader }).unwrap()
    }

    #[test]
    fn test_record_has_every_canonical_key_in_order() {
        for text in ["", "garbage \u{0} text", "Name: X\nVitals:\nBP 100/60"] {
            let record = assemble(text);
            assert_eq!(record.len(), FIELD_SPECS.len());
            assert!(record.names().eq(canonical_names()));
        }
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let text = "Name: Jane Doe\nChief Complaint: cough\nHR 88";
        assert_eq!(assemble(text), assemble(text));
    }

    #[test]
    fn test_no_labels_means_all_empty() {
        let record = assemble("The quick brown fox jumps over the lazy dog.");
        assert!(record.iter().all(|(_, value)| value.is_empty()));
        assert_eq!(record.found_count(), 0);
    }

    #[test]
    fn test_demographics_example() {
        let record = assemble("Name: Jane Doe\nAge: 45\nSex: Female\n");
        assert_eq!(record.get("Patient Name"), Some("Jane Doe"));
        assert_eq!(record.get("Age"), Some("45"));
        assert_eq!(record.get("Gender"), Some("Female"));
        let others = record
            .iter()
            .filter(|(name, _)| !["Patient Name", "Age", "Gender"].contains(name));
        for (name, value) in others {
            assert_eq!(value, "", "{name} should be empty");
        }
    }

    #[test]
    fn test_vitals_example_window_policy() {
        let text = "Chief Complaint:\nChest pain for 2 days.\nVitals:\nBP 120/80 HR 72";
        let record = assemble(text);
        assert_eq!(record.get("BP"), Some("120/80"));
        assert_eq!(record.get("HR"), Some("72"));
        // The plain window runs on into the Vitals section.
        let complaint = record.get("Chief Complaint").unwrap();
        assert!(complaint.starts_with("Chest pain for 2 days."));
        assert_eq!(complaint, "Chest pain for 2 days. Vitals: BP 120/80 HR 72");
        assert!(complaint.chars().count() <= 300);
        assert_eq!(record.get("Vitals"), Some("BP 120/80 HR 72"));
    }

    #[test]
    fn test_vitals_example_next_header_policy() {
        let text = "Chief Complaint:\nChest pain for 2 days.\nVitals:\nBP 120/80 HR 72";
        let record = next_header().assemble(text);
        assert_eq!(record.get("Chief Complaint"), Some("Chest pain for 2 days."));
        assert_eq!(record.get("Vitals"), Some("BP 120/80 HR 72"));
        assert_eq!(record.get("BP"), Some("120/80"));
    }

    #[test]
    fn test_diagnosis_aliases() {
        assert_eq!(assemble("Diagnosis: flu").get("Diagnosis"), Some("flu"));
        assert_eq!(assemble("Impression: flu").get("Diagnosis"), Some("flu"));
    }

    #[test]
    fn test_header_aliases_map_to_one_field() {
        assert_eq!(assemble("PMH:\nasthma").get("Past Medical History"), Some("asthma"));
        assert_eq!(
            assemble("Assessment and Plan: rest, fluids").get("Assessment & Plan"),
            Some("rest, fluids")
        );
        assert_eq!(assemble("Vital Signs:\nstable").get("Vitals"), Some("stable"));
        assert_eq!(assemble("Heart Rate - 64").get("HR"), Some("64"));
        assert_eq!(assemble("Respiratory Rate: 16").get("RR"), Some("16"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let record = assemble("MRN: AAA111\nAge: 30\n...\nMRN: BBB222\nAge: 31");
        assert_eq!(record.get("MRN"), Some("AAA111"));
        assert_eq!(record.get("Age"), Some("30"));
    }

    #[test]
    fn test_first_block_occurrence_wins() {
        let text = "Allergies:\nNKDA\n\nAllergies:\nPCN";
        // The plain window runs on into the repeated header.
        assert_eq!(assemble(text).get("Allergies"), Some("NKDA Allergies: PCN"));
        assert_eq!(next_header().assemble(text).get("Allergies"), Some("NKDA"));
    }

    #[test]
    fn test_digits_and_spaces_are_ascii_only() {
        assert_eq!(assemble("Age: \u{664}\u{665}").get("Age"), Some(""));
        assert_eq!(assemble("HR\u{3000}72").get("HR"), Some(""));
        assert_eq!(assemble("Age:\t45").get("Age"), Some("45"));
    }

    #[test]
    fn test_temperature_value_excludes_unit() {
        assert_eq!(assemble("Temperature: 98.6°F").get("Temp"), Some("98.6"));
        assert_eq!(assemble("Temp 101F").get("Temp"), Some("101"));
    }

    #[test]
    fn test_block_cap_applies_before_normalization() {
        let text = format!("Chief Complaint:\n{}", "a\n".repeat(400));
        let complaint = assemble(&text).get("Chief Complaint").unwrap().to_string();
        assert!(!complaint.contains('\n'));
        // 300 raw characters: 150 letters separated by newlines, the last one trimmed.
        assert_eq!(complaint.chars().filter(|c| *c == 'a').count(), 150);
        assert!(complaint.chars().count() <= 300);
    }

    #[test]
    fn test_physical_exam_block() {
        let record = assemble("Physical Examination:\nLungs clear.\nHeart RRR.");
        assert_eq!(record.get("Physical Exam"), Some("Lungs clear. Heart RRR."));
    }

    #[test]
    fn test_custom_table_controls_record_shape() {
        const TABLE: &[FieldSpec] = &[
            FieldSpec { name: "Ward", kind: FieldKind::Scalar { pattern: r"Ward\s*:\s*(\w+)" } },
            FieldSpec { name: "Notes", kind: FieldKind::Block { header: "Notes", max_len: 20 } },
        ];
        let assembler = RecordAssembler::from_specs(TABLE, AssemblerConfig::default()).unwrap();
        let record = assembler.assemble("Ward: B4\nNotes:\nstable overnight, no events reported");
        assert!(record.names().eq(["Ward", "Notes"]));
        assert_eq!(record.get("Ward"), Some("B4"));
        assert_eq!(record.get("Notes"), Some("stable overnight, no"));
    }

    #[test]
    fn test_invalid_table_entry_is_an_error() {
        const TABLE: &[FieldSpec] = &[FieldSpec { name: "Bad", kind: FieldKind::Scalar { pattern: "(" } }];
        assert!(RecordAssembler::from_specs(TABLE, AssemblerConfig::default()).is_err());
    }
}
