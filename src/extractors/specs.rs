// src/extractors/specs.rs
//! The canonical field table. Every extraction rule lives here as data;
//! adding a field means adding a row, not touching the assembly loop.

/// How a canonical field is located in the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Single-line value: the last capture group of `pattern`.
    Scalar { pattern: &'static str },
    /// Narrative excerpt following `header`, at most `max_len` characters.
    Block { header: &'static str, max_len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn scalar(name: &'static str, pattern: &'static str) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Scalar { pattern } }
}

const fn block(name: &'static str, header: &'static str, max_len: usize) -> FieldSpec {
    FieldSpec { name, kind: FieldKind::Block { header, max_len } }
}

// Label aliases are non-capturing so the final group is always the value.
// Digit and whitespace classes are ASCII-only.
pub static FIELD_SPECS: &[FieldSpec] = &[
    scalar("Patient Name", r"Name(?-u:\s)*[:\-]?(?-u:\s)*([^\r\n]+)"),
    scalar("Age", r"Age(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{1,3})"),
    scalar("Gender", r"(?:Sex|Gender)(?-u:\s)*[:\-]?(?-u:\s)*(Male|Female|Other)"),
    scalar("DOB", r"DOB(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{1,2}/[0-9]{1,2}/[0-9]{2,4})"),
    scalar("MRN", r"MRN(?-u:\s)*[:\-]?(?-u:\s)*([A-Za-z0-9]+)"),
    block("Chief Complaint", "Chief Complaint", 300),
    block("Diagnosis", "Impression|Diagnosis", 300),
    block("Problem List", "Problem List", 400),
    block("Assessment & Plan", "Assessment & Plan|Assessment and Plan", 500),
    block("Medications", "Medications", 300),
    block("Allergies", "Allergies", 300),
    block("Past Medical History", "Past Medical History|PMH", 400),
    block("Family History", "Family History", 400),
    block("Social History", "Social History", 400),
    block("Vitals", "Vitals|Vital Signs", 400),
    scalar("BP", r"(?:BP|Blood Pressure)(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{2,3}/[0-9]{2,3})"),
    scalar("HR", r"(?:HR|Heart Rate)(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{2,3})"),
    scalar("Temp", r"(?:Temp|Temperature)(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{2,3}(?:\.[0-9])?)(?:°?F)?"),
    scalar("RR", r"(?:RR|Respiratory Rate)(?-u:\s)*[:\-]?(?-u:\s)*([0-9]{2})"),
    block("Physical Exam", "Physical Exam|Physical Examination", 500),
];

/// Canonical field names in table order.
pub fn canonical_names() -> impl Iterator<Item = &'static str> {
    FIELD_SPECS.iter().map(|spec| spec.name)
}
