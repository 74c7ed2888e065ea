// src/view.rs
use crate::record::Record;
use crate::utils::error::RecordError;

/// Display state over a loaded record: per-row hide flags and a search filter.
/// Owned by the caller, never by the extractor.
#[derive(Debug, Clone)]
pub struct RecordView {
    record: Record,
    hidden: Vec<bool>,
}

impl RecordView {
    pub fn new(record: Record) -> Self {
        let hidden = vec![false; record.len()];
        Self { record, hidden }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Edits the underlying record. Hide flags are untouched.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) -> Result<(), RecordError> {
        self.record.set(field, value)
    }

    /// Applies a `FIELD=VALUE` edit to the underlying record.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), RecordError> {
        self.record.apply_assignment(assignment)
    }

    fn position(&self, field: &str) -> Result<usize, RecordError> {
        self.record
            .names()
            .position(|name| name == field)
            .ok_or_else(|| RecordError::UnknownField(field.to_string()))
    }

    pub fn hide(&mut self, field: &str) -> Result<(), RecordError> {
        let idx = self.position(field)?;
        self.hidden[idx] = true;
        Ok(())
    }

    pub fn unhide(&mut self, field: &str) -> Result<(), RecordError> {
        let idx = self.position(field)?;
        self.hidden[idx] = false;
        Ok(())
    }

    pub fn is_hidden(&self, field: &str) -> bool {
        self.position(field).map(|idx| self.hidden[idx]).unwrap_or(false)
    }

    /// Rows not flagged hidden, in table order. This is what gets exported.
    pub fn visible_rows(&self) -> Vec<(&'static str, &str)> {
        self.record
            .iter()
            .zip(&self.hidden)
            .filter(|(_, hidden)| !**hidden)
            .map(|(row, _)| row)
            .collect()
    }

    /// Rows whose field name or value contains `term`, ignoring case.
    /// The term is taken literally; a blank term matches every row.
    pub fn filter(&self, term: &str) -> Vec<(&'static str, &str)> {
        let needle = term.trim().to_lowercase();
        self.record
            .iter()
            .filter(|(name, value)| {
                needle.is_empty()
                    || name.to_lowercase().contains(&needle)
                    || value.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Renders the filter-matching rows as a Hide/Field/Value text table.
    pub fn render_table(&self, term: &str) -> String {
        let rows = self.filter(term);
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0).max("Field".len());

        let mut out = format!("Hide {:<width$}  Value\n", "Field");
        for (name, value) in rows {
            let mark = if self.is_hidden(name) { 'x' } else { ' ' };
            out.push_str(&format!("[{mark}]  {name:<width$}  {value}\n"));
        }
        out
    }
}
