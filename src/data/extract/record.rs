//! Extracted records and per-call batches

/// One normalized output row, aligned with the shape's headers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    fields: Vec<String>,
}

impl Record {
    pub(crate) fn new(fields: Vec<String>) -> Self {
        Record { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

/// Accepted records from one extraction call plus the number of rows skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    pub records: Vec<Record>,
    pub skipped: usize,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows looked at, header excluded
    pub fn examined(&self) -> usize {
        self.records.len() + self.skipped
    }

    /// Append another batch, keeping order
    pub fn merge(&mut self, other: RecordBatch) {
        self.records.extend(other.records);
        self.skipped += other.skipped;
    }
}
