use serde_json::Value;

/// Which Annalist records an export run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Type, list, view and field descriptions only.
    Metadata,
    /// Entity data records only.
    Subjects,
    /// Everything.
    All,
}

impl ExportMode {
    pub fn includes_metadata(&self) -> bool {
        matches!(self, ExportMode::Metadata | ExportMode::All)
    }

    pub fn includes_subjects(&self) -> bool {
        matches!(self, ExportMode::Subjects | ExportMode::All)
    }
}

/// One JSON-LD file to be written, with its path relative to the
/// collection directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntity {
    pub path: String,
    pub body: Value,
}

impl ExportEntity {
    pub fn new(path: impl Into<String>, body: Value) -> Self {
        ExportEntity {
            path: path.into(),
            body,
        }
    }
}

/// The full set of files produced from one or more analysis documents.
#[derive(Debug, Clone, Default)]
pub struct ExportSet {
    pub entities: Vec<ExportEntity>,
    pub type_count: usize,
    pub subject_count: usize,
}

impl ExportSet {
    pub fn merge(&mut self, other: ExportSet) {
        self.entities.extend(other.entities);
        self.type_count += other.type_count;
        self.subject_count += other.subject_count;
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
