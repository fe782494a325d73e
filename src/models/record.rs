use serde::Serialize;

/// One normalized line of OCR output, before the store assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedLine {
    pub source_path: String,
    pub normalized_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRecord {
    pub id: i64,
    pub source_path: String,
    pub normalized_text: String,
}
