use serde::Serialize;

use crate::models::record::TextRecord;

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub record: TextRecord,
    pub score: i64,
}
