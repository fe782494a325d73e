use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct FailedImage {
    pub path: String,
    pub error: AppError,
}

#[derive(Debug, Default, Serialize)]
pub struct IndexSummary {
    pub screenshot_dir: String,
    pub images_found: usize,
    pub images_indexed: usize,
    pub records_written: usize,
    pub failures: Vec<FailedImage>,
}
