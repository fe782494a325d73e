use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rusqlite::Connection;

use crate::config::{FailurePolicy, IndexingOptions};
use crate::data::repository;
use crate::error::AppError;
use crate::models::index_summary::{FailedImage, IndexSummary};
use crate::models::record::ExtractedLine;
use crate::services::ocr_service::{self, OcrEngine};

/// Lists the accepted images directly inside `directory`, sorted by file name.
pub fn find_images(directory: &Path, options: &IndexingOptions) -> Result<Vec<PathBuf>, AppError> {
    if !std::fs::metadata(directory)?.is_dir() {
        return Err(AppError::General(format!(
            "not a directory: {}",
            directory.display()
        )));
    }

    let mut images = Vec::new();

    for entry in walkdir::WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy();
        if !ocr_service::is_accepted_image(&name, options.match_mode) {
            continue;
        }
        if !entry.path().is_file() {
            tracing::debug!(path = %entry.path().display(), "skipping non-file entry");
            continue;
        }
        images.push(entry.into_path());
    }

    Ok(images)
}

fn extract_all(
    engine: &dyn OcrEngine,
    images: &[PathBuf],
    options: &IndexingOptions,
    on_progress: &(dyn Fn(usize, usize) + Sync),
) -> Result<Vec<(PathBuf, Result<Vec<ExtractedLine>, AppError>)>, AppError> {
    let total = images.len();

    if options.jobs <= 1 {
        let mut results = Vec::with_capacity(total);
        for (i, path) in images.iter().enumerate() {
            let result = ocr_service::extract(engine, path, options.skip_blank_lines);
            let failed = result.is_err();
            results.push((path.clone(), result));
            on_progress(i + 1, total);
            if failed && options.failure_policy == FailurePolicy::Abort {
                break;
            }
        }
        return Ok(results);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs)
        .build()
        .map_err(|e| AppError::General(format!("failed to start OCR workers: {e}")))?;

    let done = std::sync::atomic::AtomicUsize::new(0);
    let results = pool.install(|| {
        images
            .par_iter()
            .map(|path| {
                let result = ocr_service::extract(engine, path, options.skip_blank_lines);
                let n = done.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
                on_progress(n, total);
                (path.clone(), result)
            })
            .collect::<Vec<_>>()
    });

    Ok(results)
}

/// Rebuilds the whole index from the images in `directory`.
///
/// All OCR runs before the store is touched. The store is then replaced in
/// a single transaction, so under [`FailurePolicy::Abort`] a failing image
/// leaves the previous index exactly as it was.
pub fn reindex<F>(
    conn: &mut Connection,
    engine: &dyn OcrEngine,
    directory: &Path,
    options: &IndexingOptions,
    on_progress: F,
) -> Result<IndexSummary, AppError>
where
    F: Fn(usize, usize) + Sync,
{
    let images = find_images(directory, options)?;
    let mut summary = IndexSummary {
        screenshot_dir: directory.to_string_lossy().into_owned(),
        images_found: images.len(),
        ..Default::default()
    };
    tracing::info!(dir = %directory.display(), images = images.len(), "indexing screenshots");

    on_progress(0, images.len());
    let results = extract_all(engine, &images, options, &on_progress)?;

    let mut lines = Vec::new();
    for (path, result) in results {
        match result {
            Ok(extracted) => {
                tracing::debug!(path = %path.display(), lines = extracted.len(), "extracted text");
                summary.images_indexed += 1;
                lines.extend(extracted);
            }
            Err(e) if options.failure_policy == FailurePolicy::Abort => {
                tracing::error!(path = %path.display(), error = %e, "OCR failed, aborting reindex");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "OCR failed, skipping image");
                summary.failures.push(FailedImage {
                    path: path.to_string_lossy().into_owned(),
                    error: e,
                });
            }
        }
    }

    repository::replace_all_records(conn, &lines)?;
    summary.records_written = repository::count_records(conn)?;
    tracing::info!(
        images = summary.images_indexed,
        records = summary.records_written,
        failures = summary.failures.len(),
        "index rebuilt"
    );
    Ok(summary)
}
