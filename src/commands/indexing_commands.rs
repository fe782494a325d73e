use std::io::Write;

use crate::config::Config;
use crate::data;
use crate::error::AppError;
use crate::models::index_summary::IndexSummary;
use crate::services::{indexing_service, ocr_service};

const PROGRESS_LOG_EVERY: usize = 10;

fn progress_status(processed: usize, total: usize) -> &'static str {
    if total == 0 || processed >= total {
        "done"
    } else {
        "active"
    }
}

fn should_log_progress(processed: usize, total: usize) -> bool {
    processed == 0 || processed >= total || processed % PROGRESS_LOG_EVERY == 0
}

fn emit_indexing_progress(processed: usize, total: usize) {
    if should_log_progress(processed, total) {
        tracing::info!(
            processed,
            total,
            status = progress_status(processed, total),
            "indexing progress"
        );
    }
}

/// `sfzf index`: rebuilds the index from the configured screenshot directory.
pub fn run_index(config: &Config, json: bool) -> Result<IndexSummary, AppError> {
    let engine = ocr_service::build_engine(&config.ocr)?;

    let mut conn = data::open_database(&config.db_path)?;
    let summary = indexing_service::reindex(
        &mut conn,
        engine.as_ref(),
        &config.screenshot_dir,
        &config.indexing,
        emit_indexing_progress,
    )?;
    drop(conn);

    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &summary)?;
        writeln!(stdout)?;
    } else {
        writeln!(
            stdout,
            "indexed {} of {} screenshots ({} lines) from {}",
            summary.images_indexed,
            summary.images_found,
            summary.records_written,
            summary.screenshot_dir
        )?;
        for failure in &summary.failures {
            writeln!(stdout, "  skipped {}: {}", failure.path, failure.error)?;
        }
    }

    Ok(summary)
}
