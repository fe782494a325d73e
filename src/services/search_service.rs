use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use rusqlite::Connection;

use crate::data::repository;
use crate::error::AppError;
use crate::models::record::TextRecord;
use crate::models::search::SearchHit;

/// Scores `text` against `term` when every char of `term` occurs in `text`
/// in order, contiguous or not.
fn subsequence_score(matcher: &SkimMatcherV2, term: &str, text: &str) -> Option<i64> {
    if term.is_empty() {
        return Some(0);
    }
    matcher.fuzzy_match(text, term)
}

/// Returns every stored record whose text fuzzy-matches `term`.
///
/// Hits come back in store order. That order is an artifact of how records
/// were written, not a relevance ranking; use [`rank`] for that.
pub fn search(conn: &Connection, term: &str) -> Result<Vec<SearchHit>, AppError> {
    let records = repository::list_records(conn)?;
    let term = term.to_lowercase();
    let matcher = SkimMatcherV2::default().respect_case();

    let hits: Vec<SearchHit> = records
        .into_iter()
        .filter_map(|record: TextRecord| {
            subsequence_score(&matcher, &term, &record.normalized_text)
                .map(|score| SearchHit { record, score })
        })
        .collect();

    tracing::debug!(term = %term, hits = hits.len(), "search finished");
    Ok(hits)
}

/// Orders hits by match score, best first. Ties keep their store order.
pub fn rank(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}
