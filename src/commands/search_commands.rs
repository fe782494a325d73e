use std::io::{BufRead, Write};
use std::path::Path;

use crate::cli::SearchArgs;
use crate::data;
use crate::error::AppError;
use crate::models::search::SearchHit;
use crate::services::search_service;

const PROMPT_LABEL: &str = "open an image";

pub fn order_hits(hits: Vec<SearchHit>, ranked: bool, limit: Option<usize>) -> Vec<SearchHit> {
    let mut hits = if ranked {
        search_service::rank(hits)
    } else {
        hits
    };
    if let Some(limit) = limit {
        hits.truncate(limit);
    }
    hits
}

/// Parses a 1-based menu choice.
pub fn parse_selection(input: &str, len: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=len).contains(&choice).then(|| choice - 1)
}

fn menu_label(hit: &SearchHit) -> String {
    if hit.record.normalized_text.is_empty() {
        format!("(blank line) {}", hit.record.source_path)
    } else {
        hit.record.normalized_text.clone()
    }
}

/// Shows the numbered menu on `output` and reads choices from `input` until
/// one is valid. Empty input or EOF cancels.
pub fn prompt_selection<R, W>(
    hits: &[SearchHit],
    input: &mut R,
    output: &mut W,
) -> Result<Option<usize>, AppError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{PROMPT_LABEL}:")?;
    for (i, hit) in hits.iter().enumerate() {
        writeln!(output, "{:>4}) {}", i + 1, menu_label(hit))?;
    }

    loop {
        write!(output, "select 1-{} (enter to cancel): ", hits.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 || line.trim().is_empty() {
            return Ok(None);
        }
        match parse_selection(&line, hits.len()) {
            Some(index) => return Ok(Some(index)),
            None => writeln!(output, "invalid choice: {}", line.trim())?,
        }
    }
}

/// `sfzf search <term>`: finds matching lines and opens the chosen screenshot.
pub fn run_search(db_path: &Path, args: &SearchArgs) -> Result<(), AppError> {
    let Some(term) = args.term.as_deref() else {
        println!("Please provide a search term.");
        return Ok(());
    };

    let hits = {
        let conn = data::open_database(db_path)?;
        search_service::search(&conn, term)?
    };
    let hits = order_hits(hits, args.ranked, args.limit);

    if args.json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &hits)?;
        writeln!(stdout)?;
        return Ok(());
    }

    if hits.is_empty() {
        println!("no screenshots match \"{term}\"");
        return Ok(());
    }

    let stdin = std::io::stdin();
    let selection = prompt_selection(&hits, &mut stdin.lock(), &mut std::io::stderr())?;
    let Some(index) = selection else {
        tracing::debug!("selection cancelled");
        return Ok(());
    };

    let selected = &hits[index].record.source_path;
    if args.print {
        println!("{selected}");
    } else {
        tracing::info!(path = %selected, "opening screenshot");
        open::that(selected)?;
    }
    Ok(())
}
