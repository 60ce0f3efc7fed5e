use std::io::{self, Write};

use crate::model::{Record, ScoredRecord, SearchResults};

const NO_EXACT: &str = "No exact matches found.";
const NO_FUZZY: &str = "No fuzzy suggestions found.";

/// Exact matches, then suggestions, each numbered from 1.
pub fn render_text<W: Write>(out: &mut W, query: &str, results: &SearchResults) -> io::Result<()> {
    writeln!(out, "> {}", query.trim())?;
    writeln!(out)?;

    writeln!(out, "Exact matches ({}):", results.exact.len())?;
    if results.exact.is_empty() {
        writeln!(out, "  {}", NO_EXACT)?;
    }
    for (i, hit) in results.exact.iter().enumerate() {
        render_exact(out, i + 1, hit)?;
    }

    writeln!(out)?;
    writeln!(out, "Suggestions ({}):", results.fuzzy.len())?;
    if results.fuzzy.is_empty() {
        writeln!(out, "  {}", NO_FUZZY)?;
    }
    for (i, hit) in results.fuzzy.iter().enumerate() {
        writeln!(
            out,
            "  {}. {} (file: {}, {} {})",
            i + 1,
            hit.matched_term,
            hit.record.filename,
            hit.match_type,
            hit.match_score
        )?;
    }
    Ok(())
}

fn render_exact<W: Write>(out: &mut W, nr: usize, hit: &ScoredRecord) -> io::Result<()> {
    writeln!(out, "  {}. {} [{} {}]", nr, hit.record.filename, hit.match_type, hit.match_score)?;
    if !hit.record.keywords.is_empty() {
        writeln!(out, "     tags: {}", hit.record.keywords.join(", "))?;
    }
    if hit.matched_term != hit.record.filename {
        writeln!(out, "     match: {}", hit.matched_term)?;
    }
    Ok(())
}

pub fn render_listing<W: Write>(out: &mut W, records: &[&Record]) -> io::Result<()> {
    if records.is_empty() {
        writeln!(out, "No records.")?;
    }
    for (i, record) in records.iter().enumerate() {
        let category = record.category.as_deref().unwrap_or("-");
        let difficulty = record.difficulty.as_deref().unwrap_or("-");
        writeln!(out, "{}. {} ({}, {})", i + 1, record.filename, category, difficulty)?;
    }
    Ok(())
}

pub fn render_json<W: Write, T: serde::Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
