use log::warn;

use super::cjk::is_cjk_term;
use super::filename::{normalize_name, strip_extension};
use super::text::{fold, Folded};
use crate::model::Record;

#[derive(Debug, Clone)]
pub struct Term {
    pub(crate) lower: String,
    pub(crate) normalized: String,
    pub(crate) chars: Vec<char>,
    pub(crate) cjk: bool,
}

impl Term {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = fold(trimmed);
        Some(Self {
            normalized: normalize_name(&lower),
            chars: lower.chars().collect(),
            cjk: is_cjk_term(trimmed),
            lower,
        })
    }

    pub fn parse_query(query: &str) -> Vec<Term> {
        let Some(whole) = Term::new(query) else {
            return Vec::new();
        };
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let mut terms = vec![whole];
        if tokens.len() > 1 {
            for token in tokens {
                if terms.iter().any(|t| t.lower == fold(token)) {
                    continue;
                }
                terms.extend(Term::new(token));
            }
        }
        terms
    }
}

#[derive(Debug, Clone)]
pub struct PreparedName {
    pub(crate) original: String,
    pub(crate) lower: String,
    pub(crate) stem: String,
    pub(crate) normalized: String,
    pub(crate) normalized_stem: String,
}

impl PreparedName {
    pub fn new(filename: &str) -> Self {
        let lower = fold(filename);
        let stem = strip_extension(&lower).to_string();
        Self {
            original: filename.to_string(),
            normalized: normalize_name(&lower),
            normalized_stem: normalize_name(&stem),
            stem,
            lower,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreparedRecord {
    pub(crate) filename: PreparedName,
    pub(crate) keywords: Vec<String>,
    pub(crate) folded_keywords: Vec<String>,
    pub(crate) content: Option<Folded>,
    pub(crate) song_name: Option<(String, String)>,
}

impl PreparedRecord {
    /// `None` for records without a usable filename; those never take part in a search.
    pub fn new(record: &Record) -> Option<Self> {
        if record.filename.trim().is_empty() {
            warn!("Skipping record without filename (keywords: {:?})", record.keywords);
            return None;
        }
        Some(Self {
            filename: PreparedName::new(&record.filename),
            folded_keywords: record.keywords.iter().map(|k| fold(k)).collect(),
            keywords: record.keywords.clone(),
            content: record
                .text_content
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(Folded::new),
            song_name: record
                .song_name
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| (s.to_string(), fold(s))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_query_has_no_terms() {
        assert!(Term::parse_query("").is_empty());
        assert!(Term::parse_query(" \t\n ").is_empty());
    }

    #[test]
    fn multi_word_query_keeps_whole_then_tokens() {
        let terms = Term::parse_query("  Heavy  Rotation heavy ");
        let lowers: Vec<&str> = terms.iter().map(|t| t.lower.as_str()).collect();
        assert_eq!(lowers, vec!["heavy  rotation heavy", "heavy", "rotation"]);

        let single = Term::parse_query("B.Rise");
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].normalized, "brise");
    }

    #[test]
    fn prepared_name_forms() {
        let name = PreparedName::new("Single_Skill-001.JPG");
        assert_eq!(name.lower, "single_skill-001.jpg");
        assert_eq!(name.stem, "single_skill-001");
        assert_eq!(name.normalized, "singleskill001jpg");
        assert_eq!(name.normalized_stem, "singleskill001");
    }

    #[test]
    fn record_without_filename_is_not_prepared() {
        assert!(PreparedRecord::new(&Record::new("  ")).is_none());
        assert!(PreparedRecord::new(&Record::new("a.png")).is_some());
    }
}
