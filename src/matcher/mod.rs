mod cjk;
mod filename;
mod prepared;
mod text;

use std::collections::HashSet;

use log::debug;

use crate::model::{FieldFilter, MatchType, Record, ScoredRecord, SearchResults};

pub use cjk::{is_cjk_char, is_cjk_term, match_cjk};
pub use filename::{
    consonant_skeleton, is_abbreviation_variant, match_filename, normalize_name, similarity,
    strip_extension,
};
pub use prepared::{PreparedRecord, Term};
pub use text::{count_occurrences, excerpt, fold, match_content, match_keywords, match_song_name};

pub const EXACT_THRESHOLD: u32 = 80;
pub const FUZZY_THRESHOLD: u32 = 30;
pub const FILENAME_DOMINANCE: u32 = 70;
pub const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub score: u32,
    pub matched_term: String,
}

impl FieldMatch {
    pub fn new(score: u32, matched_term: impl Into<String>) -> Self {
        Self {
            score,
            matched_term: matched_term.into(),
        }
    }

    pub(crate) fn capped(mut self, cap: u32) -> Self {
        self.score = self.score.min(cap);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    pub score: u32,
    pub matched_term: String,
    pub match_type: MatchType,
}

fn consider(best: &mut Option<BestMatch>, found: Option<FieldMatch>, match_type: MatchType) {
    let Some(found) = found else { return };
    if best.as_ref().is_none_or(|b| found.score > b.score) {
        *best = Some(BestMatch {
            score: found.score,
            matched_term: found.matched_term,
            match_type,
        });
    }
}

pub fn score_record(record: &PreparedRecord, terms: &[Term], filter: FieldFilter) -> Option<BestMatch> {
    let mut best = None;

    if filter.allows_filename() {
        for term in terms {
            consider(&mut best, filename::filename_match(&record.filename, term), MatchType::Filename);
        }
        if best.as_ref().is_some_and(|b| b.score >= FILENAME_DOMINANCE) {
            return best;
        }
    }

    for term in terms {
        if filter.allows_keywords() {
            let found = text::keywords_match(&record.keywords, &record.folded_keywords, term);
            consider(&mut best, found, MatchType::Keywords);
        }
        if filter.allows_content() {
            if let Some(content) = &record.content {
                consider(&mut best, text::content_match(content, term), MatchType::Content);
            }
        }
        if filter.allows_song_name() {
            if let Some((original, lower)) = &record.song_name {
                consider(&mut best, text::song_match(original, lower, term), MatchType::SongName);
            }
        }
    }

    best
}

pub(crate) fn rank<'a, I>(candidates: I, query: &str, filter: FieldFilter) -> SearchResults
where
    I: IntoIterator<Item = (&'a Record, &'a PreparedRecord)>,
{
    let terms = Term::parse_query(query);
    if terms.is_empty() {
        return SearchResults::default();
    }

    let mut exact = Vec::new();
    let mut fuzzy = Vec::new();
    for (record, prepared) in candidates {
        let Some(best) = score_record(prepared, &terms, filter) else {
            continue;
        };
        if best.score < FUZZY_THRESHOLD {
            continue;
        }
        let is_exact = best.score >= EXACT_THRESHOLD;
        let scored = ScoredRecord {
            record: record.clone(),
            match_score: best.score,
            matched_term: best.matched_term,
            match_type: best.match_type,
        };
        if is_exact {
            exact.push(scored);
        } else {
            fuzzy.push(scored);
        }
    }

    // sort_by is stable: equal scores keep input order.
    exact.sort_by(|a, b| b.match_score.cmp(&a.match_score));

    let mut seen = HashSet::new();
    fuzzy.retain(|s| seen.insert(s.record.filename.clone()));
    fuzzy.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    fuzzy.truncate(MAX_SUGGESTIONS);

    debug!(
        "Matcher: query='{}', filter={}, exact={}, fuzzy={}",
        query.trim(),
        filter,
        exact.len(),
        fuzzy.len()
    );
    SearchResults { exact, fuzzy }
}

/// Searches `records` for `query`. Blank queries match nothing.
pub fn search(records: &[Record], query: &str, filter: FieldFilter) -> SearchResults {
    if query.trim().is_empty() {
        return SearchResults::default();
    }
    let prepared: Vec<Option<PreparedRecord>> = records.iter().map(PreparedRecord::new).collect();
    rank(
        records
            .iter()
            .zip(&prepared)
            .filter_map(|(record, p)| p.as_ref().map(|p| (record, p))),
        query,
        filter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("flying_get.jpg")
                .with_keywords(["フライングゲット", "コール"])
                .with_text("フライングゲットの基本コール説明です。"),
            Record::new("heavy_rotation.jpg")
                .with_keywords(["ヘビーローテーション", "振付"])
                .with_text("ヘビーローテーションの振付とコールのタイミング。"),
            Record::new("call_book_001.jpg")
                .with_keywords(["握手会", "基本"])
                .with_text("握手会での基本的なマナーとコール。")
                .with_song("桜の花びら"),
        ]
    }

    #[test]
    fn blank_query_returns_nothing() {
        let records = sample();
        assert!(search(&records, "", FieldFilter::All).is_empty());
        assert!(search(&records, "   ", FieldFilter::All).is_empty());
        assert!(search(&[], "flying", FieldFilter::All).is_empty());
    }

    #[test]
    fn exact_filename_scores_100() {
        let results = search(&sample(), "HEAVY_ROTATION.JPG", FieldFilter::All);
        assert_eq!(results.exact.len(), 1);
        assert_eq!(results.exact[0].match_score, 100);
        assert_eq!(results.exact[0].match_type, MatchType::Filename);
    }

    #[test]
    fn filename_dominates_other_fields() {
        // keyword "call" would score 90, but the filename already scored 70+
        let records = vec![Record::new("my_call_sheet.png").with_keywords(["call"])];
        let results = search(&records, "call", FieldFilter::All);
        let hit = &results.exact[0];
        assert_eq!(hit.match_type, MatchType::Filename);
        assert_eq!(hit.match_score, 85);
        assert_eq!(hit.matched_term, "my_call_sheet.png");

        let keywords_only = search(&records, "call", FieldFilter::Keywords);
        assert_eq!(keywords_only.exact[0].match_type, MatchType::Keywords);
        assert_eq!(keywords_only.exact[0].match_score, 90);
    }

    #[test]
    fn filter_restricts_fields() {
        let records = sample();
        let by_content = search(&records, "マナー", FieldFilter::Content);
        assert_eq!(by_content.fuzzy.len() + by_content.exact.len(), 1);

        let by_filename = search(&records, "マナー", FieldFilter::Filename);
        assert!(by_filename.is_empty());

        // song names only take part in unrestricted searches
        assert!(search(&records, "桜の花びら", FieldFilter::Keywords).is_empty());
        let song = search(&records, "桜の花びら", FieldFilter::All);
        assert_eq!(song.exact[0].match_type, MatchType::SongName);
        assert_eq!(song.exact[0].match_score, 95);
    }

    #[test]
    fn highest_non_filename_field_wins() {
        let records = vec![Record::new("a.png").with_keywords(["コール練習"]).with_text("コール")];
        let results = search(&records, "コール", FieldFilter::All);
        // keyword substring 60 < content 40 + 30 + 5
        assert_eq!(results.fuzzy[0].match_type, MatchType::Content);
        assert_eq!(results.fuzzy[0].match_score, 75);
    }

    #[test]
    fn multi_word_query_scores_each_token() {
        let records = sample();
        let results = search(&records, "振付 unknown", FieldFilter::All);
        assert_eq!(results.exact.len(), 1);
        assert_eq!(results.exact[0].record.filename, "heavy_rotation.jpg");
        assert_eq!(results.exact[0].match_type, MatchType::Keywords);
    }

    #[test]
    fn fuzzy_list_is_capped_and_deduplicated() {
        let mut records: Vec<Record> = (0..15)
            .map(|i| Record::new(format!("img_{i:02}.png")).with_text(format!("item {i} has a tag")))
            .collect();
        records.push(Record::new("img_00.png").with_text("tag"));

        let results = search(&records, "tag", FieldFilter::Content);
        assert!(results.exact.is_empty());
        assert_eq!(results.fuzzy.len(), MAX_SUGGESTIONS);
        let dupes = results.fuzzy.iter().filter(|s| s.record.filename == "img_00.png").count();
        assert_eq!(dupes, 1);
        assert_eq!(results.fuzzy[0].matched_term, "item 0 has a tag");
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let records = vec![
            Record::new("b_song.png"),
            Record::new("a_song.png"),
            Record::new("c_song.png"),
        ];
        let results = search(&records, "song", FieldFilter::All);
        let order: Vec<&str> = results.exact.iter().map(|s| s.record.filename.as_str()).collect();
        assert_eq!(order, vec!["b_song.png", "a_song.png", "c_song.png"]);
    }

    #[test]
    fn blank_filenames_are_skipped() {
        let records = vec![Record::new("").with_keywords(["call"]), Record::new("x.png").with_keywords(["call"])];
        let results = search(&records, "call", FieldFilter::All);
        assert_eq!(results.exact.len(), 1);
        assert_eq!(results.exact[0].record.filename, "x.png");
    }

    #[test]
    fn score_record_reports_none_without_hits() {
        let prepared = PreparedRecord::new(&Record::new("x.png")).unwrap();
        let terms = Term::parse_query("zzz");
        assert!(score_record(&prepared, &terms, FieldFilter::All).is_none());
    }
}
