use std::collections::BTreeSet;

use log::{debug, info};

use crate::matcher::{self, PreparedRecord};
use crate::model::{Difficulty, FieldFilter, Record, SearchResults};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Filename,
    Keyword,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub kind: EntryKind,
    pub value: String,
    pub owner: usize, // Index into `Catalog::records`
}

#[derive(Debug, Clone, Default)]
pub struct AdvancedQuery {
    pub category: Option<String>,
    pub min_difficulty: Option<Difficulty>,
    pub max_difficulty: Option<Difficulty>,
    pub query: Option<String>,
    pub filter: FieldFilter,
}

impl AdvancedQuery {
    fn admits(&self, record: &Record) -> bool {
        if let Some(category) = &self.category {
            if record.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if self.min_difficulty.is_none() && self.max_difficulty.is_none() {
            return true;
        }
        let Some(level) = record.difficulty_level() else {
            return false;
        };
        self.min_difficulty.is_none_or(|min| level >= min)
            && self.max_difficulty.is_none_or(|max| level <= max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdvancedResults<'a> {
    Listing(Vec<&'a Record>),
    Scored(SearchResults),
}

pub struct Catalog {
    records: Vec<Record>,
    prepared: Vec<Option<PreparedRecord>>,
    entries: Vec<IndexEntry>,
}

impl Catalog {
    pub fn new(records: Vec<Record>) -> Self {
        let prepared: Vec<Option<PreparedRecord>> = records.iter().map(PreparedRecord::new).collect();

        let mut entries = Vec::new();
        for (owner, record) in records.iter().enumerate() {
            if prepared[owner].is_none() {
                continue;
            }
            entries.push(IndexEntry {
                kind: EntryKind::Filename,
                value: record.filename.clone(),
                owner,
            });
            for keyword in &record.keywords {
                entries.push(IndexEntry {
                    kind: EntryKind::Keyword,
                    value: keyword.clone(),
                    owner,
                });
            }
            if let Some(text) = record.text_content.as_ref().filter(|t| !t.is_empty()) {
                entries.push(IndexEntry {
                    kind: EntryKind::Content,
                    value: text.clone(),
                    owner,
                });
            }
        }

        info!("Catalog: indexed {} records ({} entries)", records.len(), entries.len());
        Self {
            records,
            prepared,
            entries,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn candidates(&self) -> impl Iterator<Item = (&Record, &PreparedRecord)> {
        self.records
            .iter()
            .zip(&self.prepared)
            .filter_map(|(record, p)| p.as_ref().map(|p| (record, p)))
    }

    pub fn search(&self, query: &str, filter: FieldFilter) -> SearchResults {
        matcher::rank(self.candidates(), query, filter)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| r.category.as_deref() == Some(category))
            .collect()
    }

    pub fn unique_keywords(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|e| e.kind == EntryKind::Keyword)
            .map(|e| e.value.as_str())
            .collect();
        set.into_iter().collect()
    }

    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.records.iter().filter_map(|r| r.category.as_deref()).collect();
        set.into_iter().collect()
    }

    pub fn filter(&self, query: &AdvancedQuery) -> Vec<&Record> {
        self.records.iter().filter(|r| query.admits(r)).collect()
    }

    pub fn advanced_search(&self, query: &AdvancedQuery) -> AdvancedResults<'_> {
        let text = query.query.as_deref().map(str::trim).filter(|q| !q.is_empty());
        let Some(text) = text else {
            return AdvancedResults::Listing(self.filter(query));
        };

        let subset = self.candidates().filter(|(record, _)| query.admits(record));
        let results = matcher::rank(subset, text, query.filter);
        debug!(
            "Catalog: advanced search category={:?} difficulty={:?}..{:?}",
            query.category, query.min_difficulty, query.max_difficulty
        );
        AdvancedResults::Scored(results)
    }
}
