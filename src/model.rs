use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;

/// Separators the spreadsheet exports use between tags: ASCII comma, full-width comma, ideographic
/// enumeration comma.
static KEYWORD_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[，,、]+").expect("static keyword separator pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Record {
    pub filename: String,                    // Unique within one dataset snapshot
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,               // Tags, in sheet order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,        // Free text (lyrics, call notes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Record {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_song(mut self, song: impl Into<String>) -> Self {
        self.song_name = Some(song.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn difficulty_level(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(|d| d.parse().ok())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordField {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field: Option<KeywordField> = Option::deserialize(deserializer)?;
    Ok(match field {
        None => Vec::new(),
        Some(KeywordField::List(list)) => list,
        Some(KeywordField::Joined(joined)) => split_keywords(&joined),
    })
}

pub fn split_keywords(joined: &str) -> Vec<String> {
    KEYWORD_SEPARATORS
        .split(joined)
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Filename,
    Keywords,
    Content,
    SongName,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchType::Filename => "filename",
            MatchType::Keywords => "keywords",
            MatchType::Content => "content",
            MatchType::SongName => "song_name",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldFilter {
    #[default]
    All,
    Filename,
    Keywords,
    Content,
}

impl FieldFilter {
    pub fn allows_filename(self) -> bool {
        matches!(self, FieldFilter::All | FieldFilter::Filename)
    }

    pub fn allows_keywords(self) -> bool {
        matches!(self, FieldFilter::All | FieldFilter::Keywords)
    }

    pub fn allows_content(self) -> bool {
        matches!(self, FieldFilter::All | FieldFilter::Content)
    }

    // Song names have no dedicated filter; they only take part in unrestricted searches.
    pub fn allows_song_name(self) -> bool {
        self == FieldFilter::All
    }
}

impl FromStr for FieldFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(FieldFilter::All),
            "filename" => Ok(FieldFilter::Filename),
            "keywords" | "keyword" => Ok(FieldFilter::Keywords),
            "content" => Ok(FieldFilter::Content),
            other => Err(CatalogError::InvalidFilter(other.to_string())),
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldFilter::All => "all",
            FieldFilter::Filename => "filename",
            FieldFilter::Keywords => "keywords",
            FieldFilter::Content => "content",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Level1,
    Level2,
    Level3,
    Level4,
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "level1" => Ok(Difficulty::Level1),
            "level2" => Ok(Difficulty::Level2),
            "level3" => Ok(Difficulty::Level3),
            "level4" => Ok(Difficulty::Level4),
            other => Err(CatalogError::InvalidDifficulty(other.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Level1 => "level1",
            Difficulty::Level2 => "level2",
            Difficulty::Level3 => "level3",
            Difficulty::Level4 => "level4",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub record: Record,
    pub match_score: u32,      // 0..=100
    pub matched_term: String,  // Field value or excerpt that produced the score
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResults {
    pub exact: Vec<ScoredRecord>,
    pub fuzzy: Vec<ScoredRecord>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.fuzzy.is_empty()
    }
}
