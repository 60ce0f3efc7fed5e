use super::cjk;
use super::prepared::Term;
use super::FieldMatch;

const KEYWORD_EXACT: u32 = 90;
const KEYWORD_PARTIAL: u32 = 60;

const SONG_EXACT: u32 = 95;
const SONG_PARTIAL: u32 = 75;

const CONTENT_BASE: u32 = 40;
const CONTENT_CAP: u32 = 80;
const CONTENT_CJK_CAP: u32 = 70;

const EXCERPT_RADIUS: usize = 15;
pub(crate) const ELLIPSIS: &str = "...";

pub fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

#[derive(Debug, Clone)]
pub struct Folded {
    pub(crate) chars: Vec<char>,
    origin: Vec<usize>,
    source: Vec<char>,
}

impl Folded {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        let mut source = Vec::with_capacity(text.len());
        for (i, c) in text.chars().enumerate() {
            source.push(c);
            for lower in c.to_lowercase() {
                chars.push(lower);
                origin.push(i);
            }
        }
        Self { chars, origin, source }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn find(&self, needle: &[char]) -> Option<usize> {
        find_chars(&self.chars, needle)
    }

    pub(crate) fn source_position(&self, folded_index: usize) -> usize {
        self.origin.get(folded_index).copied().unwrap_or(self.source.len())
    }

    pub(crate) fn source_slice(&self, start: usize, end: usize) -> String {
        let (from, to) = self.source_range(start, end);
        self.source[from..to].iter().collect()
    }

    pub(crate) fn excerpt(&self, start: usize, len: usize) -> String {
        let (from, to) = self.source_range(start, start + len);
        let lo = from.saturating_sub(EXCERPT_RADIUS);
        let hi = (to + EXCERPT_RADIUS).min(self.source.len());

        let mut out = String::new();
        if lo > 0 {
            out.push_str(ELLIPSIS);
        }
        out.extend(&self.source[lo..hi]);
        if hi < self.source.len() {
            out.push_str(ELLIPSIS);
        }
        out
    }

    fn source_range(&self, start: usize, end: usize) -> (usize, usize) {
        if start >= end || start >= self.origin.len() {
            let at = self.source_position(start);
            return (at, at);
        }
        let from = self.origin[start];
        let to = self.origin[(end - 1).min(self.origin.len() - 1)] + 1;
        (from, to)
    }
}

pub(crate) fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

pub(crate) fn count_chars(haystack: &[char], needle: &[char]) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}

/// Case-insensitive, non-overlapping occurrence count. Plain substring search, so regex
/// metacharacters in `term` are literal.
pub fn count_occurrences(text: &str, term: &str) -> usize {
    let text: Vec<char> = fold(text).chars().collect();
    let term: Vec<char> = fold(term).chars().collect();
    count_chars(&text, &term)
}

pub fn excerpt(text: &str, term: &str) -> Option<String> {
    let folded = Folded::new(text);
    let needle: Vec<char> = fold(term).chars().collect();
    let at = folded.find(&needle)?;
    Some(folded.excerpt(at, needle.len()))
}

pub(crate) fn frequency_bonus(count: usize, per_hit: u32, cap: u32) -> u32 {
    let hits = u32::try_from(count).unwrap_or(u32::MAX);
    hits.saturating_mul(per_hit).min(cap)
}

pub fn match_keywords(keywords: &[String], term: &str) -> Option<FieldMatch> {
    let term = Term::new(term)?;
    let folded: Vec<String> = keywords.iter().map(|k| fold(k)).collect();
    keywords_match(keywords, &folded, &term)
}

pub(crate) fn keywords_match(keywords: &[String], folded: &[String], term: &Term) -> Option<FieldMatch> {
    let pairs = || keywords.iter().zip(folded);
    if let Some((original, _)) = pairs().find(|(_, lower)| **lower == term.lower) {
        return Some(FieldMatch::new(KEYWORD_EXACT, original.clone()));
    }
    pairs()
        .find(|(_, lower)| lower.contains(term.lower.as_str()))
        .map(|(original, _)| FieldMatch::new(KEYWORD_PARTIAL, original.clone()))
}

pub fn match_song_name(song_name: &str, term: &str) -> Option<FieldMatch> {
    let term = Term::new(term)?;
    song_match(song_name, &fold(song_name), &term)
}

pub(crate) fn song_match(original: &str, lower: &str, term: &Term) -> Option<FieldMatch> {
    let score = if lower == term.lower {
        SONG_EXACT
    } else if lower.contains(term.lower.as_str()) {
        SONG_PARTIAL
    } else {
        return None;
    };
    Some(FieldMatch::new(score, original.to_string()))
}

pub fn match_content(text_content: &str, term: &str) -> Option<FieldMatch> {
    let term = Term::new(term)?;
    content_match(&Folded::new(text_content), &term)
}

pub(crate) fn content_match(content: &Folded, term: &Term) -> Option<FieldMatch> {
    let Some(at) = content.find(&term.chars) else {
        if term.cjk {
            return cjk::cjk_match(content, &term.chars).map(|m| m.capped(CONTENT_CJK_CAP));
        }
        return None;
    };

    let position = content.source_position(at);
    let mut score = CONTENT_BASE;
    if position < 50 {
        score += 20;
    }
    if position < 200 {
        score += 10;
    }
    score += frequency_bonus(count_chars(&content.chars, &term.chars), 5, 20);

    Some(FieldMatch::new(score.min(CONTENT_CAP), content.excerpt(at, term.chars.len())))
}
