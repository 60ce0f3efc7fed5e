use super::prepared::{PreparedName, Term};
use super::text::fold;
use super::FieldMatch;

const EXACT: u32 = 100;
const SAME_STEM: u32 = 95;
const SAME_NORMALIZED: u32 = 95;
const NORMALIZED_CONTAINS: u32 = 85;
const PREFIX: u32 = 85;
const CONTAINS: u32 = 70;
const SIMILARITY_FLOOR: u32 = 70;

const ABBREVIATION_BONUS: f64 = 15.0;
const SKELETON_BONUS: f64 = 10.0;

/// Drops the last `.ext`; names that only start with a dot keep it.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

pub fn normalize_name(name: &str) -> String {
    fold(name)
        .chars()
        .filter(|c| !matches!(c, '.' | '_' | '-') && !c.is_whitespace())
        .collect()
}

pub fn consonant_skeleton(s: &str) -> String {
    fold(s)
        .chars()
        .filter(|c| !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .collect()
}

/// `x.word` written as `xword`: a single leading letter followed by a dot collapses.
fn collapse_abbreviation(s: &str) -> Option<String> {
    let mut chars = s.chars();
    let first = chars.next()?;
    if !first.is_alphabetic() || chars.next()? != '.' {
        return None;
    }
    let rest: String = chars.collect();
    if !rest.chars().next().is_some_and(char::is_alphabetic) {
        return None;
    }
    Some(format!("{first}{rest}"))
}

pub fn is_abbreviation_variant(a: &str, b: &str) -> bool {
    let (a, b) = (fold(a), fold(b));
    if a == b {
        return false;
    }
    collapse_abbreviation(&a).is_some_and(|c| c == b) || collapse_abbreviation(&b).is_some_and(|c| c == a)
}

pub fn similarity(a: &str, b: &str) -> u32 {
    let (a, b) = (fold(a), fold(b));
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0;
    }

    let distance = strsim::levenshtein(&a, &b) as f64;
    let mut score = (100.0 - 100.0 * distance / longest as f64).max(0.0);

    if is_abbreviation_variant(&a, &b) {
        score += ABBREVIATION_BONUS;
    }
    let skeleton = consonant_skeleton(&a);
    if skeleton.chars().count() >= 2 && skeleton == consonant_skeleton(&b) {
        score += SKELETON_BONUS;
    }

    score.min(100.0).round() as u32
}

pub fn match_filename(filename: &str, term: &str) -> Option<FieldMatch> {
    let term = Term::new(term)?;
    filename_match(&PreparedName::new(filename), &term)
}

pub(crate) fn filename_match(name: &PreparedName, term: &Term) -> Option<FieldMatch> {
    let has_normalized = !term.normalized.is_empty();

    let score = if name.lower == term.lower {
        EXACT
    } else if name.stem == term.lower {
        SAME_STEM
    } else if has_normalized
        && (name.normalized == term.normalized || name.normalized_stem == term.normalized)
    {
        SAME_NORMALIZED
    } else if has_normalized && name.normalized.contains(term.normalized.as_str()) {
        NORMALIZED_CONTAINS
    } else if name.lower.starts_with(term.lower.as_str()) {
        PREFIX
    } else if name.lower.contains(term.lower.as_str()) {
        CONTAINS
    } else {
        let similar = similarity(&name.stem, &term.lower);
        if similar < SIMILARITY_FLOOR {
            return None;
        }
        similar
    };

    Some(FieldMatch::new(score, name.original.clone()))
}
