use super::text::{count_chars, frequency_bonus, Folded, ELLIPSIS};
use super::FieldMatch;

const WINDOW: usize = 10;
const WINDOW_BASE: u32 = 30;
const WINDOW_IN_ORDER: u32 = 20;
const WINDOW_CAP: u32 = 60;

pub fn is_cjk_char(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}' |  // CJK Unified Ideographs
        '\u{3400}'..='\u{4dbf}' |  // CJK Extension A
        '\u{f900}'..='\u{faff}'    // CJK Compatibility Ideographs
    )
}

pub fn is_cjk_term(term: &str) -> bool {
    !term.is_empty() && term.chars().all(is_cjk_char)
}

pub fn match_cjk(text: &str, term: &str) -> Option<FieldMatch> {
    let term = term.trim();
    if !is_cjk_term(term) {
        return None;
    }
    let chars: Vec<char> = term.chars().collect();
    cjk_match(&Folded::new(text), &chars)
}

pub(crate) fn cjk_match(content: &Folded, term: &[char]) -> Option<FieldMatch> {
    if term.is_empty() || content.is_empty() {
        return None;
    }

    if let Some(at) = content.find(term) {
        let position = content.source_position(at);
        let count = count_chars(&content.chars, term);
        let score = if term.len() == 1 {
            let near = if position < 100 { 15 } else { 0 };
            (35 + near + frequency_bonus(count, 3, 15)).min(65)
        } else {
            let near = if position < 100 { 20 } else { 0 };
            (45 + near + frequency_bonus(count, 4, 20)).min(75)
        };
        return Some(FieldMatch::new(score, content.excerpt(at, term.len())));
    }

    if term.len() == 1 {
        return None;
    }
    phrase_window(content, term)
}

fn phrase_window(content: &Folded, term: &[char]) -> Option<FieldMatch> {
    let width = WINDOW.min(content.len());
    if width < term.len() {
        return None;
    }
    let mut best: Option<(u32, usize)> = None;

    for start in 0..=content.len() - width {
        let window = &content.chars[start..start + width];
        if !covers(window, term) {
            continue;
        }
        let bonus = if in_order(window, term) { WINDOW_IN_ORDER } else { 0 };
        let score = (WINDOW_BASE + bonus).min(WINDOW_CAP);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, start));
        }
    }

    best.map(|(score, start)| {
        let mut matched = content.source_slice(start, start + width);
        matched.push_str(ELLIPSIS);
        FieldMatch::new(score, matched)
    })
}

// Every term char appears in the window at least as often as in the term.
fn covers(window: &[char], term: &[char]) -> bool {
    let count = |chars: &[char], c: char| chars.iter().filter(|&&x| x == c).count();
    term.iter().all(|&c| count(window, c) >= count(term, c))
}

// Term chars appear in the window in term order, gaps allowed.
fn in_order(window: &[char], term: &[char]) -> bool {
    let mut rest = window.iter();
    term.iter().all(|c| rest.any(|x| x == c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cjk_terms() {
        assert!(is_cjk_term("唱歌"));
        assert!(!is_cjk_term("唱歌 live"));
        assert!(!is_cjk_term("コール"));
        assert!(!is_cjk_term(""));
    }

    #[test]
    fn single_character_scoring() {
        // 35 + 15 (near start) + 2 hits * 3
        assert_eq!(match_cjk("我爱唱歌，也爱跳舞", "爱").unwrap().score, 56);
        let far = format!("{}爱", "。".repeat(150));
        assert_eq!(match_cjk(&far, "爱").unwrap().score, 38);
        assert_eq!(match_cjk(&"爱".repeat(20), "爱").unwrap().score, 65);
        assert!(match_cjk("唱歌", "爱").is_none());
    }

    #[test]
    fn phrase_direct_hit_scoring() {
        // 45 + 20 + 1 hit * 4
        let m = match_cjk("今天一起唱歌吧", "唱歌").unwrap();
        assert_eq!(m.score, 69);
        assert_eq!(m.matched_term, "今天一起唱歌吧");
        assert_eq!(match_cjk(&"唱歌".repeat(10), "唱歌").unwrap().score, 75);
    }

    #[test]
    fn phrase_window_any_order() {
        let m = match_cjk("我们一起去唱歌吧", "歌唱").unwrap();
        assert_eq!(m.score, 30);
        assert_eq!(m.matched_term, "我们一起去唱歌吧...");
    }

    #[test]
    fn phrase_window_requires_all_chars_within_ten() {
        let spread = format!("唱{}歌", "一".repeat(12));
        assert!(match_cjk(&spread, "歌唱").is_none());

        let m = match_cjk("一二三四五六七八九十唱一歌", "歌唱").unwrap();
        assert_eq!(m.score, 30);
        assert_eq!(m.matched_term, "四五六七八九十唱一歌...");
    }

    #[test]
    fn phrase_window_in_order_with_gap_scores_higher() {
        let m = match_cjk("唱一歌", "唱歌").unwrap();
        assert_eq!(m.score, 50);
        assert_eq!(m.matched_term, "唱一歌...");

        // the in-order window wins over an earlier reversed one
        let m = match_cjk("歌一一一一一一一一唱一歌", "唱歌").unwrap();
        assert_eq!(m.score, 50);
    }

    #[test]
    fn phrase_window_needs_every_repeated_char() {
        assert!(match_cjk("唱", "唱唱唱唱").is_none());
        assert!(match_cjk("唱一唱", "唱唱唱").is_none());
        assert_eq!(match_cjk("唱一唱一唱", "唱唱唱").unwrap().score, 50);
    }

    #[test]
    fn non_cjk_term_is_not_handled() {
        assert!(match_cjk("hello world", "hello").is_none());
    }
}
