//! Fixed-width address wrapping.
//!
//! Japanese addresses have no word boundaries worth respecting, so lines are
//! cut greedily every `max_length` characters. Text that needs more than
//! `max_lines` lines is truncated; the label has no room for it anyway.

use crate::log::trace;

/// Break `text` into at most `max_lines` lines of at most `max_length`
/// characters each. Always returns at least one (possibly empty) line.
pub fn wrap(text: &str, max_length: usize, max_lines: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let max_lines = max_lines.max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for c in text.chars() {
        if count == max_length {
            lines.push(std::mem::take(&mut current));
            count = 0;
            if lines.len() == max_lines {
                trace!(text, max_lines, "address truncated");
                return lines;
            }
        }
        current.push(c);
        count += 1;
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Wrap several source lines independently and keep the first `max_lines`
/// results. Blank lines are dropped, including chunks that are nothing but
/// the middle of a run of spaces.
pub fn wrap_lines<S: AsRef<str>>(
    lines: &[S],
    max_length: usize,
    max_lines: usize,
) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let mut chunks = lines
        .iter()
        .flat_map(|line| wrap(line.as_ref(), max_length, usize::MAX))
        .filter(|chunk| !chunk.trim().is_empty());

    let mut out: Vec<String> = chunks.by_ref().take(max_lines).collect();
    if chunks.next().is_some() {
        trace!(max_lines, "address truncated");
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_text_fills_and_truncates() {
        let text: String = "東京都千代田区".chars().cycle().take(100).collect();
        let lines = wrap(&text, 35, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 35));
        assert_eq!(lines.concat(), text);

        let text: String = text.chars().cycle().take(200).collect();
        let lines = wrap(&text, 35, 3);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.concat(), text.chars().take(105).collect::<String>());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let lines = wrap("あいうえおかきくけこ", 4, 5);
        assert_eq!(lines, vec!["あいうえ", "おかきく", "けこ"]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_line() {
        assert_eq!(wrap("abcdef", 3, 5), vec!["abc", "def"]);
        assert_eq!(wrap("abcdef", 3, 2), vec!["abc", "def"]);
    }

    #[test]
    fn short_and_empty_text() {
        assert_eq!(wrap("abc", 35, 3), vec!["abc"]);
        assert_eq!(wrap("", 35, 3), vec![""]);
    }

    #[test]
    fn wrapping_is_idempotent() {
        let text: String = "abcdefghij".chars().cycle().take(80).collect();
        let once = wrap(&text, 35, 3);
        assert_eq!(wrap_lines(&once, 35, 3), once);
        assert_eq!(wrap(&once.concat(), 35, 3), once);

        let spaced = wrap_lines(&["ab    cd", "東京都　　　　千代田区"], 2, 8);
        assert_eq!(spaced, vec!["ab", "cd", "東京", "都　", "　千", "代田", "区"]);
        assert_eq!(wrap_lines(&spaced, 2, 8), spaced);
    }

    #[test]
    fn wrap_lines_skips_blanks_and_truncates() {
        let source = ["東京都千代田区千代田1-1", "", "  ", "サンプルビル101", "余分な行"];
        let lines = wrap_lines(&source, 35, 2);
        assert_eq!(lines, vec!["東京都千代田区千代田1-1", "サンプルビル101"]);
    }

    #[test]
    fn wrap_lines_truncates_after_dropping_blank_chunks() {
        assert_eq!(wrap_lines(&["ab    cd", "ef"], 2, 2), vec!["ab", "cd"]);
    }

    #[test]
    fn wrap_lines_wraps_each_source_line() {
        let lines = wrap_lines(&["abcde", "fg"], 3, 5);
        assert_eq!(lines, vec!["abc", "de", "fg"]);
    }

    #[test]
    fn wrap_lines_of_nothing_is_one_empty_line() {
        let empty: [&str; 0] = [];
        assert_eq!(wrap_lines(&empty, 35, 3), vec![""]);
    }
}
