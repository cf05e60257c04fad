use regex::Regex;
use std::sync::OnceLock;

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // ATX headings only; closing hashes are optional and dropped.
        Regex::new(r"^\s{0,3}(#{1,6})\s+(.*?)(?:\s+#+)?\s*$").expect("valid heading regex")
    })
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*+•]\s+(.*\S)\s*$").expect("valid bullet regex"))
}

fn numbered_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\d+\.\s*(\S.*?)\s*$").expect("valid numbered regex"))
}

fn horizontal_rule_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // No backreferences in `regex`, so spell out each rule character.
        Regex::new(r"^\s{0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$")
            .expect("valid horizontal rule regex")
    })
}

/// A markdown heading line: `(level, text)`.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = heading_re().captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2).map_or("", |m| m.as_str());
    Some((level, text))
}

/// Item text of a `-`, `*`, `+` or `•` bullet line, marker stripped.
pub fn bullet_item(line: &str) -> Option<&str> {
    bullet_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Item text of a `<integer>.` line, numeric prefix stripped.
pub fn numbered_item(line: &str) -> Option<&str> {
    numbered_re()
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

pub fn is_horizontal_rule(line: &str) -> bool {
    horizontal_rule_re().is_match(line)
}

/// Lowercased heading label with decoration removed, for comparisons.
///
/// Leading emoji/punctuation, emphasis markers and a trailing colon are dropped,
/// and curly apostrophes become straight ones.
pub fn normalize_label(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| c == ':' || c == '*' || c.is_whitespace());

    trimmed
        .chars()
        .filter(|c| *c != '*')
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            c => c.to_ascii_lowercase(),
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Joins a run of lines into one block, trimmed only at its ends.
pub fn join_block(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_reports_level_and_text() {
        assert_eq!(heading("# Lemon Pasta"), Some((1, "Lemon Pasta")));
        assert_eq!(heading("## What To Do ##"), Some((2, "What To Do")));
        assert_eq!(heading("#hashtag"), None);
        assert_eq!(heading("plain"), None);
    }

    #[test]
    fn bullet_strips_marker() {
        assert_eq!(bullet_item("- 2 lemons"), Some("2 lemons"));
        assert_eq!(bullet_item("  * salt  "), Some("salt"));
        assert_eq!(bullet_item("• basil"), Some("basil"));
        assert_eq!(bullet_item("**Tags:**"), None);
        assert_eq!(bullet_item("-"), None);
    }

    #[test]
    fn numbered_strips_prefix() {
        assert_eq!(numbered_item("1. Chop"), Some("Chop"));
        assert_eq!(numbered_item("12.Mix well "), Some("Mix well"));
        assert_eq!(numbered_item("Step 1. Chop"), None);
    }

    #[test]
    fn horizontal_rules() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule("* * *"));
        assert!(is_horizontal_rule("_____"));
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("- item"));
    }

    #[test]
    fn normalize_label_drops_decoration() {
        assert_eq!(normalize_label("🛒 What You’ll Need:"), "what you'll need");
        assert_eq!(normalize_label("**Recipe Info**"), "recipe info");
    }

    #[test]
    fn join_block_trims_ends_only() {
        let lines = ["", "one  ", "", "", "two", ""];
        assert_eq!(join_block(&lines), "one  \n\n\ntwo");
    }
}
