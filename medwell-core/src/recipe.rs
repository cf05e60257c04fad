//! Best-effort extraction of recipe responses.
//!
//! Assistants answer recipe requests with loosely formatted markdown:
//!
//! ```text
//! # Lemon Orzo
//! A bright weeknight side.
//!
//! ## What You'll Need
//! - 1 cup orzo
//!
//! ## What To Do
//! 1. Boil the orzo.
//! ```
//!
//! Every extractor below works on the same pre-split line sequence and returns
//! `None` when its section is missing. Missing sections leave the record field
//! at its default; nothing here fails.

use crate::text::{
    bullet_item, heading, is_horizontal_rule, join_block, normalize_label, numbered_item,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const INGREDIENTS_LABEL: &str = "what you'll need";
const INSTRUCTIONS_LABEL: &str = "what to do";
const NOTES_LABEL: &str = "play with your food";
const SUMMARY_LABEL: &str = "summary";
const INFO_LABEL: &str = "recipe info";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    pub title: String,
    pub summary: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub notes: String,
    pub closing_summary: String,
    pub tags: Vec<String>,
    pub info: Option<RecipeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeInfo {
    pub servings: Option<u32>,
    pub prep_minutes: Option<u32>,
    pub cook_minutes: Option<u32>,
    pub total_minutes: Option<u32>,
    pub calories_per_serving: Option<u32>,
    pub dietary_tags: Vec<String>,
}

fn recipe_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?mi)^[ \t]{0,3}#{1,2}[ \t]+[^\n]*?(?:what you['’]ll need|what to do)")
            .expect("valid recipe marker regex")
    })
}

fn tags_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*\*{0,2}\s*tags\s*:\s*\*{0,2}\s*(.*)$").expect("valid tags regex")
    })
}

/// Recipe Info labels in `RecipeInfo` field order.
const INFO_LABELS: [&str; 5] = ["servings", "prep time", "cook time", "total time", "calories"];

fn info_field_res() -> &'static [Regex; 5] {
    static RES: OnceLock<[Regex; 5]> = OnceLock::new();
    RES.get_or_init(|| {
        // Label, optional suffix ("Calories per serving"), colon, first integer.
        INFO_LABELS.map(|label| {
            Regex::new(&format!(r"(?i)\b{label}[^:\n|]*:[^\d\n]*(\d+)"))
                .expect("valid recipe info regex")
        })
    })
}

fn dietary_tags_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bdietary tags[^:\n|]*:([^\n|]*)").expect("valid dietary tags regex")
    })
}

/// True when the text carries a level-1/2 "What You'll Need" or "What To Do" heading.
pub fn is_recipe_response(text: &str) -> bool {
    recipe_marker_re().is_match(text)
}

pub fn parse_recipe(text: &str) -> Recipe {
    let lines: Vec<&str> = text.lines().collect();

    Recipe {
        title: extract_title(&lines).unwrap_or_default(),
        summary: extract_summary(&lines).unwrap_or_default(),
        ingredients: extract_ingredients(&lines).unwrap_or_default(),
        instructions: extract_instructions(&lines).unwrap_or_default(),
        notes: extract_notes(&lines).unwrap_or_default(),
        closing_summary: extract_closing_summary(&lines).unwrap_or_default(),
        tags: extract_tags(&lines).unwrap_or_default(),
        info: extract_info(&lines),
    }
}

fn extract_title(lines: &[&str]) -> Option<String> {
    let (_, text) = lines
        .iter()
        .filter_map(|l| heading(l))
        .find(|(level, _)| *level == 1)?;
    let title = text.trim();
    (!title.is_empty()).then(|| title.to_string())
}

fn extract_summary(lines: &[&str]) -> Option<String> {
    let title_idx = lines
        .iter()
        .position(|l| matches!(heading(l), Some((1, _))))?;
    let body = &lines[title_idx + 1..];
    non_empty(join_block(prose_prefix(body)))
}

fn extract_ingredients(lines: &[&str]) -> Option<Vec<String>> {
    let body = find_section(lines, |label| label.contains(INGREDIENTS_LABEL))?;
    Some(body.iter().filter_map(|l| bullet_item(l)).map(str::to_string).collect())
}

fn extract_instructions(lines: &[&str]) -> Option<Vec<String>> {
    let body = find_section(lines, |label| label.contains(INSTRUCTIONS_LABEL))?;
    Some(body.iter().filter_map(|l| numbered_item(l)).map(str::to_string).collect())
}

fn extract_notes(lines: &[&str]) -> Option<String> {
    let body = find_section(lines, |label| label.contains(NOTES_LABEL))?;
    non_empty(join_block(prose_prefix(body)))
}

fn extract_closing_summary(lines: &[&str]) -> Option<String> {
    // Last match: the intro paragraph is sometimes also headed "Summary".
    let body = find_last_section(lines, |label| label.starts_with(SUMMARY_LABEL))?;
    non_empty(join_block(prose_prefix(body)))
}

fn extract_tags(lines: &[&str]) -> Option<Vec<String>> {
    let marker_idx = lines.iter().position(|l| tags_marker_re().is_match(l))?;

    let mut tags: Vec<String> = tags_marker_re()
        .captures(lines[marker_idx])
        .and_then(|c| c.get(1))
        .map(|m| split_list(m.as_str()))
        .unwrap_or_default();

    for line in &lines[marker_idx + 1..] {
        if is_boundary(line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match bullet_item(line) {
            Some(item) => tags.push(item.to_string()),
            None => break,
        }
    }

    Some(tags)
}

fn extract_info(lines: &[&str]) -> Option<RecipeInfo> {
    let body = find_section(lines, |label| label.contains(INFO_LABEL))?.join("\n");
    let [servings, prep, cook, total, calories] = info_field_res();

    Some(RecipeInfo {
        servings: first_integer(servings, &body),
        prep_minutes: first_integer(prep, &body),
        cook_minutes: first_integer(cook, &body),
        total_minutes: first_integer(total, &body),
        calories_per_serving: first_integer(calories, &body),
        dietary_tags: dietary_tags_re()
            .captures(&body)
            .and_then(|c| c.get(1))
            .map(|m| split_list(m.as_str()))
            .unwrap_or_default(),
    })
}

fn first_integer(re: &Regex, body: &str) -> Option<u32> {
    re.captures(body)?.get(1)?.as_str().parse().ok()
}

/// Level-1/2 headings and horizontal rules end a section.
fn is_boundary(line: &str) -> bool {
    matches!(heading(line), Some((level, _)) if level <= 2) || is_horizontal_rule(line)
}

fn section_starts<'a, F>(lines: &'a [&'a str], matches: F) -> impl Iterator<Item = usize> + 'a
where
    F: Fn(&str) -> bool + 'a,
{
    lines.iter().enumerate().filter_map(move |(idx, line)| match heading(line) {
        Some((level, text)) if level <= 2 && matches(&normalize_label(text)) => Some(idx),
        _ => None,
    })
}

fn section_body<'a>(lines: &'a [&'a str], heading_idx: usize) -> &'a [&'a str] {
    let rest = &lines[heading_idx + 1..];
    let end = rest.iter().position(|l| is_boundary(l)).unwrap_or(rest.len());
    &rest[..end]
}

fn find_section<'a, F>(lines: &'a [&'a str], matches: F) -> Option<&'a [&'a str]>
where
    F: Fn(&str) -> bool + 'a,
{
    let idx = section_starts(lines, matches).next()?;
    Some(section_body(lines, idx))
}

fn find_last_section<'a, F>(lines: &'a [&'a str], matches: F) -> Option<&'a [&'a str]>
where
    F: Fn(&str) -> bool + 'a,
{
    let idx = section_starts(lines, matches).last()?;
    Some(section_body(lines, idx))
}

/// Prose sections stop early at a `**Tags:**` block.
fn prose_prefix<'a>(body: &'a [&'a str]) -> &'a [&'a str] {
    let end = body
        .iter()
        .position(|l| is_boundary(l) || tags_marker_re().is_match(l))
        .unwrap_or(body.len());
    &body[..end]
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_matches('*').trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "\
# Nona's Lemon Orzo

A bright, creamy side that comes together in twenty minutes.
Perfect next to grilled fish.

## 🛒 What You'll Need
- 1 cup orzo
- 1 lemon, zested and juiced
* 2 tbsp olive oil

## 👩‍🍳 What To Do
1. Boil the orzo in salted water.
2. Drain and toss with oil.
3. Finish with lemon.

## Play With Your Food
Swap lemon for orange in winter.

Add peas for colour.

---

## Recipe Info
- **Servings:** 4
- **Prep Time:** 5 minutes
- **Cook Time:** 15 minutes
- Total Time: 20 minutes
- **Calories:** 320 per serving
- **Dietary Tags:** vegetarian, nut-free

## Summary
Simple, citrusy, and fast.

**Tags:**
- pasta
- lemon
- weeknight
";

    #[test]
    fn detects_recipe_markers() {
        assert!(is_recipe_response("# Dinner\n## What You'll Need\n- salt"));
        assert!(is_recipe_response("# What To Do"));
        assert!(is_recipe_response("## 🛒 What You’ll Need"));
        assert!(is_recipe_response("intro\n## what to do\n1. x"));
    }

    #[test]
    fn rejects_text_without_markers() {
        assert!(!is_recipe_response("Ciao! How about a walk today?"));
        assert!(!is_recipe_response("### What To Do"));
        assert!(!is_recipe_response("Here is what you'll need: patience."));
    }

    #[test]
    fn parses_full_document() {
        let r = parse_recipe(FULL);
        assert_eq!(r.title, "Nona's Lemon Orzo");
        assert_eq!(
            r.summary,
            "A bright, creamy side that comes together in twenty minutes.\nPerfect next to grilled fish."
        );
        assert_eq!(
            r.ingredients,
            vec!["1 cup orzo", "1 lemon, zested and juiced", "2 tbsp olive oil"]
        );
        assert_eq!(
            r.instructions,
            vec![
                "Boil the orzo in salted water.",
                "Drain and toss with oil.",
                "Finish with lemon."
            ]
        );
        assert_eq!(r.notes, "Swap lemon for orange in winter.\n\nAdd peas for colour.");
        assert_eq!(r.closing_summary, "Simple, citrusy, and fast.");
        assert_eq!(r.tags, vec!["pasta", "lemon", "weeknight"]);

        let info = r.info.expect("recipe info");
        assert_eq!(info.servings, Some(4));
        assert_eq!(info.prep_minutes, Some(5));
        assert_eq!(info.cook_minutes, Some(15));
        assert_eq!(info.total_minutes, Some(20));
        assert_eq!(info.calories_per_serving, Some(320));
        assert_eq!(info.dietary_tags, vec!["vegetarian", "nut-free"]);
    }

    #[test]
    fn title_only_document_yields_defaults() {
        let r = parse_recipe("# Just a Title");
        assert_eq!(
            r,
            Recipe {
                title: "Just a Title".into(),
                ..Recipe::default()
            }
        );
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(parse_recipe(""), Recipe::default());
    }

    #[test]
    fn bullets_are_stripped_in_order() {
        let r = parse_recipe("## What You'll Need\n- a\n- b\n- c");
        assert_eq!(r.ingredients, vec!["a", "b", "c"]);
    }

    #[test]
    fn numbered_steps_are_stripped_in_order() {
        let r = parse_recipe("## What To Do\n1. Chop\n2. Mix");
        assert_eq!(r.instructions, vec!["Chop", "Mix"]);
    }

    #[test]
    fn sections_end_at_horizontal_rule() {
        let r = parse_recipe("## What You'll Need\n- a\n---\n- not an ingredient");
        assert_eq!(r.ingredients, vec!["a"]);
    }

    #[test]
    fn servings_parse_with_and_without_bold() {
        for line in ["**Servings:** 4", "Servings: 4", "Servings**:** serves 4 people"] {
            let r = parse_recipe(&format!("## Recipe Info\n{line}"));
            assert_eq!(r.info.and_then(|i| i.servings), Some(4), "line: {line}");
        }
    }

    #[test]
    fn info_without_fields_is_present_but_empty() {
        let r = parse_recipe("## Recipe Info\nNothing to see.");
        assert_eq!(r.info, Some(RecipeInfo::default()));
        assert_eq!(parse_recipe("# Title").info, None);
    }

    #[test]
    fn inline_tags_are_split_on_commas() {
        let r = parse_recipe("**Tags:** quick, vegan\n- extra");
        assert_eq!(r.tags, vec!["quick", "vegan", "extra"]);
    }

    #[test]
    fn tags_stop_at_first_non_bullet_line() {
        let r = parse_recipe("**Tags:**\n- one\n\n- two\nBuon appetito!\n- three");
        assert_eq!(r.tags, vec!["one", "two"]);
    }

    #[test]
    fn notes_are_kept_as_one_block() {
        let r = parse_recipe("## Play With Your Food\n- try basil\n- try mint\n## Summary\nDone.");
        assert_eq!(r.notes, "- try basil\n- try mint");
        assert_eq!(r.closing_summary, "Done.");
    }

    #[test]
    fn info_fields_sharing_a_line_are_all_read() {
        let r = parse_recipe(
            "## Recipe Info\n**Servings:** 4 | **Prep Time:** 10 min | **Cook Time:** 20 min",
        );
        let info = r.info.expect("recipe info");
        assert_eq!(info.servings, Some(4));
        assert_eq!(info.prep_minutes, Some(10));
        assert_eq!(info.cook_minutes, Some(20));
        assert_eq!(info.total_minutes, None);
    }

    #[test]
    fn info_table_rows_are_read() {
        let r = parse_recipe(
            "## Recipe Info\n| Field | Value |\n|---|---|\n| **Servings:** | 4 |\n| Calories per serving: | 410 kcal |\n| **Dietary Tags:** | vegan, gluten-free |",
        );
        let info = r.info.expect("recipe info");
        assert_eq!(info.servings, Some(4));
        assert_eq!(info.calories_per_serving, Some(410));
        assert_eq!(info.dietary_tags, vec!["vegan", "gluten-free"]);
    }

    #[test]
    fn closing_summary_uses_last_summary_section() {
        let r = parse_recipe(
            "# Soup\n## Summary\nA quick intro.\n## What You'll Need\n- water\n## Summary\nWarm and simple.",
        );
        assert_eq!(r.closing_summary, "Warm and simple.");
        assert_eq!(r.ingredients, vec!["water"]);
    }

    #[test]
    fn notes_keep_inner_spacing() {
        let r = parse_recipe("## Play With Your Food\nTip one.   \n\n\n\nTip two.\n\n");
        assert_eq!(r.notes, "Tip one.   \n\n\n\nTip two.");
    }
}
