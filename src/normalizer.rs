//! Turns a free-text recipe answer into ingredient and instruction lists.
//!
//! The generative service gives no structural guarantee, so this is a
//! best-effort heuristic: a missing or misplaced section marker yields an
//! empty section, never an error.

use crate::model::GeneratedRecipe;

pub const INGREDIENTS_MARKER: &str = "Ingredients:";
pub const INSTRUCTIONS_MARKER: &str = "Instructions:";

const BULLETS: [&str; 3] = ["* ", "- ", "• "];

/// Remove markdown emphasis and heading markers anywhere in the text.
pub fn strip_markdown(text: &str) -> String {
    text.replace("**", "").replace('#', "")
}

/// Normalize a raw recipe answer into a `GeneratedRecipe`.
///
/// The ingredients section spans from the first `Ingredients:` to the first
/// `Instructions:`; the instructions section runs from there to the end of
/// the text. Markers are matched case-sensitively.
pub fn normalize_recipe_text(raw: &str) -> GeneratedRecipe {
    let cleaned = remove_blank_lines(&strip_markdown(raw));

    let ingredients_at = cleaned.find(INGREDIENTS_MARKER);
    let instructions_at = cleaned.find(INSTRUCTIONS_MARKER);

    let ingredients = match (ingredients_at, instructions_at) {
        (Some(start), Some(end)) if start < end => {
            &cleaned[start + INGREDIENTS_MARKER.len()..end]
        }
        (Some(start), None) => &cleaned[start + INGREDIENTS_MARKER.len()..],
        _ => "",
    };

    let instructions = match instructions_at {
        Some(start) => &cleaned[start + INSTRUCTIONS_MARKER.len()..],
        None => "",
    };

    GeneratedRecipe {
        ingredients: split_section(ingredients),
        instructions: split_section(instructions),
        raw_text: None,
    }
}

fn remove_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn split_section(section: &str) -> Vec<String> {
    section
        .lines()
        .map(|line| strip_bullet(line.trim()).trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

fn strip_bullet(line: &str) -> &str {
    BULLETS
        .iter()
        .find_map(|bullet| line.strip_prefix(bullet))
        .unwrap_or(line)
}
