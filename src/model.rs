use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Recipe produced by the generative text service, split into sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    /// Verbatim service answer when it was returned without being parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
}

impl GeneratedRecipe {
    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.instructions.is_empty() && self.raw_text.is_none()
    }
}

/// An ingredient together with its measure, as listed by the recipe database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasuredIngredient {
    pub name: String,
    pub measure: String,
}

/// Recipe taken from the structured recipe database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecipe {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub ingredients: Vec<MeasuredIngredient>,
    pub instructions: String,
}

/// The one populated shape of a `RecipeRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecipeOutcome {
    Generated(GeneratedRecipe),
    Lookup(LookupRecipe),
    Failed { error: String },
}

/// Unified result of resolving a dish name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub dish_name: String,
    pub outcome: RecipeOutcome,
}

impl RecipeRecord {
    pub fn generated(dish_name: impl Into<String>, recipe: GeneratedRecipe) -> Self {
        Self {
            dish_name: dish_name.into(),
            outcome: RecipeOutcome::Generated(recipe),
        }
    }

    pub fn lookup(dish_name: impl Into<String>, recipe: LookupRecipe) -> Self {
        Self {
            dish_name: dish_name.into(),
            outcome: RecipeOutcome::Lookup(recipe),
        }
    }

    pub fn failed(dish_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            dish_name: dish_name.into(),
            outcome: RecipeOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, RecipeOutcome::Failed { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            RecipeOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn as_generated(&self) -> Option<&GeneratedRecipe> {
        match &self.outcome {
            RecipeOutcome::Generated(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn as_lookup(&self) -> Option<&LookupRecipe> {
        match &self.outcome {
            RecipeOutcome::Lookup(recipe) => Some(recipe),
            _ => None,
        }
    }

    /// Render the record as plain text for display.
    ///
    /// Generated recipes list their sections; a raw answer is printed as-is.
    /// Lookup recipes list `measure name` pairs followed by the instructions
    /// block. Failed records render only the error message.
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "{}", self.dish_name);

        match &self.outcome {
            RecipeOutcome::Generated(recipe) => {
                if let Some(raw) = &recipe.raw_text {
                    let _ = writeln!(output, "\n{}", raw.trim());
                    return output;
                }
                if !recipe.ingredients.is_empty() {
                    output.push_str("\nIngredients:\n");
                    for ingredient in &recipe.ingredients {
                        let _ = writeln!(output, "- {}", ingredient);
                    }
                }
                if !recipe.instructions.is_empty() {
                    output.push_str("\nInstructions:\n");
                    for (i, step) in recipe.instructions.iter().enumerate() {
                        let _ = writeln!(output, "{}. {}", i + 1, step);
                    }
                }
            }
            RecipeOutcome::Lookup(recipe) => {
                if !recipe.image_url.is_empty() {
                    let _ = writeln!(output, "{}", recipe.image_url);
                }
                if !recipe.ingredients.is_empty() {
                    output.push_str("\nIngredients:\n");
                    for ingredient in &recipe.ingredients {
                        if ingredient.measure.is_empty() {
                            let _ = writeln!(output, "- {}", ingredient.name);
                        } else {
                            let _ =
                                writeln!(output, "- {} {}", ingredient.measure, ingredient.name);
                        }
                    }
                }
                if !recipe.instructions.trim().is_empty() {
                    let _ = writeln!(output, "\nInstructions:\n{}", recipe.instructions.trim());
                }
            }
            RecipeOutcome::Failed { error } => {
                let _ = writeln!(output, "\n{}", error);
            }
        }

        output
    }
}

/// A recipe the user chose to keep for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub dish_name: String,
    pub recipe: RecipeRecord,
}
