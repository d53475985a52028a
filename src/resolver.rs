//! Dish name to recipe resolution.
//!
//! Resolution is an explicit state machine:
//!
//! ```text
//! Start -> Validating -> LanguageCheck -> Generating -> Resolved
//!   |          |              |               |
//!   |          |              +-> Resolved    +-> FallbackLookup -> Resolved | Failed
//!   |          |              +-> FallbackLookup (bare VALID, no recipe to return)
//!   |          +-> Failed (invalid)
//!   |          +-> FallbackLookup (service error)
//!   +-> Failed (empty input)
//! ```
//!
//! Every external failure is turned into a transition; nothing escapes as an
//! error. No call is retried here, retries belong to the provider.

use crate::mealdb::RecipeDatabase;
use crate::model::{GeneratedRecipe, RecipeRecord};
use crate::normalizer::normalize_recipe_text;
use crate::providers::{generation_prompt, validation_prompt, GenerativeProvider, NO_RECIPE_SIGNAL};
use log::{debug, info, warn};
use std::sync::Arc;

pub const INVALID_DISH_MESSAGE: &str = "Please enter a valid dish name";
pub const NO_RECIPE_MESSAGE: &str = "No recipe found";
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch recipe";

const INVALID_SIGNAL: &str = "INVALID";
const VALID_SIGNAL: &str = "VALID";

/// A state of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    Start,
    Validating,
    /// Holds the validation answer, returned verbatim for non-English names
    LanguageCheck { validation: String },
    Generating,
    /// Holds why generation was abandoned
    FallbackLookup { reason: String },
    Resolved(RecipeRecord),
    Failed(RecipeRecord),
}

/// Payload-free name of a `ResolveState`, used for tracing the path taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Start,
    Validating,
    LanguageCheck,
    Generating,
    FallbackLookup,
    Resolved,
    Failed,
}

impl ResolveState {
    pub fn kind(&self) -> StateKind {
        match self {
            ResolveState::Start => StateKind::Start,
            ResolveState::Validating => StateKind::Validating,
            ResolveState::LanguageCheck { .. } => StateKind::LanguageCheck,
            ResolveState::Generating => StateKind::Generating,
            ResolveState::FallbackLookup { .. } => StateKind::FallbackLookup,
            ResolveState::Resolved(_) => StateKind::Resolved,
            ResolveState::Failed(_) => StateKind::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolveState::Resolved(_) | ResolveState::Failed(_))
    }
}

/// A finished resolution and the states it went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub record: RecipeRecord,
    pub path: Vec<StateKind>,
}

/// Whether a dish name is treated as English: letters and spaces only.
pub fn is_english(dish: &str) -> bool {
    let dish = dish.trim();
    !dish.is_empty()
        && dish
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
}

fn is_invalid_answer(answer: &str) -> bool {
    answer
        .trim()
        .to_uppercase()
        .starts_with(INVALID_SIGNAL)
}

/// A validation answer that only accepts the name and carries no recipe.
fn is_bare_valid_answer(answer: &str) -> bool {
    answer
        .trim()
        .trim_end_matches('.')
        .eq_ignore_ascii_case(VALID_SIGNAL)
}

/// Normalize a generation answer, or explain why it cannot be used.
fn usable_recipe(answer: &str) -> Result<GeneratedRecipe, String> {
    if answer.trim().is_empty() {
        return Err("generative service returned an empty answer".to_string());
    }
    if answer.to_uppercase().contains(NO_RECIPE_SIGNAL) {
        return Err("generative service found no recipe".to_string());
    }

    let recipe = normalize_recipe_text(answer);
    if recipe.is_empty() {
        return Err("generative answer had no recognizable sections".to_string());
    }
    Ok(recipe)
}

/// Drives a dish name through validation, generation and database fallback.
#[derive(Clone)]
pub struct Resolver {
    generative: Arc<dyn GenerativeProvider>,
    database: Arc<dyn RecipeDatabase>,
}

impl Resolver {
    pub fn new(generative: Arc<dyn GenerativeProvider>, database: Arc<dyn RecipeDatabase>) -> Self {
        Resolver {
            generative,
            database,
        }
    }

    /// Resolve a dish name into a record.
    pub async fn resolve(&self, dish: &str) -> RecipeRecord {
        self.resolve_traced(dish).await.record
    }

    /// Resolve a dish name, also reporting every state visited.
    pub async fn resolve_traced(&self, dish: &str) -> Resolution {
        let mut state = ResolveState::Start;
        let mut path = vec![state.kind()];

        loop {
            state = self.step(state, dish).await;
            path.push(state.kind());

            match state {
                ResolveState::Resolved(record) | ResolveState::Failed(record) => {
                    info!(
                        "Resolved {:?} via {:?}",
                        record.dish_name,
                        &path[..path.len() - 1]
                    );
                    return Resolution { record, path };
                }
                _ => continue,
            }
        }
    }

    /// Perform exactly one transition. Terminal states are returned unchanged.
    pub async fn step(&self, state: ResolveState, dish: &str) -> ResolveState {
        let dish = dish.trim();
        debug!("{:?}: {:?}", state.kind(), dish);

        match state {
            ResolveState::Start => {
                if dish.is_empty() {
                    ResolveState::Failed(RecipeRecord::failed(dish, INVALID_DISH_MESSAGE))
                } else {
                    ResolveState::Validating
                }
            }

            ResolveState::Validating => {
                match self.generative.generate(&validation_prompt(dish)).await {
                    Ok(answer) if answer.trim().is_empty() => ResolveState::FallbackLookup {
                        reason: "validation returned an empty answer".to_string(),
                    },
                    Ok(answer) if is_invalid_answer(&answer) => {
                        info!("{:?} rejected as a dish name", dish);
                        ResolveState::Failed(RecipeRecord::failed(dish, INVALID_DISH_MESSAGE))
                    }
                    Ok(answer) => ResolveState::LanguageCheck { validation: answer },
                    Err(e) => ResolveState::FallbackLookup {
                        reason: format!("validation failed: {}", e),
                    },
                }
            }

            ResolveState::LanguageCheck { validation } => {
                if is_english(dish) {
                    ResolveState::Generating
                } else if is_bare_valid_answer(&validation) {
                    ResolveState::FallbackLookup {
                        reason: "validation accepted a non-English name without a recipe"
                            .to_string(),
                    }
                } else {
                    debug!("{:?} is not English, using the validation answer", dish);
                    ResolveState::Resolved(RecipeRecord::generated(
                        dish,
                        GeneratedRecipe {
                            raw_text: Some(validation),
                            ..Default::default()
                        },
                    ))
                }
            }

            ResolveState::Generating => {
                let reason = match self.generative.generate(&generation_prompt(dish)).await {
                    Ok(answer) => match usable_recipe(&answer) {
                        Ok(recipe) => {
                            return ResolveState::Resolved(RecipeRecord::generated(dish, recipe))
                        }
                        Err(reason) => reason,
                    },
                    Err(e) => format!("generation failed: {}", e),
                };
                ResolveState::FallbackLookup { reason }
            }

            ResolveState::FallbackLookup { reason } => {
                warn!("Falling back to recipe database for {:?}: {}", dish, reason);

                match self.database.search(dish).await {
                    Ok(meals) => match meals.into_iter().next() {
                        Some(meal) => {
                            ResolveState::Resolved(RecipeRecord::lookup(dish, meal.into_lookup_recipe()))
                        }
                        None => ResolveState::Failed(RecipeRecord::failed(dish, NO_RECIPE_MESSAGE)),
                    },
                    Err(e) => {
                        warn!("Recipe database lookup failed for {:?}: {}", dish, e);
                        ResolveState::Failed(RecipeRecord::failed(dish, FETCH_FAILED_MESSAGE))
                    }
                }
            }

            terminal @ (ResolveState::Resolved(_) | ResolveState::Failed(_)) => terminal,
        }
    }
}
