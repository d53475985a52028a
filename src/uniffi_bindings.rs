//! UniFFI bindings for quick-recipe
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use crate::{
    GeneratedRecipe, LookupRecipe, Meal, RecipeOutcome, RecipeRecord, RecommendationQuery,
    ResolveError,
};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible ingredient with measure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiIngredient {
    pub name: String,
    /// Empty string if the ingredient has no measure
    pub measure: String,
}

/// FFI-compatible resolved recipe
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiRecipeRecord {
    /// Recipe produced by the generative service
    Generated {
        dish_name: String,
        ingredients: Vec<String>,
        instructions: Vec<String>,
        /// Verbatim answer when it was not split into sections
        raw_text: Option<String>,
    },
    /// Recipe taken from the recipe database
    Lookup {
        dish_name: String,
        image_url: String,
        ingredients: Vec<FfiIngredient>,
        instructions: String,
    },
    /// Resolution failed; `message` is meant for display
    Failed { dish_name: String, message: String },
}

impl From<RecipeRecord> for FfiRecipeRecord {
    fn from(record: RecipeRecord) -> Self {
        let dish_name = record.dish_name;
        match record.outcome {
            RecipeOutcome::Generated(GeneratedRecipe {
                ingredients,
                instructions,
                raw_text,
            }) => FfiRecipeRecord::Generated {
                dish_name,
                ingredients,
                instructions,
                raw_text,
            },
            RecipeOutcome::Lookup(LookupRecipe {
                image_url,
                ingredients,
                instructions,
                ..
            }) => FfiRecipeRecord::Lookup {
                dish_name,
                image_url,
                ingredients: ingredients
                    .into_iter()
                    .map(|i| FfiIngredient {
                        name: i.name,
                        measure: i.measure,
                    })
                    .collect(),
                instructions,
            },
            RecipeOutcome::Failed { error } => FfiRecipeRecord::Failed {
                dish_name,
                message: error,
            },
        }
    }
}

/// FFI-compatible browse entry
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiDish {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
}

impl From<Meal> for FfiDish {
    fn from(meal: Meal) -> Self {
        FfiDish {
            id: meal.id,
            name: meal.name,
            thumbnail: meal.thumbnail,
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiResolveError {
    /// Configuration could not be loaded or a provider is not set up
    ConfigError { message: String },
    /// Network level failure outside of resolution
    FetchError { message: String },
    /// Browsing returned nothing or failed
    NotFound { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiResolveError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiResolveError::FetchError { message } => write!(f, "Fetch error: {}", message),
            FfiResolveError::NotFound { message } => write!(f, "Not found: {}", message),
            FfiResolveError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiResolveError {}

impl From<ResolveError> for FfiResolveError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::HttpError(e) => FfiResolveError::FetchError {
                message: e.to_string(),
            },
            other => FfiResolveError::ConfigError {
                message: other.to_string(),
            },
        }
    }
}

/// Options for resolving a dish
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiResolveConfig {
    /// Provider name ("google", "openai" or "anthropic"); uses default if not specified
    pub provider: Option<String>,
    /// Optional API key (uses environment variable if not specified)
    pub api_key: Option<String>,
    /// Optional model name (uses provider default if not specified)
    pub model: Option<String>,
    /// Optional timeout in seconds for each generative call
    pub timeout_seconds: Option<u64>,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiResolveError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiResolveError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

fn parse_provider(name: &str) -> Result<crate::Provider, FfiResolveError> {
    match name {
        "google" => Ok(crate::Provider::Google),
        "openai" => Ok(crate::Provider::OpenAI),
        "anthropic" => Ok(crate::Provider::Anthropic),
        other => Err(FfiResolveError::ConfigError {
            message: format!("Unknown provider: {}", other),
        }),
    }
}

/// Resolve a dish name into a recipe
///
/// Resolution failures (invalid name, nothing found) come back as
/// `FfiRecipeRecord::Failed`; only setup problems are returned as errors.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn resolve_dish(
    dish_name: String,
    config: Option<FfiResolveConfig>,
) -> Result<FfiRecipeRecord, FfiResolveError> {
    let config = config.unwrap_or_default();

    let mut builder = crate::RecipeFinder::builder();

    if let Some(provider) = config.provider.as_deref() {
        builder = builder.provider(parse_provider(provider)?);
    }

    if let Some(api_key) = config.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(model) = config.model {
        builder = builder.model(model);
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    let finder = builder.build()?;
    let rt = create_runtime()?;
    let record = rt.block_on(finder.resolve(&dish_name));
    Ok(record.into())
}

/// List dishes from the recipe database
///
/// # Arguments
/// * `letter` - Only dishes starting with this letter; all dishes if empty
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn browse_dishes(letter: String) -> Result<Vec<FfiDish>, FfiResolveError> {
    let query = match letter.trim().chars().next() {
        Some(c) => RecommendationQuery::FirstLetter(c),
        None => RecommendationQuery::All,
    };

    let rt = create_runtime()?;
    let recommendations = rt.block_on(crate::browse_dishes(query))?;

    match recommendations.error {
        Some(message) => Err(FfiResolveError::NotFound { message }),
        None => Ok(recommendations.dishes.into_iter().map(Into::into).collect()),
    }
}

/// Suggested dishes shown before the user types anything
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn popular_dishes() -> Vec<String> {
    crate::POPULAR_DISHES.iter().map(|d| d.to_string()).collect()
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MeasuredIngredient;

    #[test]
    fn test_lookup_record_conversion() {
        let record = RecipeRecord::lookup(
            "Paella",
            LookupRecipe {
                id: "52836".to_string(),
                name: "Seafood Paella".to_string(),
                image_url: "https://example.com/paella.jpg".to_string(),
                ingredients: vec![MeasuredIngredient {
                    name: "Rice".to_string(),
                    measure: "300g".to_string(),
                }],
                instructions: "Cook.".to_string(),
            },
        );

        match FfiRecipeRecord::from(record) {
            FfiRecipeRecord::Lookup {
                dish_name,
                image_url,
                ingredients,
                instructions,
            } => {
                assert_eq!(dish_name, "Paella");
                assert_eq!(image_url, "https://example.com/paella.jpg");
                assert_eq!(ingredients.len(), 1);
                assert_eq!(ingredients[0].measure, "300g");
                assert_eq!(instructions, "Cook.");
            }
            other => panic!("Expected Lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_record_conversion() {
        let record = RecipeRecord::failed("", "Please enter a valid dish name");
        match FfiRecipeRecord::from(record) {
            FfiRecipeRecord::Failed { message, .. } => {
                assert_eq!(message, "Please enter a valid dish name");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_provider() {
        assert!(matches!(
            parse_provider("google"),
            Ok(crate::Provider::Google)
        ));
        assert!(parse_provider("azure").is_err());
    }

    #[test]
    fn test_popular_dishes() {
        assert_eq!(popular_dishes().len(), 3);
    }

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }
}
