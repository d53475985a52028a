//! Resolve a dish name into a recipe.
//!
//! A generative text service is asked first; when it fails or has nothing
//! usable, the structured recipe database is searched instead. Either way
//! the caller gets a single [`RecipeRecord`].

pub mod config;
pub mod error;
pub mod finder;
pub mod mealdb;
pub mod model;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod resolver;
pub mod session;
pub mod store;
#[doc(hidden)]
pub mod testing;

// UniFFI bindings for mobile platforms
pub mod uniffi_bindings;

pub use config::AppConfig;
pub use error::{LookupError, ProviderError, ResolveError};
pub use finder::{Provider, RecipeFinder, RecipeFinderBuilder};
pub use mealdb::{Meal, MealDbClient, RecipeDatabase};
pub use model::{
    GeneratedRecipe, LookupRecipe, MeasuredIngredient, RecipeOutcome, RecipeRecord, SavedRecipe,
};
pub use normalizer::normalize_recipe_text;
pub use providers::GenerativeProvider;
pub use recommendations::{RecommendationQuery, Recommendations, POPULAR_DISHES};
pub use resolver::{Resolution, ResolveState, Resolver, StateKind};
pub use store::RecipeStore;

// Re-export UniFFI types when the feature is enabled
#[cfg(feature = "uniffi")]
pub use uniffi_bindings::*;

/// Resolve a dish name with configuration from `config.toml` and the environment
///
/// # Example
/// ```no_run
/// # use quick_recipe::resolve_dish;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let record = resolve_dish("Chicken Curry").await?;
/// println!("{}", record.to_text());
/// # Ok(())
/// # }
/// ```
pub async fn resolve_dish(dish: &str) -> Result<RecipeRecord, ResolveError> {
    let finder = RecipeFinder::builder().build()?;
    Ok(finder.resolve(dish).await)
}

/// Browse the recipe database with configuration from `config.toml` and the environment
pub async fn browse_dishes(query: RecommendationQuery) -> Result<Recommendations, ResolveError> {
    let config = AppConfig::load()?;
    let fetcher = recommendations::RecommendationFetcher::new(std::sync::Arc::new(
        MealDbClient::new(config.mealdb.base_url)
            .with_timeout(std::time::Duration::from_secs(config.timeout)),
    ));
    Ok(fetcher.fetch(query).await)
}
