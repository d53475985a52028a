use std::sync::Arc;
use std::time::Duration;

use crate::config::{default_model, AppConfig, ProviderConfig};
use crate::mealdb::{MealDbClient, RecipeDatabase};
use crate::providers::{GenerativeProvider, RetryingProvider};
use crate::recommendations::{
    RecommendationFetcher, RecommendationQuery, Recommendations, POPULAR_DISHES,
};
use crate::resolver::{Resolution, Resolver};
use crate::session::ResolutionSession;
use crate::store::RecipeStore;
use crate::{RecipeRecord, ResolveError, SavedRecipe};

/// Generative provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    OpenAI,
    Anthropic,
}

impl Provider {
    /// Provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

/// Builder for configuring a [`RecipeFinder`]
#[derive(Default)]
pub struct RecipeFinderBuilder {
    config: Option<AppConfig>,
    provider: Option<Provider>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    mealdb_url: Option<String>,
    generative: Option<Arc<dyn GenerativeProvider>>,
    database: Option<Arc<dyn RecipeDatabase>>,
    store: Option<RecipeStore>,
}

impl RecipeFinderBuilder {
    /// Use this configuration instead of loading `config.toml` and the environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the generative provider
    ///
    /// # Example
    /// ```
    /// use quick_recipe::{Provider, RecipeFinder};
    ///
    /// let builder = RecipeFinder::builder().provider(Provider::OpenAI);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key for the generative provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the generative provider
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Bound every generative call by this timeout
    ///
    /// # Example
    /// ```
    /// use quick_recipe::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder().timeout(Duration::from_secs(15));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Override the recipe database base URL
    pub fn mealdb_url(mut self, url: impl Into<String>) -> Self {
        self.mealdb_url = Some(url.into());
        self
    }

    /// Use an already constructed generative provider
    pub fn generative(mut self, provider: Arc<dyn GenerativeProvider>) -> Self {
        self.generative = Some(provider);
        self
    }

    /// Use an already constructed recipe database
    pub fn database(mut self, database: Arc<dyn RecipeDatabase>) -> Self {
        self.database = Some(database);
        self
    }

    /// Share an existing store instead of starting an empty one
    pub fn store(mut self, store: RecipeStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the finder
    ///
    /// # Errors
    /// Returns `ResolveError` if:
    /// - The configuration cannot be loaded
    /// - The selected provider is unknown, disabled, or has no API key
    pub fn build(self) -> Result<RecipeFinder, ResolveError> {
        let needs_config = self.generative.is_none() || self.database.is_none();
        let mut config = match self.config {
            Some(config) => config,
            None if needs_config => AppConfig::load()?,
            None => AppConfig::default(),
        };

        if let Some(provider) = self.provider {
            config.default_provider = provider.as_str().to_string();
        }

        if self.api_key.is_some() || self.model.is_some() {
            let name = config.default_provider.clone();
            let entry = config
                .providers
                .entry(name.clone())
                .or_insert_with(|| ProviderConfig::new(default_model(&name)));
            if let Some(api_key) = self.api_key {
                entry.api_key = Some(api_key);
            }
            if let Some(model) = self.model {
                entry.model = model;
            }
        }

        if let Some(timeout) = self.timeout {
            config.timeout = timeout.as_secs().max(1);
        }

        if let Some(url) = self.mealdb_url {
            config.mealdb.base_url = url;
        }

        let generative = match self.generative {
            Some(generative) => generative,
            None => Arc::new(RetryingProvider::new(&config)?),
        };

        let database = match self.database {
            Some(database) => database,
            None => Arc::new(
                MealDbClient::new(config.mealdb.base_url.clone())
                    .with_timeout(Duration::from_secs(config.timeout)),
            ),
        };

        let resolver = Resolver::new(generative, database.clone());

        Ok(RecipeFinder {
            session: ResolutionSession::new(resolver.clone()),
            resolver,
            recommendations: RecommendationFetcher::new(database),
            store: self.store.unwrap_or_default(),
        })
    }
}

/// The application core: resolution, suggestions and the saved-recipe list.
///
/// Construct one at start-up and hand out references (or [`RecipeStore`]
/// handles) to whatever needs them.
pub struct RecipeFinder {
    resolver: Resolver,
    session: ResolutionSession,
    recommendations: RecommendationFetcher,
    store: RecipeStore,
}

impl RecipeFinder {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use quick_recipe::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder();
    /// ```
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }

    /// Resolve a dish name; independent calls do not affect each other.
    pub async fn resolve(&self, dish: &str) -> RecipeRecord {
        self.resolver.resolve(dish).await
    }

    /// Resolve a dish name and report the states visited.
    pub async fn resolve_traced(&self, dish: &str) -> Resolution {
        self.resolver.resolve_traced(dish).await
    }

    /// Resolve a dish name for the current display, superseding any
    /// submission still in flight.
    pub async fn submit(&self, dish: &str) -> Result<RecipeRecord, ResolveError> {
        self.session.submit(dish).await
    }

    /// Cancel the submission in flight, if any.
    pub fn cancel(&self) {
        self.session.cancel();
    }

    /// Save a recipe, returning the number of saved entries.
    pub fn save(&self, dish_name: impl Into<String>, recipe: RecipeRecord) -> usize {
        self.store.save(dish_name, recipe)
    }

    /// Saved recipes in insertion order
    pub fn saved(&self) -> Vec<SavedRecipe> {
        self.store.all()
    }

    /// Handle to the shared saved-recipe list
    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub async fn recommendations(&self, query: RecommendationQuery) -> Recommendations {
        self.recommendations.fetch(query).await
    }

    pub fn popular_dishes(&self) -> &'static [&'static str] {
        &POPULAR_DISHES
    }
}
