use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Generative provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Retry and provider fallback behaviour for generative calls
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Structured recipe database settings
    #[serde(default)]
    pub mealdb: MealDbConfig,
    /// Request timeout in seconds for every external call
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fallback: FallbackConfig::default(),
            mealdb: MealDbConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a specific generative provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-1.5-flash", "gpt-4o-mini"); empty means the provider default
    #[serde(default)]
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            enabled: true,
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Configuration for generative retry and provider fallback
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether to chain several providers
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Attempts per provider, including the first one
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay between attempts in milliseconds (multiplied by the attempt number)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Configuration for the structured recipe database
#[derive(Debug, Deserialize, Clone)]
pub struct MealDbConfig {
    #[serde(default = "default_mealdb_url")]
    pub base_url: String,
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: default_mealdb_url(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_mealdb_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

/// Default model for a provider when none is configured
pub fn default_model(provider_name: &str) -> &'static str {
    match provider_name {
        "openai" => "gpt-4o-mini",
        "anthropic" => "claude-3-5-haiku-20241022",
        _ => "gemini-1.5-flash",
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with QUICK_RECIPE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: QUICK_RECIPE__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: QUICK_RECIPE__MEALDB__BASE_URL
        .add_source(
            Environment::with_prefix("QUICK_RECIPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
