use crate::config::{default_model, AppConfig, ProviderConfig};
use crate::error::ProviderError;
use crate::providers::{AnthropicProvider, GenerativeProvider, GoogleProvider, OpenAIProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn GenerativeProvider>, ProviderError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ProviderError::NotConfigured(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )));
        }

        let mut config = config.clone();
        if config.model.trim().is_empty() {
            config.model = default_model(provider_name).to_string();
        }

        match provider_name {
            "google" => Ok(Box::new(GoogleProvider::new(&config)?)),
            "openai" => Ok(Box::new(OpenAIProvider::new(&config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(&config)?)),
            _ => Err(ProviderError::NotConfigured(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    ///
    /// A provider missing from the `providers` table is created with its
    /// default model, so an API key in the environment is enough to run.
    pub fn get_default_provider(
        config: &AppConfig,
    ) -> Result<Box<dyn GenerativeProvider>, ProviderError> {
        let provider_name = &config.default_provider;
        match config.providers.get(provider_name) {
            Some(provider_config) => Self::create(provider_name, provider_config),
            None => Self::create(
                provider_name,
                &ProviderConfig::new(default_model(provider_name)),
            ),
        }
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "anthropic"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_provider_config() -> ProviderConfig {
        let mut config = ProviderConfig::new("test-model");
        config.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_create_google_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("google", &config).unwrap();
        assert_eq!(provider.provider_name(), "google");
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_anthropic_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("anthropic", &config).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown provider"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_provider_config();
        config.enabled = false;

        let result = ProviderFactory::create("google", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let app_config = AppConfig {
            default_provider: "openai".to_string(),
            providers,
            ..Default::default()
        };

        let provider = ProviderFactory::get_default_provider(&app_config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
        assert_eq!(provider.model_name(), "test-model");
    }

    #[test]
    fn test_empty_model_uses_provider_default() {
        let mut config = create_test_provider_config();
        config.model = String::new();

        let provider = ProviderFactory::create("openai", &config).unwrap();
        assert_eq!(provider.model_name(), "gpt-4o-mini");
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers.len(), 3);
        assert!(providers.contains(&"google"));
        assert!(providers.contains(&"openai"));
        assert!(providers.contains(&"anthropic"));
    }
}
