use crate::config::AppConfig;
use crate::error::ProviderError;
use crate::providers::{GenerativeProvider, ProviderFactory};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Generative provider that bounds every call with a timeout, retries a
/// failed call, and moves on to the next configured provider when one is
/// exhausted.
pub struct RetryingProvider {
    providers: Vec<Box<dyn GenerativeProvider>>,
    retry_attempts: u32,
    retry_delay_ms: u64,
    timeout: Duration,
}

impl RetryingProvider {
    /// Create a new retrying provider from configuration
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout);
        let retry_attempts = config.fallback.retry_attempts.max(1);

        if !config.fallback.enabled {
            // Without a chain, just retry the default provider
            let default_provider = ProviderFactory::get_default_provider(config)?;
            return Ok(Self::from_providers(
                vec![default_provider],
                retry_attempts,
                config.fallback.retry_delay_ms,
                timeout,
            ));
        }

        let mut providers = Vec::new();

        for provider_name in &config.fallback.order {
            if let Some(provider_config) = config.providers.get(provider_name) {
                if provider_config.enabled {
                    match ProviderFactory::create(provider_name, provider_config) {
                        Ok(provider) => {
                            info!("Added '{}' to fallback chain", provider_name);
                            providers.push(provider);
                        }
                        Err(e) => {
                            warn!("Failed to initialize provider '{}': {}", provider_name, e);
                        }
                    }
                }
            } else {
                warn!(
                    "Provider '{}' in fallback order not found in configuration",
                    provider_name
                );
            }
        }

        if providers.is_empty() {
            return Err(ProviderError::NotConfigured(
                "No providers available in fallback configuration".to_string(),
            ));
        }

        Ok(Self::from_providers(
            providers,
            retry_attempts,
            config.fallback.retry_delay_ms,
            timeout,
        ))
    }

    /// Wrap already constructed providers
    pub fn from_providers(
        providers: Vec<Box<dyn GenerativeProvider>>,
        retry_attempts: u32,
        retry_delay_ms: u64,
        timeout: Duration,
    ) -> Self {
        RetryingProvider {
            providers,
            retry_attempts: retry_attempts.max(1),
            retry_delay_ms,
            timeout,
        }
    }

    async fn try_provider_with_retry(
        &self,
        provider: &dyn GenerativeProvider,
        prompt: &str,
    ) -> Result<String, String> {
        let mut last_error = String::new();

        for attempt in 1..=self.retry_attempts {
            debug!(
                "Calling {} (attempt {}/{})",
                provider.provider_name(),
                attempt,
                self.retry_attempts
            );

            let result = match timeout(self.timeout, provider.generate(prompt)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.timeout.as_secs())),
            };

            match result {
                Ok(text) => {
                    info!("Generation succeeded using {}", provider.provider_name());
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed (attempt {}/{}): {}",
                        provider.provider_name(),
                        attempt,
                        self.retry_attempts,
                        e
                    );
                    last_error = e.to_string();
                }
            }

            if attempt < self.retry_attempts {
                let delay = Duration::from_millis(self.retry_delay_ms * attempt as u64);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay).await;
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl GenerativeProvider for RetryingProvider {
    fn provider_name(&self) -> &str {
        "retrying"
    }

    fn model_name(&self) -> &str {
        self.providers
            .first()
            .map(|p| p.model_name())
            .unwrap_or_default()
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut all_errors: Vec<String> = Vec::new();

        for provider in &self.providers {
            match self
                .try_provider_with_retry(provider.as_ref(), prompt)
                .await
            {
                Ok(result) => return Ok(result),
                Err(e) => {
                    all_errors.push(format!("{}: {}", provider.provider_name(), e));
                }
            }
        }

        Err(ProviderError::Exhausted(all_errors.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FallbackConfig, ProviderConfig};
    use crate::testing::FakeProvider;
    use std::collections::HashMap;

    fn test_provider_config() -> ProviderConfig {
        let mut config = ProviderConfig::new("gemini-1.5-flash");
        config.api_key = Some("test-key".to_string());
        config
    }

    #[test]
    fn test_fallback_disabled_uses_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("google".to_string(), test_provider_config());

        let config = AppConfig {
            providers,
            ..Default::default()
        };

        let retrying = RetryingProvider::new(&config).unwrap();
        assert_eq!(retrying.providers.len(), 1);
        assert_eq!(retrying.retry_attempts, 2);
        assert_eq!(retrying.provider_name(), "retrying");
        assert_eq!(retrying.model_name(), "gemini-1.5-flash");
    }

    #[test]
    fn test_fallback_chain_skips_unknown_entries() {
        let mut providers = HashMap::new();
        providers.insert("google".to_string(), test_provider_config());
        providers.insert("openai".to_string(), test_provider_config());

        let config = AppConfig {
            providers,
            fallback: FallbackConfig {
                enabled: true,
                order: vec![
                    "google".to_string(),
                    "missing".to_string(),
                    "openai".to_string(),
                ],
                retry_attempts: 1,
                retry_delay_ms: 0,
            },
            ..Default::default()
        };

        let retrying = RetryingProvider::new(&config).unwrap();
        assert_eq!(retrying.providers.len(), 2);
    }

    #[test]
    fn test_fallback_no_providers() {
        let config = AppConfig {
            fallback: FallbackConfig {
                enabled: true,
                order: vec!["google".to_string()],
                retry_attempts: 2,
                retry_delay_ms: 0,
            },
            ..Default::default()
        };

        let result = RetryingProvider::new(&config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("No providers available"));
        }
    }

    #[tokio::test]
    async fn test_single_retry_then_success() {
        let fake = FakeProvider::new()
            .then_fail("rate limited")
            .then_respond("VALID");
        let probe = fake.clone();

        let retrying = RetryingProvider::from_providers(
            vec![Box::new(fake)],
            2,
            0,
            Duration::from_secs(5),
        );

        assert_eq!(retrying.generate("prompt").await.unwrap(), "VALID");
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_moves_to_next_provider_after_retries() {
        let first = FakeProvider::new().then_fail("down").then_fail("still down");
        let second = FakeProvider::new().then_respond("VALID");
        let probe = first.clone();

        let retrying = RetryingProvider::from_providers(
            vec![Box::new(first), Box::new(second)],
            2,
            0,
            Duration::from_secs(5),
        );

        assert_eq!(retrying.generate("prompt").await.unwrap(), "VALID");
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn test_all_providers_fail() {
        let retrying = RetryingProvider::from_providers(
            vec![Box::new(FakeProvider::new().then_fail("boom"))],
            1,
            0,
            Duration::from_secs(5),
        );

        let err = retrying.generate("prompt").await.unwrap_err();
        assert!(matches!(err, ProviderError::Exhausted(_)));
        assert!(err.to_string().contains("fake: "));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_call_times_out() {
        let retrying = RetryingProvider::from_providers(
            vec![Box::new(FakeProvider::new().then_hang())],
            1,
            0,
            Duration::from_secs(30),
        );

        let err = retrying.generate("prompt").await.unwrap_err();
        assert!(err.to_string().contains("timed out after 30 seconds"));
    }
}
