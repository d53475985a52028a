//! Deterministic stand-ins for the external services.
//!
//! These let resolver behaviour be exercised without network access. Both
//! fakes are cheap to clone and share their state, so a test can keep a
//! clone to inspect calls after handing the original to a `Resolver`.

use crate::error::{LookupError, ProviderError};
use crate::mealdb::{Meal, RecipeDatabase};
use crate::providers::GenerativeProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(String),
    Fail(String),
    Hang,
}

/// Generative provider answering from a script, one entry per call.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn then_respond(self, text: &str) -> Self {
        self.push(Scripted::Respond(text.to_string()));
        self
    }

    /// Queue a failed call
    pub fn then_fail(self, message: &str) -> Self {
        self.push(Scripted::Fail(message.to_string()));
        self
    }

    /// Queue a call that never completes
    pub fn then_hang(self) -> Self {
        self.push(Scripted::Hang);
        self
    }

    /// Number of `generate` calls received so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn push(&self, entry: Scripted) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
    }
}

#[async_trait]
impl GenerativeProvider for FakeProvider {
    fn provider_name(&self) -> &str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Scripted::Respond(text)) => Ok(text),
            Some(Scripted::Fail(message)) => Err(ProviderError::ApiError {
                status: 503,
                message,
            }),
            Some(Scripted::Hang) => std::future::pending().await,
            None => Err(ProviderError::ParseError(
                "No scripted response left".to_string(),
            )),
        }
    }
}

/// Recipe database serving a fixed catalogue with substring search.
#[derive(Debug, Clone, Default)]
pub struct FakeDatabase {
    meals: Arc<Vec<Meal>>,
    failing: bool,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meals(meals: Vec<Meal>) -> Self {
        Self {
            meals: Arc::new(meals),
            ..Self::default()
        }
    }

    /// A database whose every call errors
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Number of calls received so far
    pub fn calls(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or_default()
    }

    /// Queries received, in call order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    fn record(&self, query: String) -> Result<(), LookupError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query);
        }
        if self.failing {
            return Err(LookupError::ApiError { status: 503 });
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeDatabase for FakeDatabase {
    async fn search(&self, query: &str) -> Result<Vec<Meal>, LookupError> {
        self.record(query.to_string())?;
        let needle = query.trim().to_lowercase();
        Ok(self
            .meals
            .iter()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn by_first_letter(&self, letter: char) -> Result<Vec<Meal>, LookupError> {
        self.record(letter.to_string())?;
        let letter = letter.to_lowercase().to_string();
        Ok(self
            .meals
            .iter()
            .filter(|m| m.name.to_lowercase().starts_with(&letter))
            .cloned()
            .collect())
    }
}

/// A small meal record for tests
pub fn sample_meal(id: &str, name: &str) -> Meal {
    Meal {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: format!("https://www.themealdb.com/images/media/meals/{}.jpg", id),
        category: None,
        area: None,
        ingredients: vec![crate::model::MeasuredIngredient {
            name: "Rice".to_string(),
            measure: "300g".to_string(),
        }],
        instructions: format!("Cook the {}.", name.to_lowercase()),
    }
}
