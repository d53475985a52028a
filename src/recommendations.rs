use crate::mealdb::{Meal, RecipeDatabase};
use log::warn;
use serde::Serialize;
use std::sync::Arc;

/// Suggestions offered before the user types anything
pub const POPULAR_DISHES: [&str; 3] = ["Spaghetti Bolognese", "Chicken Curry", "Beef Stroganoff"];

/// Which slice of the recipe database to browse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationQuery {
    /// Dishes whose name starts with the letter
    FirstLetter(char),
    /// Everything an empty search returns
    All,
}

/// Browse list for display. `error` is set when `dishes` is empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Recommendations {
    pub dishes: Vec<Meal>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct RecommendationFetcher {
    database: Arc<dyn RecipeDatabase>,
}

impl RecommendationFetcher {
    pub fn new(database: Arc<dyn RecipeDatabase>) -> Self {
        RecommendationFetcher { database }
    }

    /// Issue one query and return the raw records.
    pub async fn fetch(&self, query: RecommendationQuery) -> Recommendations {
        let result = match query {
            RecommendationQuery::FirstLetter(letter) => self.database.by_first_letter(letter).await,
            RecommendationQuery::All => self.database.search("").await,
        };

        match result {
            Ok(dishes) if dishes.is_empty() => Recommendations {
                dishes,
                error: Some("No dishes found".to_string()),
            },
            Ok(dishes) => Recommendations {
                dishes,
                error: None,
            },
            Err(e) => {
                warn!("Failed to fetch recommendations for {:?}: {}", query, e);
                Recommendations {
                    dishes: Vec::new(),
                    error: Some("Failed to fetch recommendations".to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_meal, FakeDatabase};

    fn catalogue() -> FakeDatabase {
        FakeDatabase::with_meals(vec![
            sample_meal("1", "Beef Stroganoff"),
            sample_meal("2", "Bakewell Tart"),
            sample_meal("3", "Chicken Curry"),
        ])
    }

    #[tokio::test]
    async fn test_fetch_by_letter() {
        let fetcher = RecommendationFetcher::new(Arc::new(catalogue()));
        let result = fetcher.fetch(RecommendationQuery::FirstLetter('B')).await;

        assert!(result.error.is_none());
        let names: Vec<_> = result.dishes.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Beef Stroganoff", "Bakewell Tart"]);
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let database = catalogue();
        let fetcher = RecommendationFetcher::new(Arc::new(database.clone()));
        let result = fetcher.fetch(RecommendationQuery::All).await;

        assert_eq!(result.dishes.len(), 3);
        assert_eq!(database.queries(), vec![""]);
    }

    #[tokio::test]
    async fn test_empty_result_reports_error() {
        let fetcher = RecommendationFetcher::new(Arc::new(catalogue()));
        let result = fetcher.fetch(RecommendationQuery::FirstLetter('z')).await;

        assert!(result.dishes.is_empty());
        assert_eq!(result.error.as_deref(), Some("No dishes found"));
    }

    #[tokio::test]
    async fn test_failure_reports_error() {
        let fetcher = RecommendationFetcher::new(Arc::new(FakeDatabase::failing()));
        let result = fetcher.fetch(RecommendationQuery::All).await;

        assert!(result.dishes.is_empty());
        assert_eq!(
            result.error.as_deref(),
            Some("Failed to fetch recommendations")
        );
    }

    #[test]
    fn test_popular_dishes() {
        assert_eq!(POPULAR_DISHES.len(), 3);
        assert!(POPULAR_DISHES.contains(&"Chicken Curry"));
    }
}
