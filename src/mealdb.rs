//! Client for the structured recipe database (TheMealDB JSON API).

use crate::config::default_mealdb_url;
use crate::error::LookupError;
use crate::model::{LookupRecipe, MeasuredIngredient};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// The database lists ingredients as discrete numbered fields, up to this many
pub const MAX_INGREDIENTS: usize = 20;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A record from the structured recipe database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMeal", into = "RawMeal")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub ingredients: Vec<MeasuredIngredient>,
    pub instructions: String,
}

impl Meal {
    pub fn into_lookup_recipe(self) -> LookupRecipe {
        LookupRecipe {
            id: self.id,
            name: self.name,
            image_url: self.thumbnail,
            ingredients: self.ingredients,
            instructions: self.instructions,
        }
    }
}

/// Wire shape of a meal: fixed fields plus `strIngredientN`/`strMeasureN`.
#[derive(Serialize, Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal", default)]
    id: String,
    #[serde(rename = "strMeal", default)]
    name: String,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(flatten)]
    rest: HashMap<String, Value>,
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        let field = |key: String| {
            raw.rest
                .get(&key)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let ingredients = (1..=MAX_INGREDIENTS)
            .filter_map(|i| {
                let name = field(format!("strIngredient{}", i));
                if name.is_empty() {
                    return None;
                }
                Some(MeasuredIngredient {
                    name,
                    measure: field(format!("strMeasure{}", i)),
                })
            })
            .collect();

        Meal {
            id: raw.id,
            name: raw.name,
            thumbnail: raw.thumbnail.unwrap_or_default(),
            category: raw.category.filter(|c| !c.is_empty()),
            area: raw.area.filter(|a| !a.is_empty()),
            ingredients,
            instructions: raw.instructions.unwrap_or_default(),
        }
    }
}

impl From<Meal> for RawMeal {
    fn from(meal: Meal) -> Self {
        let mut rest = HashMap::new();
        for (i, ingredient) in meal.ingredients.into_iter().take(MAX_INGREDIENTS).enumerate() {
            rest.insert(format!("strIngredient{}", i + 1), Value::String(ingredient.name));
            rest.insert(format!("strMeasure{}", i + 1), Value::String(ingredient.measure));
        }

        RawMeal {
            id: meal.id,
            name: meal.name,
            thumbnail: Some(meal.thumbnail),
            category: meal.category,
            area: meal.area,
            instructions: Some(meal.instructions),
            rest,
        }
    }
}

#[derive(Deserialize)]
struct MealsResponse {
    meals: Option<Vec<Meal>>,
}

/// Search interface of the structured recipe database
#[async_trait]
pub trait RecipeDatabase: Send + Sync {
    /// Meals whose name matches the query; an empty query lists the catalogue
    async fn search(&self, query: &str) -> Result<Vec<Meal>, LookupError>;

    /// Meals whose name starts with the given letter
    async fn by_first_letter(&self, letter: char) -> Result<Vec<Meal>, LookupError>;
}

pub struct MealDbClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl MealDbClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        MealDbClient {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each request, body included, by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn query(&self, param: &str, value: &str) -> Result<Vec<Meal>, LookupError> {
        tokio::time::timeout(self.timeout, self.fetch(param, value))
            .await
            .map_err(|_| LookupError::Timeout(self.timeout.as_secs()))?
    }

    async fn fetch(&self, param: &str, value: &str) -> Result<Vec<Meal>, LookupError> {
        let response = self
            .client
            .get(format!("{}/search.php", self.base_url))
            .query(&[(param, value)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::ApiError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: MealsResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::ParseError(e.to_string()))?;
        let meals = parsed.meals.unwrap_or_default();
        debug!("Recipe database returned {} meal(s) for {}={:?}", meals.len(), param, value);

        Ok(meals)
    }
}

impl Default for MealDbClient {
    fn default() -> Self {
        Self::new(default_mealdb_url())
    }
}

#[async_trait]
impl RecipeDatabase for MealDbClient {
    async fn search(&self, query: &str) -> Result<Vec<Meal>, LookupError> {
        self.query("s", query.trim()).await
    }

    async fn by_first_letter(&self, letter: char) -> Result<Vec<Meal>, LookupError> {
        self.query("f", &letter.to_lowercase().to_string()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const PAELLA_JSON: &str = r#"{
        "meals": [{
            "idMeal": "52836",
            "strMeal": "Seafood Paella",
            "strCategory": "Seafood",
            "strArea": "Spanish",
            "strInstructions": "Fry the chorizo. Add the rice.",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/paella.jpg",
            "strIngredient1": "Chorizo",
            "strIngredient2": "Paella Rice",
            "strIngredient3": " ",
            "strIngredient4": "",
            "strIngredient5": null,
            "strMeasure1": "100g",
            "strMeasure2": "300g ",
            "strMeasure3": " ",
            "strMeasure4": "",
            "strMeasure5": null
        }]
    }"#;

    #[test]
    fn test_meal_collects_ingredient_pairs() {
        let parsed: MealsResponse = serde_json::from_str(PAELLA_JSON).unwrap();
        let meal = parsed.meals.unwrap().remove(0);

        assert_eq!(meal.id, "52836");
        assert_eq!(meal.name, "Seafood Paella");
        assert_eq!(meal.area.as_deref(), Some("Spanish"));
        assert_eq!(
            meal.ingredients,
            vec![
                MeasuredIngredient {
                    name: "Chorizo".to_string(),
                    measure: "100g".to_string(),
                },
                MeasuredIngredient {
                    name: "Paella Rice".to_string(),
                    measure: "300g".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_ingredient_fields_beyond_twenty_are_ignored() {
        let json = r#"{
            "idMeal": "1",
            "strMeal": "Big Stew",
            "strIngredient20": "Salt",
            "strMeasure20": "pinch",
            "strIngredient21": "Pepper"
        }"#;
        let meal: Meal = serde_json::from_str(json).unwrap();

        assert_eq!(meal.ingredients.len(), 1);
        assert_eq!(meal.ingredients[0].name, "Salt");
        assert!(meal.thumbnail.is_empty());
        assert!(meal.instructions.is_empty());
    }

    #[test]
    fn test_serialized_meal_reads_back() {
        let parsed: MealsResponse = serde_json::from_str(PAELLA_JSON).unwrap();
        let meal = parsed.meals.unwrap().remove(0);

        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["strMeal"], "Seafood Paella");
        assert_eq!(json["strIngredient2"], "Paella Rice");

        let read_back: Meal = serde_json::from_value(json).unwrap();
        assert_eq!(read_back, meal);
    }

    #[test]
    fn test_into_lookup_recipe() {
        let parsed: MealsResponse = serde_json::from_str(PAELLA_JSON).unwrap();
        let recipe = parsed.meals.unwrap().remove(0).into_lookup_recipe();

        assert_eq!(
            recipe.image_url,
            "https://www.themealdb.com/images/media/meals/paella.jpg"
        );
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.instructions, "Fry the chorizo. Add the rice.");
    }

    #[tokio::test]
    async fn test_search() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("s".into(), "Paella".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PAELLA_JSON)
            .create_async()
            .await;

        let client = MealDbClient::new(server.url());
        let meals = client.search(" Paella ").await.unwrap();

        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Seafood Paella");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_null_meals_is_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let client = MealDbClient::new(server.url());
        let meals = client.search("Unicorn Pie").await.unwrap();
        assert!(meals.is_empty());
    }

    #[tokio::test]
    async fn test_by_first_letter() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("f".into(), "s".into()))
            .with_status(200)
            .with_body(PAELLA_JSON)
            .create_async()
            .await;

        let client = MealDbClient::new(format!("{}/", server.url()));
        let meals = client.by_first_letter('S').await.unwrap();

        assert_eq!(meals.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = MealDbClient::new(server.url());
        let result = client.search("Paella").await;
        assert!(matches!(result, Err(LookupError::ApiError { status: 500 })));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = MealDbClient::new(server.url());
        let result = client.search("Paella").await;
        assert!(matches!(result, Err(LookupError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_stalled_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let client = MealDbClient::new(url).with_timeout(Duration::from_millis(200));
        let result = client.search("Paella").await;
        assert!(matches!(result, Err(LookupError::Timeout(_))));
    }

    #[test]
    fn test_default_base_url() {
        let client = MealDbClient::default();
        assert_eq!(client.base_url(), "https://www.themealdb.com/api/json/v1/1");
    }
}
