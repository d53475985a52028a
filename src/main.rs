use log::error;
use quick_recipe::{browse_dishes, resolve_dish, RecommendationQuery, POPULAR_DISHES};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage:
  quick-recipe [--json] <dish name...>   Find a recipe for a dish
  quick-recipe --browse [letter]         List dishes from the recipe database
  quick-recipe --popular                 List suggested dishes";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match args.first().map(String::as_str) {
        None | Some("-h") | Some("--help") => {
            println!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }

        Some("--popular") => {
            for dish in POPULAR_DISHES {
                println!("{}", dish);
            }
            Ok(ExitCode::SUCCESS)
        }

        Some("--browse") => {
            let query = match args.get(1).and_then(|s| s.chars().next()) {
                Some(letter) => RecommendationQuery::FirstLetter(letter),
                None => RecommendationQuery::All,
            };

            let recommendations = browse_dishes(query).await?;
            if let Some(error) = &recommendations.error {
                eprintln!("{}", error);
                return Ok(ExitCode::FAILURE);
            }
            for meal in &recommendations.dishes {
                println!("{}\t{}", meal.id, meal.name);
            }
            Ok(ExitCode::SUCCESS)
        }

        Some(_) => {
            let json = args.iter().any(|a| a == "--json");
            let dish = args
                .iter()
                .filter(|a| *a != "--json")
                .cloned()
                .collect::<Vec<_>>()
                .join(" ");

            let record = resolve_dish(&dish).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", record.to_text());
            }

            Ok(if record.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
