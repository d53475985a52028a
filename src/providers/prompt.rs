/// Prompt asking the service to validate a dish name.
///
/// Loaded from `validate.txt` at compile time. Contains a `{{DISH}}`
/// placeholder replaced by [`validation_prompt`].
pub const VALIDATION_PROMPT: &str = include_str!("validate.txt");

/// Prompt asking the service for a sectioned recipe.
///
/// Loaded from `generate.txt` at compile time. Contains a `{{DISH}}`
/// placeholder replaced by [`generation_prompt`].
pub const GENERATION_PROMPT: &str = include_str!("generate.txt");

/// Answer the generation prompt asks for when no recipe is known
pub const NO_RECIPE_SIGNAL: &str = "NO RECIPE FOUND";

/// Injects the dish name into the validation prompt template.
pub fn validation_prompt(dish: &str) -> String {
    VALIDATION_PROMPT.replace("{{DISH}}", dish.trim())
}

/// Injects the dish name into the generation prompt template.
pub fn generation_prompt(dish: &str) -> String {
    GENERATION_PROMPT.replace("{{DISH}}", dish.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_are_embedded() {
        assert!(VALIDATION_PROMPT.contains("{{DISH}}"));
        assert!(VALIDATION_PROMPT.contains("INVALID"));
        assert!(VALIDATION_PROMPT.contains("VALID"));

        assert!(GENERATION_PROMPT.contains("{{DISH}}"));
        assert!(GENERATION_PROMPT.contains("Ingredients:"));
        assert!(GENERATION_PROMPT.contains("Instructions:"));
        assert!(GENERATION_PROMPT.contains(NO_RECIPE_SIGNAL));
    }

    #[test]
    fn test_dish_is_injected() {
        let prompt = generation_prompt("  Chicken Curry ");
        assert!(prompt.contains("to prepare Chicken Curry."));
        assert!(!prompt.contains("{{DISH}}"));

        let prompt = validation_prompt("红烧肉");
        assert!(prompt.contains("红烧肉"));
        assert!(!prompt.contains("{{DISH}}"));
    }
}
