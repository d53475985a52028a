use crate::model::{RecipeRecord, SavedRecipe};
use log::debug;
use std::sync::{Arc, RwLock};

/// Append-only list of recipes saved during a session.
///
/// Cloning yields another handle to the same list. Appends are serialized by
/// the lock; entries are never removed, edited, or deduplicated.
#[derive(Debug, Clone, Default)]
pub struct RecipeStore {
    saved: Arc<RwLock<Vec<SavedRecipe>>>,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipe and return the number of saved entries.
    pub fn save(&self, dish_name: impl Into<String>, recipe: RecipeRecord) -> usize {
        let entry = SavedRecipe {
            dish_name: dish_name.into(),
            recipe,
        };

        let mut saved = self.saved.write().unwrap_or_else(|e| e.into_inner());
        debug!("Saving recipe for {:?}", entry.dish_name);
        saved.push(entry);
        saved.len()
    }

    /// All saved recipes in insertion order.
    pub fn all(&self) -> Vec<SavedRecipe> {
        self.saved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn get(&self, index: usize) -> Option<SavedRecipe> {
        self.saved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(index)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.saved.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
