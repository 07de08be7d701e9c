use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::error::{PlanError, Result};
use crate::models::Food;

/// Minimum Jaro-Winkler similarity for a fuzzy name match.
const FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// Ordered food list with case-insensitive and fuzzy name lookup.
pub struct FoodCatalog {
    foods: Vec<Food>,
    /// Index into `foods` keyed by lowercase name.
    index: HashMap<String, usize>,
}

impl FoodCatalog {
    /// Build a catalog. Names must be unique (case-insensitive).
    pub fn new(foods: Vec<Food>) -> Result<Self> {
        let mut index = HashMap::with_capacity(foods.len());
        for (i, food) in foods.iter().enumerate() {
            if index.insert(food.key(), i).is_some() {
                return Err(PlanError::DuplicateFood(food.name().to_string()));
            }
        }
        Ok(Self { foods, index })
    }

    /// Rice, vegetables, chicken and oil: a small catalog for a first run.
    pub fn starter() -> Result<Self> {
        Self::new(vec![
            Food::new("Rice", "g", 47.0, 170.0, 37.0, 3.0, 0.0, true)?,
            Food::new("Vegetables", "g", 100.0, 28.0, 3.0, 3.0, 0.5, true)?,
            Food::new("Chicken breast", "g", 112.0, 100.0, 0.0, 24.0, 0.5, true)?,
            Food::new("Canola oil", "g", 14.0, 120.0, 0.0, 0.0, 14.0, false)?,
        ])
    }

    /// Get a food by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Food> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.foods[i])
    }

    /// Resolve a name exactly (case-insensitive), else `UnknownFood`.
    pub fn resolve(&self, name: &str) -> Result<&Food> {
        self.get(name)
            .ok_or_else(|| PlanError::UnknownFood(name.trim().to_string()))
    }

    /// Closest fuzzy match for a name with no exact match.
    ///
    /// A suggestion only; callers confirm it before using it.
    pub fn suggest(&self, name: &str) -> Option<&Food> {
        let wanted = name.trim().to_lowercase();
        self.foods
            .iter()
            .map(|f| (f, jaro_winkler(&f.key(), &wanted)))
            .filter(|(_, score)| *score >= FUZZY_MATCH_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(f, _)| f)
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn into_foods(self) -> Vec<Food> {
        self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_foods() -> Vec<Food> {
        vec![
            Food::new("Chicken breast", "g", 112.0, 100.0, 0.0, 24.0, 0.5, true).unwrap(),
            Food::new("Canola oil", "g", 14.0, 120.0, 0.0, 0.0, 14.0, false).unwrap(),
        ]
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut foods = sample_foods();
        foods.push(Food::new("chicken BREAST", "g", 1.0, 1.0, 0.0, 0.0, 0.0, false).unwrap());
        assert!(matches!(
            FoodCatalog::new(foods),
            Err(PlanError::DuplicateFood(name)) if name == "chicken BREAST"
        ));

        let catalog = FoodCatalog::new(sample_foods()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("CHICKEN BREAST").unwrap().serving_size(), 112.0);
    }

    #[test]
    fn test_starter_catalog() {
        let catalog = FoodCatalog::starter().unwrap();
        assert_eq!(catalog.len(), 4);
        assert!(catalog.get("canola oil").is_some());
    }

    #[test]
    fn test_resolve_is_exact() {
        let catalog = FoodCatalog::new(sample_foods()).unwrap();
        assert_eq!(catalog.resolve(" canola oil ").unwrap().name(), "Canola oil");
        assert!(matches!(
            catalog.resolve("chiken breast"),
            Err(PlanError::UnknownFood(_))
        ));
        assert!(matches!(
            catalog.resolve("tofu"),
            Err(PlanError::UnknownFood(_))
        ));
    }

    #[test]
    fn test_near_names_are_not_swapped_for_another_food() {
        let catalog = FoodCatalog::starter().unwrap();
        for typed in ["Chicken thigh", "Rice cake", "Canola spray"] {
            match catalog.resolve(typed) {
                Err(PlanError::UnknownFood(name)) => assert_eq!(name, typed),
                Ok(food) => panic!("{} resolved to {}", typed, food.name()),
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn test_suggest_fuzzy() {
        let catalog = FoodCatalog::new(sample_foods()).unwrap();
        assert_eq!(catalog.suggest("chiken breast").unwrap().name(), "Chicken breast");
        assert!(catalog.suggest("tofu").is_none());
    }
}
