use serde::Serialize;

use crate::models::{Food, Nutrient};

/// Result of one solve: a quantity per food and the mean squared residual.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Quantity per food, in the order the foods were registered.
    pub quantities: Vec<f64>,

    /// Mean squared residual across all constraints.
    pub loss: f64,

    /// Degrees of freedom the constraints leave undetermined.
    pub rank_deficiency: usize,

    /// Iterations the bounded least-squares fit took.
    pub iterations: usize,
}

impl Solution {
    /// Pair the quantities with the foods they were solved for.
    pub fn to_plan(&self, foods: &[Food]) -> MealPlan {
        let items = foods
            .iter()
            .zip(&self.quantities)
            .map(|(food, &quantity)| MealPlanItem::new(food, quantity))
            .collect();

        MealPlan {
            items,
            loss: self.loss,
            rank_deficiency: self.rank_deficiency,
        }
    }
}

/// One food in a solved meal with the macros it contributes.
#[derive(Debug, Clone, Serialize)]
pub struct MealPlanItem {
    pub food_name: String,
    pub unit: String,
    pub quantity: f64,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

impl MealPlanItem {
    pub fn new(food: &Food, quantity: f64) -> Self {
        Self {
            food_name: food.name().to_string(),
            unit: food.unit().to_string(),
            quantity,
            calories: food.density(Nutrient::Calories) * quantity,
            carbs: food.density(Nutrient::Carbs) * quantity,
            protein: food.density(Nutrient::Protein) * quantity,
            fat: food.density(Nutrient::Fat) * quantity,
        }
    }
}

/// A solved meal ready for display or export.
#[derive(Debug, Clone)]
pub struct MealPlan {
    pub items: Vec<MealPlanItem>,
    pub loss: f64,
    pub rank_deficiency: usize,
}

impl MealPlan {
    /// Achieved total of a nutrient across the meal.
    pub fn total(&self, nutrient: Nutrient) -> f64 {
        self.items
            .iter()
            .map(|item| match nutrient {
                Nutrient::Calories => item.calories,
                Nutrient::Carbs => item.carbs,
                Nutrient::Protein => item.protein,
                Nutrient::Fat => item.fat,
                Nutrient::Quantity => item.quantity,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
