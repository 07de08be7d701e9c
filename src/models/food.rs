use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

/// A quantity a total constraint can target.
///
/// `Quantity` has a density of one per unit, so a total constraint on it
/// targets the combined amount of all foods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Carbs,
    Protein,
    Fat,
    Quantity,
}

impl Nutrient {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Carbs => "carbs",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Quantity => "quantity",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Nutrient {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "calories" | "cals" | "kcal" => Ok(Nutrient::Calories),
            "carbs" | "carbohydrates" => Ok(Nutrient::Carbs),
            "protein" | "proteins" => Ok(Nutrient::Protein),
            "fat" | "fats" => Ok(Nutrient::Fat),
            "quantity" => Ok(Nutrient::Quantity),
            other => Err(PlanError::InvalidInput(format!("Unknown nutrient: {}", other))),
        }
    }
}

/// On-disk shape of a food: per-serving totals as printed on a label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub serving_size: f64,
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub discrete: bool,
}

fn default_unit() -> String {
    "g".to_string()
}

/// Label values for one serving.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ServingTotals {
    calories: f64,
    carbs: f64,
    protein: f64,
    fat: f64,
}

/// A food item with nutrient densities per unit of its base measurement.
///
/// Densities are derived once from the per-serving totals and never change.
/// The totals themselves are kept so saving writes back exactly what was read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FoodRecord", into = "FoodRecord")]
pub struct Food {
    name: String,
    unit: String,
    serving_size: f64,
    per_serving: ServingTotals,
    calories: f64,
    carbs: f64,
    protein: f64,
    fat: f64,
    discrete: bool,
}

impl Food {
    /// Build a food from per-serving totals.
    ///
    /// Fails with `InvalidServingSize` unless the serving size is finite and positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        serving_size: f64,
        calories: f64,
        carbs: f64,
        protein: f64,
        fat: f64,
        discrete: bool,
    ) -> Result<Self> {
        let name = name.into();
        if !serving_size.is_finite() || serving_size <= 0.0 {
            return Err(PlanError::InvalidServingSize { name, serving_size });
        }

        for (label, value) in [
            ("calories", calories),
            ("carbs", carbs),
            ("protein", protein),
            ("fat", fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidInput(format!(
                    "{} of {} must be finite and non-negative, got {}",
                    label, name, value
                )));
            }
        }

        Ok(Self {
            name,
            unit: unit.into(),
            serving_size,
            per_serving: ServingTotals {
                calories,
                carbs,
                protein,
                fat,
            },
            calories: calories / serving_size,
            carbs: carbs / serving_size,
            protein: protein / serving_size,
            fat: fat / serving_size,
            discrete,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn serving_size(&self) -> f64 {
        self.serving_size
    }

    /// Label value of a nutrient for one serving.
    pub fn per_serving(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.per_serving.calories,
            Nutrient::Carbs => self.per_serving.carbs,
            Nutrient::Protein => self.per_serving.protein,
            Nutrient::Fat => self.per_serving.fat,
            Nutrient::Quantity => self.serving_size,
        }
    }

    /// Whether the planned quantity must be a whole number of units.
    pub fn is_discrete(&self) -> bool {
        self.discrete
    }

    /// Density of a nutrient per unit.
    #[inline]
    pub fn density(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbs => self.carbs,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Quantity => 1.0,
        }
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl TryFrom<FoodRecord> for Food {
    type Error = PlanError;

    fn try_from(record: FoodRecord) -> Result<Self> {
        Food::new(
            record.name,
            record.unit,
            record.serving_size,
            record.calories,
            record.carbs,
            record.protein,
            record.fat,
            record.discrete,
        )
    }
}

impl From<Food> for FoodRecord {
    fn from(food: Food) -> Self {
        let totals = food.per_serving;
        FoodRecord {
            name: food.name,
            unit: food.unit,
            serving_size: food.serving_size,
            calories: totals.calories,
            carbs: totals.carbs,
            protein: totals.protein,
            fat: totals.fat,
            discrete: food.discrete,
        }
    }
}

impl fmt::Display for Food {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>20} cals: {:>5.1}/{:<5} carbs: {:>5.1}/{:<5} protein: {:>5.1}/{:<5} fat: {:>5.1}/{:<5}",
            self.name,
            self.calories,
            self.unit,
            self.carbs,
            self.unit,
            self.protein,
            self.unit,
            self.fat,
            self.unit
        )
    }
}

impl PartialEq for Food {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Food {}

impl std::hash::Hash for Food {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> Food {
        Food::new("Rice", "g", 47.0, 170.0, 37.0, 3.0, 0.0, true).unwrap()
    }

    #[test]
    fn test_densities_divide_by_serving_size() {
        let food = rice();
        assert_eq!(food.density(Nutrient::Calories), 170.0 / 47.0);
        assert_eq!(food.density(Nutrient::Carbs), 37.0 / 47.0);
        assert_eq!(food.density(Nutrient::Protein), 3.0 / 47.0);
        assert_eq!(food.density(Nutrient::Fat), 0.0);
        assert_eq!(food.density(Nutrient::Quantity), 1.0);
    }

    #[test]
    fn test_record_keeps_label_values() {
        let veg = Food::new("Vegetables", "g", 100.0, 28.0, 3.0, 3.0, 0.5, true).unwrap();
        assert_eq!(veg.per_serving(Nutrient::Calories), 28.0);
        assert_eq!(veg.per_serving(Nutrient::Quantity), 100.0);

        let record = FoodRecord::from(rice());
        assert_eq!(record.serving_size, 47.0);
        assert_eq!(record.calories, 170.0);
        assert_eq!(record.carbs, 37.0);
        assert_eq!(record.protein, 3.0);
        assert_eq!(record.fat, 0.0);
    }

    #[test]
    fn test_zero_serving_size_rejected() {
        let err = Food::new("Air", "g", 0.0, 10.0, 0.0, 0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, PlanError::InvalidServingSize { .. }));

        let err = Food::new("Air", "g", -5.0, 10.0, 0.0, 0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, PlanError::InvalidServingSize { .. }));
    }

    #[test]
    fn test_negative_nutrient_rejected() {
        let err = Food::new("Odd", "g", 10.0, -1.0, 0.0, 0.0, 0.0, false).unwrap_err();
        assert!(matches!(err, PlanError::InvalidInput(_)));
    }

    #[test]
    fn test_nutrient_from_str() {
        assert_eq!("cals".parse::<Nutrient>().unwrap(), Nutrient::Calories);
        assert_eq!("Proteins".parse::<Nutrient>().unwrap(), Nutrient::Protein);
        assert_eq!("fats".parse::<Nutrient>().unwrap(), Nutrient::Fat);
        assert!("fiber".parse::<Nutrient>().is_err());
    }

    #[test]
    fn test_deserialize_validates_serving_size() {
        let json = r#"{"name": "Egg", "unit": "egg", "serving_size": 0, "calories": 70}"#;
        assert!(serde_json::from_str::<Food>(json).is_err());

        let json = r#"{"name": "Egg", "unit": "egg", "serving_size": 1, "calories": 70, "protein": 6, "discrete": true}"#;
        let egg: Food = serde_json::from_str(json).unwrap();
        assert!(egg.is_discrete());
        assert_eq!(egg.density(Nutrient::Protein), 6.0);
    }

    #[test]
    fn test_equality_case_insensitive() {
        let a = rice();
        let b = Food::new("RICE", "g", 100.0, 1.0, 1.0, 1.0, 1.0, false).unwrap();
        assert_eq!(a, b);
    }
}
