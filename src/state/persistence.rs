use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{Food, MealPlan};

/// Load foods from a JSON file.
///
/// File order is kept since solver indices follow it. Every record goes
/// through the validated `Food` constructor.
pub fn load_foods<P: AsRef<Path>>(path: P) -> Result<Vec<Food>> {
    let content = fs::read_to_string(path)?;
    let foods: Vec<Food> = serde_json::from_str(&content)?;
    Ok(foods)
}

/// Save foods to a JSON file as per-serving records.
pub fn save_foods<P: AsRef<Path>>(path: P, foods: &[Food]) -> Result<()> {
    let json = serde_json::to_string_pretty(foods)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write a solved meal to CSV, one row per food.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plan: &MealPlan) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for item in &plan.items {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Nutrient, Solution};
    use crate::state::FoodCatalog;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_and_save_roundtrip() {
        let json = r#"[
            {"name": "Rice", "unit": "g", "serving_size": 47, "calories": 170, "carbs": 37, "protein": 3, "fat": 0, "discrete": true},
            {"name": "Canola oil", "serving_size": 14, "calories": 120, "fat": 14}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let foods = load_foods(file.path()).unwrap();
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].name(), "Rice");
        assert_eq!(foods[1].unit(), "g");
        assert!(!foods[1].is_discrete());

        let out_file = NamedTempFile::new().unwrap();
        save_foods(out_file.path(), &foods).unwrap();

        let reloaded = load_foods(out_file.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].name(), "Rice");
        assert_eq!(reloaded[0].density(Nutrient::Calories), 170.0 / 47.0);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out_file.path()).unwrap()).unwrap();
        assert_eq!(written[0]["calories"], 170.0);
        assert_eq!(written[0]["carbs"], 37.0);
        assert_eq!(written[0]["protein"], 3.0);
        assert_eq!(written[1]["fat"], 14.0);
    }

    #[test]
    fn test_save_writes_label_values_exactly() {
        let foods = FoodCatalog::starter().unwrap().into_foods();
        let out = NamedTempFile::new().unwrap();
        save_foods(out.path(), &foods).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.path()).unwrap()).unwrap();
        assert_eq!(written[0]["protein"], 3.0);
        assert_eq!(written[1]["calories"], 28.0);
        assert_eq!(written[2]["protein"], 24.0);
        assert_eq!(written[3]["fat"], 14.0);
    }

    #[test]
    fn test_load_rejects_zero_serving() {
        let json = r#"[{"name": "Bad", "serving_size": 0, "calories": 10}]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(load_foods(file.path()).is_err());
    }

    #[test]
    fn test_duplicate_rows_rejected_on_load() {
        let json = r#"[
            {"name": "Rice", "serving_size": 47, "calories": 170},
            {"name": "rice", "serving_size": 100, "calories": 130}
        ]"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let foods = load_foods(file.path()).unwrap();
        assert_eq!(foods.len(), 2);
        assert!(matches!(
            FoodCatalog::new(foods),
            Err(crate::error::PlanError::DuplicateFood(name)) if name == "rice"
        ));
    }

    #[test]
    fn test_write_plan_csv() {
        let foods = vec![Food::new("Egg", "egg", 1.0, 70.0, 0.0, 6.0, 5.0, true).unwrap()];
        let plan = Solution {
            quantities: vec![2.0],
            loss: 0.0,
            rank_deficiency: 0,
            iterations: 1,
        }
        .to_plan(&foods);

        let out = NamedTempFile::new().unwrap();
        write_plan_csv(out.path(), &plan).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("food_name,unit,quantity,calories,carbs,protein,fat")
        );
        assert_eq!(lines.next(), Some("Egg,egg,2.0,140.0,0.0,12.0,10.0"));
    }
}
