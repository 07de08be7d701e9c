use crate::error::{PlanError, Result};

/// Per-meal macro targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroTargets {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
}

/// Daily protein and fat from bodyweight and per-pound ratios.
///
/// Returns (protein, fat).
pub fn daily_macros(bodyweight: f64, protein_ratio: f64, fat_ratio: f64) -> (f64, f64) {
    (bodyweight * protein_ratio, bodyweight * fat_ratio)
}

impl MacroTargets {
    /// Split daily targets evenly across `n_meals`.
    ///
    /// Bodyweight is in pounds. A protein ratio of 1 is standard; fat ratios of
    /// 0.3 to 0.5 suit a gaining phase.
    pub fn per_meal(
        bodyweight: f64,
        protein_ratio: f64,
        fat_ratio: f64,
        daily_calories: f64,
        n_meals: u32,
    ) -> Result<Self> {
        if n_meals == 0 {
            return Err(PlanError::InvalidInput(
                "number of meals must be at least 1".to_string(),
            ));
        }
        for (label, value) in [
            ("bodyweight", bodyweight),
            ("protein ratio", protein_ratio),
            ("fat ratio", fat_ratio),
            ("daily calories", daily_calories),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::InvalidInput(format!(
                    "{} must be finite and non-negative, got {}",
                    label, value
                )));
            }
        }

        let (daily_protein, daily_fat) = daily_macros(bodyweight, protein_ratio, fat_ratio);
        let meals = n_meals as f64;

        Ok(Self {
            calories: daily_calories / meals,
            protein: daily_protein / meals,
            fat: daily_fat / meals,
        })
    }
}
