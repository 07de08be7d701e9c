//! Meal timing: spread meals evenly through the waking day while landing
//! near the preferred post-wake, pre-gym and pre-sleep times.
//!
//! Times are decimal hours (17.5 = 17:30). The same bounded least-squares fit
//! as the meal solver balances the equal-interval rows against the anchor rows.

use crate::error::{PlanError, Result};
use crate::planner::constants::MIN_TIMED_MEALS;
use crate::planner::constraints::LinearSystem;
use crate::planner::least_squares::{self, Bounds, LeastSquaresOptions};

/// Daily schedule the meal times are fitted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MealTimingRequest {
    pub wake: f64,
    /// Time after waking for the first meal.
    pub delta_wake: f64,
    pub gym: f64,
    /// Time before the gym for the pre-gym meal.
    pub delta_gym: f64,
    pub sleep: f64,
    /// Time before sleep for the last meal.
    pub delta_sleep: f64,
    pub n_meals: usize,
}

impl MealTimingRequest {
    fn validate(&self) -> Result<()> {
        if self.n_meals < MIN_TIMED_MEALS {
            return Err(PlanError::InvalidInput(format!(
                "at least {} meals are needed to balance intervals, got {}",
                MIN_TIMED_MEALS, self.n_meals
            )));
        }
        let values = [
            self.wake,
            self.delta_wake,
            self.gym,
            self.delta_gym,
            self.sleep,
            self.delta_sleep,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PlanError::InvalidInput(
                "times must be finite and non-negative".to_string(),
            ));
        }
        if self.wake + self.delta_wake > self.sleep {
            return Err(PlanError::InvalidInput(
                "first meal would fall after sleep time".to_string(),
            ));
        }
        Ok(())
    }

    /// Estimated index of the meal eaten before the gym.
    pub fn pregym_meal(&self) -> usize {
        let span = (self.sleep - self.delta_sleep - self.wake - self.delta_sleep) / self.n_meals as f64;
        let estimate = (self.gym - self.delta_gym - self.wake - self.delta_sleep) / span;
        if !estimate.is_finite() || estimate < 0.0 {
            return 0;
        }
        (estimate as usize).min(self.n_meals - 1)
    }

    fn linear_system(&self) -> Result<LinearSystem> {
        let n = self.n_meals;
        let mut a = Vec::with_capacity(n + 1);
        let mut b = Vec::with_capacity(n + 1);

        // Equal consecutive intervals: -m[i] + 2 m[i+1] - m[i+2] = 0.
        for i in 0..n - 2 {
            let mut row = vec![0.0; n];
            row[i] = -1.0;
            row[i + 1] = 2.0;
            row[i + 2] = -1.0;
            a.push(row);
            b.push(0.0);
        }

        let anchors = [
            (0, self.wake + self.delta_wake),
            (self.pregym_meal(), self.gym - self.delta_gym),
            (n - 1, self.sleep - self.delta_sleep),
        ];
        for (meal, time) in anchors {
            let mut row = vec![0.0; n];
            row[meal] = 1.0;
            a.push(row);
            b.push(time);
        }

        LinearSystem::new(a, b)
    }

    fn bounds(&self) -> Result<Bounds> {
        let mut lower = vec![self.wake; self.n_meals];
        lower[0] += self.delta_wake;
        let upper = vec![self.sleep; self.n_meals];
        Bounds::new(lower, upper)
    }
}

/// Fitted meal times in decimal hours.
#[derive(Debug, Clone, PartialEq)]
pub struct MealSchedule {
    pub times: Vec<f64>,
}

impl MealSchedule {
    /// Gaps between consecutive meals.
    pub fn intervals(&self) -> Vec<f64> {
        self.times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Population standard deviation of the intervals.
    pub fn interval_std(&self) -> f64 {
        let intervals = self.intervals();
        if intervals.is_empty() {
            return 0.0;
        }
        let n = intervals.len() as f64;
        let mean = intervals.iter().sum::<f64>() / n;
        (intervals.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt()
    }

    /// Index of the last meal before `gym`.
    pub fn pregym_meal(&self, gym: f64) -> usize {
        match self.times.iter().position(|&t| t > gym) {
            Some(0) | None => self.times.len().saturating_sub(1),
            Some(i) => i - 1,
        }
    }
}

/// Fit meal times to the request.
pub fn calc_meal_times(request: &MealTimingRequest) -> Result<MealSchedule> {
    request.validate()?;
    let system = request.linear_system()?;
    let bounds = request.bounds()?;
    let fit = least_squares::least_squares(
        &system,
        &bounds,
        &bounds.midpoint(),
        &LeastSquaresOptions::default(),
    )?;
    Ok(MealSchedule { times: fit.x })
}

/// Format decimal hours as `HH:MMh`, or `MMm` under one hour.
pub fn format_clock(hours: f64) -> String {
    let whole = hours.trunc() as i64;
    let minutes = (60.0 * (hours - hours.trunc())) as i64;
    if whole == 0 {
        format!("{:02}m", minutes)
    } else {
        format!("{:02}:{:02}h", whole, minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MealTimingRequest {
        MealTimingRequest {
            wake: 8.0,
            delta_wake: 1.0 / 6.0,
            gym: 17.5,
            delta_gym: 2.0,
            sleep: 23.0,
            delta_sleep: 3.0,
            n_meals: 4,
        }
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(17.5), "17:30h");
        assert_eq!(format_clock(0.25), "15m");
        assert_eq!(format_clock(8.0), "08:00h");
    }

    #[test]
    fn test_pregym_estimate() {
        assert_eq!(request().pregym_meal(), 2);
    }

    #[test]
    fn test_rejects_too_few_meals() {
        let req = MealTimingRequest {
            n_meals: 2,
            ..request()
        };
        assert!(matches!(
            calc_meal_times(&req),
            Err(PlanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_schedule_within_waking_day() {
        let req = request();
        let schedule = calc_meal_times(&req).unwrap();

        assert_eq!(schedule.times.len(), 4);
        assert!(schedule.times[0] >= req.wake + req.delta_wake - 1e-9);
        assert!(schedule.times.iter().all(|&t| t <= req.sleep + 1e-9));
        assert!(schedule.intervals().iter().all(|&d| d > 0.0));
    }

    #[test]
    fn test_schedule_helpers() {
        let schedule = MealSchedule {
            times: vec![8.0, 11.0, 14.0, 17.0],
        };
        assert_eq!(schedule.intervals(), vec![3.0, 3.0, 3.0]);
        assert!(schedule.interval_std().abs() < 1e-12);
        assert_eq!(schedule.pregym_meal(15.0), 2);
        assert_eq!(schedule.pregym_meal(20.0), 3);
    }
}
