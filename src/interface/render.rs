use crate::models::{Food, MealPlan, Nutrient};
use crate::planner::targets::MacroTargets;
use crate::planner::timing::{format_clock, MealSchedule, MealTimingRequest};

/// Display the per-meal macro goal.
pub fn display_goal(targets: &MacroTargets) {
    println!("Goal:");
    println!(
        "  cals: {:.0}, protein: {:.0}g, fat: {:.0}g",
        targets.calories, targets.protein, targets.fat
    );
}

/// Display a solved meal with the macros it achieves.
pub fn display_meal(plan: &MealPlan) {
    if plan.is_empty() {
        println!("No meal generated.");
        return;
    }

    println!("Meal:");
    for item in &plan.items {
        println!("   -{:.1}{} of {}", item.quantity, item.unit, item.food_name);
    }

    println!("Macros:");
    println!(
        "cals: {:.1}, carbs: {:.1}g, protein: {:.1}g, fat: {:.1}g",
        plan.total(Nutrient::Calories),
        plan.total(Nutrient::Carbs),
        plan.total(Nutrient::Protein),
        plan.total(Nutrient::Fat)
    );
    println!("Loss: {:.4}", plan.loss);

    if plan.rank_deficiency > 0 {
        println!(
            "!!! WARNING !!! Infinitely many solutions. Add {} linearly independent constraints for a unique one.",
            plan.rank_deficiency
        );
    }
}

/// Display a simple list of foods with their densities.
pub fn display_food_list(foods: &[Food], title: &str) {
    if foods.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} items) ===", title, foods.len());
    println!();

    for food in foods {
        let tag = if food.is_discrete() { " [whole units]" } else { "" };
        println!("  {}{}", food, tag);
    }

    println!();
}

/// Display fitted meal times against the requested anchors.
pub fn display_meal_times(schedule: &MealSchedule, request: &MealTimingRequest) {
    println!("Meal Times:");
    for (i, &time) in schedule.times.iter().enumerate() {
        println!("m{} = {}", i, format_clock(time));
    }
    println!();

    let intervals: Vec<String> = schedule.intervals().into_iter().map(format_clock).collect();
    println!(
        "Meal intervals: [{}], std = {}",
        intervals.join(", "),
        format_clock(schedule.interval_std())
    );

    let pregym = schedule.pregym_meal(request.gym);
    println!("Pregym meal interval:");
    println!(
        "\tDesired = {}, current = {}",
        format_clock(request.delta_gym),
        format_clock(request.gym - schedule.times[pregym])
    );

    if let (Some(&first), Some(&last)) = (schedule.times.first(), schedule.times.last()) {
        println!("Presleep meal interval:");
        println!(
            "\tDesired = {}, current = {}",
            format_clock(request.delta_sleep),
            format_clock(request.sleep - last)
        );

        println!("Postwake meal interval:");
        println!(
            "\tDesired = {}, current = {}",
            format_clock(request.delta_wake),
            format_clock(first - request.wake)
        );
    }
}
