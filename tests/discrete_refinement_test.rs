use meal_proportion_rs::models::{Food, Nutrient};
use meal_proportion_rs::planner::{refine, Bounds, LinearSystem, MealSolver};
use meal_proportion_rs::PlanError;

/// Every floor/ceil combination for the discrete dimensions, enumerated independently.
fn brute_force_best(
    system: &LinearSystem,
    bounds: &Bounds,
    x: &[f64],
    discrete: &[usize],
) -> (Vec<f64>, f64) {
    let mut best = (x.to_vec(), f64::INFINITY);
    for mask in 0..(1u32 << discrete.len()) {
        let mut trial = x.to_vec();
        let mut feasible = true;
        for (bit, &i) in discrete.iter().enumerate() {
            let value = if mask & (1 << bit) == 0 {
                x[i].floor()
            } else {
                x[i].ceil()
            };
            let (lo, hi) = bounds.get(i);
            if value < lo || value > hi {
                feasible = false;
            }
            trial[i] = value;
        }
        if !feasible {
            continue;
        }
        let loss = system.loss(&trial);
        if loss < best.1 {
            best = (trial, loss);
        }
    }
    best
}

fn egg_solver(target: f64) -> MealSolver {
    let egg = Food::new("Egg", "egg", 1.0, 70.0, 0.0, 6.0, 5.0, true).unwrap();
    let mut solver = MealSolver::new(vec![egg]).unwrap();
    solver.set_bounds("Egg", 0.0, 5.0).unwrap();
    solver.add_quantity_constraint("Egg", target).unwrap();
    solver
}

#[test]
fn test_single_discrete_food_evaluates_floor_and_ceil() {
    let system = LinearSystem::new(vec![vec![1.0]], vec![2.6]).unwrap();
    let bounds = Bounds::new(vec![0.0], vec![5.0]).unwrap();

    let refined = refine(&system, &bounds, &[2.6], &[0], &["Egg"]).unwrap();
    assert_eq!(refined.evaluated, 2);
    assert_eq!(refined.quantities, vec![3.0]);

    assert_eq!(egg_solver(2.6).solve().unwrap().quantities, vec![3.0]);
    assert_eq!(egg_solver(2.4).solve().unwrap().quantities, vec![2.0]);
}

#[test]
fn test_whole_optimum_is_single_candidate() {
    let system = LinearSystem::new(vec![vec![1.0]], vec![3.0]).unwrap();
    let bounds = Bounds::new(vec![0.0], vec![5.0]).unwrap();

    let refined = refine(&system, &bounds, &[3.0], &[0], &["Egg"]).unwrap();
    assert_eq!(refined.evaluated, 1);
    assert_eq!(refined.quantities, vec![3.0]);
}

#[test]
fn test_matches_brute_force_enumeration() {
    // Three discrete foods and one continuous food, mixed constraints.
    let system = LinearSystem::new(
        vec![
            vec![3.6, 0.9, 0.3, 8.6],
            vec![0.06, 0.21, 0.03, 0.0],
            vec![0.0, 0.005, 0.005, 1.0],
            vec![1.0, -1.0, 0.5, 0.0],
        ],
        vec![550.0, 37.5, 15.0, 2.0],
    )
    .unwrap();
    let bounds = Bounds::new(vec![0.0, 0.0, 80.0, 0.0], vec![500.0, 500.0, 120.0, 50.0]).unwrap();
    let discrete = [0, 1, 2];

    for x in [
        vec![77.4, 137.9, 100.2, 13.88],
        vec![12.5, 0.49, 80.3, 40.0],
        vec![499.7, 3.0, 119.6, 0.0],
    ] {
        let refined = refine(&system, &bounds, &x, &discrete, &["a", "b", "c", "d"]).unwrap();
        let (expected, expected_loss) = brute_force_best(&system, &bounds, &x, &discrete);

        assert!(bounds.contains(&refined.quantities));
        assert!((refined.loss - expected_loss).abs() < 1e-9);
        assert_eq!(refined.quantities, expected);
        assert_eq!(refined.quantities[3], x[3]);
    }
}

#[test]
fn test_refined_quantities_stay_in_bounds() {
    // Lower bound 2.2: floor of 2.5 is excluded, leaving ceil.
    let system = LinearSystem::new(vec![vec![1.0]], vec![2.0]).unwrap();
    let bounds = Bounds::new(vec![2.2], vec![5.0]).unwrap();

    let refined = refine(&system, &bounds, &[2.5], &[0], &["Egg"]).unwrap();
    assert_eq!(refined.quantities, vec![3.0]);
}

#[test]
fn test_no_whole_quantity_in_bounds() {
    let egg = Food::new("Egg", "egg", 1.0, 70.0, 0.0, 6.0, 5.0, true).unwrap();
    let mut solver = MealSolver::new(vec![egg]).unwrap();
    solver.set_bounds("Egg", 2.2, 2.8).unwrap();
    solver.add_total_constraint(Nutrient::Protein, 15.0).unwrap();

    assert!(matches!(
        solver.solve(),
        Err(PlanError::NoDiscreteCandidate(name)) if name == "Egg"
    ));
}
