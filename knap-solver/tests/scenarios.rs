use knap_solver::{
    DistributedSolver, Item, ItemSet, Knapsack, KnapsackError, Mode, SharedMemorySolver, Solver,
    SolverConfig,
};

fn solvers() -> Vec<Solver> {
    vec![
        Solver::Sequential,
        Solver::SharedMemory(SharedMemorySolver::new(Some(3), 2).unwrap()),
        Solver::Distributed(DistributedSolver::new(3, 1, 2).unwrap()),
        Solver::Distributed(DistributedSolver::new(2, 3, 4).unwrap()),
    ]
}

fn items(pairs: &[(u64, u64)]) -> ItemSet {
    ItemSet::try_from_items(pairs.iter().copied()).unwrap()
}

fn pack_with(solver: &Solver, pairs: &[(u64, u64)], capacity: u64) -> (u64, Vec<Item>) {
    let items = items(pairs);
    let mut knapsack = Knapsack::new(capacity);
    let value = solver.pack(&mut knapsack, &items).unwrap();
    assert_eq!(knapsack.value(), value, "{:?}", solver.mode());
    assert!(knapsack.weight() <= capacity, "{:?}", solver.mode());
    (value, knapsack.selected.iter().copied().collect())
}

#[test]
fn test_scenario_a() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(2, 3), (3, 4), (4, 5), (5, 6)], 5);
        assert_eq!(value, 7, "{:?}", solver.mode());
        assert_eq!(selected, vec![Item::new(2, 3), Item::new(3, 4)]);
    }
}

#[test]
fn test_scenario_b_prefers_first_of_equal_items() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(1, 1), (1, 1)], 1);
        assert_eq!(value, 1);
        assert_eq!(selected, vec![Item::new(1, 1)]);
    }
}

#[test]
fn test_tie_break_excludes_later_item() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(1, 3), (2, 3)], 2);
        assert_eq!(value, 3);
        assert_eq!(selected, vec![Item::new(1, 3)], "{:?}", solver.mode());
    }
}

#[test]
fn test_scenario_c_item_too_heavy() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(10, 100)], 5);
        assert_eq!(value, 0);
        assert!(selected.is_empty());
    }
}

#[test]
fn test_empty_item_set() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[], 10);
        assert_eq!(value, 0);
        assert!(selected.is_empty());
    }
}

#[test]
fn test_zero_capacity() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(1, 10), (2, 20), (3, 30)], 0);
        assert_eq!(value, 0);
        assert!(selected.is_empty());
    }
}

#[test]
fn test_zero_capacity_takes_zero_weight_items() {
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(1, 10), (0, 5), (2, 20), (0, 7)], 0);
        assert_eq!(value, 12);
        assert_eq!(selected, vec![Item::new(0, 5), Item::new(0, 7)]);
    }
}

#[test]
fn test_items_heavier_than_every_column() {
    // Every item but the last outweighs the whole capacity.
    for solver in solvers() {
        let (value, selected) = pack_with(&solver, &[(9, 50), (7, 40), (8, 30), (2, 1)], 3);
        assert_eq!(value, 1);
        assert_eq!(selected, vec![Item::new(2, 1)]);
    }
}

#[test]
fn test_selected_appends_to_existing_contents() {
    let items = items(&[(2, 3), (3, 4)]);
    let mut knapsack = Knapsack::new(5);
    knapsack.selected.push(Item::new(9, 9)).unwrap();
    Solver::Sequential.pack(&mut knapsack, &items).unwrap();
    assert_eq!(
        knapsack.selected.as_slice(),
        &[Item::new(9, 9), Item::new(2, 3), Item::new(3, 4)]
    );
}

#[test]
fn test_solver_from_config() {
    for mode in [Mode::Sequential, Mode::SharedMemory, Mode::Distributed] {
        let solver = Solver::from_config(&SolverConfig::with_mode(mode)).unwrap();
        assert_eq!(solver.mode(), mode);
        let (value, _) = pack_with(&solver, &[(2, 3), (3, 4), (4, 5), (5, 6)], 5);
        assert_eq!(value, 7);
    }
}

#[test]
fn test_unallocatable_table_is_resource_error() {
    let cases = [
        (items(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]), 1u64 << 60),
        (ItemSet::new(), u64::MAX - 1),
    ];
    let mut all = solvers();
    for workers in [1, 2, 8] {
        all.push(Solver::Distributed(
            DistributedSolver::new(workers, 1, 1 << 20).unwrap(),
        ));
    }
    for (items, capacity) in &cases {
        for solver in &all {
            let mut knapsack = Knapsack::new(*capacity);
            let result = solver.pack(&mut knapsack, items);
            assert!(
                matches!(result, Err(KnapsackError::Resource { .. })),
                "{:?} with {} items: {:?}",
                solver.mode(),
                items.len(),
                result
            );
            assert!(knapsack.selected.is_empty());
        }
    }
}
