//! End-to-end solver tests over assembled systems.

use pf_solver::{solve, solve_and_commit, Classification, PartitionOutcome, SolverConfig};
use pf_system::{BranchPolicy, ConstraintSystem, Domain, Equation, VarSpec};
use proptest::prelude::*;

fn cfg() -> SolverConfig {
    SolverConfig::default()
}

#[test]
fn chain_propagates_through_shared_variables() {
    // a = 2 known; a + b = 5; b * c = 6
    let mut sys = ConstraintSystem::new();
    let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
    let b = sys.declare("b", VarSpec::unknown()).unwrap();
    let c = sys.declare("c", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new("sum", pf_expr::Expr::var(a) + pf_expr::Expr::var(b), 5.0.into()))
        .unwrap();
    sys.add_equation(Equation::new(
        "product",
        pf_expr::Expr::var(b) * pf_expr::Expr::var(c),
        6.0.into(),
    ))
    .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Solved);
    assert_eq!(outcome.value("b"), Some(3.0));
    assert_eq!(outcome.value("c"), Some(2.0));
}

#[test]
fn underdetermined_names_every_free_variable() {
    // One equation, two unknowns
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    let y = sys.declare("y", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new(
        "sum",
        pf_expr::Expr::var(x) + pf_expr::Expr::var(y),
        3.0.into(),
    ))
    .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Underdetermined);
    let free = outcome.free_variables();
    assert!(free.contains(&"x") && free.contains(&"y"), "got {free:?}");
}

#[test]
fn infeasible_names_both_equations() {
    // x is pinned to 3 by one equation and to 4 by another
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new("pin_three", pf_expr::Expr::var(x), 3.0.into()))
        .unwrap();
    sys.add_equation(Equation::new("pin_four", pf_expr::Expr::var(x), 4.0.into()))
        .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Infeasible);
    let conflicting = outcome.conflicting_equations();
    assert!(
        conflicting.contains(&"pin_three") && conflicting.contains(&"pin_four"),
        "got {conflicting:?}"
    );
}

#[test]
fn partitions_fail_independently() {
    // Cluster {x} solves; cluster {y, z} is underdetermined
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    let y = sys.declare("y", VarSpec::unknown()).unwrap();
    let z = sys.declare("z", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new("fix_x", pf_expr::Expr::var(x) * 2.0, 8.0.into()))
        .unwrap();
    sys.add_equation(Equation::new(
        "couple_yz",
        pf_expr::Expr::var(y) + pf_expr::Expr::var(z),
        1.0.into(),
    ))
    .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::PartiallySolved);
    assert_eq!(outcome.value("x"), Some(4.0));
    assert_eq!(outcome.value("y"), None);
    assert_eq!(outcome.partitions.len(), 2);
}

#[test]
fn multi_root_without_policy_is_ambiguous() {
    // (x - 1)(x - 3) = 0 with both roots positive
    let mut sys = ConstraintSystem::new();
    let x = sys
        .declare("x", VarSpec::unknown().in_domain(Domain::Positive))
        .unwrap();
    let e = pf_expr::Expr::var(x).pow(2.0) - 4.0 * pf_expr::Expr::var(x) + 3.0;
    sys.add_equation(Equation::new("quadratic", e, 0.0.into()))
        .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Ambiguous);
    match &outcome.partitions[0].outcome {
        PartitionOutcome::Ambiguous { variable, candidates } => {
            assert_eq!(variable, "x");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected ambiguous, got {other:?}"),
    }
}

#[test]
fn branch_policy_resolves_multi_root() {
    for (policy, expected) in [
        (BranchPolicy::PreferSmallest, 1.0),
        (BranchPolicy::PreferLargest, 3.0),
    ] {
        let mut sys = ConstraintSystem::new();
        let x = sys
            .declare(
                "x",
                VarSpec::unknown()
                    .in_domain(Domain::Positive)
                    .with_branch(policy),
            )
            .unwrap();
        let e = pf_expr::Expr::var(x).pow(2.0) - 4.0 * pf_expr::Expr::var(x) + 3.0;
        sys.add_equation(Equation::new("quadratic", e, 0.0.into()))
            .unwrap();

        let outcome = solve(&sys, &cfg()).unwrap();
        assert_eq!(outcome.classification, Classification::Solved);
        let got = outcome.value("x").unwrap();
        assert!((got - expected).abs() < 1e-9, "policy {policy:?}: got {got}");
    }
}

#[test]
fn coupled_linear_pair_solves_through_newton() {
    // Both equations carry both unknowns, so propagation stalls and the
    // Newton fallback closes the cluster.
    let mut sys = ConstraintSystem::new();
    let f = sys
        .declare("fuel", VarSpec::unknown().in_domain(Domain::Positive))
        .unwrap();
    let o = sys
        .declare("oxidizer", VarSpec::unknown().in_domain(Domain::Positive))
        .unwrap();
    sys.add_equation(Equation::new(
        "mass_balance",
        pf_expr::Expr::var(f) + pf_expr::Expr::var(o),
        8.4.into(),
    ))
    .unwrap();
    sys.add_equation(Equation::new(
        "mixture_ratio",
        pf_expr::Expr::var(o),
        pf_expr::Expr::var(f) * 6.0,
    ))
    .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Solved);
    assert!((outcome.value("fuel").unwrap() - 1.2).abs() < 1e-6);
    assert!((outcome.value("oxidizer").unwrap() - 7.2).abs() < 1e-6);
}

#[test]
fn redundant_consistent_equation_is_tolerated() {
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new("double", pf_expr::Expr::var(x) * 2.0, 4.0.into()))
        .unwrap();
    sys.add_equation(Equation::new("offset", pf_expr::Expr::var(x) + 1.0, 3.0.into()))
        .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Solved);
    assert_eq!(outcome.value("x"), Some(2.0));
}

#[test]
fn joined_clusters_match_separate_solves() {
    // Assembling two disjoint clusters into one system must give the
    // same values as solving each cluster in a system of its own.
    fn linear_cluster(sys: &mut ConstraintSystem) {
        let x = sys.declare("x", VarSpec::unknown()).unwrap();
        let y = sys.declare("y", VarSpec::unknown()).unwrap();
        sys.add_equation(Equation::new(
            "row_one",
            2.0 * pf_expr::Expr::var(x) + pf_expr::Expr::var(y),
            7.0.into(),
        ))
        .unwrap();
        sys.add_equation(Equation::new(
            "row_two",
            pf_expr::Expr::var(x) - pf_expr::Expr::var(y),
            2.0.into(),
        ))
        .unwrap();
    }
    fn square_cluster(sys: &mut ConstraintSystem) {
        let z = sys
            .declare("z", VarSpec::unknown().in_domain(Domain::Positive))
            .unwrap();
        sys.add_equation(Equation::new(
            "square",
            pf_expr::Expr::var(z).pow(2.0),
            9.0.into(),
        ))
        .unwrap();
    }

    let mut joined = ConstraintSystem::new();
    linear_cluster(&mut joined);
    square_cluster(&mut joined);
    let all_at_once = solve(&joined, &cfg()).unwrap();
    assert_eq!(all_at_once.classification, Classification::Solved);
    assert_eq!(all_at_once.partitions.len(), 2);

    let mut first = ConstraintSystem::new();
    linear_cluster(&mut first);
    let mut second = ConstraintSystem::new();
    square_cluster(&mut second);
    let first_alone = solve(&first, &cfg()).unwrap();
    let second_alone = solve(&second, &cfg()).unwrap();

    for name in ["x", "y"] {
        assert_eq!(all_at_once.value(name), first_alone.value(name));
    }
    assert_eq!(all_at_once.value("z"), second_alone.value("z"));
}

#[test]
fn duplicated_equation_carries_no_extra_information() {
    // The same equation contributed twice must not count as a second
    // independent relation for two unknowns.
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    let y = sys.declare("y", VarSpec::unknown()).unwrap();
    for _ in 0..2 {
        sys.add_equation(Equation::new(
            "sum",
            pf_expr::Expr::var(x) + pf_expr::Expr::var(y),
            3.0.into(),
        ))
        .unwrap();
    }

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Underdetermined);
    let free = outcome.free_variables();
    assert!(free.contains(&"x") && free.contains(&"y"), "got {free:?}");
}

#[test]
fn parallel_contradictory_pair_lists_each_label_once() {
    // Same left side pinned to two different totals: a genuinely
    // contradictory cluster, each equation named exactly once.
    let mut sys = ConstraintSystem::new();
    let x = sys.declare("x", VarSpec::unknown()).unwrap();
    let y = sys.declare("y", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new(
        "total_three",
        pf_expr::Expr::var(x) + pf_expr::Expr::var(y),
        3.0.into(),
    ))
    .unwrap();
    sys.add_equation(Equation::new(
        "total_four",
        pf_expr::Expr::var(x) + pf_expr::Expr::var(y),
        4.0.into(),
    ))
    .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Infeasible);
    match &outcome.partitions[0].outcome {
        PartitionOutcome::Infeasible { equations, .. } => {
            let mut sorted = equations.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), equations.len(), "got {equations:?}");
        }
        other => panic!("expected infeasible, got {other:?}"),
    }
}

#[test]
fn domain_violating_root_is_infeasible() {
    // x + 5 = 0 forces x = -5, but x must be positive
    let mut sys = ConstraintSystem::new();
    let x = sys
        .declare("x", VarSpec::unknown().in_domain(Domain::Positive))
        .unwrap();
    sys.add_equation(Equation::new("negative_pin", pf_expr::Expr::var(x) + 5.0, 0.0.into()))
        .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Infeasible);
    assert_eq!(outcome.conflicting_equations(), vec!["negative_pin"]);
}

#[test]
fn solve_and_commit_writes_values_back() {
    let mut sys = ConstraintSystem::new();
    let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
    let b = sys.declare("b", VarSpec::unknown()).unwrap();
    sys.add_equation(Equation::new(
        "sum",
        pf_expr::Expr::var(a) + pf_expr::Expr::var(b),
        5.0.into(),
    ))
    .unwrap();

    let outcome = solve_and_commit(&mut sys, &cfg()).unwrap();
    assert!(outcome.is_solved());
    assert_eq!(sys.registry().value("b"), Some(3.0));
}

#[test]
fn fully_known_consistent_system_is_solved() {
    let mut sys = ConstraintSystem::new();
    let a = sys.declare("a", VarSpec::known(2.0)).unwrap();
    sys.add_equation(Equation::new("identity", pf_expr::Expr::var(a) * 2.0, 4.0.into()))
        .unwrap();

    let outcome = solve(&sys, &cfg()).unwrap();
    assert_eq!(outcome.classification, Classification::Solved);
    assert!(outcome.partitions.is_empty());
}

proptest! {
    #[test]
    fn random_well_conditioned_linear_pairs_solve(
        a in -10.0..10.0f64,
        b in -10.0..10.0f64,
        c in -10.0..10.0f64,
        d in -10.0..10.0f64,
        x_true in -5.0..5.0f64,
        y_true in -5.0..5.0f64,
    ) {
        prop_assume!((a * d - b * c).abs() > 0.5);

        let e = a * x_true + b * y_true;
        let f = c * x_true + d * y_true;

        let mut sys = ConstraintSystem::new();
        let x = sys.declare("x", VarSpec::unknown()).unwrap();
        let y = sys.declare("y", VarSpec::unknown()).unwrap();
        sys.add_equation(Equation::new(
            "row_one",
            a * pf_expr::Expr::var(x) + b * pf_expr::Expr::var(y),
            e.into(),
        ))
        .unwrap();
        sys.add_equation(Equation::new(
            "row_two",
            c * pf_expr::Expr::var(x) + d * pf_expr::Expr::var(y),
            f.into(),
        ))
        .unwrap();

        let outcome = solve(&sys, &cfg()).unwrap();
        prop_assert_eq!(outcome.classification, Classification::Solved);
        let xs = outcome.value("x").unwrap();
        let ys = outcome.value("y").unwrap();
        prop_assert!((a * xs + b * ys - e).abs() < 1e-6);
        prop_assert!((c * xs + d * ys - f).abs() < 1e-6);
    }
}
