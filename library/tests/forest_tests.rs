//! Forest properties: counts, root placement, parent/child relations and the
//! branch angle convention.

use std::f64::consts::PI;

use branching_tree::evaluation::ForestBuilder;
use branching_tree::model::forest::expected_count;
use branching_tree::model::AngleUnit;
use branching_tree::{build_forest, generate_children, BranchParameters, Line, Point3};

const EPS: f64 = 1e-9;

fn assert_close(a: Point3, b: Point3) {
    assert!(a.distance_to(b) < EPS, "{:?} != {:?}", a, b);
}

#[test]
fn test_segment_count_is_two_to_the_n_plus_one_minus_one() {
    for n in 0..12 {
        let forest = build_forest(3.0, 45.0, 0.5, n);
        assert_eq!(forest.count(), (1usize << (n + 1)) - 1);
        assert_eq!(forest.count(), expected_count(n as usize));
    }
}

#[test]
fn test_zero_iterations_yield_the_trunk() {
    let forest = build_forest(7.5, 30.0, 0.7, 0);
    assert_eq!(
        forest.segments(),
        &[Line::new(Point3::ORIGIN, Point3::new(0.0, 7.5, 0.0))]
    );
}

#[test]
fn test_negative_iterations_yield_the_trunk() {
    let forest = build_forest(10.0, 30.0, 0.7, -1);
    assert_eq!(forest.count(), 1);
    assert_eq!(forest.segments()[0].to, Point3::new(0.0, 10.0, 0.0));
}

#[test]
fn test_identical_inputs_give_identical_forests() {
    let a = build_forest(10.0, 30.0, 0.7, 6);
    let b = build_forest(10.0, 30.0, 0.7, 6);
    assert_eq!(a, b);
}

#[test]
fn test_children_start_at_parent_end_with_scaled_length() {
    let scale = 0.7;
    let forest = build_forest(10.0, 30.0, scale, 5);
    for k in 1..forest.generations() {
        let parents = forest.generation(k - 1).unwrap();
        let children = forest.generation(k).unwrap();
        assert_eq!(children.len(), parents.len() * 2);
        for (i, child) in children.iter().enumerate() {
            let parent = parents[i / 2];
            assert_eq!(child.from, parent.to);
            assert!((child.length() - parent.length() * scale).abs() < EPS);
        }
    }
}

#[test]
fn test_ten_thirty_point_seven_two() {
    let forest = build_forest(10.0, 30.0, 0.7, 2);
    assert_eq!(forest.count(), 7);

    let first = forest.generation(1).unwrap();
    assert_eq!(first.len(), 2);
    for line in first {
        assert_eq!(line.from, Point3::new(0.0, 10.0, 0.0));
    }

    // 30 input units at π/100 each.
    let angle = 0.3 * PI;
    assert_close(first[0].to, Point3::new(-7.0 * angle.sin(), 10.0 + 7.0 * angle.cos(), 0.0));
    assert_close(first[1].to, Point3::new(7.0 * angle.sin(), 10.0 + 7.0 * angle.cos(), 0.0));

    let second = forest.generation(2).unwrap();
    assert_eq!(second.len(), 4);
    for line in second {
        assert!(line.from == first[0].to || line.from == first[1].to);
    }
    assert_eq!(second[0].from, first[0].to);
    assert_eq!(second[3].from, first[1].to);
}

#[test]
fn test_hundred_units_turn_a_half_circle() {
    let forest = build_forest(10.0, 100.0, 0.5, 1);
    // Both children fold straight back down onto the trunk.
    for child in forest.generation(1).unwrap() {
        assert_close(child.to, Point3::new(0.0, 5.0, 0.0));
    }

    let params = BranchParameters::new(10.0, 100.0, 0.5, 1);
    assert_eq!(params.angle_radians(AngleUnit::Legacy), (PI / 100.0) * 100.0);
    assert!((params.angle_radians(AngleUnit::Legacy) - PI).abs() < 1e-15);
}

#[test]
fn test_degrees_unit_is_opt_in() {
    let params = BranchParameters::new(10.0, 180.0, 0.5, 1);
    let legacy = ForestBuilder::default().build(&params);
    let degrees = ForestBuilder::default().with_angle_unit(AngleUnit::Degrees).build(&params);

    assert_eq!(legacy, build_forest(10.0, 180.0, 0.5, 1));
    assert_close(degrees.segments()[1].to, Point3::new(0.0, 5.0, 0.0));
    assert!(legacy.segments()[1].to.distance_to(Point3::new(0.0, 5.0, 0.0)) > 1.0);
}

#[test]
fn test_generate_children_over_a_whole_generation() {
    let forest = build_forest(4.0, 20.0, 0.8, 3);
    let next = generate_children(
        forest.last_generation().unwrap(),
        0.8,
        AngleUnit::Legacy.to_radians(20.0),
    );
    assert_eq!(next, build_forest(4.0, 20.0, 0.8, 4).last_generation().unwrap());
}

#[test]
fn test_parallel_threshold_does_not_change_result() {
    let params = BranchParameters::new(5.0, 12.5, 0.9, 10);
    let sequential = ForestBuilder::default().with_parallel_threshold(usize::MAX).build(&params);
    let parallel = ForestBuilder::default().with_parallel_threshold(1).build(&params);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_degenerate_inputs_are_accepted() {
    let zero = build_forest(0.0, 30.0, 0.7, 3);
    assert_eq!(zero.count(), 15);
    assert!(zero.segments().iter().all(|line| line.length() == 0.0));

    let flipped = build_forest(10.0, 0.0, -1.0, 1);
    assert_close(flipped.segments()[1].to, Point3::new(0.0, 0.0, 0.0));
}
