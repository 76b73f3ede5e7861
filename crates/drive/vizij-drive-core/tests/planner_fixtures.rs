use serde::Deserialize;
use vizij_drive_core::{BezierCurve, PathPlanner, Point, Pose};
use vizij_test_fixtures::plans;

#[derive(Debug, Deserialize)]
struct PlanCase {
    pose: Pose,
    target: Point,
    exit_distance: f64,
    control_scale: f64,
    expected: BezierCurve,
}

fn approx_point(name: &str, label: &str, got: Point, want: Point) {
    let eps = 1e-9 * (1.0 + want.x.abs().max(want.y.abs()));
    assert!(
        (got.x - want.x).abs() <= eps && (got.y - want.y).abs() <= eps,
        "{name}: {label} left={got:?} right={want:?}"
    );
}

/// it should reproduce every recorded plan
#[test]
fn plans_match_fixtures() {
    let names = plans::keys();
    assert!(!names.is_empty());
    for name in names {
        let case: PlanCase = plans::load(&name).expect("load plan fixture");
        let planner = PathPlanner::new(case.exit_distance, case.control_scale);
        let curve = planner.plan(case.pose, case.target);
        approx_point(&name, "p0", curve.p0, case.expected.p0);
        approx_point(&name, "p1", curve.p1, case.expected.p1);
        approx_point(&name, "p2", curve.p2, case.expected.p2);
        approx_point(&name, "p3", curve.p3, case.expected.p3);
    }
}

/// it should start on the vehicle, leave along its heading and end on the target
#[test]
fn endpoints_and_exit_leg_hold_for_a_sweep_of_inputs() {
    let planner = PathPlanner::default();
    for h in 0..16 {
        let heading = -3.0 + h as f64 * 0.4;
        let pose = Pose::new(320.0, 480.0, heading);
        for k in 0..24 {
            let angle = k as f64 * std::f64::consts::TAU / 24.0;
            let target = pose.position() + Point::unit(angle) * (50.0 + 10.0 * k as f64);
            let curve = planner.plan(pose, target);

            assert_eq!(curve.p0, pose.position());
            assert_eq!(curve.p3, target);
            let exit = curve.p1 - curve.p0;
            assert!((exit.length() - 200.0).abs() < 1e-9);
            assert!(exit.x * heading.cos() - exit.y * heading.sin() > 0.0);
            // approach point sits at most 5 units per degree of a half turn away
            assert!(curve.p0.distance(curve.p2) <= 5.0 * 180.0 + 1e-9);
        }
    }
}

/// it should place the approach point on the side of the shorter turn
#[test]
fn approach_point_sits_on_the_turning_side() {
    let planner = PathPlanner::default();
    let pose = Pose::new(0.0, 0.0, 0.0);

    let left = planner.plan(pose, Point::new(200.0, -150.0));
    assert!(left.p2.y < 0.0, "target above bends upward: {:?}", left.p2);

    let right = planner.plan(pose, Point::new(200.0, 150.0));
    assert!(right.p2.y > 0.0, "target below bends downward: {:?}", right.p2);
}
