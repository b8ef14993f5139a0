//! Wheel force law
//!
//! Each wheel pushes along the robot's heading, signed by its power.
//! Unequal powers at the two lateral contact points give a net torque;
//! opposite powers cancel linearly and only turn the body.

use glam::Vec2;

use super::motor::MotorBoard;
use super::physics::RigidBody;

/// A force to apply at a world-space point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelForce {
    pub force: Vec2,
    pub point: Vec2,
}

/// Force for one wheel at body-local lateral offset `offset`, or `None` when
/// the wheel is unpowered.
pub fn wheel_force(body: &RigidBody, offset: f32, power: f32, force_scale: f32) -> Option<WheelForce> {
    if power == 0.0 {
        return None;
    }
    let point = body.get_world_point(Vec2::new(0.0, offset));
    let force = Vec2::from_angle(body.angle()) * (power * force_scale);
    Some(WheelForce { force, point })
}

/// Forces for the left (m0, `-half_width`) and right (m1, `+half_width`)
/// wheels driven by `board`.
pub fn drive_forces(
    body: &RigidBody,
    board: &MotorBoard,
    half_width: f32,
    force_scale: f32,
) -> [Option<WheelForce>; 2] {
    [
        wheel_force(body, -half_width, board.m0.power(), force_scale),
        wheel_force(body, half_width, board.m1.power(), force_scale),
    ]
}

/// Push the drive forces into the body's accumulators
pub fn apply_drive(body: &mut RigidBody, board: &MotorBoard, half_width: f32, force_scale: f32) {
    for wheel in drive_forces(body, board, half_width, force_scale).into_iter().flatten() {
        log::trace!("wheel force {:?} at {:?}", wheel.force, wheel.point);
        body.apply_force(wheel.force, wheel.point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{BodyDef, PhysicsWorld, square_vertices};
    use std::f32::consts::FRAC_PI_2;

    fn body_at(angle: f32) -> RigidBody {
        let mut world = PhysicsWorld::new();
        let h = world
            .create_body(BodyDef {
                angle,
                ..Default::default()
            })
            .unwrap();
        world
            .create_polygon_fixture(h, &square_vertices(0.48), 60.0)
            .unwrap();
        world.body(h).unwrap().clone()
    }

    fn board(left: f32, right: f32) -> MotorBoard {
        let mut board = MotorBoard::default();
        board.m0.set_power(left, 100.0);
        board.m1.set_power(right, 100.0);
        board
    }

    #[test]
    fn test_unpowered_wheels_apply_nothing() {
        let body = body_at(0.0);
        assert_eq!(drive_forces(&body, &board(0.0, 0.0), 0.24, 0.4), [None, None]);
    }

    #[test]
    fn test_forces_follow_heading() {
        let body = body_at(FRAC_PI_2);
        let [left, right] = drive_forces(&body, &board(10.0, 10.0), 0.24, 0.4);
        for wheel in [left.unwrap(), right.unwrap()] {
            assert!(wheel.force.x.abs() < 1e-6);
            assert!((wheel.force.y - 4.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_opposite_powers_are_symmetric() {
        let body = body_at(0.0);
        let [left, right] = drive_forces(&body, &board(50.0, -50.0), 0.24, 0.4);
        let (left, right) = (left.unwrap(), right.unwrap());

        assert!((left.force.length() - right.force.length()).abs() < 1e-6);
        assert!((left.force.length() - 20.0).abs() < 1e-5);
        assert_eq!(left.point, Vec2::new(0.0, -0.24));
        assert_eq!(right.point, Vec2::new(0.0, 0.24));
        // Both along the heading axis, pointing opposite ways
        assert_eq!(left.force.y, 0.0);
        assert_eq!(right.force.y, 0.0);
        assert_eq!(left.force, -right.force);
        assert!(left.force.x > 0.0);
    }

    #[test]
    fn test_opposite_powers_only_turn() {
        let mut body = body_at(0.0);
        apply_drive(&mut body, &board(50.0, -50.0), 0.24, 0.4);
        assert!(body.force().length() < 1e-6);
        // m0 at -y pushes forward, m1 at +y pushes back: counter-clockwise
        assert!((body.torque() - 2.0 * 0.24 * 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_unequal_powers_turn_the_body() {
        let mut body = body_at(0.0);
        apply_drive(&mut body, &board(0.0, 50.0), 0.24, 0.4);
        // Right wheel pushes forward at +y: clockwise torque
        assert!(body.torque() < 0.0);
        assert!((body.torque() - (-0.24 * 20.0)).abs() < 1e-5);
    }
}
