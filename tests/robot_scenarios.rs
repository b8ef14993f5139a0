//! End-to-end scenarios: a robot, tokens and the stepping loop together

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use arena_sim::sim::{
    Arena, ArenaObject, Channel, MarkerInfo, MarkerType, MotorBoard, Robot, Simulator, StaticMarker,
    Token,
};
use arena_sim::{SimError, SimSettings};
use glam::Vec2;
use parking_lot::Mutex;

fn token(arena: &Arc<Arena>, offset: u32, at: Vec2) -> Arc<Token> {
    Token::spawn(arena, MarkerInfo::new(MarkerType::TokenB, offset), at).unwrap()
}

#[test]
fn robot_sees_marker_straight_ahead() {
    let arena = Arena::new(SimSettings::default());
    let robot = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    token(&arena, 0, Vec2::new(1.0, 0.0));

    let markers = robot.see((800, 600));
    assert_eq!(markers.len(), 1);
    assert!((markers[0].centre.polar.length - 1.0).abs() < 1e-6);
    assert!(markers[0].centre.polar.rot_y.abs() < 1e-6);
}

#[test]
fn robot_does_not_see_marker_to_the_side() {
    let arena = Arena::new(SimSettings::default());
    let robot = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    token(&arena, 0, Vec2::new(0.0, 1.0));
    assert!(robot.see((800, 600)).is_empty());
}

/// A marked object with motors, e.g. a robot carrying its own marker
#[derive(Debug)]
struct MarkedRover {
    location: Vec2,
    boards: Mutex<Vec<MotorBoard>>,
}

impl ArenaObject for MarkedRover {
    fn location(&self) -> Vec2 {
        self.location
    }

    fn marker_info(&self) -> Option<MarkerInfo> {
        Some(MarkerInfo::new(MarkerType::Robot, 0))
    }

    fn motor_boards(&self) -> Option<Vec<MotorBoard>> {
        Some(self.boards.lock().clone())
    }
}

#[test]
fn observer_motion_blurs_its_own_camera() {
    let arena = Arena::new(SimSettings::default());
    let observer = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    let wall = StaticMarker::spawn(&arena, MarkerInfo::new(MarkerType::Arena, 2), Vec2::new(3.0, 0.0), PI);
    let other = Robot::spawn(&arena, Vec2::new(0.0, 2.0), 0.0).unwrap();
    StaticMarker::spawn(&arena, MarkerInfo::new(MarkerType::Arena, 3), Vec2::new(3.0, 2.0), PI);

    other.set_power(Channel::M0, 80.0);
    // A busy robot elsewhere does not blur markers without motors
    let seen = observer.see_default();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].info, wall.marker);

    assert!(other.see_default().is_empty());
    other.set_power(Channel::M0, 0.0);
    assert_eq!(other.see_default().len(), 1);
}

#[test]
fn observed_object_with_busy_motors_is_blurred() {
    let arena = Arena::new(SimSettings::default());
    let observer = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    let rover = Arc::new(MarkedRover {
        location: Vec2::new(1.5, 0.0),
        boards: Mutex::new(vec![MotorBoard::default()]),
    });
    arena.add_object(rover.clone());

    assert_eq!(observer.see_default().len(), 1);
    rover.boards.lock()[0].m1.set_power(-20.0, 100.0);
    assert!(observer.see_default().is_empty());
}

#[test]
fn grab_then_regrab_requires_release() {
    let arena = Arena::new(SimSettings::default());
    let robot = Robot::spawn(&arena, Vec2::new(-1.0, 0.5), FRAC_PI_2).unwrap();
    let t = token(&arena, 1, Vec2::new(-1.0, 0.8));

    assert!(robot.grab().unwrap());
    assert!(matches!(robot.grab(), Err(SimError::AlreadyHolding)));
    assert!(robot.release());
    assert!(!robot.release());
    assert!(t.grabbable());
}

#[test]
fn held_token_follows_robot_through_simulation() {
    let arena = Arena::new(SimSettings::default());
    let robot = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    let t = token(&arena, 0, Vec2::new(0.3, 0.0));
    assert!(robot.grab().unwrap());

    robot.set_power(Channel::M0, 60.0);
    robot.set_power(Channel::M1, 60.0);
    let mut sim = Simulator::new(Arc::clone(&arena));
    for _ in 0..120 {
        sim.step(1.0 / 60.0);
    }

    // Carried token sits between the robot and the grabber point from the last tick
    let gap = t.location() - robot.location();
    assert!(robot.location().x > 0.1);
    assert!(gap.x > 0.0 && gap.x <= 0.25 + 1e-4);
    assert!(gap.y.abs() < 1e-4);

    robot.release();
    assert!(t.grabbable());
}

#[test]
fn stepping_thread_runs_alongside_control() {
    let arena = Arena::new(SimSettings::default());
    let robot = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    token(&arena, 0, Vec2::new(2.0, 0.0));

    let running = Arc::new(AtomicBool::new(true));
    let handle = Simulator::new(Arc::clone(&arena)).spawn(Arc::clone(&running));

    robot.set_power(Channel::M0, 100.0);
    robot.set_power(Channel::M1, 100.0);
    for _ in 0..10 {
        // Concurrent reads while the stepper mutates the world
        let _ = robot.see_default();
        let _ = robot.grab();
        robot.release();
        thread::sleep(Duration::from_millis(20));
    }
    robot.set_power(Channel::M0, 0.0);
    robot.set_power(Channel::M1, 0.0);

    running.store(false, Ordering::Release);
    let sim = handle.join().unwrap();
    assert!(sim.steps() > 0);
    assert!(robot.location().x > 0.0);
}

#[test]
fn settings_round_trip_through_json_file() {
    let path = std::env::temp_dir().join(format!("arena_sim_scenario_{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "half_fov_width": 1.6, "grab_radius": 1.0 }"#).unwrap();
    let settings = SimSettings::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    // Wide camera now sees the marker at 90°
    let arena = Arena::new(settings);
    let robot = Robot::spawn(&arena, Vec2::ZERO, 0.0).unwrap();
    token(&arena, 0, Vec2::new(0.0, 1.0));
    let seen = robot.see_default();
    assert_eq!(seen.len(), 1);
    assert!((seen[0].centre.polar.rot_y - 90.0).abs() < 1e-3);
}
