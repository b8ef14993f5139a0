//! Arena Sim - native demo
//!
//! Populates an arena with tokens and wall markers, starts the stepping
//! thread and drives one robot from this thread: wander until a token is in
//! view, steer onto it, grab it, carry it for a while and drop it.

use std::f32::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use arena_sim::sim::{Arena, Channel, MarkerInfo, MarkerType, Robot, Simulator, StaticMarker, Token};
use arena_sim::{SimError, SimSettings, polar_to_cartesian};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Control loop iterations (~20 Hz)
const CONTROL_STEPS: u32 = 400;
const CONTROL_PERIOD: Duration = Duration::from_millis(50);

fn main() {
    env_logger::init();
    log::info!("Arena Sim (native) starting...");

    if let Err(e) = run() {
        log::error!("Simulation failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let settings = match std::env::args().nth(1) {
        Some(path) => SimSettings::load(path)?,
        None => SimSettings::default(),
    };
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);
    log::info!("Controller seed: {}", seed);

    let arena = Arena::new(settings);
    populate(&arena)?;
    let robot = Robot::spawn(&arena, Vec2::new(0.0, -3.0), FRAC_PI_2)?;

    let running = Arc::new(AtomicBool::new(true));
    let stepper = Simulator::new(Arc::clone(&arena)).spawn(Arc::clone(&running));

    drive(&robot, Pcg32::seed_from_u64(seed))?;

    running.store(false, Ordering::Release);
    match stepper.join() {
        Ok(sim) => log::info!("Finished after {} simulation steps", sim.steps()),
        Err(_) => log::error!("Stepping thread panicked"),
    }
    Ok(())
}

/// Wall markers on a 4m ring and a 3x3 grid of tokens
fn populate(arena: &Arc<Arena>) -> Result<(), SimError> {
    for i in 0..8 {
        let theta = i as f32 * PI / 4.0;
        let marker = MarkerInfo::new(MarkerType::Arena, i);
        // Facing the arena centre
        StaticMarker::spawn(arena, marker, polar_to_cartesian(4.0, theta), theta + PI);
    }

    let kinds = [MarkerType::TokenA, MarkerType::TokenB, MarkerType::TokenC];
    let offsets = [-0.75, 0.0, 0.75];
    for (i, &x) in offsets.iter().enumerate() {
        for (j, &y) in offsets.iter().enumerate() {
            let marker = MarkerInfo::new(kinds[(i + j) % kinds.len()], (i * 3 + j) as u32);
            Token::spawn(arena, marker, Vec2::new(x, y))?;
        }
    }
    Ok(())
}

fn drive(robot: &Robot, mut rng: Pcg32) -> Result<(), SimError> {
    let mut carry_ticks = 0;

    for step in 0..CONTROL_STEPS {
        if robot.is_holding() {
            carry_ticks += 1;
            if carry_ticks > 40 {
                robot.release();
                carry_ticks = 0;
                log::info!("[{step}] dropped token");
            }
        } else if robot.grab()? {
            log::info!("[{step}] grabbed token");
        }

        // Stop to get a sharp picture
        robot.set_power(Channel::M0, 0.0);
        robot.set_power(Channel::M1, 0.0);
        let nearest_token = robot
            .see_default()
            .into_iter()
            .filter(|m| m.info.marker_type != MarkerType::Arena)
            .min_by(|a, b| a.centre.polar.length.total_cmp(&b.centre.polar.length));

        let (left, right) = match nearest_token {
            Some(m) if !robot.is_holding() => {
                log::debug!(
                    "[{step}] token {} at {:.2}m {:.1}°",
                    m.info.code,
                    m.centre.polar.length,
                    m.centre.polar.rot_y
                );
                // Positive bearing is to the left; m0 turns the robot left
                let turn = (m.centre.polar.rot_y / 30.0).clamp(-1.0, 1.0) * 20.0;
                (40.0 + turn, 40.0 - turn)
            }
            _ => {
                let base = rng.random_range(20.0..60.0);
                let turn = rng.random_range(-30.0..30.0);
                (base + turn, base - turn)
            }
        };
        robot.set_power(Channel::M0, left);
        robot.set_power(Channel::M1, right);

        thread::sleep(CONTROL_PERIOD);
    }

    robot.set_power(Channel::M0, 0.0);
    robot.set_power(Channel::M1, 0.0);
    Ok(())
}
