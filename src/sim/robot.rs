//! Simulated robot: two-wheel drive, a grabber and a camera
//!
//! Locks, always taken in this order and never held across a scan of other
//! objects:
//! - `holding`: the held-object slot, held for the whole of `grab`/`release`
//! - `motors`: motor boards; also taken while reading the own pose for a
//!   `grab`/`see` snapshot and during force computation in `tick`
//! - the physics world, taken inside [`SharedBody`] accessors

use std::sync::{Arc, Weak};

use glam::Vec2;
use parking_lot::Mutex;

use super::actuation::apply_drive;
use super::arena::{Arena, ArenaObject};
use super::grab::{GrabSector, Pose, grabber_point};
use super::motor::{Channel, MotorBoard, any_exceeds};
use super::physics::{BodyDef, BodyKind, SharedBody, square_vertices};
use super::vision::{Marker, acquisition_time, in_field_of_view};
use crate::error::SimError;
use crate::settings::SimSettings;

/// A robot in an arena
#[derive(Debug)]
pub struct Robot {
    id: u32,
    body: SharedBody,
    arena: Weak<Arena>,
    settings: Arc<SimSettings>,
    motors: Mutex<Vec<MotorBoard>>,
    holding: Mutex<Option<Weak<dyn ArenaObject>>>,
}

impl Robot {
    /// Create a robot at `location` facing `heading` and append it to the arena
    pub fn spawn(arena: &Arc<Arena>, location: Vec2, heading: f32) -> Result<Arc<Self>, SimError> {
        let settings = Arc::clone(arena.settings());
        let body = arena.create_body(
            BodyDef {
                position: location,
                angle: heading,
                linear_damping: settings.robot_linear_damping,
                angular_damping: settings.robot_angular_damping,
                kind: BodyKind::Dynamic,
            },
            &square_vertices(settings.robot_width),
            settings.robot_density,
        )?;

        let robot = Arc::new(Self {
            id: arena.next_robot_id(),
            body,
            arena: Arc::downgrade(arena),
            settings,
            motors: Mutex::new(vec![MotorBoard::default()]),
            holding: Mutex::new(None),
        });
        arena.add_object(robot.clone());
        log::debug!(
            "Spawned robot {} at {:?} heading {:.3}",
            robot.id,
            location,
            heading
        );
        Ok(robot)
    }

    /// Index of this robot among those spawned into its arena
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current pose, read under the motor lock
    fn snapshot(&self) -> Pose {
        let _guard = self.motors.lock();
        self.pose()
    }

    fn pose(&self) -> Pose {
        self.body.read(|b| Pose {
            location: b.world_center(),
            heading: b.angle(),
        })
    }

    // === Actuation ===

    /// Set a channel on the first motor board, clamped to the rated range
    pub fn set_power(&self, channel: Channel, value: f32) {
        let max = self.settings.max_motor_speed;
        if let Some(board) = self.motors.lock().first_mut() {
            board.channel_mut(channel).set_power(value, max);
        }
    }

    pub fn power(&self, channel: Channel) -> f32 {
        self.motors
            .lock()
            .first()
            .map(|board| board.channel(channel).power())
            .unwrap_or(0.0)
    }

    // === Manipulation ===

    pub fn is_holding(&self) -> bool {
        self.holding.lock().is_some()
    }

    /// The held object, if it still exists
    pub fn held(&self) -> Option<Arc<dyn ArenaObject>> {
        self.holding.lock().as_ref().and_then(Weak::upgrade)
    }

    /// Pick up the first grabbable object inside the grab sector
    ///
    /// Returns `Ok(false)` when nothing is in reach and
    /// [`SimError::AlreadyHolding`] if something is already held.
    pub fn grab(&self) -> Result<bool, SimError> {
        let mut holding = self.holding.lock();
        if holding.is_some() {
            return Err(SimError::AlreadyHolding);
        }

        let pose = self.snapshot();
        let sector = GrabSector::new(self.settings.grab_radius, self.settings.half_grab_sector_width);

        let objects = self.arena.upgrade().map(|a| a.objects()).unwrap_or_default();
        let Some(target) = objects
            .into_iter()
            .find(|o| o.grabbable() && sector.contains(&pose, o.location()))
        else {
            return Ok(false);
        };

        target.grab();
        target.set_location(grabber_point(&pose, self.settings.grabber_offset));
        log::debug!("Grabbed {:?}", target.marker_info().map(|m| m.code));
        *holding = Some(Arc::downgrade(&target));
        Ok(true)
    }

    /// Drop whatever is held; `false` if nothing was
    pub fn release(&self) -> bool {
        let mut holding = self.holding.lock();
        let Some(held) = holding.take() else {
            return false;
        };
        if let Some(object) = held.upgrade() {
            object.release();
            log::debug!("Released {:?}", object.marker_info().map(|m| m.code));
        }
        true
    }

    // === Perception ===

    /// Markers currently visible to the camera, in arena order
    pub fn see(&self, res: (u32, u32)) -> Vec<Marker> {
        let pose = self.snapshot();
        let timestamp = acquisition_time();
        let half_fov = self.settings.half_fov_width;

        let objects = self.arena.upgrade().map(|a| a.objects()).unwrap_or_default();
        objects
            .iter()
            .filter_map(|o| {
                let info = o.marker_info()?;
                let location = o.location();
                let visible = in_field_of_view(&pose, location, half_fov) && !self.motion_blurred(o.as_ref());
                visible.then(|| Marker::observe(&pose, info, location, res, timestamp))
            })
            .collect()
    }

    /// `see` at the configured default resolution
    pub fn see_default(&self) -> Vec<Marker> {
        self.see(self.settings.default_resolution)
    }

    /// Either this robot or the observed object is driving hard enough to blur
    /// the image. Objects carried by a moving robot are not considered.
    fn motion_blurred(&self, object: &dyn ArenaObject) -> bool {
        let threshold = self.settings.motion_blur_power_threshold;
        self.is_moving(threshold)
            || object
                .motor_boards()
                .is_some_and(|boards| any_exceeds(&boards, threshold))
    }

    fn is_moving(&self, threshold: f32) -> bool {
        any_exceeds(&self.motors.lock(), threshold)
    }

    // === Stepping ===

    /// Push this tick's wheel forces into the body, then carry the held object
    ///
    /// `_dt` is unused by the force law.
    pub fn tick(&self, _dt: f32) {
        let half_width = self.settings.robot_width * 0.5;
        let force_scale = self.settings.force_scale;
        {
            let motors = self.motors.lock();
            if let Some(board) = motors.first() {
                self.body.write(|body| apply_drive(body, board, half_width, force_scale));
            }
        }

        if let Some(held) = self.held() {
            held.set_location(grabber_point(&self.pose(), self.settings.grabber_offset));
        }
    }
}

impl ArenaObject for Robot {
    fn location(&self) -> Vec2 {
        self.body.read(|b| b.world_center())
    }

    fn heading(&self) -> Option<f32> {
        Some(self.body.read(|b| b.angle()))
    }

    fn motor_boards(&self) -> Option<Vec<MotorBoard>> {
        Some(self.motors.lock().clone())
    }

    fn tick(&self, dt: f32) {
        Robot::tick(self, dt);
    }
}
