//! Arena container
//!
//! Owns the ordered object list and the physics world. Objects are iterated
//! in insertion order; grab tie-breaking and vision output order rely on it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;
use parking_lot::{Mutex, RwLock};

use super::motor::MotorBoard;
use super::physics::{BodyDef, PhysicsWorld, SharedBody};
use super::vision::MarkerInfo;
use crate::error::SimError;
use crate::settings::SimSettings;

/// Anything that lives in an arena
///
/// Only `location` is required; the rest default to an inert, unmarked,
/// ungrabbable object.
pub trait ArenaObject: fmt::Debug + Send + Sync {
    /// World position of the object's centre
    fn location(&self) -> Vec2;

    fn heading(&self) -> Option<f32> {
        None
    }

    fn grabbable(&self) -> bool {
        false
    }

    fn marker_info(&self) -> Option<MarkerInfo> {
        None
    }

    /// Snapshot of the object's motor boards, if it has any
    fn motor_boards(&self) -> Option<Vec<MotorBoard>> {
        None
    }

    /// Attach to a grabber
    fn grab(&self) {}

    /// Detach from a grabber
    fn release(&self) {}

    /// Move the object (used to hold it in front of a grabber)
    fn set_location(&self, _location: Vec2) {}

    /// Called once per simulation step before the physics world integrates
    fn tick(&self, _dt: f32) {}
}

/// The world every object lives in
pub struct Arena {
    settings: Arc<SimSettings>,
    objects: RwLock<Vec<Arc<dyn ArenaObject>>>,
    world: Arc<Mutex<PhysicsWorld>>,
    next_robot_id: AtomicU32,
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("objects", &self.objects.read().len())
            .field("bodies", &self.world.lock().len())
            .finish()
    }
}

impl Arena {
    pub fn new(settings: SimSettings) -> Arc<Self> {
        Arc::new(Self {
            settings: Arc::new(settings),
            objects: RwLock::new(Vec::new()),
            world: Arc::new(Mutex::new(PhysicsWorld::new())),
            next_robot_id: AtomicU32::new(0),
        })
    }

    pub fn settings(&self) -> &Arc<SimSettings> {
        &self.settings
    }

    /// Append an object; it is iterated after every existing one
    pub fn add_object(&self, object: Arc<dyn ArenaObject>) {
        self.objects.write().push(object);
    }

    /// Snapshot of the object list in insertion order
    pub fn objects(&self) -> Vec<Arc<dyn ArenaObject>> {
        self.objects.read().clone()
    }

    pub fn object_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Hand out robot ids 0, 1, 2... in spawn order
    pub(crate) fn next_robot_id(&self) -> u32 {
        self.next_robot_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Run `f` with exclusive access to the physics world
    pub fn with_world<R>(&self, f: impl FnOnce(&mut PhysicsWorld) -> R) -> R {
        f(&mut self.world.lock())
    }

    /// Create a body with a single polygon fixture
    pub fn create_body(
        &self,
        def: BodyDef,
        vertices: &[Vec2],
        density: f32,
    ) -> Result<SharedBody, SimError> {
        let handle = self.with_world(|world| {
            let handle = world.create_body(def)?;
            world.create_polygon_fixture(handle, vertices, density)?;
            Ok::<_, SimError>(handle)
        })?;
        Ok(SharedBody::new(Arc::clone(&self.world), handle))
    }

    /// Integrate every body by `dt`
    pub fn step_world(&self, dt: f32) {
        self.world.lock().step(dt);
    }
}
