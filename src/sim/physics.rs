//! Minimal rigid-body substrate
//!
//! Bodies accumulate forces applied during a tick; [`PhysicsWorld::step`]
//! integrates them (semi-implicit Euler with linear/angular damping) and
//! clears the accumulators. There is no collision detection: the kernel only
//! needs force application, local-to-world transforms and pose reads.

use std::ops::{Index, IndexMut};
use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Index of a body inside a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// How a body responds to forces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves
    Static,
    /// Integrated from forces
    #[default]
    Dynamic,
}

/// Parameters for [`PhysicsWorld::create_body`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDef {
    pub position: Vec2,
    pub angle: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub kind: BodyKind,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            angle: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            kind: BodyKind::Dynamic,
        }
    }
}

/// A 2D rigid body
#[derive(Debug, Clone)]
pub struct RigidBody {
    position: Vec2,
    angle: f32,
    linear_velocity: Vec2,
    angular_velocity: f32,
    force: Vec2,
    torque: f32,
    inv_mass: f32,
    inv_inertia: f32,
    linear_damping: f32,
    angular_damping: f32,
    kind: BodyKind,
}

impl RigidBody {
    fn new(def: &BodyDef) -> Self {
        Self {
            position: def.position,
            angle: def.angle,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            // Unit mass until a fixture is attached
            inv_mass: 1.0,
            inv_inertia: 1.0,
            linear_damping: def.linear_damping,
            angular_damping: def.angular_damping,
            kind: def.kind,
        }
    }

    /// World-space centre of mass
    #[inline]
    pub fn world_center(&self) -> Vec2 {
        self.position
    }

    /// Heading in radians (unbounded; integrates angular velocity)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn linear_velocity(&self) -> Vec2 {
        self.linear_velocity
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Force accumulated since the last step
    pub fn force(&self) -> Vec2 {
        self.force
    }

    /// Torque accumulated since the last step
    pub fn torque(&self) -> f32 {
        self.torque
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Transform a body-local point into world space
    pub fn get_world_point(&self, local: Vec2) -> Vec2 {
        self.position + Vec2::from_angle(self.angle).rotate(local)
    }

    /// Accumulate a world-space force acting at a world-space point
    pub fn apply_force(&mut self, force: Vec2, point: Vec2) {
        if self.kind != BodyKind::Dynamic {
            return;
        }
        self.force += force;
        self.torque += (point - self.position).perp_dot(force);
    }

    /// Teleport the body, cancelling its motion
    pub fn set_transform(&mut self, position: Vec2, angle: f32) {
        self.position = position;
        self.angle = angle;
        self.linear_velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }

    fn set_mass(&mut self, mass: f32, inertia: f32) {
        self.inv_mass = 1.0 / mass;
        self.inv_inertia = 1.0 / inertia;
    }

    fn integrate(&mut self, dt: f32) {
        if self.kind == BodyKind::Dynamic {
            self.linear_velocity += dt * self.inv_mass * self.force;
            self.angular_velocity += dt * self.inv_inertia * self.torque;

            // Pade approximation, stable for large damping * dt
            self.linear_velocity *= 1.0 / (1.0 + dt * self.linear_damping);
            self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);

            self.position += dt * self.linear_velocity;
            self.angle += dt * self.angular_velocity;
        }
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}

/// Owner of every rigid body in an arena
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body; fails on non-finite pose or negative damping
    pub fn create_body(&mut self, def: BodyDef) -> Result<BodyHandle, SimError> {
        if !def.position.is_finite() || !def.angle.is_finite() {
            return Err(SimError::InvalidBody(format!(
                "non-finite pose {:?} @ {}",
                def.position, def.angle
            )));
        }
        if !(def.linear_damping >= 0.0 && def.angular_damping >= 0.0) {
            return Err(SimError::InvalidBody(format!(
                "damping must be >= 0 (linear {}, angular {})",
                def.linear_damping, def.angular_damping
            )));
        }
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(RigidBody::new(&def));
        Ok(handle)
    }

    /// Attach a convex polygon fixture (body-local vertices, counter-clockwise)
    /// and derive the body's mass and rotational inertia from it.
    pub fn create_polygon_fixture(
        &mut self,
        handle: BodyHandle,
        vertices: &[Vec2],
        density: f32,
    ) -> Result<(), SimError> {
        if vertices.len() < 3 {
            return Err(SimError::InvalidFixture(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if !density.is_finite() || density <= 0.0 {
            return Err(SimError::InvalidFixture(format!("density {density} must be > 0")));
        }

        // Shoelace area and polar moment about the body origin
        let mut area = 0.0;
        let mut inertia = 0.0;
        for (i, &a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let cross = a.perp_dot(b);
            area += 0.5 * cross;
            inertia += cross * (a.dot(a) + a.dot(b) + b.dot(b)) / 12.0;
        }
        if area <= f32::EPSILON {
            return Err(SimError::InvalidFixture(format!(
                "polygon area {area} is degenerate or clockwise"
            )));
        }

        let body = self.body_mut(handle)?;
        body.set_mass(density * area, density * inertia);
        Ok(())
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&RigidBody, SimError> {
        self.bodies
            .get(handle.0 as usize)
            .ok_or(SimError::UnknownBody(handle))
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, SimError> {
        self.bodies
            .get_mut(handle.0 as usize)
            .ok_or(SimError::UnknownBody(handle))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Integrate every body by `dt` seconds and clear accumulated forces
    pub fn step(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.integrate(dt);
        }
    }
}

/// Panics on a handle from another world, like slice indexing
impl Index<BodyHandle> for PhysicsWorld {
    type Output = RigidBody;

    fn index(&self, handle: BodyHandle) -> &RigidBody {
        &self.bodies[handle.0 as usize]
    }
}

impl IndexMut<BodyHandle> for PhysicsWorld {
    fn index_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle.0 as usize]
    }
}

/// A body handle bundled with the world that owns it
///
/// Every access takes the world lock for the duration of the closure only.
#[derive(Debug, Clone)]
pub struct SharedBody {
    world: Arc<Mutex<PhysicsWorld>>,
    handle: BodyHandle,
}

impl SharedBody {
    pub(crate) fn new(world: Arc<Mutex<PhysicsWorld>>, handle: BodyHandle) -> Self {
        Self { world, handle }
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub fn read<R>(&self, f: impl FnOnce(&RigidBody) -> R) -> R {
        f(&self.world.lock()[self.handle])
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut RigidBody) -> R) -> R {
        f(&mut self.world.lock()[self.handle])
    }
}

/// Counter-clockwise square centred on the body origin
pub fn square_vertices(width: f32) -> [Vec2; 4] {
    let half = width * 0.5;
    [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
}
