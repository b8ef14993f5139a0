//! Simulation module
//!
//! Robots, markers and the arena they share:
//! - Actuation: motor powers become wheel forces every step
//! - Manipulation: grab/release of objects in a sector ahead of the robot
//! - Perception: marker observations within the field of view
//! - Stable iteration order (arena insertion order)

pub mod actuation;
pub mod arena;
pub mod grab;
pub mod motor;
pub mod physics;
pub mod robot;
pub mod runner;
pub mod token;
pub mod vision;

pub use arena::{Arena, ArenaObject};
pub use grab::{GrabSector, Pose, grabber_point};
pub use motor::{Channel, MotorBoard, MotorChannel};
pub use physics::{BodyDef, BodyHandle, BodyKind, PhysicsWorld, RigidBody, SharedBody};
pub use robot::Robot;
pub use runner::Simulator;
pub use token::{StaticMarker, Token};
pub use vision::{Marker, MarkerInfo, MarkerType, Point, PolarCoord};
