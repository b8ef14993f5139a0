//! Marked objects: movable tokens and fixed wall markers

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;

use super::arena::{Arena, ArenaObject};
use super::physics::{BodyDef, BodyKind, SharedBody, square_vertices};
use super::vision::MarkerInfo;
use crate::error::SimError;

#[derive(Debug, Default)]
struct TokenState {
    grabbed: bool,
}

/// A small marked box robots can pick up
#[derive(Debug)]
pub struct Token {
    marker: MarkerInfo,
    body: SharedBody,
    state: Mutex<TokenState>,
}

impl Token {
    /// Create a token at `location` and append it to the arena
    pub fn spawn(arena: &Arc<Arena>, marker: MarkerInfo, location: Vec2) -> Result<Arc<Self>, SimError> {
        let settings = arena.settings();
        let body = arena.create_body(
            BodyDef {
                position: location,
                angle: 0.0,
                linear_damping: settings.token_damping,
                angular_damping: settings.token_damping,
                kind: BodyKind::Dynamic,
            },
            &square_vertices(settings.token_width),
            settings.token_density,
        )?;

        let token = Arc::new(Self {
            marker,
            body,
            state: Mutex::new(TokenState::default()),
        });
        arena.add_object(token.clone());
        log::debug!("Spawned token {} at {:?}", marker.code, location);
        Ok(token)
    }

    pub fn is_grabbed(&self) -> bool {
        self.state.lock().grabbed
    }
}

impl ArenaObject for Token {
    fn location(&self) -> Vec2 {
        self.body.read(|b| b.world_center())
    }

    fn heading(&self) -> Option<f32> {
        Some(self.body.read(|b| b.angle()))
    }

    fn grabbable(&self) -> bool {
        !self.state.lock().grabbed
    }

    fn marker_info(&self) -> Option<MarkerInfo> {
        Some(self.marker)
    }

    fn grab(&self) {
        self.state.lock().grabbed = true;
    }

    fn release(&self) {
        self.state.lock().grabbed = false;
    }

    fn set_location(&self, location: Vec2) {
        self.body.write(|b| {
            let angle = b.angle();
            b.set_transform(location, angle);
        });
    }
}

/// A marker fixed to the arena (e.g. on a wall); never moves, never grabbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticMarker {
    pub marker: MarkerInfo,
    pub location: Vec2,
    /// Direction the marker faces
    pub heading: f32,
}

impl StaticMarker {
    pub fn spawn(arena: &Arc<Arena>, marker: MarkerInfo, location: Vec2, heading: f32) -> Arc<Self> {
        let wall_marker = Arc::new(Self {
            marker,
            location,
            heading,
        });
        arena.add_object(wall_marker.clone());
        wall_marker
    }
}

impl ArenaObject for StaticMarker {
    fn location(&self) -> Vec2 {
        self.location
    }

    fn heading(&self) -> Option<f32> {
        Some(self.heading)
    }

    fn marker_info(&self) -> Option<MarkerInfo> {
        Some(self.marker)
    }
}
