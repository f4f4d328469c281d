//! Adjacency Builder: nearest neighbor in each direction.
//!
//! For an origin element and a direction the search runs in two stages:
//!
//! 1. Half-plane exclusion: a candidate whose facing edge reaches past the
//!    origin's exit edge is not in that direction at all.
//! 2. Distance: from the origin's exit midpoint to the candidate's facing
//!    edge (orthogonal gap when squarely across, nearest corner otherwise).
//!
//! Candidates are visited in registry (discovery) order and only a strictly
//! smaller distance replaces the current best, so the first minimal
//! candidate wins. A candidate must also be strictly closer than the canvas
//! ceiling for the axis of travel.

use serde::{Deserialize, Serialize};

use super::geometry::directional_distance;
use super::registry::ElementRegistry;
use super::Direction;

/// Display canvas; its dimensions are the distance ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Canvas {
    pub fn ceiling(&self, dir: Direction) -> f32 {
        if dir.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }
}

/// Four-direction adjacency of one element, before route overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    pub left: Option<String>,
    pub right: Option<String>,
    pub up: Option<String>,
    pub down: Option<String>,
}

impl Adjacency {
    pub fn get(&self, dir: Direction) -> Option<&str> {
        match dir {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
            Direction::Up => self.up.as_deref(),
            Direction::Down => self.down.as_deref(),
        }
    }

    pub fn set(&mut self, dir: Direction, target: Option<String>) {
        let slot = match dir {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
            Direction::Up => &mut self.up,
            Direction::Down => &mut self.down,
        };
        *slot = target;
    }
}

/// Nearest registered element from `origin` in `dir`, if any.
pub fn nearest(
    registry: &ElementRegistry,
    origin: &str,
    dir: Direction,
    canvas: &Canvas,
) -> Option<String> {
    let from = registry.geometry(origin)?;
    let mut best: Option<&str> = None;
    let mut best_distance = canvas.ceiling(dir);

    for candidate in registry.ids() {
        if candidate == origin {
            continue;
        }
        let Some(to) = registry.geometry(candidate) else {
            continue;
        };
        if !to.lies_toward(from, dir) {
            continue;
        }
        let d = directional_distance(from, to, dir);
        if d < best_distance {
            best_distance = d;
            best = Some(candidate);
        }
    }

    best.map(str::to_string)
}

/// Compute the adjacency record of `origin`.
pub fn adjacency_of(registry: &ElementRegistry, origin: &str, canvas: &Canvas) -> Adjacency {
    let mut adj = Adjacency::default();
    for dir in Direction::ALL {
        adj.set(dir, nearest(registry, origin, dir, canvas));
    }
    adj
}
