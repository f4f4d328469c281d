//! Remote-control focus navigation.
//!
//! Pipeline: `registry` (discover focusable images) → `adjacency` (nearest
//! neighbor per direction) → `graph` (merge manual routes, attach overlays)
//! → `session` (focus state machine driven by key commands).

pub mod adjacency;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod keys;
pub mod registry;
pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use config::{NavConfig, RouteOverride};
pub use graph::{NavNode, NavigationGraph};
pub use session::NavigationSession;

/// One of the four d-pad directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ids containing one of these words get the `scale` highlight class.
pub fn is_scalable(id: &str) -> bool {
    id.contains("list") || id.contains("card") || id.contains("nav")
}

/// Ids whose focus is remembered across an `enter` navigation.
pub fn is_resumable(id: &str) -> bool {
    id.contains("list") || id.contains("card")
}

/// Highlight class applied to focused scalable elements.
pub const SCALE_CLASS: &str = "scale";

/// Class marker that makes a select overlay blink while focused.
pub const FLICKER_CLASS: &str = "flicker";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_names() {
        for dir in Direction::ALL {
            assert_eq!(Direction::parse(dir.as_str()), Some(dir));
        }
        assert_eq!(Direction::parse("enter"), None);
    }

    #[test]
    fn highlight_patterns() {
        assert!(is_scalable("focus_list_3"));
        assert!(is_scalable("page_nav_1"));
        assert!(!is_scalable("back_btn"));
        assert!(is_resumable("focus_card_2"));
        assert!(!is_resumable("page_nav_1"));
    }
}
