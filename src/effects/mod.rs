//! Visual focus effects.
//!
//! - `flicker` — blinking selection overlay, one timer per session
//! - `marquee` — horizontal scroll of overflowing focused text

pub mod flicker;
pub mod marquee;

pub use flicker::Flicker;
