//! Key codes, commands and the per-session command table.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::ActionHook;
use super::Direction;

pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;
pub const KEY_ENTER: u32 = 13;
pub const KEY_BACKSPACE: u32 = 8;
pub const KEY_ESCAPE: u32 = 27;

/// The six remote-control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Back,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::Left,
        Command::Right,
        Command::Up,
        Command::Down,
        Command::Enter,
        Command::Back,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Up => "up",
            Command::Down => "down",
            Command::Enter => "enter",
            Command::Back => "back",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Command::ALL.into_iter().find(|c| c.as_str() == s)
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::Left => Some(Direction::Left),
            Command::Right => Some(Direction::Right),
            Command::Up => Some(Direction::Up),
            Command::Down => Some(Direction::Down),
            Command::Enter | Command::Back => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key code → command translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodes {
    codes: HashMap<u32, Command>,
}

impl Default for KeyCodes {
    fn default() -> Self {
        let codes = [
            (KEY_LEFT, Command::Left),
            (KEY_UP, Command::Up),
            (KEY_RIGHT, Command::Right),
            (KEY_DOWN, Command::Down),
            (KEY_ENTER, Command::Enter),
            (KEY_BACKSPACE, Command::Back),
            (KEY_ESCAPE, Command::Back),
        ];
        Self {
            codes: codes.into_iter().collect(),
        }
    }
}

impl KeyCodes {
    pub fn bind(&mut self, code: u32, command: Command) {
        self.codes.insert(code, command);
    }

    pub fn command_for(&self, code: u32) -> Option<Command> {
        self.codes.get(&code).copied()
    }
}

/// How a command is carried out.
#[derive(Clone)]
pub enum Binding {
    /// The session's own move/enter/back.
    Builtin,
    /// A page-supplied handler that replaces the built-in one.
    Custom(ActionHook),
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Builtin => f.write_str("Builtin"),
            Binding::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Command table owned by one session: defaults merged with overrides.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<Command, Binding>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: Command::ALL.into_iter().map(|c| (c, Binding::Builtin)).collect(),
        }
    }
}

impl KeyBindings {
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a Command, &'a ActionHook)>,
    ) -> Self {
        let mut table = Self::default();
        for (command, handler) in overrides {
            table.bindings.insert(*command, Binding::Custom(handler.clone()));
        }
        table
    }

    pub fn get(&self, command: Command) -> Binding {
        self.bindings.get(&command).cloned().unwrap_or(Binding::Builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn default_codes() {
        let codes = KeyCodes::default();
        assert_eq!(codes.command_for(KEY_LEFT), Some(Command::Left));
        assert_eq!(codes.command_for(KEY_DOWN), Some(Command::Down));
        assert_eq!(codes.command_for(KEY_ENTER), Some(Command::Enter));
        assert_eq!(codes.command_for(KEY_BACKSPACE), Some(Command::Back));
        assert_eq!(codes.command_for(KEY_ESCAPE), Some(Command::Back));
        assert_eq!(codes.command_for(65), None);
    }

    #[test]
    fn overrides_replace_single_commands() {
        let handler: ActionHook =
            Rc::new(|_: &mut crate::dom::Document, _: &crate::nav::NavNode| Ok(()));
        let mut overrides = HashMap::new();
        overrides.insert(Command::Back, handler);
        let table = KeyBindings::with_overrides(&overrides);
        assert!(matches!(table.get(Command::Back), Binding::Custom(_)));
        assert!(matches!(table.get(Command::Left), Binding::Builtin));
    }

    #[test]
    fn command_names() {
        for c in Command::ALL {
            assert_eq!(Command::parse(c.as_str()), Some(c));
        }
        assert_eq!(Command::Left.direction(), Some(Direction::Left));
        assert_eq!(Command::Enter.direction(), None);
    }
}
