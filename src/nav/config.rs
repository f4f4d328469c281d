//! Session configuration: initial focus, manual routes, hooks, metadata.
//!
//! Hooks are typed closures attached in code. The JSON form carries
//! everything else; a hook given there as a string is a configuration error.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::dom::{Document, NodeId};

use super::adjacency::Canvas;
use super::graph::NavNode;
use super::keys::{Command, KeyCodes};
use super::Direction;

/// Error raised by a hook. It aborts the rest of the transition and is
/// returned to whoever dispatched the key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hook failed: {0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type HookResult<T = ()> = Result<T, HookError>;

/// `action` hook, also used for custom command handlers.
pub type ActionHook = Rc<dyn Fn(&mut Document, &NavNode) -> HookResult>;
/// `onfocus(select_overlay, element)`.
pub type FocusHook = Rc<dyn Fn(&mut Document, Option<NodeId>, NodeId) -> HookResult>;
/// `onmove` / `move_<direction>`. For `onmove` a `true` result vetoes the move.
pub type MoveHook = Rc<dyn Fn(&mut Document, &NavNode, Direction) -> HookResult<bool>>;
/// `onblur(node, next_id)`.
pub type BlurHook = Rc<dyn Fn(&mut Document, &NavNode, &str) -> HookResult>;

const HOOK_KEYS: &[&str] = &[
    "action",
    "onfocus",
    "onblur",
    "onmove",
    "move_left",
    "move_right",
    "move_up",
    "move_down",
];

/// Behavior hooks of one element.
#[derive(Clone, Default)]
pub struct Hooks {
    pub action: Option<ActionHook>,
    pub on_focus: Option<FocusHook>,
    pub on_blur: Option<BlurHook>,
    pub on_move: Option<MoveHook>,
    pub on_direction: HashMap<Direction, MoveHook>,
}

impl Hooks {
    pub fn direction(&self, dir: Direction) -> Option<&MoveHook> {
        self.on_direction.get(&dir)
    }

    /// Later hooks replace earlier ones key by key.
    pub fn merge(&mut self, other: &Hooks) {
        if other.action.is_some() {
            self.action = other.action.clone();
        }
        if other.on_focus.is_some() {
            self.on_focus = other.on_focus.clone();
        }
        if other.on_blur.is_some() {
            self.on_blur = other.on_blur.clone();
        }
        if other.on_move.is_some() {
            self.on_move = other.on_move.clone();
        }
        for (dir, hook) in &other.on_direction {
            self.on_direction.insert(*dir, hook.clone());
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dirs: Vec<&str> = self.on_direction.keys().map(|d| d.as_str()).collect();
        dirs.sort_unstable();
        f.debug_struct("Hooks")
            .field("action", &self.action.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_blur", &self.on_blur.is_some())
            .field("on_move", &self.on_move.is_some())
            .field("on_direction", &dirs)
            .finish()
    }
}

/// Manually authored partial node.
///
/// A direction entry is `Some(Some(id))` to route to `id`, `Some(None)` to
/// declare "no neighbor" explicitly, and absent to keep the computed value.
#[derive(Debug, Clone, Default)]
pub struct RouteOverride {
    pub directions: HashMap<Direction, Option<String>>,
    pub hooks: Hooks,
    pub props: Map<String, Value>,
}

impl RouteOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to(mut self, dir: Direction, target: impl Into<String>) -> Self {
        self.directions.insert(dir, Some(target.into()));
        self
    }

    /// Explicitly no neighbor in `dir`.
    pub fn block(mut self, dir: Direction) -> Self {
        self.directions.insert(dir, None);
        self
    }

    pub fn action(
        mut self,
        hook: impl Fn(&mut Document, &NavNode) -> HookResult + 'static,
    ) -> Self {
        self.hooks.action = Some(Rc::new(hook));
        self
    }

    pub fn on_focus(
        mut self,
        hook: impl Fn(&mut Document, Option<NodeId>, NodeId) -> HookResult + 'static,
    ) -> Self {
        self.hooks.on_focus = Some(Rc::new(hook));
        self
    }

    pub fn on_blur(
        mut self,
        hook: impl Fn(&mut Document, &NavNode, &str) -> HookResult + 'static,
    ) -> Self {
        self.hooks.on_blur = Some(Rc::new(hook));
        self
    }

    pub fn on_move(
        mut self,
        hook: impl Fn(&mut Document, &NavNode, Direction) -> HookResult<bool> + 'static,
    ) -> Self {
        self.hooks.on_move = Some(Rc::new(hook));
        self
    }

    /// `move_<dir>` hook. Its return value is ignored.
    pub fn on_direction(
        mut self,
        dir: Direction,
        hook: impl Fn(&mut Document, &NavNode, Direction) -> HookResult<bool> + 'static,
    ) -> Self {
        self.hooks.on_direction.insert(dir, Rc::new(hook));
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Parse one route entry of the JSON form.
    fn from_json(element: &str, value: &Value) -> Result<Self, ConfigError> {
        let Value::Object(entries) = value else {
            return Err(ConfigError::InvalidRoute {
                element: element.to_string(),
                reason: "route must be an object".into(),
            });
        };
        let mut route = RouteOverride::new();
        for (key, value) in entries {
            if let Some(dir) = Direction::parse(key) {
                let target = match value {
                    Value::Null => None,
                    Value::String(id) => Some(id.clone()),
                    other => {
                        return Err(ConfigError::InvalidRoute {
                            element: element.to_string(),
                            reason: format!("`{}` must be an id or null, got {}", key, other),
                        })
                    }
                };
                route.directions.insert(dir, target);
            } else if HOOK_KEYS.contains(&key.as_str()) {
                return Err(ConfigError::StringHook {
                    element: element.to_string(),
                    key: key.clone(),
                });
            } else {
                route.props.insert(key.clone(), value.clone());
            }
        }
        Ok(route)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid navigation config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{key}` hook for `{element}` must be attached in code, not given as a string")]
    StringHook { element: String, key: String },
    #[error("invalid route for `{element}`: {reason}")]
    InvalidRoute { element: String, reason: String },
    #[error("invalid key code `{0}`")]
    InvalidKeyCode(String),
}

/// Everything a [`NavigationSession`](super::NavigationSession) is built from.
#[derive(Clone, Default)]
pub struct NavConfig {
    /// Requested initial focus.
    pub focus: Option<String>,
    /// Manual route mode: skip geometry and use `routes` as the whole graph.
    pub route_type: bool,
    pub routes: HashMap<String, RouteOverride>,
    /// Custom handlers replacing built-in commands.
    pub event_key: HashMap<Command, ActionHook>,
    /// Opaque per-element metadata (`btn_info`).
    pub info: HashMap<String, Value>,
    pub canvas: Canvas,
    pub key_codes: KeyCodes,
}

impl fmt::Debug for NavConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut overridden: Vec<Command> = self.event_key.keys().copied().collect();
        overridden.sort_by_key(|c| c.as_str());
        f.debug_struct("NavConfig")
            .field("focus", &self.focus)
            .field("route_type", &self.route_type)
            .field("routes", &self.routes)
            .field("event_key", &overridden)
            .field("info", &self.info)
            .field("canvas", &self.canvas)
            .field("key_codes", &self.key_codes)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    focus: Option<String>,
    #[serde(default)]
    route_type: bool,
    #[serde(default)]
    routes: Map<String, Value>,
    #[serde(default)]
    event_key: Map<String, Value>,
    #[serde(default)]
    info: HashMap<String, Value>,
    #[serde(default)]
    canvas: Option<Canvas>,
    #[serde(default)]
    key_codes: HashMap<String, Command>,
}

impl NavConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form:
    /// `{"focus", "routeType", "routes", "info", "keyCodes", "canvas"}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        if let Some(command) = raw.event_key.keys().next() {
            return Err(ConfigError::StringHook {
                element: "eventKey".into(),
                key: command.clone(),
            });
        }

        let mut routes = HashMap::with_capacity(raw.routes.len());
        for (element, value) in &raw.routes {
            routes.insert(element.clone(), RouteOverride::from_json(element, value)?);
        }

        let mut key_codes = KeyCodes::default();
        for (code, command) in raw.key_codes {
            let code: u32 = code
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidKeyCode(code.clone()))?;
            key_codes.bind(code, command);
        }

        Ok(Self {
            focus: raw.focus.filter(|f| !f.is_empty()),
            route_type: raw.route_type,
            routes,
            event_key: HashMap::new(),
            info: raw.info,
            canvas: raw.canvas.unwrap_or_default(),
            key_codes,
        })
    }

    pub fn with_focus(mut self, id: impl Into<String>) -> Self {
        self.focus = Some(id.into());
        self
    }

    pub fn with_route_type(mut self, manual: bool) -> Self {
        self.route_type = manual;
        self
    }

    /// Add a route, merging into any route already configured for `id`.
    pub fn with_route(mut self, id: impl Into<String>, route: RouteOverride) -> Self {
        self.route_mut(id).merge(route);
        self
    }

    pub fn with_info(mut self, id: impl Into<String>, info: Value) -> Self {
        self.info.insert(id.into(), info);
        self
    }

    pub fn with_event_key(
        mut self,
        command: Command,
        handler: impl Fn(&mut Document, &NavNode) -> HookResult + 'static,
    ) -> Self {
        self.event_key.insert(command, Rc::new(handler));
        self
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    /// Route for `id`, created empty if missing.
    pub fn route_mut(&mut self, id: impl Into<String>) -> &mut RouteOverride {
        self.routes.entry(id.into()).or_default()
    }
}

impl RouteOverride {
    /// Later entries replace earlier ones key by key.
    pub fn merge(&mut self, other: RouteOverride) {
        self.directions.extend(other.directions);
        self.hooks.merge(&other.hooks);
        self.props.extend(other.props);
    }
}
