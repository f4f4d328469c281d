//! Focus state machine.
//!
//! One element is focused at all times. Direction commands walk the
//! navigation graph, running blur effects on the outgoing element and
//! focus effects on the incoming one; `enter` and `back` leave the page
//! through the host, remembering enough in cookies to resume focus when the
//! user comes back.
//!
//! Hooks run inline. A failing hook stops the transition where it is and
//! its error is returned; effects already applied stay applied.

use std::time::Instant;

use url::Url;

use crate::dom::Document;
use crate::effects::{marquee, Flicker};
use crate::host::{
    CookieStore, Host, LastAction, ACTION_KEY, NAV_COOKIE_DAYS, PREVIOUS_FOCUS_KEY,
};

use super::config::{HookError, NavConfig};
use super::graph::NavigationGraph;
use super::keys::{Binding, Command, KeyBindings, KeyCodes};
use super::registry::ElementRegistry;
use super::{is_resumable, is_scalable, Direction, FLICKER_CLASS, SCALE_CLASS};

/// Id of the element whose `href` is the page-level back target.
pub const GLOBAL_BACK_ID: &str = "global_back";

/// Session construction failures.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("page has no focusable elements")]
    NoFocusableElements,
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Focus moved.
    Moved { from: String, to: String },
    /// `onmove` vetoed the move.
    Vetoed,
    /// No usable neighbor in that direction.
    NoNeighbor,
    /// The focused element's `action` hook ran.
    Action,
    /// The host was sent to a new page.
    Navigated(Url),
    /// A custom command handler ran.
    Custom,
    /// Nothing to do.
    Ignored,
}

pub struct NavigationSession<H: Host> {
    document: Document,
    host: H,
    graph: NavigationGraph,
    current: String,
    prev_focus: String,
    prev_action: String,
    bindings: KeyBindings,
    key_codes: KeyCodes,
    flicker: Flicker,
    /// Host time as of the last `tick`; blink timers start from it.
    clock: Instant,
}

impl<H: Host> NavigationSession<H> {
    /// Scan the page, build the graph and focus the entry element.
    ///
    /// Entry is the remembered element when the user came back to this
    /// page, else the configured `focus`, else the last discovered element.
    pub fn new(document: Document, host: H, config: &NavConfig) -> Result<Self, NavError> {
        let registry = ElementRegistry::scan(&document);
        let graph = NavigationGraph::build(&document, &registry, config);

        let prev_focus = host.cookies().get(PREVIOUS_FOCUS_KEY);
        let prev_action = host.cookies().get(ACTION_KEY);

        let entry = if LastAction::parse(&prev_action) == Some(LastAction::Back)
            && graph.contains(&prev_focus)
        {
            log::debug!("resuming focus on `{}`", prev_focus);
            prev_focus.clone()
        } else if let Some(focus) = config.focus.as_deref().filter(|f| graph.contains(f)) {
            focus.to_string()
        } else {
            graph.last().ok_or(NavError::NoFocusableElements)?.to_string()
        };

        let mut session = Self {
            document,
            host,
            graph,
            current: entry.clone(),
            prev_focus,
            prev_action,
            bindings: KeyBindings::with_overrides(&config.event_key),
            key_codes: config.key_codes.clone(),
            flicker: Flicker::default(),
            clock: Instant::now(),
        };
        session.initialize(&entry)?;
        Ok(session)
    }

    /// Focus `id` and apply its focus effects. Unknown ids are ignored.
    ///
    /// Applying the same element twice yields the same visible state.
    pub fn initialize(&mut self, id: &str) -> Result<(), HookError> {
        let Some(node) = self.graph.get(id) else {
            log::debug!("initialize: `{}` is not in the graph", id);
            return Ok(());
        };
        self.current = id.to_string();
        let h = node.handles;
        let doc = &mut self.document;
        let scalable = is_scalable(id);

        if scalable {
            doc.add_class(h.element, SCALE_CLASS);
        }

        if let Some(focus) = h.focus {
            if let (Some(img), Some(src)) = (h.focus_image, node.focus_image()) {
                doc.set_src(img, src);
            }
            doc.show(focus);
            if let Some(wrap) = h.wrap {
                doc.hide(wrap);
            }
        }

        if let Some(select) = h.select {
            doc.show(select);
            if scalable {
                doc.add_class(select, SCALE_CLASS);
            }
            if doc.has_class(select, FLICKER_CLASS) {
                self.flicker.start(select, self.clock);
            }
        }

        if let Some(scroll) = h.scroll {
            marquee::start(doc, scroll);
        }

        if let Some(flag) = h.flag {
            doc.add_class(flag, SCALE_CLASS);
        }

        if let Some(on_focus) = &node.hooks.on_focus {
            on_focus(doc, h.select, h.element)?;
        }
        Ok(())
    }

    /// Move focus one step in `dir`.
    ///
    /// `onmove` runs first and may veto; `move_<dir>` runs after it either
    /// way. Both run before the neighbor is looked up.
    pub fn move_focus(&mut self, dir: Direction) -> Result<Transition, HookError> {
        let Some(node) = self.graph.get(&self.current) else {
            return Ok(Transition::Ignored);
        };

        let vetoed = match &node.hooks.on_move {
            Some(on_move) => on_move(&mut self.document, node, dir)?,
            None => false,
        };
        if let Some(on_dir) = node.hooks.direction(dir) {
            on_dir(&mut self.document, node, dir)?;
        }
        if vetoed {
            log::debug!("move {} from `{}` vetoed", dir, node.id);
            return Ok(Transition::Vetoed);
        }

        let Some(next) = node.neighbor(dir) else {
            return Ok(Transition::NoNeighbor);
        };
        if !self.graph.contains(next) || self.document.query(next).is_none() {
            log::debug!("move {} from `{}`: `{}` does not resolve", dir, node.id, next);
            return Ok(Transition::NoNeighbor);
        }
        let next = next.to_string();
        let from = node.id.clone();
        let h = node.handles;
        let doc = &mut self.document;
        let scalable = is_scalable(&from);

        if scalable {
            doc.remove_class(h.element, SCALE_CLASS);
        }

        if let Some(focus) = h.focus {
            doc.hide(focus);
            if let Some(wrap) = h.wrap {
                doc.show(wrap);
            }
        }

        if let Some(select) = h.select {
            if scalable {
                doc.remove_class(select, SCALE_CLASS);
            }
            doc.hide(select);
        }

        if let Some(flag) = h.flag {
            doc.remove_class(flag, SCALE_CLASS);
        }

        if let Some(on_blur) = &node.hooks.on_blur {
            on_blur(doc, node, &next)?;
        }

        if let Some(scroll) = h.scroll {
            marquee::stop(doc, scroll);
        }

        self.flicker.stop();
        self.initialize(&next)?;
        log::debug!("focus `{}` → `{}`", from, next);
        Ok(Transition::Moved { from, to: next })
    }

    /// Activate the focused element: its `action` hook, else its link.
    pub fn enter(&mut self) -> Result<Transition, HookError> {
        self.host
            .cookies_mut()
            .set(ACTION_KEY, LastAction::Enter.as_str(), NAV_COOKIE_DAYS);

        let Some(node) = self.graph.get(&self.current) else {
            return Ok(Transition::Ignored);
        };
        if let Some(action) = &node.hooks.action {
            action(&mut self.document, node)?;
            return Ok(Transition::Action);
        }

        let target = self.document.title_of(node.handles.element);
        if target.is_empty() {
            return Ok(Transition::Ignored);
        }
        let url = match self.document.url.join(target) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("`{}` has an unusable link `{}`: {}", node.id, target, e);
                return Ok(Transition::Ignored);
            }
        };
        if is_resumable(&node.id) {
            self.host
                .cookies_mut()
                .set(PREVIOUS_FOCUS_KEY, &node.id, NAV_COOKIE_DAYS);
        }
        self.host.navigate(&url);
        Ok(Transition::Navigated(url))
    }

    /// Leave through the page's global back link, if it has one.
    pub fn back(&mut self) -> Result<Transition, HookError> {
        let Some(link) = self.document.query(GLOBAL_BACK_ID) else {
            return Ok(Transition::Ignored);
        };
        let href = self.document.href_of(link);
        if href.is_empty() {
            return Ok(Transition::Ignored);
        }
        let url = match self.document.url.join(href) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("global back link `{}` is unusable: {}", href, e);
                return Ok(Transition::Ignored);
            }
        };
        self.host
            .cookies_mut()
            .set(ACTION_KEY, LastAction::Back.as_str(), NAV_COOKIE_DAYS);
        self.host.navigate(&url);
        Ok(Transition::Navigated(url))
    }

    /// Run `command` through the session's command table.
    pub fn dispatch(&mut self, command: Command) -> Result<Transition, HookError> {
        if let Binding::Custom(handler) = self.bindings.get(command) {
            let Some(node) = self.graph.get(&self.current) else {
                return Ok(Transition::Ignored);
            };
            handler(&mut self.document, node)?;
            return Ok(Transition::Custom);
        }
        match command {
            Command::Enter => self.enter(),
            Command::Back => self.back(),
            Command::Left | Command::Right | Command::Up | Command::Down => {
                match command.direction() {
                    Some(dir) => self.move_focus(dir),
                    None => Ok(Transition::Ignored),
                }
            }
        }
    }

    /// Translate a key code and dispatch it. Unbound keys are ignored.
    pub fn handle_key(&mut self, code: u32) -> Result<Transition, HookError> {
        match self.key_codes.command_for(code) {
            Some(command) => self.dispatch(command),
            None => Ok(Transition::Ignored),
        }
    }

    /// Advance the blink timer.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.clock = now;
        self.flicker.tick(&mut self.document, now)
    }

    /// End the session: stop timers and hand back the host.
    pub fn teardown(mut self) -> H {
        self.flicker.stop();
        self.host
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Previous-focus cookie as read at construction.
    pub fn prev_focus(&self) -> &str {
        &self.prev_focus
    }

    /// Last-action cookie as read at construction.
    pub fn prev_action(&self) -> &str {
        &self.prev_action
    }

    pub fn graph(&self) -> &NavigationGraph {
        &self.graph
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_blinking(&self) -> bool {
        self.flicker.is_active()
    }
}
