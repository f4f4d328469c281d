//! Host-side collaborators: the persisted key/value store and the browsing
//! context that link targets are navigated to.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use url::Url;

/// Cookie holding the id focused before an `enter` navigation.
pub const PREVIOUS_FOCUS_KEY: &str = "previous_focus";
/// Cookie holding the last page-leaving action.
pub const ACTION_KEY: &str = "action";
/// Lifetime of the navigation cookies, in days.
pub const NAV_COOKIE_DAYS: u32 = 1;

/// How the user last left a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastAction {
    Enter,
    Back,
}

impl LastAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LastAction::Enter => "enter",
            LastAction::Back => "back",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "enter" => Some(LastAction::Enter),
            "back" => Some(LastAction::Back),
            _ => None,
        }
    }
}

/// Cookie-like persisted store. Missing keys read as `""`.
pub trait CookieStore {
    fn set(&mut self, key: &str, value: &str, days: u32);
    fn get(&self, key: &str) -> String;
    fn del(&mut self, key: &str);
}

/// Everything a session needs from its environment.
pub trait Host {
    type Cookies: CookieStore;

    fn cookies(&self) -> &Self::Cookies;
    fn cookies_mut(&mut self) -> &mut Self::Cookies;
    /// Send the browsing context to `target`.
    fn navigate(&mut self, target: &Url);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Cookie {
    value: String,
    /// Seconds since the epoch.
    expires: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// In-memory cookie jar with day-granular expiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCookies {
    entries: HashMap<String, Cookie>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Drop expired entries.
    pub fn purge(&mut self) {
        let now = now_secs();
        self.entries.retain(|_, c| c.expires > now);
    }
}

impl CookieStore for MemoryCookies {
    fn set(&mut self, key: &str, value: &str, days: u32) {
        let expires = now_secs() + u64::from(days) * 86_400;
        self.entries.insert(
            key.to_string(),
            Cookie {
                value: value.to_string(),
                expires,
            },
        );
    }

    fn get(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(c) if c.expires > now_secs() => c.value.clone(),
            _ => String::new(),
        }
    }

    fn del(&mut self, key: &str) {
        if let Some(c) = self.entries.get_mut(key) {
            c.value.clear();
            c.expires = 0;
        }
    }
}

/// Host that keeps cookies in memory and records navigations instead of
/// performing them.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub cookies: MemoryCookies,
    history: Vec<Url>,
    pending: Option<Url>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookies(cookies: MemoryCookies) -> Self {
        Self {
            cookies,
            ..Self::default()
        }
    }

    /// Every navigation requested so far, oldest first.
    pub fn history(&self) -> &[Url] {
        &self.history
    }

    /// The navigation requested since the last call, if any.
    pub fn take_navigation(&mut self) -> Option<Url> {
        self.pending.take()
    }
}

impl Host for MemoryHost {
    type Cookies = MemoryCookies;

    fn cookies(&self) -> &MemoryCookies {
        &self.cookies
    }

    fn cookies_mut(&mut self) -> &mut MemoryCookies {
        &mut self.cookies
    }

    fn navigate(&mut self, target: &Url) {
        log::info!("navigate → {}", target);
        self.history.push(target.clone());
        self.pending = Some(target.clone());
    }
}
