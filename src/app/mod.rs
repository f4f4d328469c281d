//! `DpadApp`: the headless driver state.
//!
//! Holds the live navigation session for the current page and the list of
//! pages visited so far. Page loading and the follow-the-link loop live in
//! `navigation`.

pub mod navigation;

use std::path::PathBuf;

use url::Url;

use alice_dpad::dom::Document;
use alice_dpad::host::MemoryHost;
use alice_dpad::nav::config::{ConfigError, HookError};
use alice_dpad::nav::keys::Command;
use alice_dpad::nav::session::{NavError, Transition};
use alice_dpad::nav::{NavConfig, NavigationSession};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} cannot be opened as a page", .0.display())]
    BadPath(PathBuf),
    #[error("{0} is not a local page")]
    NotLocal(Url),
    #[error("bad navigation config: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Hook(#[from] HookError),
}

pub struct DpadApp {
    pub session: NavigationSession<MemoryHost>,
    /// Pages visited, oldest first.
    pub history: Vec<Url>,
    /// Initial focus forced on every page.
    pub focus: Option<String>,
}

impl DpadApp {
    /// Page configuration: the embedded `nav-config` JSON, if any, plus the
    /// command-line focus override.
    fn config_for(doc: &Document, focus: Option<&str>) -> Result<NavConfig, AppError> {
        let mut config = match doc.nav_config() {
            Some(json) => NavConfig::from_json(json)?,
            None => NavConfig::new(),
        };
        if let Some(focus) = focus {
            config = config.with_focus(focus);
        }
        Ok(config)
    }

    /// Run one key token: a numeric key code or a command name.
    pub fn press(&mut self, token: &str) -> Result<Transition, AppError> {
        let transition = if let Ok(code) = token.parse::<u32>() {
            self.session.handle_key(code)?
        } else if let Some(command) = Command::parse(&token.to_ascii_lowercase()) {
            self.session.dispatch(command)?
        } else {
            log::warn!("unknown key `{}`", token);
            Transition::Ignored
        };
        Ok(transition)
    }

    pub fn current_page(&self) -> &Url {
        &self.session.document().url
    }
}
