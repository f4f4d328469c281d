//! Page loading and link following for `DpadApp`.
//!
//! Navigations requested by the session are recorded by the host; `follow`
//! picks them up, tears the old session down and builds a new one on the
//! target page with the same cookie jar, so back-resume works across pages.

use std::path::Path;
use std::time::Instant;

use url::Url;

use alice_dpad::dom::parser::parse_html;
use alice_dpad::dom::Document;
use alice_dpad::host::MemoryHost;
use alice_dpad::nav::NavigationSession;

use super::{AppError, DpadApp};

/// Read and parse a local page.
pub fn load_document(url: &Url) -> Result<Document, AppError> {
    let path = url
        .to_file_path()
        .map_err(|_| AppError::NotLocal(url.clone()))?;
    let started = Instant::now();
    let html = std::fs::read_to_string(&path).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;
    let doc = parse_html(&html, url.clone());
    log::info!(
        "loaded {} ({} elements, {:.1}ms)",
        path.display(),
        doc.len(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(doc)
}

/// `file://` URL for a local page path.
pub fn file_url(path: &Path) -> Result<Url, AppError> {
    let absolute = std::fs::canonicalize(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Url::from_file_path(&absolute).map_err(|_| AppError::BadPath(absolute))
}

impl DpadApp {
    /// Open the page at `url` with `host`.
    pub fn open(url: &Url, host: MemoryHost, focus: Option<String>) -> Result<Self, AppError> {
        let doc = load_document(url)?;
        let config = Self::config_for(&doc, focus.as_deref())?;
        let session = NavigationSession::new(doc, host, &config)?;
        Ok(Self {
            session,
            history: vec![url.clone()],
            focus,
        })
    }

    /// Follow the navigation the last command requested, if any.
    /// Returns whether a new page was opened.
    pub fn follow(&mut self) -> Result<bool, AppError> {
        let Some(target) = self.session.host_mut().take_navigation() else {
            return Ok(false);
        };
        if target.scheme() != "file" {
            log::warn!("not following {}: only local pages are supported", target);
            return Ok(false);
        }

        let doc = load_document(&target)?;
        let config = Self::config_for(&doc, self.focus.as_deref())?;
        let host = self.session.host().clone();
        let session = NavigationSession::new(doc, host, &config)?;
        // Only replace the old session once the new page is up.
        let old = std::mem::replace(&mut self.session, session);
        drop(old.teardown());

        self.history.push(target);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alice_dpad::nav::session::Transition;

    const HOME: &str = r#"<html><head><title>Home</title>
        <script type="application/json" id="nav-config">{"focus": "page_card_1"}</script>
        </head><body>
        <img id="page_card_1" title="detail.html" style="position:absolute;left:0px;top:0px" width="200" height="100">
        <img id="page_card_2" title="detail.html" style="position:absolute;left:300px;top:0px" width="200" height="100">
    </body></html>"#;

    const DETAIL: &str = r#"<html><body>
        <a id="global_back" href="home.html"></a>
        <img id="focus_play" style="position:absolute;left:0px;top:0px" width="200" height="100">
    </body></html>"#;

    fn site(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("alice-dpad-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("home.html"), HOME).unwrap();
        std::fs::write(dir.join("detail.html"), DETAIL).unwrap();
        dir
    }

    #[test]
    fn back_resumes_focus_across_pages() {
        let dir = site("resume");
        let home = file_url(&dir.join("home.html")).unwrap();
        let mut app = DpadApp::open(&home, MemoryHost::new(), None).unwrap();
        assert_eq!(app.session.current(), "page_card_1");

        app.press("right").unwrap();
        assert!(matches!(app.press("13").unwrap(), Transition::Navigated(_)));
        assert!(app.follow().unwrap());
        assert_eq!(app.session.current(), "focus_play");

        assert!(matches!(app.press("back").unwrap(), Transition::Navigated(_)));
        assert!(app.follow().unwrap());
        assert_eq!(app.current_page(), &home);
        // The page asks for page_card_1, the cookie wins
        assert_eq!(app.session.current(), "page_card_2");
        assert_eq!(app.history.len(), 3);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn nothing_to_follow() {
        let dir = site("idle");
        let home = file_url(&dir.join("home.html")).unwrap();
        let mut app = DpadApp::open(&home, MemoryHost::new(), Some("page_card_2".into())).unwrap();
        assert_eq!(app.session.current(), "page_card_2");
        assert_eq!(app.press("bogus").unwrap(), Transition::Ignored);
        assert!(!app.follow().unwrap());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_page_is_an_io_error() {
        let url = Url::parse("file:///nonexistent/alice-dpad/page.html").unwrap();
        assert!(matches!(load_document(&url), Err(AppError::Io { .. })));
        let remote = Url::parse("http://stb.local/page.html").unwrap();
        assert!(matches!(load_document(&remote), Err(AppError::NotLocal(_))));
    }
}
