//! `alice-dpad`: drive a TV page with remote-control keys from the terminal.
//!
//! Usage:
//!   alice-dpad page.html --keys right,right,down,enter
//!   alice-dpad page.html --routes
//!   echo "39 39 13" | alice-dpad page.html --cookies jar.json

mod app;

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use alice_dpad::host::{MemoryCookies, MemoryHost};
use alice_dpad::nav::session::Transition;

use app::navigation::file_url;
use app::{AppError, DpadApp};

#[derive(Parser)]
#[command(name = "alice-dpad")]
#[command(about = "Remote-control focus navigation over local HTML pages")]
struct Cli {
    /// Page to open
    page: PathBuf,

    /// Keys to press (comma-separated key codes or command names).
    /// Read from stdin when omitted.
    #[arg(short, long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Print the computed route table as JSON and exit
    #[arg(long)]
    routes: bool,

    /// Cookie jar file, loaded before and saved after the run
    #[arg(long)]
    cookies: Option<PathBuf>,

    /// Initial focus, overriding the page's own
    #[arg(long)]
    focus: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("alice-dpad: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let cookies = match &cli.cookies {
        Some(path) if path.exists() => load_cookies(path)?,
        _ => MemoryCookies::new(),
    };

    let url = file_url(&cli.page)?;
    let mut app = DpadApp::open(&url, MemoryHost::with_cookies(cookies), cli.focus.clone())?;

    if cli.routes {
        match app.session.graph().route_table_json() {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("route table: {}", e),
        }
        return Ok(());
    }

    println!("{} focus={}", app.current_page(), app.session.current());

    if cli.keys.is_empty() {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.map_err(|source| AppError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
            for token in line.split(|c: char| c.is_whitespace() || c == ',') {
                if !token.is_empty() {
                    step(&mut app, token)?;
                }
            }
        }
    } else {
        for token in &cli.keys {
            step(&mut app, token.trim())?;
        }
    }

    if let Some(path) = &cli.cookies {
        save_cookies(path, &app)?;
    }
    log::info!("visited {} page(s)", app.history.len());
    Ok(())
}

fn step(app: &mut DpadApp, token: &str) -> Result<(), AppError> {
    let transition = app.press(token)?;
    app.session.tick(Instant::now());
    match &transition {
        Transition::Navigated(_) => {
            if app.follow()? {
                println!("{} focus={}", app.current_page(), app.session.current());
            } else {
                println!("{:<6} {:?}", token, transition);
            }
        }
        _ => println!("{:<6} {:?} focus={}", token, transition, app.session.current()),
    }
    Ok(())
}

fn load_cookies(path: &Path) -> Result<MemoryCookies, AppError> {
    let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match MemoryCookies::from_json(&json) {
        Ok(mut jar) => {
            jar.purge();
            Ok(jar)
        }
        Err(e) => {
            log::warn!("ignoring unreadable cookie jar {}: {}", path.display(), e);
            Ok(MemoryCookies::new())
        }
    }
}

fn save_cookies(path: &Path, app: &DpadApp) -> Result<(), AppError> {
    let json = match app.session.host().cookies.to_json() {
        Ok(json) => json,
        Err(e) => {
            log::error!("cookie jar not saved: {}", e);
            return Ok(());
        }
    };
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}
