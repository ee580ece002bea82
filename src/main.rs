mod app;
mod infra;
mod state;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use ac_base::config::Settings;
use ac_base::config::constants::{GENERATE_TIMEOUT_SECS, SNAPSHOT_FILE, STORE_DIR};
use ac_mod_api::AdminClient;
use ac_mod_gallery::Gallery;

use app::App;
use app::headless::{self, Command, USAGE};
use state::persistence::SnapshotStore;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match headless::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let _ = dotenvy::dotenv();
    let store_dir = Path::new(STORE_DIR);
    infra::logging::init(store_dir);

    let mut settings = Settings::load(store_dir);
    settings.apply_env(|key| std::env::var(key).ok());
    tracing::info!(base_url = %settings.base_url, ?command, "agent-console starting");

    if command != Command::Tui {
        let code = headless::run(command, &settings, store_dir);
        if code != 0 {
            std::process::exit(code);
        }
        return Ok(());
    }

    run_tui(settings, store_dir)
}

fn run_tui(settings: Settings, store_dir: &Path) -> io::Result<()> {
    let client = AdminClient::with_timeout(&settings.base_url, Duration::from_secs(GENERATE_TIMEOUT_SECS))
        .map_err(|e| io::Error::other(e.to_string()))?;
    let client = Arc::new(client);
    let store = SnapshotStore::with_background_writer(store_dir.join(SNAPSHOT_FILE))?;
    tracing::debug!(path = %store.path().display(), "form snapshot slot");
    let root = std::env::current_dir()?;
    let gallery = Gallery::from_settings(&settings.gallery, &root, Instant::now());
    tracing::info!(images = gallery.len(), "gallery scanned");

    let mut app = App::new(settings, client.clone(), client, store, gallery);

    infra::logging::install_panic_hook(store_dir);

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = app.run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}
