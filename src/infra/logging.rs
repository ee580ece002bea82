//! Process-level diagnostics: the tracing subscriber and the panic hook.
//!
//! stdout belongs to the TUI, so diagnostics go to files under the store dir.
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crossterm::{
    ExecutableCommand,
    event::DisableBracketedPaste,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tracing_subscriber::EnvFilter;

use ac_base::config::constants::{ENV_LOG_FILTER, ERRORS_DIR, LOG_FILE, LOGS_DIR, PANIC_LOG_FILE};

/// Install the file subscriber. Failure to open the log file leaves
/// tracing uninstalled; the app still runs.
pub fn init(store_dir: &Path) {
    let dir = store_dir.join(LOGS_DIR);
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Cannot create log dir {}: {}", dir.display(), e);
        return;
    }
    let path = dir.join(LOG_FILE);
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", path.display(), e);
            return;
        }
    };

    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(Mutex::new(file)).with_ansi(false).try_init();
}

/// Restore the terminal and append the panic to `<store>/errors/panic.log`
/// before handing over to the default hook.
pub fn install_panic_hook(store_dir: &Path) {
    let error_dir = store_dir.join(ERRORS_DIR);
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableBracketedPaste);
        let _ = io::stdout().execute(LeaveAlternateScreen);

        let _ = fs::create_dir_all(&error_dir);
        let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("[{}] {}\n\n{}\n\n---\n", ts, info, backtrace);
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(error_dir.join(PANIC_LOG_FILE))
            .and_then(|mut f| f.write_all(msg.as_bytes()));

        tracing::error!("panic: {}", info);
        default_hook(info);
    }));
}
