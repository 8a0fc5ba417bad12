//! File logging. The terminal belongs to the UI, so log lines go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use directories::ProjectDirs;
use env_logger::{Env, Target, WriteStyle};

/// Environment variable holding the log filter, e.g. `FOLIO_LOG=debug`.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Location of the log file, if a data directory exists.
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.data_local_dir().join("folio.log"))
}

/// Route `log` output to the log file. Leaves logging off if the file cannot
/// be opened.
pub fn init() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .try_init();

    log::info!("logging to {}", path.display());
}
