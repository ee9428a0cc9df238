//! Where riverbear keeps its files: `config.toml` and the terminal UI log,
//! both under `~/.riverbear/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".riverbear";
const CONFIG_FILE: &str = "config.toml";
const LOG_FILE: &str = "riverbear.log";

fn home() -> io::Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "no home directory to hold ~/.riverbear",
        )
    })
}

/// `<home>/.riverbear`, created on first use.
fn app_dir_in(home: &Path) -> io::Result<PathBuf> {
    let dir = home.join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Settings file read at startup. It may not exist yet.
pub fn config_file() -> io::Result<PathBuf> {
    Ok(app_dir_in(&home()?)?.join(CONFIG_FILE))
}

/// Log file the terminal UI writes to instead of the screen.
pub fn log_file() -> io::Result<PathBuf> {
    Ok(app_dir_in(&home()?)?.join(LOG_FILE))
}
