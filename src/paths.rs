// Paths - where the config file and saved files live

use std::io;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "textpilot";
const CONFIG_FILE_NAME: &str = "config.json";
const FILES_DIR_NAME: &str = "saved_files";

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} directory not found", what))
}

/// Returns {os config dir}/textpilot/
pub fn config_dir() -> io::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| not_found("Config"))?;
    Ok(base.join(APP_DIR_NAME))
}

/// Returns {os config dir}/textpilot/config.json
pub fn config_file_path() -> io::Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Returns {os data dir}/textpilot/saved_files/
pub fn files_dir() -> io::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| not_found("App data"))?;
    Ok(base.join(APP_DIR_NAME).join(FILES_DIR_NAME))
}

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;
