use anyhow::{Context, Result};
use std::env::{self, consts::OS};
use std::fs;
use std::path::PathBuf;

pub const APP_DIR: &str = "todoapp";

/// Platform-specific application data directory.
///
/// - **Windows**: `%LOCALAPPDATA%\todoapp`
/// - **macOS**: `~/Library/Application Support/todoapp`
/// - **Linux**: `$XDG_DATA_HOME/todoapp`, falling back to `~/.local/share/todoapp`
///
/// Without the relevant variables the current directory is used.
#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStorage {
    pub fn new() -> Self {
        Self {
            base_path: platform_root().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR),
        }
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    /// Resolves `file_name` inside the data directory, creating the directory if needed.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_path).with_context(|| format!("creating {}", self.base_path.display()))?;
        Ok(self.base_path.join(file_name))
    }
}

fn platform_root() -> Option<PathBuf> {
    let home = || env::var_os("HOME").map(PathBuf::from);
    match OS {
        "windows" => env::var_os("LOCALAPPDATA").map(PathBuf::from),
        "macos" => home().map(|h| h.join("Library").join("Application Support")),
        _ => env::var_os("XDG_DATA_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| home().map(|h| h.join(".local").join("share"))),
    }
}
