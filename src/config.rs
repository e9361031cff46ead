use std::ffi::OsString;
use std::path::PathBuf;

use crate::windowing::Window;

const APP_DIR: &str = "dcmviewer";
const FOLDERS_FILE_NAME: &str = "folders.txt";
const FALLBACK_FOLDERS_FILE: &str = "dcmviewer-folders.txt";

const FOLDERS_FILE_ENV: &str = "DCMVIEWER_FOLDERS_FILE";
const DRAG_SENSITIVITY_ENV: &str = "DCMVIEWER_DRAG_SENSITIVITY";

const DEFAULT_DRAG_SENSITIVITY: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Config {
    /// Plain-text file holding the registered scan folders, one per line.
    pub folders_file: PathBuf,
    pub default_window: Window,
    /// HU per pixel of right-button drag.
    pub drag_sensitivity: f64,
}

impl Config {
    pub fn from_env() -> Self {
        let folders_file =
            resolve_folders_file(std::env::var_os(FOLDERS_FILE_ENV), dirs::config_dir());
        let drag_sensitivity = std::env::var(DRAG_SENSITIVITY_ENV)
            .ok()
            .and_then(|raw| {
                let parsed = parse_sensitivity(&raw);
                if parsed.is_none() {
                    log::warn!("Ignoring invalid {DRAG_SENSITIVITY_ENV}={raw:?}");
                }
                parsed
            })
            .unwrap_or(DEFAULT_DRAG_SENSITIVITY);

        log::info!("Folder registry file: {}", folders_file.display());

        Self {
            folders_file,
            default_window: Window::default(),
            drag_sensitivity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            folders_file: PathBuf::from(FALLBACK_FOLDERS_FILE),
            default_window: Window::default(),
            drag_sensitivity: DEFAULT_DRAG_SENSITIVITY,
        }
    }
}

fn resolve_folders_file(overridden: Option<OsString>, config_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = overridden.filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }

    match config_dir {
        Some(dir) => dir.join(APP_DIR).join(FOLDERS_FILE_NAME),
        None => {
            log::warn!("No config directory found, keeping folder list in the working directory");
            PathBuf::from(FALLBACK_FOLDERS_FILE)
        }
    }
}

fn parse_sensitivity(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
