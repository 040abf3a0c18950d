//! Minimal `.env` loader (KEY=VALUE lines).
//!
//! Loaded values never override variables already present in the process
//! environment, so real env vars keep priority over the dotfile.

use std::path::{Path, PathBuf};

/// Load environment variables from the first `.env` file found among the
/// usual locations. Silently does nothing when no file exists.
pub fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root (gembot/) — two levels up from crates/gembot-config/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        PathBuf::from(".env"),
    ];

    for path in &candidates {
        if load_dotenv_from(path) {
            tracing::debug!(path = %path.display(), "loaded .env file");
            return;
        }
    }
}

/// Load a specific dotfile. Returns false when the file cannot be read.
pub fn load_dotenv_from(path: &Path) -> bool {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return false;
    };

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if std::env::var(key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
    true
}
