use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "aquaconsole";
const APPLICATION: &str = "aquaconsole";

/// Directory holding `config.toml` and the session token.
///
/// An explicit override wins; otherwise the platform config directory is
/// used, and `./.aquaconsole` when no home directory can be determined.
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".aquaconsole"))
}

pub fn config_file(dir: &Path) -> PathBuf {
    dir.join("config.toml")
}

pub fn token_file(dir: &Path) -> PathBuf {
    dir.join("token")
}
