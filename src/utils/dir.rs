use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};

pub const APPLICATION_NAME: &str = "liftlog";

const STORE_DIR: &str = "store";
const LOGS_DIR: &str = "logs";

/// Directory holding one json file per stored collection.
pub fn store_path(app_dir: &Path) -> PathBuf {
    app_dir.join(STORE_DIR)
}

/// Directory holding the rotated log files.
pub fn logs_path(app_dir: &Path) -> PathBuf {
    app_dir.join(LOGS_DIR)
}

/// Resolves the directory used for the store and the logs. Tries $XDG_STATE_HOME and
/// $HOME/.local/state on unix systems and %APPDATA% on Windows.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = env::var("APPDATA")
                .map(PathBuf::from)
                .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
            path.push(APPLICATION_NAME);
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| {
                    env::var("HOME").map(|home| {
                        let mut path = PathBuf::from(home);
                        path.push(".local/state");
                        path
                    })
                })
                .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
            path.push(APPLICATION_NAME);
            path
        }
    };

    create_application_path(path)
}

/// Makes sure a user supplied directory exists before anything is written into it.
pub fn create_application_path(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}
