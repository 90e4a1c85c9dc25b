//! Runtime configuration
//!
//! Built from the command line by [`CliArgs::to_config`](crate::cli::CliArgs::to_config).

use std::path::PathBuf;

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = ".ledgerbook";

const CACHE_FILE: &str = "local-cache.json";
const REMOTE_DIR: &str = "remote";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of everything the bookkeeper writes
    pub data_dir: PathBuf,

    /// Signed-in user; the remote store is scoped to this name
    pub user: Option<String>,

    /// Skip the remote store and work on the local cache only
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            user: None,
            offline: false,
        }
    }
}

impl Config {
    /// Location of the local snapshot
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(CACHE_FILE)
    }

    /// Location of the user's remote document
    ///
    /// `None` when running offline or when no (non-blank) user is set.
    /// Characters outside `[A-Za-z0-9_.-]` in the user name become `_`.
    pub fn remote_path(&self) -> Option<PathBuf> {
        if self.offline {
            return None;
        }
        let user = self.user.as_deref()?.trim();
        if user.is_empty() {
            return None;
        }

        let file_stem: String = user
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        Some(
            self.data_dir
                .join(REMOTE_DIR)
                .join(format!("{}.json", file_stem)),
        )
    }
}
