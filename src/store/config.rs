use super::{DocumentBackend, ResultBackend, SqliteBackend};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which backend persists results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    Document,
}

impl BackendKind {
    pub fn default_file_name(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "results.db",
            BackendKind::Document => "results.json",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Document => write!(f, "document"),
        }
    }
}

/// `store:` section of the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Data file location, with `~/` expanded. Falls back to a
    /// backend-specific file in `config_dir`.
    pub fn resolved_path(&self, config_dir: &Path) -> PathBuf {
        match &self.path {
            Some(path) => expand_home(path),
            None => config_dir.join(self.backend.default_file_name()),
        }
    }

    /// Build the configured backend. Nothing is opened until it is initialized.
    pub fn build_backend(&self, config_dir: &Path) -> Box<dyn ResultBackend> {
        let path = self.resolved_path(config_dir);
        match self.backend {
            BackendKind::Sqlite => Box::new(SqliteBackend::open(path)),
            BackendKind::Document => Box::new(DocumentBackend::open(path)),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
