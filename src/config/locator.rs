//! Discovery of the config cascade.
//!
//! The cascade is an ordered precedence chain: the system-wide file first,
//! then every `.jira.d/config.yml` found between the filesystem root (or a
//! stopping boundary) and the working directory, shallowest first. The file
//! nearest the working directory is consulted last and therefore wins.

use std::path::{Path, PathBuf};

/// Marker path searched for in every ancestor directory.
pub const CONFIG_MARKER: &str = ".jira.d/config.yml";

/// System-wide config, always the first cascade entry.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/jira-cli.yml";

/// Finds the ordered list of config files to consult.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    /// Relative marker path joined onto each directory
    pub marker: PathBuf,
    /// Fixed system path, prepended whether or not it exists
    pub system_path: PathBuf,
    /// Directory the search starts from
    pub cwd: PathBuf,
    /// Home directory, consulted even when the cwd is outside it
    pub home: Option<PathBuf>,
    /// Directory at which the upward walk stops (inclusive)
    pub boundary: Option<PathBuf>,
}

impl ConfigLocator {
    /// Locator for the current process: real cwd and home directory.
    pub fn discover() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?, dirs::home_dir()))
    }

    /// Locator with explicit directories and the default marker/system path.
    pub fn new(cwd: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            marker: PathBuf::from(CONFIG_MARKER),
            system_path: PathBuf::from(SYSTEM_CONFIG_PATH),
            cwd: cwd.into(),
            home,
            boundary: None,
        }
    }

    pub fn with_system_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_path = path.into();
        self
    }

    /// Stop ascending once this directory has been checked.
    pub fn with_boundary(mut self, boundary: impl Into<PathBuf>) -> Self {
        self.boundary = Some(boundary.into());
        self
    }

    /// Ordered cascade: system path, then existing markers shallow-to-deep.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.system_path.clone()];

        if let Some(home) = &self.home {
            if !self.cwd.starts_with(home) {
                let candidate = home.join(&self.marker);
                if candidate.exists() {
                    paths.push(candidate);
                }
            }
        }

        let mut found: Vec<PathBuf> = Vec::new();
        for dir in self.cwd.ancestors() {
            let candidate = dir.join(&self.marker);
            if candidate.exists() {
                found.push(candidate);
            }
            if self.is_boundary(dir) {
                break;
            }
        }
        found.reverse();

        paths.extend(found);
        paths
    }

    fn is_boundary(&self, dir: &Path) -> bool {
        self.boundary.as_deref() == Some(dir)
    }
}
