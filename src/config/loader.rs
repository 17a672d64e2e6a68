//! Cascade loader.
//!
//! Walks the located config paths in order and merges each one into the
//! option store. Static files are parsed as YAML; executable files are run
//! through an [`OptionProvider`] and their stdout is parsed instead.

use super::env::EnvProjector;
use super::merge::parse_layer;
use super::provider::{OptionProvider, ProcessProvider, is_executable};
use crate::error::ConfigResult;
use crate::options::OptionStore;
use crate::router::Operation;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Who wins when a config file and a command-line flag set the same option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Precedence {
    /// Config files overwrite flags (files are merged after flags)
    #[default]
    Config,
    /// Flags are re-applied after the cascade and always win
    Flags,
}

impl std::fmt::Display for Precedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Precedence::Config => write!(f, "config"),
            Precedence::Flags => write!(f, "flags"),
        }
    }
}

/// How a cascade entry was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Path does not exist
    Missing,
    /// Static YAML merged
    Static,
    /// Executable ran and its output merged
    Executable,
    /// File could not be read or did not parse; contributed nothing
    Ignored,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Missing => write!(f, "missing"),
            SourceKind::Static => write!(f, "static"),
            SourceKind::Executable => write!(f, "executable"),
            SourceKind::Ignored => write!(f, "ignored"),
        }
    }
}

/// One visited cascade entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Number of options the entry contributed
    pub options: usize,
}

/// Loads an ordered list of config paths into an [`OptionStore`].
pub struct ConfigLoader<P = ProcessProvider> {
    paths: Vec<PathBuf>,
    provider: P,
    projector: EnvProjector,
    precedence: Precedence,
}

impl ConfigLoader<ProcessProvider> {
    /// Loader that runs executable configs as real child processes.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self::with_provider(paths, ProcessProvider)
    }
}

impl<P: OptionProvider> ConfigLoader<P> {
    /// Loader with a custom provider for executable entries.
    pub fn with_provider(paths: Vec<PathBuf>, provider: P) -> Self {
        Self {
            paths,
            provider,
            projector: EnvProjector::default(),
            precedence: Precedence::default(),
        }
    }

    pub fn with_precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Run the cascade.
    ///
    /// `flags` holds the options set on the command line; they are already
    /// merged into `store` and are only consulted again for
    /// [`Precedence::Flags`]. A failing executable config aborts the cascade
    /// and leaves `store` with every layer merged before it.
    pub fn load(
        &self,
        store: &mut OptionStore,
        operation: Operation,
        flags: &OptionStore,
    ) -> ConfigResult<Vec<ConfigSource>> {
        let mut sources = Vec::with_capacity(self.paths.len());

        for path in &self.paths {
            let source = self.load_one(path, store, operation)?;
            debug!(
                path = %source.path.display(),
                kind = %source.kind,
                options = source.options,
                "Visited config source"
            );
            sources.push(source);
        }

        if self.precedence == Precedence::Flags {
            debug!(count = flags.len(), "Re-applying command-line flags over config files");
            store.merge(flags.clone());
        }

        Ok(sources)
    }

    fn load_one(
        &self,
        path: &Path,
        store: &mut OptionStore,
        operation: Operation,
    ) -> ConfigResult<ConfigSource> {
        let Ok(metadata) = std::fs::metadata(path) else {
            return Ok(ConfigSource {
                path: path.to_path_buf(),
                kind: SourceKind::Missing,
                options: 0,
            });
        };

        if is_executable(&metadata) {
            debug!(path = %path.display(), "Found executable config file");
            let env = self.projector.project(store, Some(operation));
            let stdout = self.provider.provide(path, &env)?;
            return Ok(Self::merge_layer(path, &stdout, store, SourceKind::Executable));
        }

        debug!(path = %path.display(), "Found config file");
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::merge_layer(path, &content, store, SourceKind::Static)),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Config file unreadable, skipping");
                Ok(ConfigSource {
                    path: path.to_path_buf(),
                    kind: SourceKind::Ignored,
                    options: 0,
                })
            }
        }
    }

    fn merge_layer(
        path: &Path,
        content: &str,
        store: &mut OptionStore,
        kind: SourceKind,
    ) -> ConfigSource {
        match parse_layer(content) {
            Ok(layer) => {
                let options = layer.len();
                store.merge(layer);
                ConfigSource {
                    path: path.to_path_buf(),
                    kind,
                    options,
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Config did not parse as YAML, skipping");
                ConfigSource {
                    path: path.to_path_buf(),
                    kind: SourceKind::Ignored,
                    options: 0,
                }
            }
        }
    }
}
