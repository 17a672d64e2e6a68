//! Executable configs as external option providers.
//!
//! A cascade entry with the owner-execute bit set is run rather than read.
//! It gets no arguments, inherits the environment plus the projected
//! options, and must print a YAML mapping on stdout.

use super::env::EnvSnapshot;
use crate::error::{ConfigError, ConfigResult};
use std::fs::Metadata;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Source of YAML produced by running a config entry.
pub trait OptionProvider {
    /// Run the provider at `path` with `env` layered over the inherited
    /// environment, returning its standard output.
    fn provide(&self, path: &Path, env: &EnvSnapshot) -> ConfigResult<String>;
}

/// Runs executable configs as blocking child processes.
///
/// There is no timeout: a hung script blocks resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessProvider;

impl OptionProvider for ProcessProvider {
    fn provide(&self, path: &Path, env: &EnvSnapshot) -> ConfigResult<String> {
        debug!(path = %path.display(), vars = env.len(), "Running executable config");

        let output = Command::new(path)
            .envs(env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ConfigError::ExecutableSpawn {
                path: path.to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConfigError::ExecutableFailed {
                path: path.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Whether a cascade entry should be executed instead of parsed.
#[cfg(unix)]
pub fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
pub fn is_executable(_metadata: &Metadata) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::EnvProjector;
    use crate::options::OptionStore;
    use crate::router::Operation;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str, mode: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_owner_execute_bit_detection() {
        let temp = TempDir::new().unwrap();
        let exec = write_script(temp.path(), "exec.yml", "", 0o744);
        let group_only = write_script(temp.path(), "group.yml", "", 0o654);
        let plain = write_script(temp.path(), "plain.yml", "", 0o644);

        assert!(is_executable(&fs::metadata(exec).unwrap()));
        assert!(!is_executable(&fs::metadata(group_only).unwrap()));
        assert!(!is_executable(&fs::metadata(plain).unwrap()));
        assert!(!is_executable(&fs::metadata(temp.path()).unwrap()));
    }

    #[test]
    fn test_process_provider_sees_projected_env() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            temp.path(),
            "config.yml",
            "#!/bin/sh\necho \"seen_project: $JIRA_PROJECT\"\necho \"seen_op: $JIRA_OPERATION\"\n",
            0o755,
        );

        let mut store = OptionStore::new();
        store.set("project", "ABC");
        let env = EnvProjector::default().project(&store, Some(Operation::List));

        let stdout = ProcessProvider.provide(&script, &env).unwrap();
        assert!(stdout.contains("seen_project: ABC"));
        assert!(stdout.contains("seen_op: list"));
    }

    #[test]
    fn test_process_provider_reports_failure_with_stderr() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            temp.path(),
            "config.yml",
            "#!/bin/sh\necho 'token lookup failed' >&2\nexit 3\n",
            0o755,
        );

        let err = ProcessProvider
            .provide(&script, &EnvSnapshot::default())
            .unwrap_err();
        match err {
            ConfigError::ExecutableFailed { path, stderr, .. } => {
                assert_eq!(path, script);
                assert!(stderr.contains("token lookup failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_provider_gives_child_empty_stdin() {
        let temp = TempDir::new().unwrap();
        let script = write_script(
            temp.path(),
            "config.yml",
            "#!/bin/sh\nif read line; then echo 'stdin: data'; else echo 'stdin: eof'; fi\n",
            0o755,
        );

        let stdout = ProcessProvider
            .provide(&script, &EnvSnapshot::default())
            .unwrap();
        assert_eq!(stdout.trim(), "stdin: eof");
    }
}
