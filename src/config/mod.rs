//! Configuration cascade.
//!
//! Options are resolved from several layers, each overwriting the keys it
//! sets:
//! 1. **Defaults** - compiled in (see [`crate::options`])
//! 2. **Flags** - parsed from the command line
//! 3. **System** - `/etc/jira-cli.yml`
//! 4. **Ancestors** - every `.jira.d/config.yml` from the filesystem root
//!    down to the working directory
//!
//! Because files are merged after flags, a config file can override an
//! explicit flag unless [`Precedence::Flags`] is selected.
//!
//! ## Executable configs
//! A cascade file with the owner-execute bit set is run instead of read.
//! Its stdout is parsed as YAML. It sees every option resolved so far as a
//! `JIRA_<NAME>` environment variable, plus `JIRA_OPERATION`.

mod env;
mod loader;
mod locator;
mod merge;
mod provider;

pub use env::{ENV_PREFIX, EnvProjector, EnvSnapshot, OPERATION_VAR};
pub use loader::{ConfigLoader, ConfigSource, Precedence, SourceKind};
pub use locator::{CONFIG_MARKER, ConfigLocator, SYSTEM_CONFIG_PATH};
pub use merge::{layer_from_value, parse_layer};
pub use provider::{OptionProvider, ProcessProvider, is_executable};
