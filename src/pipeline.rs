//! Sequential option resolution.
//!
//! flags -> route -> config cascade -> required options -> edit mode.
//! Produces the operation, its arguments and the final option map.

use crate::cli::Cli;
use crate::config::{ConfigLoader, ConfigLocator, ConfigSource, OptionProvider, Precedence};
use crate::edit::{self, EditPolicy};
use crate::error::{ConfigError, ConfigResult};
use crate::options::{OptionStore, OptionValue};
use crate::router::{self, Invocation};
use std::path::PathBuf;
use tracing::debug;

/// Options that must be non-empty once the cascade has run.
pub const REQUIRED_OPTIONS: &[&str] = &["endpoint"];

/// Process facts the defaults and config discovery depend on.
#[derive(Debug, Clone)]
pub struct Context {
    pub user: String,
    pub home: Option<PathBuf>,
}

impl Context {
    /// Context from `$USER` and the platform home directory.
    pub fn from_env() -> Self {
        Self {
            user: std::env::var("USER").unwrap_or_default(),
            home: dirs::home_dir(),
        }
    }
}

/// Everything the handlers receive.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub invocation: Invocation,
    pub options: OptionStore,
    /// Cascade entries in the order they were visited
    pub sources: Vec<ConfigSource>,
}

/// The inputs gathered from the command line.
#[derive(Debug, Clone)]
pub struct Request {
    /// Options explicitly set by flags, overrides included when given
    pub flags: OptionStore,
    /// Positional arguments left after flag parsing
    pub args: Vec<String>,
    pub precedence: Precedence,
}

impl From<&Cli> for Request {
    fn from(cli: &Cli) -> Self {
        let mut flags = cli.flag_options();
        if !cli.overrides.is_empty() {
            flags.set("overrides", cli.overrides());
        }
        Self {
            flags,
            args: cli.args.clone(),
            precedence: cli.precedence,
        }
    }
}

/// Run the full resolution pipeline.
pub fn resolve<P: OptionProvider>(
    request: Request,
    context: &Context,
    locator: &ConfigLocator,
    provider: P,
) -> ConfigResult<Resolution> {
    let mut options = OptionStore::with_defaults(&context.user, context.home.as_deref());
    options.set("overrides", OptionValue::Map(Default::default()));
    options.merge(request.flags.clone());

    let invocation = router::route(request.args);
    debug!(operation = %invocation.operation, args = ?invocation.args, "Routed command");

    let loader = ConfigLoader::with_provider(locator.paths(), provider)
        .with_precedence(request.precedence);
    let sources = loader.load(&mut options, invocation.operation, &request.flags)?;

    check_required(&options)?;

    if let Some(policy) = EditPolicy::for_operation(invocation.operation) {
        let editing = edit::apply(policy, &mut options);
        debug!(operation = %invocation.operation, edit = editing, "Reconciled edit mode");
    }

    debug!(options = ?options, "Resolved options");

    Ok(Resolution {
        invocation,
        options,
        sources,
    })
}

/// Fail if any required option is missing or empty.
pub fn check_required(options: &OptionStore) -> ConfigResult<()> {
    for &name in REQUIRED_OPTIONS {
        let present = options
            .get(name)
            .map(|value| !value.to_string().is_empty())
            .unwrap_or(false);
        if !present {
            return Err(ConfigError::MissingOption(name));
        }
    }
    Ok(())
}
