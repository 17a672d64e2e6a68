//! Hand-off from a resolved invocation to the issue handlers.
//!
//! The REST client lives behind [`IssueHandler`]. This module only decides
//! which handler entry points run, with which arguments, and applies the
//! operation-specific option tweaks beforehand.

use crate::error::{DispatchError, DispatchResult};
use crate::options::OptionStore;
use crate::router::{Invocation, Operation};
use serde::Serialize;
use std::io::Write;

/// A single handler entry point with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    Login,
    Fields,
    List,
    View { issue: String },
    Edit { issue: String },
    EditMeta { issue: String },
    TransitionMeta { issue: String },
    IssueLinkTypes,
    IssueTypes,
    CreateMeta,
    Create,
    Transitions { issue: String },
    Blocks { blocker: String, issue: String },
    Dups { duplicate: String, issue: String },
    Watch { issue: String },
    Transition { issue: String, transition: String },
    Comment { issue: String },
    Assign { issue: String, assignee: String },
    Browse { issue: String },
    ExportTemplates,
}

/// The downstream collaborator that talks to Jira.
pub trait IssueHandler {
    fn call(&mut self, call: &Call, options: &OptionStore) -> anyhow::Result<()>;
}

/// Run an invocation against a handler.
///
/// Calls run in order and the first failure stops the sequence.
pub fn dispatch<H: IssueHandler>(
    invocation: &Invocation,
    options: &mut OptionStore,
    handler: &mut H,
) -> DispatchResult<()> {
    let required = invocation.operation.required_args();
    if let Some(&name) = required.get(invocation.args.len()) {
        return Err(DispatchError::MissingArgument {
            operation: invocation.operation,
            name,
        });
    }

    let arg = |index: usize| invocation.args[index].clone();

    match invocation.operation {
        Operation::Login => handler.call(&Call::Login, options)?,
        Operation::Fields => handler.call(&Call::Fields, options)?,
        Operation::List => handler.call(&Call::List, options)?,
        Operation::View => handler.call(&Call::View { issue: arg(0) }, options)?,
        Operation::Edit => handler.call(&Call::Edit { issue: arg(0) }, options)?,
        Operation::EditMeta => handler.call(&Call::EditMeta { issue: arg(0) }, options)?,
        Operation::TransMeta => handler.call(&Call::TransitionMeta { issue: arg(0) }, options)?,
        Operation::IssueLinkTypes => handler.call(&Call::IssueLinkTypes, options)?,
        Operation::IssueTypes => handler.call(&Call::IssueTypes, options)?,
        Operation::CreateMeta => handler.call(&Call::CreateMeta, options)?,
        Operation::Create => handler.call(&Call::Create, options)?,
        Operation::Transitions => handler.call(&Call::Transitions { issue: arg(0) }, options)?,
        Operation::Blocks => handler.call(
            &Call::Blocks {
                blocker: arg(0),
                issue: arg(1),
            },
            options,
        )?,
        Operation::Dups => {
            handler.call(
                &Call::Dups {
                    duplicate: arg(0),
                    issue: arg(1),
                },
                options,
            )?;
            options.set("resolution", "Duplicate");
            handler.call(
                &Call::Transition {
                    issue: arg(0),
                    transition: "close".to_string(),
                },
                options,
            )?;
        }
        Operation::Watch => handler.call(&Call::Watch { issue: arg(0) }, options)?,
        Operation::Transition => handler.call(
            &Call::Transition {
                issue: arg(0),
                transition: arg(1),
            },
            options,
        )?,
        Operation::Close
        | Operation::Acknowledge
        | Operation::Reopen
        | Operation::Resolve
        | Operation::Start
        | Operation::Stop => handler.call(
            &Call::Transition {
                issue: arg(0),
                transition: invocation.operation.to_string(),
            },
            options,
        )?,
        Operation::Comment => handler.call(&Call::Comment { issue: arg(0) }, options)?,
        Operation::Take => {
            let user = options
                .get_str("user")
                .ok_or(DispatchError::NotAString("user"))?
                .to_string();
            handler.call(
                &Call::Assign {
                    issue: arg(0),
                    assignee: user,
                },
                options,
            )?
        }
        Operation::Assign => handler.call(
            &Call::Assign {
                issue: arg(0),
                assignee: arg(1),
            },
            options,
        )?,
        Operation::Browse => {
            options.set("browse", true);
            handler.call(&Call::Browse { issue: arg(0) }, options)?
        }
        Operation::ExportTemplates => handler.call(&Call::ExportTemplates, options)?,
    }

    Ok(())
}

/// Handler that reports each call and its options as a JSON line.
pub struct ReportHandler<W: Write> {
    out: W,
}

impl<W: Write> ReportHandler<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> IssueHandler for ReportHandler<W> {
    fn call(&mut self, call: &Call, options: &OptionStore) -> anyhow::Result<()> {
        let mut report = serde_json::to_value(call)?;
        report["options"] = serde_json::to_value(options)?;
        serde_json::to_writer(&mut self.out, &report)?;
        writeln!(self.out)?;
        Ok(())
    }
}
