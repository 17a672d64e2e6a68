//! Command routing.
//!
//! Turns the positional arguments left after flag parsing into a canonical
//! [`Operation`] plus the arguments that operation consumes.

use serde::Serialize;
use std::fmt;

/// Canonical operations, one per handler entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    List,
    View,
    Edit,
    Create,
    Dups,
    Blocks,
    Watch,
    Transition,
    Acknowledge,
    Close,
    Resolve,
    Reopen,
    Start,
    Stop,
    Comment,
    Take,
    Assign,
    Fields,
    #[serde(rename = "issuelinktypes")]
    IssueLinkTypes,
    #[serde(rename = "transmeta")]
    TransMeta,
    #[serde(rename = "editmeta")]
    EditMeta,
    #[serde(rename = "issuetypes")]
    IssueTypes,
    #[serde(rename = "createmeta")]
    CreateMeta,
    Transitions,
    ExportTemplates,
    Browse,
    Login,
}

/// Every accepted spelling and the operation it routes to.
///
/// Case-sensitive, no abbreviations.
const ALIASES: &[(&str, Operation)] = &[
    ("list", Operation::List),
    ("ls", Operation::List),
    ("view", Operation::View),
    ("edit", Operation::Edit),
    ("create", Operation::Create),
    ("dups", Operation::Dups),
    ("blocks", Operation::Blocks),
    ("watch", Operation::Watch),
    ("trans", Operation::Transition),
    ("transition", Operation::Transition),
    ("ack", Operation::Acknowledge),
    ("acknowledge", Operation::Acknowledge),
    ("close", Operation::Close),
    ("resolve", Operation::Resolve),
    ("reopen", Operation::Reopen),
    ("start", Operation::Start),
    ("stop", Operation::Stop),
    ("comment", Operation::Comment),
    ("take", Operation::Take),
    ("assign", Operation::Assign),
    ("give", Operation::Assign),
    ("fields", Operation::Fields),
    ("issuelinktypes", Operation::IssueLinkTypes),
    ("transmeta", Operation::TransMeta),
    ("editmeta", Operation::EditMeta),
    ("issuetypes", Operation::IssueTypes),
    ("createmeta", Operation::CreateMeta),
    ("transitions", Operation::Transitions),
    ("export-templates", Operation::ExportTemplates),
    ("b", Operation::Browse),
    ("browse", Operation::Browse),
    ("login", Operation::Login),
];

impl Operation {
    /// Resolve an input spelling to its operation.
    pub fn from_alias(token: &str) -> Option<Operation> {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, op)| *op)
    }

    /// Resolve a token that appears second, after a primary issue key.
    ///
    /// Only the relational operations are accepted here.
    pub fn from_second_alias(token: &str) -> Option<Operation> {
        Self::from_alias(token).filter(|op| op.is_relational())
    }

    /// Operations relating two issues (`ISSUE verb ISSUE`).
    pub fn is_relational(self) -> bool {
        matches!(self, Operation::Dups | Operation::Blocks)
    }

    /// Canonical identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::View => "view",
            Operation::Edit => "edit",
            Operation::Create => "create",
            Operation::Dups => "dups",
            Operation::Blocks => "blocks",
            Operation::Watch => "watch",
            Operation::Transition => "transition",
            Operation::Acknowledge => "acknowledge",
            Operation::Close => "close",
            Operation::Resolve => "resolve",
            Operation::Reopen => "reopen",
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Comment => "comment",
            Operation::Take => "take",
            Operation::Assign => "assign",
            Operation::Fields => "fields",
            Operation::IssueLinkTypes => "issuelinktypes",
            Operation::TransMeta => "transmeta",
            Operation::EditMeta => "editmeta",
            Operation::IssueTypes => "issuetypes",
            Operation::CreateMeta => "createmeta",
            Operation::Transitions => "transitions",
            Operation::ExportTemplates => "export-templates",
            Operation::Browse => "browse",
            Operation::Login => "login",
        }
    }

    /// Names of the positional arguments the operation requires.
    pub fn required_args(self) -> &'static [&'static str] {
        match self {
            Operation::List
            | Operation::Create
            | Operation::Fields
            | Operation::IssueLinkTypes
            | Operation::IssueTypes
            | Operation::CreateMeta
            | Operation::ExportTemplates
            | Operation::Login => &[],
            Operation::Dups => &["DUPLICATE", "ISSUE"],
            Operation::Blocks => &["BLOCKER", "ISSUE"],
            Operation::Transition => &["ISSUE", "TRANSITION"],
            Operation::Assign => &["ISSUE", "ASSIGNEE"],
            Operation::View
            | Operation::Edit
            | Operation::Watch
            | Operation::Acknowledge
            | Operation::Close
            | Operation::Resolve
            | Operation::Reopen
            | Operation::Start
            | Operation::Stop
            | Operation::Comment
            | Operation::Take
            | Operation::TransMeta
            | Operation::EditMeta
            | Operation::Transitions
            | Operation::Browse => &["ISSUE"],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A routed command: operation plus its remaining positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub operation: Operation,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(operation: Operation, args: Vec<String>) -> Self {
        Self { operation, args }
    }

    /// Positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Route positional arguments to an operation.
///
/// 1. No arguments: `view` with nothing (the handler reports the missing key)
/// 2. First token is an alias: that operation, token dropped
/// 3. Second token is a relational alias: that operation, second token
///    dropped, the rest kept in order
/// 4. Otherwise: `view` with the arguments untouched
pub fn route(mut args: Vec<String>) -> Invocation {
    let Some(first) = args.first() else {
        return Invocation::new(Operation::View, args);
    };

    if let Some(operation) = Operation::from_alias(first) {
        args.remove(0);
        return Invocation::new(operation, args);
    }

    if let Some(operation) = args.get(1).and_then(|t| Operation::from_second_alias(t)) {
        args.remove(1);
        return Invocation::new(operation, args);
    }

    Invocation::new(Operation::View, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_every_alias_round_trips_canonical_name() {
        for (alias, op) in ALIASES {
            assert_eq!(Operation::from_alias(alias), Some(*op));
            assert_eq!(Operation::from_alias(op.as_str()), Some(*op));
        }
    }

    #[test]
    fn test_serialized_name_matches_canonical() {
        for (_, op) in ALIASES {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, serde_json::Value::String(op.as_str().to_string()));
        }
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(Operation::from_alias("ls"), Some(Operation::List));
        assert_eq!(Operation::from_alias("trans"), Some(Operation::Transition));
        assert_eq!(Operation::from_alias("ack"), Some(Operation::Acknowledge));
        assert_eq!(Operation::from_alias("give"), Some(Operation::Assign));
        assert_eq!(Operation::from_alias("assign"), Some(Operation::Assign));
        assert_eq!(Operation::from_alias("b"), Some(Operation::Browse));
    }

    #[test]
    fn test_aliases_are_case_sensitive_and_exact() {
        assert_eq!(Operation::from_alias("LIST"), None);
        assert_eq!(Operation::from_alias("lis"), None);
        assert_eq!(Operation::from_alias("export"), None);
    }

    #[test]
    fn test_route_first_token() {
        let inv = route(strings(&["list"]));
        assert_eq!(inv.operation, Operation::List);
        assert!(inv.args.is_empty());

        let inv = route(strings(&["assign", "ABC-1", "bob"]));
        assert_eq!(inv.operation, Operation::Assign);
        assert_eq!(inv.args, strings(&["ABC-1", "bob"]));
    }

    #[test]
    fn test_route_verb_second() {
        let inv = route(strings(&["ABC-1", "dups", "ABC-2"]));
        assert_eq!(inv.operation, Operation::Dups);
        assert_eq!(inv.args, strings(&["ABC-1", "ABC-2"]));

        let inv = route(strings(&["ABC-1", "blocks", "ABC-2", "extra"]));
        assert_eq!(inv.operation, Operation::Blocks);
        assert_eq!(inv.args, strings(&["ABC-1", "ABC-2", "extra"]));
    }

    #[test]
    fn test_route_non_relational_second_token_is_view() {
        let inv = route(strings(&["ABC-1", "close"]));
        assert_eq!(inv.operation, Operation::View);
        assert_eq!(inv.args, strings(&["ABC-1", "close"]));
    }

    #[test]
    fn test_route_empty_is_view() {
        let inv = route(Vec::new());
        assert_eq!(inv.operation, Operation::View);
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_route_bare_issue_is_view() {
        let inv = route(strings(&["ABC-1"]));
        assert_eq!(inv, Invocation::new(Operation::View, strings(&["ABC-1"])));
    }

    #[test]
    fn test_first_token_wins_over_second() {
        let inv = route(strings(&["view", "dups"]));
        assert_eq!(inv.operation, Operation::View);
        assert_eq!(inv.args, strings(&["dups"]));
    }
}
