//! CLI definitions for jira
//!
//! Flags may appear anywhere on the command line; whatever clap does not
//! recognise as a flag is left in [`Cli::args`] for the command router.

use crate::config::Precedence;
use crate::options::{OptionStore, OptionValue};
use clap::{ArgAction, Parser};
use std::collections::BTreeMap;

/// Command-line front end for Jira
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    override_usage = USAGE,
    after_help = OPERATIONS
)]
pub struct Cli {
    /// URI to use for jira
    #[arg(short, long, value_name = "URI", help_heading = "General Options")]
    pub endpoint: Option<String>,

    /// Template file to use for output/editing
    #[arg(short, long, value_name = "FILE", help_heading = "General Options")]
    pub template: Option<String>,

    /// Username to use for authentication (default: $USER)
    #[arg(short, long, value_name = "USER", help_heading = "General Options")]
    pub user: Option<String>,

    /// Increase output logging
    #[arg(short, long, action = ArgAction::Count, help_heading = "General Options")]
    pub verbose: u8,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(long, default_value = "2", help_heading = "General Options")]
    pub log: String,

    /// Whether config files or command-line flags win on conflict
    #[arg(long, value_enum, default_value_t, help_heading = "General Options")]
    pub precedence: Precedence,

    /// Show what would be done without changing anything
    #[arg(long, help_heading = "General Options")]
    pub dryrun: bool,

    /// Editor command to use for interactive edits
    #[arg(long, value_name = "COMMAND", help_heading = "General Options")]
    pub editor: Option<String>,

    /// Username assigned the issue
    #[arg(short, long, value_name = "USER")]
    pub assignee: Option<String>,

    /// Open your browser to the Jira issue
    #[arg(short, long)]
    pub browse: bool,

    /// Component to search for
    #[arg(short, long, value_name = "COMPONENT")]
    pub component: Option<String>,

    /// Directory to export templates to (default: ~/.jira.d/templates)
    #[arg(short, long, visible_alias = "dir", value_name = "DIR")]
    pub directory: Option<String>,

    /// Fields that are used in "list" template
    #[arg(short = 'f', long, value_name = "FIELDS")]
    pub queryfields: Option<String>,

    /// Jira issue type (default: Bug)
    #[arg(short, long, value_name = "ISSUETYPE")]
    pub issuetype: Option<String>,

    /// Comment message for transition
    #[arg(short = 'm', long, value_name = "COMMENT")]
    pub comment: Option<String>,

    /// Set custom key/value pairs
    #[arg(short, long = "override", value_name = "KEY=VAL", value_parser = parse_key_val)]
    pub overrides: Vec<(String, String)>,

    /// Project to search for
    #[arg(short, long, value_name = "PROJECT")]
    pub project: Option<String>,

    /// Jira Query Language expression for the search
    #[arg(short, long, value_name = "JQL")]
    pub query: Option<String>,

    /// Reporter to search for
    #[arg(short, long, value_name = "USER")]
    pub reporter: Option<String>,

    /// For list operations, sort issues (default: priority asc, created)
    #[arg(short, long, value_name = "ORDER")]
    pub sort: Option<String>,

    /// Watcher to add to issue, or watcher to search for (default: $USER)
    #[arg(short, long, value_name = "USER")]
    pub watcher: Option<String>,

    /// Maximum number of results to return in query (default: 500)
    #[arg(
        short = 'l',
        long = "max_results",
        visible_alias = "limit",
        value_name = "VAL"
    )]
    pub max_results: Option<i64>,

    /// Open the editor even when the operation skips it by default
    #[arg(long)]
    pub edit: bool,

    /// Skip the editor even when the operation opens it by default
    #[arg(long)]
    pub noedit: bool,

    /// Operation and its arguments, e.g. `view ABC-1` or `ABC-1 dups ABC-2`
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

const USAGE: &str = "jira [OPTIONS] [OPERATION] [ARGS]...";

const OPERATIONS: &str = "\
Operations:
  jira (ls|list) ( [-q JQL] | [-p PROJECT] [-c COMPONENT] [-a ASSIGNEE] [-i ISSUETYPE] [-w WATCHER] [-r REPORTER]) [-f FIELDS] [-s ORDER] [--max_results MAX_RESULTS]
  jira view ISSUE
  jira edit ISSUE [--noedit] [-m COMMENT] [-o KEY=VAL]...
  jira create [--noedit] [-p PROJECT] [-i ISSUETYPE] [-o KEY=VAL]...
  jira DUPLICATE dups ISSUE
  jira BLOCKER blocks ISSUE
  jira watch ISSUE [-w WATCHER]
  jira (trans|transition) ISSUE TRANSITION [-m COMMENT] [-o KEY=VAL] [--noedit]
  jira ack ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira close ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira resolve ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira reopen ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira start ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira stop ISSUE [-m COMMENT] [-o KEY=VAL] [--edit]
  jira comment ISSUE [-m COMMENT]
  jira take ISSUE
  jira (assign|give) ISSUE ASSIGNEE
  jira fields
  jira issuelinktypes
  jira transmeta ISSUE
  jira editmeta ISSUE
  jira issuetypes [-p PROJECT]
  jira createmeta [-p PROJECT] [-i ISSUETYPE]
  jira transitions ISSUE
  jira export-templates [-d DIR] [-t TEMPLATE]
  jira (b|browse) ISSUE
  jira login
  jira ISSUE";

/// Parse a `KEY=VAL` override.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VAL: no `=` found in `{}`", s)),
    }
}

impl Cli {
    /// Options explicitly set by flags, keyed by their option names.
    ///
    /// Flags that were not given are absent, so they never mask defaults.
    /// Overrides are not included; see [`Cli::overrides`].
    pub fn flag_options(&self) -> OptionStore {
        let mut store = OptionStore::new();

        let strings = [
            ("endpoint", &self.endpoint),
            ("template", &self.template),
            ("user", &self.user),
            ("editor", &self.editor),
            ("assignee", &self.assignee),
            ("component", &self.component),
            ("directory", &self.directory),
            ("queryfields", &self.queryfields),
            ("issuetype", &self.issuetype),
            ("comment", &self.comment),
            ("project", &self.project),
            ("query", &self.query),
            ("reporter", &self.reporter),
            ("sort", &self.sort),
            ("watcher", &self.watcher),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                store.set(name, value.as_str());
            }
        }

        let bools = [
            ("dryrun", self.dryrun),
            ("browse", self.browse),
            ("edit", self.edit),
            ("noedit", self.noedit),
        ];
        for (name, given) in bools {
            if given {
                store.set(name, true);
            }
        }

        if let Some(max_results) = self.max_results {
            store.set("max_results", max_results);
        }

        store
    }

    /// Collected `-o KEY=VAL` pairs; a repeated key keeps the last value.
    pub fn overrides(&self) -> OptionValue {
        let map: BTreeMap<String, String> = self.overrides.iter().cloned().collect();
        OptionValue::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jira").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_anywhere() {
        let cli = parse(&["ABC-1", "-p", "ABC", "dups", "--noedit", "ABC-2"]);
        assert_eq!(cli.args, vec!["ABC-1", "dups", "ABC-2"]);
        assert_eq!(cli.project.as_deref(), Some("ABC"));
        assert!(cli.noedit);
    }

    #[test]
    fn test_only_given_flags_become_options() {
        let cli = parse(&["list", "-q", "project = ABC"]);
        let flags = cli.flag_options();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.get_str("query"), Some("project = ABC"));
        assert!(!flags.contains("edit"));
    }

    #[test]
    fn test_max_results_aliases() {
        for flag in ["-l", "--limit", "--max_results"] {
            let cli = parse(&["list", flag, "25"]);
            assert_eq!(cli.flag_options().get("max_results"), Some(&OptionValue::Int(25)));
        }
    }

    #[test]
    fn test_directory_alias() {
        let cli = parse(&["export-templates", "--dir", "/tmp/tpl"]);
        assert_eq!(cli.flag_options().get_str("directory"), Some("/tmp/tpl"));
    }

    #[test]
    fn test_overrides_repeatable() {
        let cli = parse(&[
            "create",
            "-o",
            "priority=High",
            "--override",
            "summary=a=b",
            "-o",
            "priority=Low",
        ]);
        let overrides = cli.overrides();
        let map = overrides.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("priority").map(String::as_str), Some("Low"));
        assert_eq!(map.get("summary").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_bad_override_rejected() {
        let result = Cli::try_parse_from(["jira", "-o", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = parse(&["-vv", "list"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_precedence_flag() {
        assert_eq!(parse(&[]).precedence, Precedence::Config);
        assert_eq!(parse(&["--precedence", "flags"]).precedence, Precedence::Flags);
    }
}
