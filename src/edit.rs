//! Edit-mode reconciliation.
//!
//! Each mutating operation has a compiled-in default for whether the user's
//! editor is opened. `--edit` and `--noedit` adjust it, and the outcome is
//! written back as the `edit` option, which is all handlers ever look at.

use crate::options::OptionStore;
use crate::router::Operation;

/// Compiled-in edit default for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Open the editor unless `--noedit` is given
    On,
    /// Skip the editor unless `--edit` is given
    Off,
}

impl EditPolicy {
    /// Policy for an operation, or `None` when it never edits.
    pub fn for_operation(operation: Operation) -> Option<EditPolicy> {
        match operation {
            Operation::Edit | Operation::Create | Operation::Transition | Operation::Comment => {
                Some(EditPolicy::On)
            }
            Operation::Close
            | Operation::Acknowledge
            | Operation::Reopen
            | Operation::Resolve
            | Operation::Start
            | Operation::Stop => Some(EditPolicy::Off),
            _ => None,
        }
    }
}

/// Compute the effective edit flag.
///
/// `edit` and `noedit` are the explicit values, `None` when never set.
pub fn reconcile(policy: EditPolicy, edit: Option<bool>, noedit: Option<bool>) -> bool {
    match policy {
        EditPolicy::On => noedit != Some(true),
        EditPolicy::Off => edit.unwrap_or(false),
    }
}

/// Reconcile against the store and write the result back under `edit`.
pub fn apply(policy: EditPolicy, store: &mut OptionStore) -> bool {
    let effective = reconcile(policy, store.get_bool("edit"), store.get_bool("noedit"));
    store.set("edit", effective);
    effective
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_on() {
        assert!(reconcile(EditPolicy::On, None, None));
        assert!(!reconcile(EditPolicy::On, None, Some(true)));
        assert!(reconcile(EditPolicy::On, Some(true), None));
        assert!(reconcile(EditPolicy::On, None, Some(false)));
        // --noedit wins even alongside --edit
        assert!(!reconcile(EditPolicy::On, Some(true), Some(true)));
    }

    #[test]
    fn test_default_off() {
        assert!(!reconcile(EditPolicy::Off, None, None));
        assert!(reconcile(EditPolicy::Off, Some(true), None));
        assert!(!reconcile(EditPolicy::Off, Some(false), None));
        assert!(!reconcile(EditPolicy::Off, None, Some(true)));
    }

    #[test]
    fn test_policies() {
        assert_eq!(EditPolicy::for_operation(Operation::Edit), Some(EditPolicy::On));
        assert_eq!(EditPolicy::for_operation(Operation::Comment), Some(EditPolicy::On));
        assert_eq!(EditPolicy::for_operation(Operation::Close), Some(EditPolicy::Off));
        assert_eq!(EditPolicy::for_operation(Operation::Stop), Some(EditPolicy::Off));
        assert_eq!(EditPolicy::for_operation(Operation::List), None);
        assert_eq!(EditPolicy::for_operation(Operation::Dups), None);
    }

    #[test]
    fn test_apply_writes_back() {
        let mut store = OptionStore::new();
        store.set("noedit", true);
        assert!(!apply(EditPolicy::On, &mut store));
        assert_eq!(store.get_bool("edit"), Some(false));

        let mut store = OptionStore::new();
        assert!(!apply(EditPolicy::Off, &mut store));
        assert_eq!(store.get_bool("edit"), Some(false));
    }
}
