use crate::Action;

/// The action bound to every unset slot entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopAction;

/// Shared default for empty slots and for `last_invoked` before any press.
pub static NOOP: NoopAction = NoopAction;

impl Action for NoopAction {
    fn perform(&self) {
        tracing::info!("empty slot, nothing to do");
    }

    fn reverse(&self) {
        tracing::info!("no last command to undo");
    }

    fn label(&self) -> &str {
        "NoCommand"
    }
}
