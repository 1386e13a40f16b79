//! Execution guard.

use std::cell::Cell;

use dutch_core::Operation;

/// Whether an operation is currently running on an engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionGuard {
    /// No operation in progress.
    #[default]
    Idle,
    /// The given operation is in progress.
    Executing(Operation),
}

impl ExecutionGuard {
    /// True while an operation is in progress.
    pub fn is_executing(&self) -> bool {
        matches!(self, ExecutionGuard::Executing(_))
    }
}

/// Marks the guard as executing for its lifetime.
///
/// Dropping the token restores whatever the guard held before, so nested
/// entries (allowed when the guard check is disabled) unwind correctly and
/// an early return via `?` can never leave the engine locked.
pub(crate) struct GuardToken<'a> {
    cell: &'a Cell<ExecutionGuard>,
    previous: ExecutionGuard,
}

impl<'a> GuardToken<'a> {
    pub(crate) fn acquire(cell: &'a Cell<ExecutionGuard>, operation: Operation) -> Self {
        let previous = cell.replace(ExecutionGuard::Executing(operation));
        Self { cell, previous }
    }
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.cell.set(self.previous);
    }
}
