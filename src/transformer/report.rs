//! Result of transforming one class.

use std::fmt;

use crate::{
    hook::{HookResult, HookStatus},
    Error, Result,
};

/// Per-hook outcome of one class transformation.
///
/// The report never decides on its own whether a failure is fatal. Callers either inspect
/// [`Self::failures`] or escalate through [`Self::into_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Internal name of the transformed class
    pub class_name: String,
    /// One entry per hook that targets the class
    pub results: Vec<HookResult>,
}

impl DispatchReport {
    /// Creates a report.
    #[must_use]
    pub fn new(class_name: impl Into<String>, results: Vec<HookResult>) -> Self {
        DispatchReport {
            class_name: class_name.into(),
            results,
        }
    }

    /// Returns `true` if no hook failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failure())
    }

    /// Returns `true` if at least one hook changed the class.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.results.iter().any(|r| r.status.is_applied())
    }

    /// Returns an iterator over the applied hooks.
    pub fn applied(&self) -> impl Iterator<Item = &HookResult> {
        self.results.iter().filter(|r| r.status.is_applied())
    }

    /// Returns an iterator over the failed hooks.
    pub fn failures(&self) -> impl Iterator<Item = &HookResult> {
        self.results.iter().filter(|r| r.status.is_failure())
    }

    /// Returns the result for the hook named `hook`.
    #[must_use]
    pub fn get(&self, hook: &str) -> Option<&HookResult> {
        self.results.iter().find(|r| r.hook == hook)
    }

    /// Returns the status of the hook named `hook`.
    #[must_use]
    pub fn status(&self, hook: &str) -> Option<&HookStatus> {
        self.get(hook).map(|r| &r.status)
    }

    /// Returns the report if every hook succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HookFailed`] with the error of every failed hook otherwise, see
    /// [`HookResult::to_error`].
    pub fn into_result(self) -> Result<Self> {
        let failures: Vec<Error> = self
            .results
            .iter()
            .filter_map(|r| r.to_error(&self.class_name))
            .collect();
        if failures.is_empty() {
            return Ok(self);
        }

        Err(Error::HookFailed {
            class: self.class_name,
            failures,
        })
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} hook(s), {} applied, {} failed",
            self.class_name,
            self.results.len(),
            self.applied().count(),
            self.failures().count()
        )?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        Ok(())
    }
}
