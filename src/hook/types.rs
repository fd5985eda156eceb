//! Core types for the hook system.
//!
//! - [`HookPriority`]: Controls the order in which hooks on the same class are applied
//! - [`EditOp`]: One step of a hook's edit chain
//! - [`HookStatus`]: Outcome of applying one hook to one class
//! - [`HookResult`]: A [`HookStatus`] together with the hook and target it belongs to

use std::fmt;

use crate::{
    bytecode::{Instruction, Label, LabelFault, MemberRef},
    pattern::Pattern,
    Error,
};

/// Priority level for hooks, controlling application order.
///
/// Hooks targeting the same class are applied from the highest to the lowest priority; hooks of
/// equal priority keep their registration order. Order matters when two hooks patch the same
/// method, since the second one searches the body the first one already changed.
///
/// | Constant | Value |
/// |----------|-------|
/// | [`HIGHEST`](Self::HIGHEST) | 1000 |
/// | [`HIGH`](Self::HIGH) | 500 |
/// | [`NORMAL`](Self::NORMAL) | 0 |
/// | [`LOW`](Self::LOW) | -500 |
/// | [`LOWEST`](Self::LOWEST) | -1000 |
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::hook::HookPriority;
///
/// assert!(HookPriority::HIGHEST > HookPriority::HIGH);
/// assert!(HookPriority(750) > HookPriority::HIGH);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HookPriority(pub i32);

impl HookPriority {
    /// Highest priority - applied first (value: 1000).
    pub const HIGHEST: Self = Self(1000);

    /// High priority (value: 500).
    pub const HIGH: Self = Self(500);

    /// Normal priority - default (value: 0).
    pub const NORMAL: Self = Self(0);

    /// Low priority (value: -500).
    pub const LOW: Self = Self(-500);

    /// Lowest priority - applied last (value: -1000).
    pub const LOWEST: Self = Self(-1000);
}

impl Default for HookPriority {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// One step of a hook's edit chain.
///
/// Operations run in order against a single method body and share one cursor. The cursor
/// starts at position 0; seeks search from the current cursor onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Moves the cursor to the start of the method body.
    SeekToStart,

    /// Moves the cursor to the first instruction of the next match.
    ///
    /// Fails the hook if the pattern does not match at or after the cursor.
    SeekToPattern(Pattern),

    /// Moves the cursor just past the last instruction of the next match.
    ///
    /// Fails the hook if the pattern does not match at or after the cursor.
    SeekPastPattern(Pattern),

    /// Inserts instructions at the cursor, which then moves past them.
    Insert(Vec<Instruction>),

    /// Anchors a label at the cursor, which then moves past the anchor.
    ///
    /// Jumps in previously or subsequently inserted instructions may target the label.
    MarkLabel(Label),

    /// Replaces the next match at or after the cursor with new instructions.
    ///
    /// The cursor moves past the replacement. An empty replacement removes the match. Fails the
    /// hook if the pattern does not match.
    Replace {
        /// Instructions to remove
        pattern: Pattern,
        /// Instructions to splice in their place
        with: Vec<Instruction>,
    },
}

impl EditOp {
    /// Returns the pattern this operation searches for, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        match self {
            EditOp::SeekToPattern(pattern)
            | EditOp::SeekPastPattern(pattern)
            | EditOp::Replace { pattern, .. } => Some(pattern),
            EditOp::SeekToStart | EditOp::Insert(_) | EditOp::MarkLabel(_) => None,
        }
    }

    /// Returns the instructions this operation puts into the method body.
    #[must_use]
    pub fn inserted(&self) -> &[Instruction] {
        match self {
            EditOp::Insert(instructions) | EditOp::Replace { with: instructions, .. } => {
                instructions
            }
            _ => &[],
        }
    }

    /// Returns the labels this operation anchors in the method body.
    #[must_use]
    pub fn anchors(&self) -> Vec<&Label> {
        match self {
            EditOp::MarkLabel(label) => vec![label],
            other => other
                .inserted()
                .iter()
                .filter_map(Instruction::anchored_label)
                .collect(),
        }
    }

    /// Returns `true` if the operation changes the method body.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            EditOp::Insert(_) | EditOp::MarkLabel(_) | EditOp::Replace { .. }
        )
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::SeekToStart => write!(f, "seek to start"),
            EditOp::SeekToPattern(p) => write!(f, "seek to {p}"),
            EditOp::SeekPastPattern(p) => write!(f, "seek past {p}"),
            EditOp::Insert(instructions) => write!(f, "insert {} instruction(s)", instructions.len()),
            EditOp::MarkLabel(label) => write!(f, "mark label {label}"),
            EditOp::Replace { pattern, with } => {
                write!(f, "replace {pattern} with {} instruction(s)", with.len())
            }
        }
    }
}

/// Outcome of applying one hook to one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookStatus {
    /// Every operation succeeded and the patched body was committed.
    Applied {
        /// Number of operations that changed the method body
        edits: usize,
    },

    /// The hook does not target the class.
    Skipped,

    /// The class was already transformed; the hook was not run again.
    AlreadyApplied,

    /// The class has no method with the resolved name and descriptor, or the method has no
    /// body.
    TargetNotFound,

    /// A seek or replace found no match.
    PatternNotFound {
        /// Index of the failing operation within the hook
        op_index: usize,
        /// Rendered pattern
        pattern: String,
        /// Edits applied by earlier operations before the failure
        partial_edits: usize,
    },

    /// The hook left a dangling or duplicated label in the patched body.
    ///
    /// Label faults the body already had before the hook ran are not attributed to it.
    InvalidLabels(LabelFault),
}

impl HookStatus {
    /// Returns `true` if the hook was applied.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, HookStatus::Applied { .. })
    }

    /// Returns `true` if the hook should have been applied but was not.
    ///
    /// [`HookStatus::Skipped`] and [`HookStatus::AlreadyApplied`] are not failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            HookStatus::TargetNotFound
                | HookStatus::PatternNotFound { .. }
                | HookStatus::InvalidLabels(_)
        )
    }
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStatus::Applied { edits } => write!(f, "applied ({edits} edit(s))"),
            HookStatus::Skipped => write!(f, "skipped"),
            HookStatus::AlreadyApplied => write!(f, "already applied"),
            HookStatus::TargetNotFound => write!(f, "target not found"),
            HookStatus::PatternNotFound {
                op_index,
                pattern,
                partial_edits,
            } => write!(
                f,
                "pattern not found by operation #{op_index} {pattern} after {partial_edits} edit(s)"
            ),
            HookStatus::InvalidLabels(fault) => write!(f, "invalid labels: {fault}"),
        }
    }
}

/// The result of one hook in one dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookResult {
    /// Name of the hook
    pub hook: String,
    /// Target method, with the name resolved for the dispatch mode
    pub target: MemberRef,
    /// What happened
    pub status: HookStatus,
    /// `true` if partial edits of a failed hook were undone
    pub rolled_back: bool,
}

impl HookResult {
    /// Creates a result that was not rolled back.
    #[must_use]
    pub fn new(hook: impl Into<String>, target: MemberRef, status: HookStatus) -> Self {
        HookResult {
            hook: hook.into(),
            target,
            status,
            rolled_back: false,
        }
    }

    /// Converts a failed result into the matching [`Error`].
    ///
    /// Returns `None` for results that are not failures.
    #[must_use]
    pub fn to_error(&self, class: &str) -> Option<Error> {
        match &self.status {
            HookStatus::TargetNotFound => Some(Error::TargetNotFound {
                hook: self.hook.clone(),
                class: class.to_string(),
                name: self.target.name.clone(),
                descriptor: self.target.descriptor.clone(),
            }),
            HookStatus::PatternNotFound {
                op_index, pattern, ..
            } => Some(Error::PatternNotFound {
                hook: self.hook.clone(),
                op_index: *op_index,
                pattern: pattern.clone(),
            }),
            HookStatus::InvalidLabels(fault) => Some(fault.clone().into()),
            HookStatus::Applied { .. } | HookStatus::Skipped | HookStatus::AlreadyApplied => None,
        }
    }
}

impl fmt::Display for HookResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}: {}", self.hook, self.target, self.status)?;
        if self.rolled_back {
            write!(f, " (rolled back)")?;
        }
        Ok(())
    }
}
