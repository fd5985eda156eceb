//! Mutable instruction sequence of one method body.
//!
//! [`InstructionStream`] owns the instructions of a single method and provides the splice
//! primitives used by hook edit chains. Positions are plain indices and are only stable between
//! edits; branch targets are not positions but [`Label`] anchors stored in the stream itself, so
//! splices never leave a jump dangling. [`InstructionStream::resolve_labels`] turns the anchors
//! into concrete offsets once all edits are done.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    fmt,
    ops::{Index, Range},
};

use crate::{
    bytecode::instruction::{Instruction, Label},
    Error, Result,
};

/// Concrete label offsets of a committed method body.
///
/// Offsets index the label-free instruction sequence returned by
/// [`InstructionStream::real_instructions`]. A label anchored at the very end of a method maps
/// to the instruction count.
pub type LabelOffsets = HashMap<Label, usize>;

/// A label defect that keeps a method body from being committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelFault {
    /// The label is anchored more than once
    Duplicate(Label),
    /// A jump targets the label but it has no anchor
    Undefined(Label),
}

impl LabelFault {
    /// Returns the label at fault.
    #[must_use]
    pub fn label(&self) -> &Label {
        match self {
            LabelFault::Duplicate(label) | LabelFault::Undefined(label) => label,
        }
    }
}

impl fmt::Display for LabelFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelFault::Duplicate(label) => write!(f, "duplicate label {label}"),
            LabelFault::Undefined(label) => write!(f, "undefined label {label}"),
        }
    }
}

impl From<LabelFault> for Error {
    fn from(fault: LabelFault) -> Self {
        match fault {
            LabelFault::Duplicate(label) => Error::DuplicateLabel(label.to_string()),
            LabelFault::Undefined(label) => Error::UndefinedLabel(label.to_string()),
        }
    }
}

/// An ordered, mutable sequence of instructions belonging to one method body.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
}

impl InstructionStream {
    /// Creates an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of instructions, label anchors included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the stream holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Returns the instructions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns an iterator over all instructions, label anchors included.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Appends one instruction.
    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Splices `instructions` in before position `at`.
    ///
    /// Returns the position just past the inserted instructions, which is where a cursor that
    /// performed the insertion continues. Every position at or after `at` recorded before the
    /// call is stale afterwards.
    pub fn insert(&mut self, at: usize, instructions: &[Instruction]) -> usize {
        debug_assert!(at <= self.len(), "insert position {at} out of bounds");
        let at = at.min(self.len());
        self.instructions
            .splice(at..at, instructions.iter().cloned());
        at + instructions.len()
    }

    /// Removes the instructions in `range` and returns them.
    pub fn remove(&mut self, range: Range<usize>) -> Vec<Instruction> {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.instructions.drain(start..end).collect()
    }

    /// Replaces the instructions in `range` with `with`.
    ///
    /// Returns the position just past the replacement.
    pub fn replace(&mut self, range: Range<usize>, with: &[Instruction]) -> usize {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.instructions.splice(start..end, with.iter().cloned());
        start + with.len()
    }

    /// Returns an iterator over all labels anchored in this stream.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.instructions.iter().filter_map(Instruction::anchored_label)
    }

    /// Returns `true` if `label` is anchored in this stream.
    #[must_use]
    pub fn has_label(&self, label: &Label) -> bool {
        self.labels().any(|l| l == label)
    }

    /// Returns an iterator over the real instructions, skipping label anchors.
    pub fn real_instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter().filter(|insn| !insn.is_label())
    }

    /// Resolves every label anchor to a concrete offset.
    ///
    /// The offset of a label is the index, within [`Self::real_instructions`], of the first
    /// real instruction following its anchor. All jump targets must be anchored exactly once.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::DuplicateLabel`] if a label is anchored more than once
    /// - [`crate::Error::UndefinedLabel`] if a jump refers to a label without anchor
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bytehook::bytecode::{opcodes::*, Instruction, InstructionStream, Label};
    ///
    /// let stream: InstructionStream = vec![
    ///     Instruction::jump(IFEQ, "skip"),
    ///     Instruction::simple(RETURN),
    ///     Instruction::label("skip"),
    ///     Instruction::simple(NOP),
    /// ]
    /// .into();
    ///
    /// let offsets = stream.resolve_labels()?;
    /// assert_eq!(offsets[&Label::new("skip")], 2);
    /// # Ok::<(), bytehook::Error>(())
    /// ```
    pub fn resolve_labels(&self) -> Result<LabelOffsets> {
        let mut offsets = LabelOffsets::new();
        let mut position = 0usize;

        for insn in &self.instructions {
            match insn.anchored_label() {
                Some(label) => {
                    if offsets.insert(label.clone(), position).is_some() {
                        return Err(Error::DuplicateLabel(label.to_string()));
                    }
                }
                None => position += 1,
            }
        }

        if let Some(missing) = self
            .instructions
            .iter()
            .filter_map(Instruction::jump_target)
            .find(|target| !offsets.contains_key(*target))
        {
            return Err(Error::UndefinedLabel(missing.to_string()));
        }

        Ok(offsets)
    }

    /// Returns every label defect of the stream, empty when [`Self::resolve_labels`] succeeds.
    ///
    /// Unlike [`Self::resolve_labels`] this does not stop at the first defect, so the faults of
    /// a body can be compared before and after an edit.
    #[must_use]
    pub fn label_faults(&self) -> BTreeSet<LabelFault> {
        let mut anchored = HashSet::new();
        let mut faults = BTreeSet::new();

        for label in self.labels() {
            if !anchored.insert(label) {
                faults.insert(LabelFault::Duplicate(label.clone()));
            }
        }
        for target in self.instructions.iter().filter_map(Instruction::jump_target) {
            if !anchored.contains(target) {
                faults.insert(LabelFault::Undefined(target.clone()));
            }
        }
        faults
    }

    /// Returns the set of labels targeted by jumps in this stream.
    #[must_use]
    pub fn jump_targets(&self) -> HashSet<&Label> {
        self.instructions
            .iter()
            .filter_map(Instruction::jump_target)
            .collect()
    }

    /// Consumes the stream and returns the instructions.
    #[must_use]
    pub fn into_vec(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl From<Vec<Instruction>> for InstructionStream {
    fn from(instructions: Vec<Instruction>) -> Self {
        InstructionStream { instructions }
    }
}

impl FromIterator<Instruction> for InstructionStream {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        InstructionStream {
            instructions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a InstructionStream {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl Index<usize> for InstructionStream {
    type Output = Instruction;

    fn index(&self, index: usize) -> &Self::Output {
        &self.instructions[index]
    }
}

impl fmt::Display for InstructionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, insn) in self.instructions.iter().enumerate() {
            if insn.is_label() {
                writeln!(f, "{insn}")?;
            } else {
                writeln!(f, "  {index:4}: {insn}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for InstructionStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.instructions.iter()).finish()
    }
}
