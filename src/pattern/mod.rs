//! Instruction patterns and the leftmost pattern matcher.
//!
//! A [`Pattern`] is a non-empty, immutable list of instructions that may carry wildcard
//! sentinels. [`find`] scans a method body for the first contiguous run of instructions that
//! matches the pattern under [`crate::bytecode::insn_equal`].
//!
//! The scan is a plain O(n·m) sliding comparison. Method bodies are tens to a few hundred
//! instructions long and every class is patched once, so nothing smarter pays off. The first
//! (leftmost) match at or after the start position wins.
//!
//! Label anchors in the haystack take part in matching like any other instruction: a pattern
//! without a label anchor does not match across one.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{opcodes::*, Instruction, InstructionStream};
//! use bytehook::pattern::{find, Pattern};
//!
//! let body: InstructionStream = vec![
//!     Instruction::local(ALOAD, 0),
//!     Instruction::local(ILOAD, 1),
//!     Instruction::simple(IRETURN),
//! ]
//! .into();
//!
//! let needle = Pattern::new(vec![Instruction::any_local(ILOAD), Instruction::simple(IRETURN)])?;
//! assert_eq!(find(body.as_slice(), &needle, 0), Some(1));
//! assert_eq!(find(body.as_slice(), &needle, 2), None);
//! # Ok::<(), bytehook::Error>(())
//! ```

use std::fmt;

use crate::{
    bytecode::{insn_equal, Instruction, InstructionStream},
    mapping::{MappingMode, SymbolRef},
    Error, Result,
};

/// A non-empty sequence of instructions used as a search key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    instructions: Vec<Instruction>,
}

impl Pattern {
    /// Creates a pattern from its instructions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyPattern`] if `instructions` is empty.
    pub fn new(instructions: Vec<Instruction>) -> Result<Self> {
        if instructions.is_empty() {
            return Err(Error::EmptyPattern);
        }
        Ok(Pattern { instructions })
    }

    /// Creates a single-instruction pattern.
    #[must_use]
    pub fn single(instruction: Instruction) -> Self {
        Pattern {
            instructions: vec![instruction],
        }
    }

    /// Returns the number of instructions in the pattern.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always `false`, patterns hold at least one instruction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the pattern instructions.
    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Returns `true` if the pattern matches `haystack` starting exactly at `start`.
    #[must_use]
    pub fn matches_at(&self, haystack: &[Instruction], start: usize) -> bool {
        haystack
            .get(start..start.saturating_add(self.len()))
            .is_some_and(|window| {
                window
                    .iter()
                    .zip(&self.instructions)
                    .all(|(h, n)| insn_equal(h, n))
            })
    }

    /// Returns the pattern with every mapped member resolved for `mode`.
    #[must_use]
    pub fn resolve(&self, mode: MappingMode) -> Pattern {
        Pattern {
            instructions: self.instructions.iter().map(|insn| insn.resolve(mode)).collect(),
        }
    }

    /// Returns the mapped members the pattern refers to.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolRef> {
        self.instructions.iter().filter_map(Instruction::symbol_ref)
    }

    /// Checks every instruction of the pattern against the opcode table.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by [`Instruction::validate`].
    pub fn validate(&self) -> Result<()> {
        self.instructions.iter().try_for_each(Instruction::validate)
    }
}

impl TryFrom<Vec<Instruction>> for Pattern {
    type Error = Error;

    fn try_from(instructions: Vec<Instruction>) -> Result<Self> {
        Pattern::new(instructions)
    }
}

impl From<Instruction> for Pattern {
    fn from(instruction: Instruction) -> Self {
        Pattern::single(instruction)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, insn) in self.instructions.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{insn}")?;
        }
        f.write_str("]")
    }
}

/// Finds the first position at or after `from` where `needle` matches `haystack`.
///
/// Returns `None` if the needle is never fully matched before the haystack ends, including when
/// `from` lies past the end.
#[must_use]
pub fn find(haystack: &[Instruction], needle: &Pattern, from: usize) -> Option<usize> {
    let last_start = haystack.len().checked_sub(needle.len())?;
    (from..=last_start).find(|&start| needle.matches_at(haystack, start))
}

impl InstructionStream {
    /// Finds the first match of `pattern` at or after `from`, see [`find`].
    #[must_use]
    pub fn find(&self, pattern: &Pattern, from: usize) -> Option<usize> {
        find(self.as_slice(), pattern, from)
    }
}
