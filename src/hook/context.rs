//! Edit chain state machine.
//!
//! [`EditContext`] holds the state of one hook application: the method body being edited, the
//! cursor and the number of edits performed so far. Each [`EditOp`] is one transition.
//!
//! ```text
//!                 ┌──────────────┐
//!   new() ───────►│ cursor = 0   │
//!                 └──────┬───────┘
//!                        │ step(op)
//!         ┌──────────────┼───────────────────────────────┐
//!         ▼              ▼                               ▼
//!   SeekToStart    SeekTo/SeekPast/Replace         Insert/MarkLabel
//!   cursor = 0     find(pattern, cursor)           splice at cursor
//!                    │ None ──► SeekFailure        cursor past splice
//!                    ▼ Some(pos)
//!                  cursor = pos / pos + len
//! ```
//!
//! Positions are never kept across a splice: every seek searches the current body, and labels
//! are anchors inside the body rather than recorded indices.
//!
//! Mapped members in patterns and inserted code are resolved for the context's
//! [`MappingMode`] as each operation runs.

use std::collections::HashMap;

use log::debug;

use crate::{
    bytecode::{Instruction, InstructionStream, Label, Operand},
    hook::{core::Hook, types::EditOp},
    mapping::MappingMode,
    pattern::Pattern,
    Error,
};

/// A seek or replace whose pattern has no match at or after the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekFailure {
    /// Name of the hook
    pub hook: String,
    /// Index of the failing operation within the hook
    pub op_index: usize,
    /// The pattern as searched, mapped members resolved
    pub pattern: String,
}

impl From<SeekFailure> for Error {
    fn from(failure: SeekFailure) -> Self {
        Error::PatternNotFound {
            hook: failure.hook,
            op_index: failure.op_index,
            pattern: failure.pattern,
        }
    }
}

/// State of one hook application against one method body.
#[derive(Debug)]
pub struct EditContext<'a> {
    hook: &'a Hook,
    stream: &'a mut InstructionStream,
    mode: MappingMode,
    cursor: usize,
    edits: usize,
    scope: HashMap<Label, Label>,
}

impl<'a> EditContext<'a> {
    /// Creates a context with the cursor at the start of `stream`.
    ///
    /// `mode` picks the name variant of every mapped member the hook refers to.
    pub fn new(hook: &'a Hook, stream: &'a mut InstructionStream, mode: MappingMode) -> Self {
        let scope = hook
            .local_labels()
            .into_iter()
            .map(|label| (label.clone(), Label::new(format!("{}:{label}", hook.name()))))
            .collect();

        EditContext {
            hook,
            stream,
            mode,
            cursor: 0,
            edits: 0,
            scope,
        }
    }

    /// Returns the current cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the number of operations that changed the body so far.
    #[must_use]
    pub fn edits(&self) -> usize {
        self.edits
    }

    /// Runs every operation of the hook in order.
    ///
    /// Returns the number of edits. On failure the edits made before the failing operation
    /// remain in the body and [`Self::edits`] reports how many there were.
    ///
    /// # Errors
    ///
    /// Returns a [`SeekFailure`] for the first seek or replace without a match.
    pub fn run(&mut self) -> Result<usize, SeekFailure> {
        let hook = self.hook;
        for (index, op) in hook.ops().iter().enumerate() {
            self.step(index, op)?;
        }
        Ok(self.edits)
    }

    /// Performs a single operation.
    ///
    /// # Errors
    ///
    /// Returns a [`SeekFailure`] if `op` searches for a pattern that does not match at or after
    /// the cursor. The body and cursor are unchanged in that case.
    pub fn step(&mut self, index: usize, op: &EditOp) -> Result<(), SeekFailure> {
        match op {
            EditOp::SeekToStart => self.cursor = 0,
            EditOp::SeekToPattern(pattern) => self.cursor = self.locate(index, pattern)?,
            EditOp::SeekPastPattern(pattern) => {
                self.cursor = self.locate(index, pattern)? + pattern.len();
            }
            EditOp::Insert(instructions) => {
                let scoped = self.scoped(instructions);
                self.cursor = self.stream.insert(self.cursor, &scoped);
                self.edits += 1;
            }
            EditOp::MarkLabel(label) => {
                let anchor = Instruction::label(self.scoped_label(label));
                self.cursor = self.stream.insert(self.cursor, &[anchor]);
                self.edits += 1;
            }
            EditOp::Replace { pattern, with } => {
                let start = self.locate(index, pattern)?;
                let scoped = self.scoped(with);
                self.cursor = self
                    .stream
                    .replace(start..start + pattern.len(), &scoped);
                self.edits += 1;
            }
        }

        debug!(
            "{}: op #{index} {op} -> cursor {}",
            self.hook.name(),
            self.cursor
        );
        Ok(())
    }

    fn locate(&self, index: usize, pattern: &Pattern) -> Result<usize, SeekFailure> {
        let pattern = pattern.resolve(self.mode);
        self.stream
            .find(&pattern, self.cursor)
            .ok_or_else(|| SeekFailure {
                hook: self.hook.name().to_string(),
                op_index: index,
                pattern: pattern.to_string(),
            })
    }

    fn scoped_label(&self, label: &Label) -> Label {
        self.scope.get(label).cloned().unwrap_or_else(|| label.clone())
    }

    fn scoped(&self, instructions: &[Instruction]) -> Vec<Instruction> {
        instructions
            .iter()
            .map(|insn| match &insn.operand {
                Operand::Jump(target) => Instruction::jump(insn.opcode, self.scoped_label(target)),
                Operand::Label(label) => Instruction::label(self.scoped_label(label)),
                _ => insn.resolve(self.mode),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::opcodes::*;
    use crate::mapping::SymbolRef;
    use crate::test::factories::{insn, pattern, stream};
    use crate::Result;

    const MODE: MappingMode = MappingMode::Named;

    fn hook(name: &str) -> Hook {
        Hook::new(name, SymbolRef::unmapped_method("a/B", "run", "()V"))
    }

    #[test]
    fn test_chained_ops_compose() -> Result<()> {
        let mut body = stream("ABCD");
        let chain = hook("chain")
            .seek_to_start()
            .seek_past(pattern("AB"))
            .insert(vec![insn('X')])
            .seek_past(pattern("C"))
            .insert(vec![insn('Y')]);

        assert_eq!(chain.apply(&mut body, MODE)?, 2);
        assert_eq!(body, stream("ABXCYD"));
        Ok(())
    }

    #[test]
    fn test_insert_without_seek_goes_first() -> Result<()> {
        let mut body = stream("AB");
        hook("prepend").insert(vec![insn('X'), insn('Y')]).apply(&mut body, MODE)?;
        assert_eq!(body, stream("XYAB"));
        Ok(())
    }

    #[test]
    fn test_seek_to_inserts_before_match() -> Result<()> {
        let mut body = stream("ABCD");
        hook("before")
            .seek_to(pattern("CD"))
            .insert(vec![insn('X')])
            .apply(&mut body, MODE)?;
        assert_eq!(body, stream("ABXCD"));
        Ok(())
    }

    #[test]
    fn test_seek_searches_from_cursor() {
        let mut body = stream("ABCA");
        let chain = hook("forward")
            .seek_past(pattern("C"))
            .seek_to(pattern("B"));

        let err = chain.apply(&mut body, MODE).unwrap_err();
        assert!(matches!(err, Error::PatternNotFound { op_index: 1, .. }));
    }

    #[test]
    fn test_failure_keeps_partial_edits() {
        let mut body = stream("ABCD");
        let chain = hook("partial")
            .seek_past(pattern("A"))
            .insert(vec![insn('X')])
            .seek_past(pattern("Z"))
            .insert(vec![insn('Y')]);

        let mut ctx = EditContext::new(&chain, &mut body, MODE);
        let failure = ctx.run().unwrap_err();
        assert_eq!(failure.hook, "partial");
        assert_eq!(failure.op_index, 2);
        assert!(failure.pattern.contains("\"Z\""), "{}", failure.pattern);
        assert_eq!(ctx.edits(), 1);
        assert_eq!(ctx.cursor(), 2);
        assert_eq!(body, stream("AXBCD"));
    }

    #[test]
    fn test_replace_and_remove() -> Result<()> {
        let mut body = stream("ABCBD");
        let chain = hook("swap")
            .seek_past(pattern("C"))
            .replace(pattern("B"), vec![insn('X'), insn('Y')])
            .seek_to_start()
            .remove(pattern("B"));

        assert_eq!(chain.apply(&mut body, MODE)?, 2);
        assert_eq!(body, stream("ACXYD"));
        Ok(())
    }

    #[test]
    fn test_second_application_fails() -> Result<()> {
        let mut body = stream("ABC");
        let chain = hook("once").replace(pattern("B"), vec![insn('X')]);

        chain.apply(&mut body, MODE)?;
        assert!(matches!(
            chain.apply(&mut body, MODE),
            Err(Error::PatternNotFound { .. })
        ));
        assert_eq!(body, stream("AXC"));
        Ok(())
    }

    #[test]
    fn test_mark_label_is_scoped_to_hook() -> Result<()> {
        let mut body = stream("ABCD");
        let chain = hook("skip-c")
            .seek_past(pattern("B"))
            .insert(vec![Instruction::jump(GOTO, "skip")])
            .seek_past(pattern("C"))
            .mark_label("skip");

        chain.apply(&mut body, MODE)?;
        assert_eq!(body[2], Instruction::jump(GOTO, "skip-c:skip"));
        assert_eq!(body[4], Instruction::label("skip-c:skip"));

        let offsets = body.resolve_labels()?;
        assert_eq!(offsets[&Label::new("skip-c:skip")], 4);
        Ok(())
    }

    #[test]
    fn test_two_hooks_reuse_label_name() -> Result<()> {
        let mut body = stream("ABCD");
        for (name, after) in [("first", "A"), ("second", "C")] {
            hook(name)
                .seek_past(pattern(after))
                .insert(vec![
                    Instruction::jump(IFEQ, "skip"),
                    Instruction::simple(RETURN),
                    Instruction::label("skip"),
                ])
                .apply(&mut body, MODE)?;
        }

        let offsets = body.resolve_labels()?;
        assert_eq!(offsets.len(), 2);
        Ok(())
    }

    #[test]
    fn test_foreign_jump_targets_untouched() -> Result<()> {
        let mut body: InstructionStream = vec![insn('A'), Instruction::label("L3"), insn('B')].into();
        hook("to-method-label")
            .insert(vec![Instruction::jump(GOTO, "L3")])
            .apply(&mut body, MODE)?;
        assert_eq!(body[0], Instruction::jump(GOTO, "L3"));
        body.resolve_labels()?;
        Ok(())
    }

    #[test]
    fn test_mapped_members_follow_mode() -> Result<()> {
        let set = SymbolRef::method("k/B", "setKeyBindState", "func_74510_a", "(IZ)V");
        let player = SymbolRef::field("a/M", "thePlayer", "field_71439_g", "La/P;");
        let chain = hook("key-bind")
            .seek_past(Pattern::single(Instruction::symbol(INVOKESTATIC, set.clone())))
            .insert(vec![Instruction::symbol(GETSTATIC, player.clone())]);

        for mode in [MappingMode::Named, MappingMode::Remapped] {
            let mut body: InstructionStream =
                vec![insn('A'), set.instruction(INVOKESTATIC, mode), insn('B')].into();
            assert_eq!(chain.apply(&mut body, mode)?, 1, "{mode}");
            assert_eq!(body[2], player.instruction(GETSTATIC, mode), "{mode}");
        }

        let mut remapped: InstructionStream =
            vec![set.instruction(INVOKESTATIC, MappingMode::Remapped)].into();
        let failure = EditContext::new(&chain, &mut remapped, MappingMode::Named)
            .run()
            .unwrap_err();
        assert!(failure.pattern.contains("setKeyBindState"), "{}", failure.pattern);
        Ok(())
    }
}
