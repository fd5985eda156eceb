//! Hook definition and builder.
//!
//! This module provides the [`Hook`] struct, which binds a target method to the ordered edit
//! chain that patches it.

use std::collections::HashSet;

use crate::{
    bytecode::{Instruction, InstructionStream, Label},
    hook::{
        context::EditContext,
        types::{EditOp, HookPriority},
    },
    mapping::{MappingMode, MemberKind, SymbolRef},
    pattern::Pattern,
    Error, Result,
};

/// A named patch of one target method.
///
/// Hooks are built with a fluent builder. Each builder call appends one [`EditOp`]; the ops run
/// in the order they were added, against the body of the target method, sharing one cursor that
/// starts at position 0.
///
/// # Building Hooks
///
/// ```rust,no_run
/// use bytehook::bytecode::{opcodes::*, Instruction};
/// use bytehook::hook::Hook;
/// use bytehook::mapping::SymbolRef;
///
/// let controller = "net/minecraft/client/multiplayer/PlayerControllerMP";
/// let event = "net/malisis/core/event/user/UserAttackEvent";
/// let attack = SymbolRef::method(
///     controller,
///     "attackEntity",
///     "func_78764_a",
///     "(Lnet/minecraft/entity/player/EntityPlayer;Lnet/minecraft/entity/Entity;)V",
/// );
///
/// // if (new UserAttackEvent(player, target).post()) return;
/// let hook = Hook::new("user-attack-event", attack).insert(vec![
///     Instruction::type_insn(NEW, event),
///     Instruction::simple(DUP),
///     Instruction::local(ALOAD, 1),
///     Instruction::local(ALOAD, 2),
///     Instruction::method(INVOKESPECIAL, event, "<init>", "(Lnet/minecraft/entity/player/EntityPlayer;Lnet/minecraft/entity/Entity;)V"),
///     Instruction::method(INVOKEVIRTUAL, event, "post", "()Z"),
///     Instruction::jump(IFEQ, "continue"),
///     Instruction::simple(RETURN),
///     Instruction::label("continue"),
/// ]);
///
/// assert_eq!(hook.ops().len(), 1);
/// ```
///
/// # Mapped Members
///
/// Patterns and inserted code may refer to members through [`Instruction::symbol`]. Such
/// references are resolved with the same [`MappingMode`] as the target when the hook runs, so a
/// single definition works against named and remapped classes alike.
///
/// # Labels
///
/// Labels anchored by a hook, through [`Hook::mark_label`] or label instructions inside
/// inserted code, are local to the hook. They are renamed when the hook is applied, so two
/// hooks may both use a label called `skip` in the same method. Jumps to labels the hook does
/// not anchor keep their name and refer to labels of the method body.
#[derive(Debug, Clone)]
pub struct Hook {
    name: String,
    target: SymbolRef,
    priority: HookPriority,
    ops: Vec<EditOp>,
}

impl Hook {
    /// Creates a hook without operations.
    ///
    /// A hook whose chain never seeks inserts at the start of the method.
    ///
    /// # Arguments
    ///
    /// * `name` - A descriptive name, used in logs and reports
    /// * `target` - The method to patch
    #[must_use]
    pub fn new(name: impl Into<String>, target: SymbolRef) -> Self {
        Self {
            name: name.into(),
            target,
            priority: HookPriority::NORMAL,
            ops: Vec::new(),
        }
    }

    /// Returns the hook's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the target method.
    #[must_use]
    pub fn target(&self) -> &SymbolRef {
        &self.target
    }

    /// Returns the internal name of the class this hook patches.
    #[must_use]
    pub fn target_class(&self) -> &str {
        self.target.declaring_type()
    }

    /// Returns the hook's priority.
    #[must_use]
    pub fn priority(&self) -> HookPriority {
        self.priority
    }

    /// Returns the edit chain.
    #[must_use]
    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    /// Sets the hook's priority.
    #[must_use]
    pub fn with_priority(mut self, priority: HookPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Appends an arbitrary operation.
    #[must_use]
    pub fn with_op(mut self, op: EditOp) -> Self {
        self.ops.push(op);
        self
    }

    /// Moves the cursor back to the start of the method.
    #[must_use]
    pub fn seek_to_start(self) -> Self {
        self.with_op(EditOp::SeekToStart)
    }

    /// Moves the cursor onto the first instruction of the next match of `pattern`.
    ///
    /// New code inserted afterwards lands before the matched instructions.
    #[must_use]
    pub fn seek_to(self, pattern: Pattern) -> Self {
        self.with_op(EditOp::SeekToPattern(pattern))
    }

    /// Moves the cursor just past the next match of `pattern`.
    ///
    /// New code inserted afterwards lands after the matched instructions.
    #[must_use]
    pub fn seek_past(self, pattern: Pattern) -> Self {
        self.with_op(EditOp::SeekPastPattern(pattern))
    }

    /// Inserts `instructions` at the cursor.
    #[must_use]
    pub fn insert(self, instructions: Vec<Instruction>) -> Self {
        self.with_op(EditOp::Insert(instructions))
    }

    /// Anchors `label` at the cursor.
    #[must_use]
    pub fn mark_label(self, label: impl Into<Label>) -> Self {
        self.with_op(EditOp::MarkLabel(label.into()))
    }

    /// Replaces the next match of `pattern` with `with`.
    #[must_use]
    pub fn replace(self, pattern: Pattern, with: Vec<Instruction>) -> Self {
        self.with_op(EditOp::Replace { pattern, with })
    }

    /// Removes the next match of `pattern`.
    #[must_use]
    pub fn remove(self, pattern: Pattern) -> Self {
        self.replace(pattern, Vec::new())
    }

    /// Returns the labels this hook anchors.
    #[must_use]
    pub fn local_labels(&self) -> HashSet<&Label> {
        self.ops.iter().flat_map(EditOp::anchors).collect()
    }

    /// Returns the mapped members referred to by patterns and inserted code, target excluded.
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolRef> {
        self.ops.iter().flat_map(|op| {
            op.pattern()
                .map(Pattern::instructions)
                .unwrap_or_default()
                .iter()
                .chain(op.inserted())
                .filter_map(Instruction::symbol_ref)
        })
    }

    /// Checks the hook for definition errors.
    ///
    /// Run by [`crate::transformer::HookRegistry`] at registration, before any class is
    /// transformed.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if the target is not a method
    /// - [`Error::OperandMismatch`] or [`Error::UnknownOpcode`] for an invalid pattern or
    ///   inserted instruction
    /// - [`Error::DuplicateLabel`] if the hook anchors the same label twice
    pub fn validate(&self) -> Result<()> {
        if self.target.kind() != MemberKind::Method {
            return Err(config_error!(
                "hook '{}' targets field {}, hooks patch method bodies",
                self.name,
                self.target
            ));
        }

        let mut anchored = HashSet::new();
        for op in &self.ops {
            if let Some(pattern) = op.pattern() {
                pattern.validate()?;
            }
            for insn in op.inserted() {
                insn.validate()?;
            }

            for label in op.anchors() {
                if !anchored.insert(label) {
                    return Err(Error::DuplicateLabel(format!("{label} in hook '{}'", self.name)));
                }
            }
        }

        Ok(())
    }

    /// Runs the edit chain against `stream`, resolving mapped members for `mode`.
    ///
    /// Returns the number of operations that changed the stream. Label anchors are not resolved
    /// here; see [`InstructionStream::resolve_labels`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PatternNotFound`] when a seek or replace finds no match. Edits performed
    /// by earlier operations stay in `stream`.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bytehook::bytecode::{opcodes::*, Instruction, InstructionStream};
    /// use bytehook::hook::Hook;
    /// use bytehook::mapping::{MappingMode, SymbolRef};
    /// use bytehook::pattern::Pattern;
    ///
    /// let mut body: InstructionStream =
    ///     vec![Instruction::simple(ICONST_0), Instruction::simple(IRETURN)].into();
    ///
    /// let hook = Hook::new("always-true", SymbolRef::unmapped_method("a/B", "check", "()Z"))
    ///     .replace(
    ///         Pattern::single(Instruction::simple(ICONST_0)),
    ///         vec![Instruction::simple(ICONST_1)],
    ///     );
    ///
    /// assert_eq!(hook.apply(&mut body, MappingMode::Named)?, 1);
    /// assert_eq!(body[0], Instruction::simple(ICONST_1));
    /// # Ok::<(), bytehook::Error>(())
    /// ```
    pub fn apply(&self, stream: &mut InstructionStream, mode: MappingMode) -> Result<usize> {
        Ok(EditContext::new(self, stream, mode).run()?)
    }
}
