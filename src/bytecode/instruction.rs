//! Instruction representation, operand payloads and wildcard sentinels.
//!
//! This module defines the typed model of a single JVM instruction as it is seen by the hook
//! engine: an opcode byte plus a kind-specific [`Operand`]. The same types describe both the
//! instructions of a decoded method body (the haystack) and the instructions of a search
//! [`crate::pattern::Pattern`] (the needle).
//!
//! # Wildcards
//!
//! Pattern instructions may carry sentinel values that match anything:
//!
//! | Operand | Sentinel | Helper |
//! |---------|----------|--------|
//! | [`Operand::Local`] | `-1` ([`ANY_SLOT`]) | [`Instruction::any_local`] |
//! | [`Operand::Int`] | `-1` ([`ANY_INT`]) | [`Instruction::any_int`] |
//! | [`Operand::Type`] | `"~"` ([`WILDCARD`]) | [`Instruction::any_type`] |
//! | [`Operand::Field`] / [`Operand::Method`] | `"~"` per field | [`MemberRef::any`] |
//! | [`Operand::Constant`] | `"~"` string constant | [`Constant::any`] |
//!
//! Sentinels are only meaningful in pattern instructions; a decoded method body never contains
//! them.
//!
//! # Labels
//!
//! Branch targets are symbolic. A [`Operand::Jump`] names a [`Label`], and the position of that
//! label is an anchor instruction ([`Instruction::label`]) inside the same stream. Because the
//! anchor travels with the instructions around it, inserting or removing code never invalidates a
//! branch target. Concrete offsets are only computed at commit time by
//! [`crate::bytecode::InstructionStream::resolve_labels`].
//!
//! # Mapped Members
//!
//! A member whose name differs between mapping modes is written as an [`Operand::Symbol`]
//! through [`Instruction::symbol`]. The symbol is resolved with [`Instruction::resolve`] when a
//! hook runs, using the mode dispatch was configured with, so one pattern serves both modes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{opcodes::*, Instruction};
//!
//! // if (new KeyboardEvent().post()) -> skip
//! let insert = vec![
//!     Instruction::type_insn(NEW, "net/malisis/core/event/user/KeyboardEvent"),
//!     Instruction::simple(DUP),
//!     Instruction::method(INVOKESPECIAL, "net/malisis/core/event/user/KeyboardEvent", "<init>", "()V"),
//!     Instruction::method(INVOKEVIRTUAL, "net/malisis/core/event/user/KeyboardEvent", "post", "()Z"),
//!     Instruction::jump(IFNE, "skip"),
//! ];
//! assert_eq!(insert.len(), 5);
//! ```

use std::fmt;

use strum::{Display, EnumCount, EnumIter};

use crate::{
    bytecode::opcodes::{self, LABEL, LDC2_W},
    mapping::{MappingMode, MemberKind, SymbolRef},
    Error, Result,
};

/// String sentinel matching any value of a string-typed operand field.
pub const WILDCARD: &str = "~";

/// Local-variable slot sentinel matching any slot.
pub const ANY_SLOT: i32 = -1;

/// Integer operand sentinel matching any operand.
pub const ANY_INT: i32 = -1;

/// The closed set of operand kinds an instruction can carry.
///
/// Two instructions can only be equal when their kinds agree. The kind of every real opcode is
/// fixed by the [`crate::bytecode::opcodes`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[strum(serialize_all = "snake_case")]
pub enum InstructionKind {
    /// No operand (`dup`, `iadd`, `return`, ...)
    None,
    /// Local-variable slot (`aload`, `istore`, `ret`)
    Local,
    /// Type descriptor or internal name (`new`, `checkcast`, `instanceof`, `anewarray`)
    Type,
    /// Field reference (`getfield`, `putstatic`, ...)
    Field,
    /// Method reference (`invokevirtual`, `invokestatic`, ...)
    Method,
    /// Constant pool value (`ldc`, `ldc_w`, `ldc2_w`)
    Constant,
    /// Integer operand (`bipush`, `sipush`, `newarray`)
    Int,
    /// Slot and delta (`iinc`)
    Increment,
    /// Branch to a label (`ifeq`, `goto`, ...)
    Jump,
    /// Label anchor pseudo-instruction
    Label,
    /// Operand bytes the engine does not interpret (`tableswitch`, `invokedynamic`, ...)
    Raw,
}

/// A symbolic branch target.
///
/// Labels are compared by name. Method bodies produced by a class reader typically use
/// generated names (`L0`, `L1`, ...), hooks use descriptive names for the labels they introduce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(String);

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }

    /// Returns the label name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::new(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Label(name)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field or method reference: owner internal name, member name and descriptor.
///
/// Each of the three fields may be the [`WILDCARD`] sentinel in a pattern instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    /// Internal name of the declaring type (`net/minecraft/client/Minecraft`)
    pub owner: String,
    /// Member name
    pub name: String,
    /// Field or method descriptor
    pub descriptor: String,
}

impl MemberRef {
    /// Creates a new member reference.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        MemberRef {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// A reference with every field set to the wildcard sentinel.
    #[must_use]
    pub fn any() -> Self {
        MemberRef::new(WILDCARD, WILDCARD, WILDCARD)
    }

    /// Returns `true` if any of the three fields is a wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.owner == WILDCARD || self.name == WILDCARD || self.descriptor == WILDCARD
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} {}", self.owner, self.name, self.descriptor)
    }
}

/// A constant pool value loaded by `ldc`, `ldc_w` or `ldc2_w`.
///
/// Floating point constants compare by bit pattern, so `NaN` equals `NaN` and `0.0` differs from
/// `-0.0`, the way boxed JVM floats compare.
#[derive(Debug, Clone)]
pub enum Constant {
    /// `int` constant
    Int(i32),
    /// `long` constant
    Long(i64),
    /// `float` constant
    Float(f32),
    /// `double` constant
    Double(f64),
    /// `String` constant
    String(String),
    /// Class literal, given as internal name or descriptor
    Type(String),
}

impl Constant {
    /// The constant wildcard: a string constant equal to [`WILDCARD`].
    #[must_use]
    pub fn any() -> Self {
        Constant::String(WILDCARD.to_string())
    }

    /// Returns `true` if this is the wildcard constant.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Constant::String(s) if s == WILDCARD)
    }

    /// Returns `true` for the two-slot constant types loaded by `ldc2_w`.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        matches!(self, Constant::Long(_) | Constant::Double(_))
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Int(a), Constant::Int(b)) => a == b,
            (Constant::Long(a), Constant::Long(b)) => a == b,
            (Constant::Float(a), Constant::Float(b)) => a.to_bits() == b.to_bits(),
            (Constant::Double(a), Constant::Double(b)) => a.to_bits() == b.to_bits(),
            (Constant::String(a), Constant::String(b)) | (Constant::Type(a), Constant::Type(b)) => {
                a == b
            }
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Long(v) => write!(f, "{v}L"),
            Constant::Float(v) => write!(f, "{v}F"),
            Constant::Double(v) => write!(f, "{v}D"),
            Constant::String(s) => write!(f, "{s:?}"),
            Constant::Type(t) => write!(f, "{t}.class"),
        }
    }
}

/// The operand payload of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// No operand
    None,
    /// Local-variable slot, `-1` matches any slot
    Local(i32),
    /// Type descriptor or internal name, `"~"` matches any type
    Type(String),
    /// Field reference
    Field(MemberRef),
    /// Method reference
    Method(MemberRef),
    /// Field or method reference whose name is picked by the mapping mode at dispatch
    Symbol(SymbolRef),
    /// Constant pool value
    Constant(Constant),
    /// Integer operand, `-1` matches any value
    Int(i32),
    /// `iinc` slot and delta, compared exactly
    Increment {
        /// Local-variable slot
        index: u16,
        /// Signed increment
        delta: i16,
    },
    /// Branch target
    Jump(Label),
    /// Label anchor
    Label(Label),
    /// Uninterpreted operand bytes
    Raw(Vec<u8>),
}

impl Operand {
    /// Returns the kind of this operand.
    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        match self {
            Operand::None => InstructionKind::None,
            Operand::Local(_) => InstructionKind::Local,
            Operand::Type(_) => InstructionKind::Type,
            Operand::Field(_) => InstructionKind::Field,
            Operand::Method(_) => InstructionKind::Method,
            Operand::Symbol(symbol) => match symbol.kind() {
                MemberKind::Method => InstructionKind::Method,
                MemberKind::Field => InstructionKind::Field,
            },
            Operand::Constant(_) => InstructionKind::Constant,
            Operand::Int(_) => InstructionKind::Int,
            Operand::Increment { .. } => InstructionKind::Increment,
            Operand::Jump(_) => InstructionKind::Jump,
            Operand::Label(_) => InstructionKind::Label,
            Operand::Raw(_) => InstructionKind::Raw,
        }
    }
}

/// A single instruction: opcode plus typed operand.
///
/// The derived [`PartialEq`] is strict structural equality. Pattern matching uses the
/// wildcard-aware [`crate::bytecode::insn_equal`] instead.
#[derive(Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Opcode byte, see [`crate::bytecode::opcodes`]
    pub opcode: u8,
    /// Operand payload
    pub operand: Operand,
}

impl Instruction {
    /// Creates an instruction from its parts.
    #[must_use]
    pub fn new(opcode: u8, operand: Operand) -> Self {
        Instruction { opcode, operand }
    }

    /// An instruction without operand (`dup`, `iand`, `return`, ...).
    #[must_use]
    pub fn simple(opcode: u8) -> Self {
        Instruction::new(opcode, Operand::None)
    }

    /// A local-variable instruction (`aload 1`).
    #[must_use]
    pub fn local(opcode: u8, slot: i32) -> Self {
        Instruction::new(opcode, Operand::Local(slot))
    }

    /// A local-variable instruction matching any slot.
    #[must_use]
    pub fn any_local(opcode: u8) -> Self {
        Instruction::local(opcode, ANY_SLOT)
    }

    /// An integer operand instruction (`bipush 15`).
    #[must_use]
    pub fn int(opcode: u8, operand: i32) -> Self {
        Instruction::new(opcode, Operand::Int(operand))
    }

    /// An integer operand instruction matching any operand.
    #[must_use]
    pub fn any_int(opcode: u8) -> Self {
        Instruction::int(opcode, ANY_INT)
    }

    /// A type instruction (`new net/malisis/core/event/user/KeyboardEvent`).
    #[must_use]
    pub fn type_insn(opcode: u8, descriptor: impl Into<String>) -> Self {
        Instruction::new(opcode, Operand::Type(descriptor.into()))
    }

    /// A type instruction matching any type.
    #[must_use]
    pub fn any_type(opcode: u8) -> Self {
        Instruction::type_insn(opcode, WILDCARD)
    }

    /// A field instruction (`getfield owner.name desc`).
    #[must_use]
    pub fn field(
        opcode: u8,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Instruction::new(opcode, Operand::Field(MemberRef::new(owner, name, descriptor)))
    }

    /// A method invocation (`invokestatic owner.name desc`).
    #[must_use]
    pub fn method(
        opcode: u8,
        owner: impl Into<String>,
        name: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Instruction::new(
            opcode,
            Operand::Method(MemberRef::new(owner, name, descriptor)),
        )
    }

    /// A field access or invocation of a mapped member, resolved when the hook runs.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bytehook::bytecode::{opcodes::*, Instruction};
    /// use bytehook::mapping::{MappingMode, SymbolRef};
    ///
    /// let set = SymbolRef::method("net/minecraft/client/settings/KeyBinding", "setKeyBindState", "func_74510_a", "(IZ)V");
    /// let call = Instruction::symbol(INVOKESTATIC, set.clone());
    ///
    /// assert_eq!(call.resolve(MappingMode::Remapped), set.instruction(INVOKESTATIC, MappingMode::Remapped));
    /// ```
    #[must_use]
    pub fn symbol(opcode: u8, symbol: SymbolRef) -> Self {
        Instruction::new(opcode, Operand::Symbol(symbol))
    }

    /// An `ldc` of the given constant, choosing `ldc2_w` for `long` and `double` values.
    #[must_use]
    pub fn ldc(constant: Constant) -> Self {
        let opcode = if constant.is_wide() {
            opcodes::LDC2_W
        } else {
            opcodes::LDC
        };
        Instruction::new(opcode, Operand::Constant(constant))
    }

    /// An `ldc` matching any constant.
    #[must_use]
    pub fn any_ldc() -> Self {
        Instruction::ldc(Constant::any())
    }

    /// An `iinc` instruction.
    #[must_use]
    pub fn iinc(index: u16, delta: i16) -> Self {
        Instruction::new(opcodes::IINC, Operand::Increment { index, delta })
    }

    /// A branch to `target`.
    #[must_use]
    pub fn jump(opcode: u8, target: impl Into<Label>) -> Self {
        Instruction::new(opcode, Operand::Jump(target.into()))
    }

    /// A label anchor.
    #[must_use]
    pub fn label(name: impl Into<Label>) -> Self {
        Instruction::new(LABEL, Operand::Label(name.into()))
    }

    /// An instruction with uninterpreted operand bytes.
    #[must_use]
    pub fn raw(opcode: u8, bytes: Vec<u8>) -> Self {
        Instruction::new(opcode, Operand::Raw(bytes))
    }

    /// Returns the kind of this instruction's operand.
    #[must_use]
    pub fn kind(&self) -> InstructionKind {
        self.operand.kind()
    }

    /// Returns the mnemonic of the opcode.
    #[must_use]
    pub fn mnemonic(&self) -> &'static str {
        opcodes::mnemonic(self.opcode)
    }

    /// Returns `true` for label anchors.
    #[must_use]
    pub fn is_label(&self) -> bool {
        matches!(self.operand, Operand::Label(_))
    }

    /// Returns the label this instruction anchors, if any.
    #[must_use]
    pub fn anchored_label(&self) -> Option<&Label> {
        match &self.operand {
            Operand::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Returns the mapped member this instruction refers to, if any.
    #[must_use]
    pub fn symbol_ref(&self) -> Option<&SymbolRef> {
        match &self.operand {
            Operand::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Returns this instruction with a mapped member replaced by its reference in `mode`.
    ///
    /// Instructions without an [`Operand::Symbol`] are returned unchanged.
    #[must_use]
    pub fn resolve(&self, mode: MappingMode) -> Instruction {
        match &self.operand {
            Operand::Symbol(symbol) => symbol.instruction(self.opcode, mode),
            _ => self.clone(),
        }
    }

    /// Returns the branch target of a jump instruction, if any.
    #[must_use]
    pub fn jump_target(&self) -> Option<&Label> {
        match &self.operand {
            Operand::Jump(label) => Some(label),
            _ => None,
        }
    }

    /// Checks that the operand fits the opcode.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::UnknownOpcode`] if the opcode is not part of the instruction set
    /// - [`crate::Error::OperandMismatch`] if the operand kind differs from the opcode's kind, or a
    ///   one-slot constant is loaded with `ldc2_w` (and vice versa)
    pub fn validate(&self) -> Result<()> {
        let info = opcodes::info(self.opcode).ok_or(Error::UnknownOpcode(self.opcode))?;

        if info.kind != self.kind() {
            return Err(Error::OperandMismatch {
                mnemonic: info.mnemonic,
                expected: info.kind.to_string(),
                found: self.kind().to_string(),
            });
        }

        if let Operand::Constant(constant) = &self.operand {
            if !constant.is_wildcard() && constant.is_wide() != (self.opcode == LDC2_W) {
                return Err(Error::OperandMismatch {
                    mnemonic: info.mnemonic,
                    expected: if self.opcode == LDC2_W {
                        "long or double constant".to_string()
                    } else {
                        "single-slot constant".to_string()
                    },
                    found: constant.to_string(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::None => write!(f, "{}", self.mnemonic()),
            Operand::Local(slot) | Operand::Int(slot) if *slot == -1 => {
                write!(f, "{} *", self.mnemonic())
            }
            Operand::Local(slot) => write!(f, "{} {slot}", self.mnemonic()),
            Operand::Int(value) => write!(f, "{} {value}", self.mnemonic()),
            Operand::Type(desc) => write!(f, "{} {desc}", self.mnemonic()),
            Operand::Field(member) | Operand::Method(member) => {
                write!(f, "{} {member}", self.mnemonic())
            }
            Operand::Symbol(symbol) => write!(f, "{} {symbol}", self.mnemonic()),
            Operand::Constant(constant) => write!(f, "{} {constant}", self.mnemonic()),
            Operand::Increment { index, delta } => write!(f, "{} {index} {delta}", self.mnemonic()),
            Operand::Jump(label) => write!(f, "{} {label}", self.mnemonic()),
            Operand::Label(label) => write!(f, "{label}:"),
            Operand::Raw(bytes) => write!(f, "{} <{} bytes>", self.mnemonic(), bytes.len()),
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
