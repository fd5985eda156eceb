//! Typed JVM instruction model.
//!
//! This module contains everything the hook engine knows about individual instructions. It does
//! not decode or encode class files; a class reader hands over already decoded method bodies as
//! [`InstructionStream`]s and receives the patched streams back.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`opcodes`] | Opcode constants and the static opcode table |
//! | `instruction` | [`Instruction`], [`Operand`] and the wildcard sentinels |
//! | `equality` | Wildcard-aware comparison via [`insn_equal`] |
//! | `stream` | The mutable [`InstructionStream`] of one method body |
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{insn_equal, opcodes::*, Instruction, InstructionStream};
//!
//! let body: InstructionStream = vec![
//!     Instruction::local(ALOAD, 0),
//!     Instruction::field(GETFIELD, "net/minecraft/client/Minecraft", "player", "Lnet/minecraft/entity/Player;"),
//!     Instruction::simple(ARETURN),
//! ]
//! .into();
//!
//! assert!(insn_equal(&body[0], &Instruction::any_local(ALOAD)));
//! ```

mod equality;
mod instruction;
pub mod opcodes;
mod stream;

pub use equality::{
    constant_equal, insn_equal, int_equal, local_equal, member_equal, symbol_equal, type_equal,
};
pub use instruction::{
    Constant, Instruction, InstructionKind, Label, MemberRef, Operand, ANY_INT, ANY_SLOT,
    WILDCARD,
};
pub use opcodes::OpcodeInfo;
pub use stream::{InstructionStream, LabelFault, LabelOffsets};
