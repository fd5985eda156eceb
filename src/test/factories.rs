//! Instruction, stream and pattern factories for unit tests.
//!
//! Bodies are spelled as strings of single letters: every letter becomes a distinct
//! `ldc "<letter>"` instruction, so `stream("ABAB")` is a four-instruction body in which the
//! first and third instructions compare equal.

use crate::{
    bytecode::{opcodes::*, Constant, Instruction, InstructionStream},
    pattern::Pattern,
};

// Helper function to create a letter instruction
pub(crate) fn insn(letter: char) -> Instruction {
    Instruction::ldc(Constant::String(letter.to_string()))
}

// Helper function to create a body from letters
pub(crate) fn stream(letters: &str) -> InstructionStream {
    letters.chars().map(insn).collect()
}

// Helper function to create a pattern from letters, panics on an empty string
pub(crate) fn pattern(letters: &str) -> Pattern {
    Pattern::new(letters.chars().map(insn).collect()).unwrap()
}

// One concrete instruction of every operand kind
pub(crate) fn concrete_instructions() -> Vec<Instruction> {
    vec![
        Instruction::simple(NOP),
        Instruction::simple(ARETURN),
        Instruction::local(ALOAD, 1),
        Instruction::local(ILOAD, 3),
        Instruction::type_insn(NEW, "net/malisis/core/event/user/KeyboardEvent"),
        Instruction::type_insn(CHECKCAST, "net/minecraft/block/state/IBlockState"),
        Instruction::field(GETFIELD, "net/minecraft/client/Minecraft", "field_71439_g", "Lnet/minecraft/client/entity/EntityPlayerSP;"),
        Instruction::method(INVOKESTATIC, "org/lwjgl/input/Keyboard", "getEventKey", "()I"),
        Instruction::method(INVOKEINTERFACE, "net/minecraft/block/state/IBlockState", "func_185901_i", "()Lnet/minecraft/util/EnumBlockRenderType;"),
        Instruction::ldc(Constant::Int(42)),
        Instruction::ldc(Constant::Long(-1)),
        Instruction::ldc(Constant::Float(0.5)),
        Instruction::ldc(Constant::Double(2.25)),
        Instruction::ldc(Constant::String("key".into())),
        Instruction::ldc(Constant::Type("net/malisis/core/renderer/icon/provider/IIconProvider".into())),
        Instruction::int(BIPUSH, 15),
        Instruction::int(SIPUSH, 1024),
        Instruction::iinc(2, -1),
        Instruction::jump(IFNE, "cancelled"),
        Instruction::jump(GOTO, "end"),
        Instruction::label("cancelled"),
        Instruction::raw(TABLESWITCH, vec![0, 0, 0, 1]),
    ]
}
