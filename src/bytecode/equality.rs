//! Wildcard-aware instruction equality.
//!
//! [`insn_equal`] is the predicate the pattern matcher uses to compare a pattern instruction
//! with a method body instruction. It first requires identical opcodes and operand kinds, then
//! dispatches to a per-kind comparator that treats the wildcard sentinels of
//! [`crate::bytecode::instruction`] as equal to anything.
//!
//! The predicate is symmetric: a sentinel on either side matches. It has no failure modes and
//! no side effects.
//!
//! | Kind | Rule |
//! |------|------|
//! | `Local` | either slot `-1`, else slots equal |
//! | `Type` | either descriptor `"~"`, else descriptors equal |
//! | `Field` / `Method` | owner, name and descriptor compared pairwise, `"~"` matches per field |
//! | unresolved symbol | either name variant of the symbol matches |
//! | `Constant` | either constant is the `"~"` string, else values equal |
//! | `Increment` | slot and delta equal, no wildcard |
//! | `Int` | either operand `-1`, else operands equal |
//! | anything else | equal once the opcodes match |

use crate::{
    bytecode::instruction::{Constant, Instruction, MemberRef, Operand, ANY_INT, ANY_SLOT, WILDCARD},
    mapping::SymbolRef,
};

/// Compares two instructions, honouring wildcard sentinels on either side.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::bytecode::{insn_equal, opcodes::*, Instruction};
///
/// let concrete = Instruction::local(ALOAD, 11);
/// assert!(insn_equal(&concrete, &Instruction::any_local(ALOAD)));
/// assert!(!insn_equal(&concrete, &Instruction::local(ALOAD, 2)));
/// assert!(!insn_equal(&concrete, &Instruction::local(ILOAD, 11)));
/// ```
#[must_use]
pub fn insn_equal(a: &Instruction, b: &Instruction) -> bool {
    if a.opcode != b.opcode || a.kind() != b.kind() {
        return false;
    }

    match (&a.operand, &b.operand) {
        (Operand::Local(x), Operand::Local(y)) => local_equal(*x, *y),
        (Operand::Type(x), Operand::Type(y)) => type_equal(x, y),
        (Operand::Field(x), Operand::Field(y)) | (Operand::Method(x), Operand::Method(y)) => {
            member_equal(x, y)
        }
        (Operand::Constant(x), Operand::Constant(y)) => constant_equal(x, y),
        (
            Operand::Increment {
                index: xi,
                delta: xd,
            },
            Operand::Increment {
                index: yi,
                delta: yd,
            },
        ) => xi == yi && xd == yd,
        (Operand::Int(x), Operand::Int(y)) => int_equal(*x, *y),
        (Operand::Symbol(s), Operand::Field(m) | Operand::Method(m))
        | (Operand::Field(m) | Operand::Method(m), Operand::Symbol(s)) => symbol_equal(s, m),
        (Operand::Symbol(x), Operand::Symbol(y)) => x == y,
        _ => true,
    }
}

/// Local-variable slots: `-1` on either side matches any slot.
#[must_use]
pub fn local_equal(a: i32, b: i32) -> bool {
    a == ANY_SLOT || b == ANY_SLOT || a == b
}

/// Integer operands: `-1` on either side matches any operand.
#[must_use]
pub fn int_equal(a: i32, b: i32) -> bool {
    a == ANY_INT || b == ANY_INT || a == b
}

/// Type descriptors: `"~"` on either side matches any descriptor.
#[must_use]
pub fn type_equal(a: &str, b: &str) -> bool {
    field_equal(a, b)
}

/// Member references, compared field by field.
#[must_use]
pub fn member_equal(a: &MemberRef, b: &MemberRef) -> bool {
    field_equal(&a.owner, &b.owner)
        && field_equal(&a.name, &b.name)
        && field_equal(&a.descriptor, &b.descriptor)
}

/// An unresolved mapped member against a concrete reference: either name variant matches.
///
/// Patterns are resolved for the active mode before a hook searches a body, so this only
/// decides comparisons made outside dispatch.
#[must_use]
pub fn symbol_equal(symbol: &SymbolRef, member: &MemberRef) -> bool {
    field_equal(symbol.declaring_type(), &member.owner)
        && field_equal(symbol.descriptor(), &member.descriptor)
        && symbol
            .name_variants()
            .iter()
            .any(|name| field_equal(name, &member.name))
}

/// Constants: the `"~"` string constant on either side matches any value.
#[must_use]
pub fn constant_equal(a: &Constant, b: &Constant) -> bool {
    a.is_wildcard() || b.is_wildcard() || a == b
}

fn field_equal(a: &str, b: &str) -> bool {
    a == WILDCARD || b == WILDCARD || a == b
}
