//! JVM opcode constants and the static opcode table.
//!
//! Every opcode of the Java Virtual Machine instruction set is defined here once, together with
//! its mnemonic and the [`InstructionKind`] of operand it carries. The table drives instruction
//! formatting and the operand validation performed when hooks are registered.
//!
//! The pseudo-opcode [`LABEL`] (`0xFF`, reserved as `impdep2` and never present in a loadable
//! class file) marks label anchors inside an [`crate::bytecode::InstructionStream`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{opcodes, InstructionKind};
//!
//! let info = opcodes::info(opcodes::INVOKEVIRTUAL).unwrap();
//! assert_eq!(info.mnemonic, "invokevirtual");
//! assert_eq!(info.kind, InstructionKind::Method);
//! ```

use crate::bytecode::instruction::InstructionKind;

/// Static description of a single opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeInfo {
    /// The opcode byte
    pub opcode: u8,
    /// Lower-case mnemonic as used by `javap`
    pub mnemonic: &'static str,
    /// The operand kind instructions with this opcode carry
    pub kind: InstructionKind,
}

macro_rules! opcodes {
    ($($(#[$doc:meta])* $name:ident = $value:literal => $mnemonic:literal, $kind:ident;)*) => {
        $(
            #[doc = concat!("Opcode of `", $mnemonic, "`.")]
            $(#[$doc])*
            pub const $name: u8 = $value;
        )*

        const fn build_table() -> [Option<OpcodeInfo>; 256] {
            let mut table: [Option<OpcodeInfo>; 256] = [None; 256];
            $(
                table[$value as usize] = Some(OpcodeInfo {
                    opcode: $value,
                    mnemonic: $mnemonic,
                    kind: InstructionKind::$kind,
                });
            )*
            table
        }
    };
}

opcodes! {
    NOP = 0x00 => "nop", None;
    ACONST_NULL = 0x01 => "aconst_null", None;
    ICONST_M1 = 0x02 => "iconst_m1", None;
    ICONST_0 = 0x03 => "iconst_0", None;
    ICONST_1 = 0x04 => "iconst_1", None;
    ICONST_2 = 0x05 => "iconst_2", None;
    ICONST_3 = 0x06 => "iconst_3", None;
    ICONST_4 = 0x07 => "iconst_4", None;
    ICONST_5 = 0x08 => "iconst_5", None;
    LCONST_0 = 0x09 => "lconst_0", None;
    LCONST_1 = 0x0a => "lconst_1", None;
    FCONST_0 = 0x0b => "fconst_0", None;
    FCONST_1 = 0x0c => "fconst_1", None;
    FCONST_2 = 0x0d => "fconst_2", None;
    DCONST_0 = 0x0e => "dconst_0", None;
    DCONST_1 = 0x0f => "dconst_1", None;
    BIPUSH = 0x10 => "bipush", Int;
    SIPUSH = 0x11 => "sipush", Int;
    LDC = 0x12 => "ldc", Constant;
    LDC_W = 0x13 => "ldc_w", Constant;
    LDC2_W = 0x14 => "ldc2_w", Constant;
    ILOAD = 0x15 => "iload", Local;
    LLOAD = 0x16 => "lload", Local;
    FLOAD = 0x17 => "fload", Local;
    DLOAD = 0x18 => "dload", Local;
    ALOAD = 0x19 => "aload", Local;
    ILOAD_0 = 0x1a => "iload_0", None;
    ILOAD_1 = 0x1b => "iload_1", None;
    ILOAD_2 = 0x1c => "iload_2", None;
    ILOAD_3 = 0x1d => "iload_3", None;
    LLOAD_0 = 0x1e => "lload_0", None;
    LLOAD_1 = 0x1f => "lload_1", None;
    LLOAD_2 = 0x20 => "lload_2", None;
    LLOAD_3 = 0x21 => "lload_3", None;
    FLOAD_0 = 0x22 => "fload_0", None;
    FLOAD_1 = 0x23 => "fload_1", None;
    FLOAD_2 = 0x24 => "fload_2", None;
    FLOAD_3 = 0x25 => "fload_3", None;
    DLOAD_0 = 0x26 => "dload_0", None;
    DLOAD_1 = 0x27 => "dload_1", None;
    DLOAD_2 = 0x28 => "dload_2", None;
    DLOAD_3 = 0x29 => "dload_3", None;
    ALOAD_0 = 0x2a => "aload_0", None;
    ALOAD_1 = 0x2b => "aload_1", None;
    ALOAD_2 = 0x2c => "aload_2", None;
    ALOAD_3 = 0x2d => "aload_3", None;
    IALOAD = 0x2e => "iaload", None;
    LALOAD = 0x2f => "laload", None;
    FALOAD = 0x30 => "faload", None;
    DALOAD = 0x31 => "daload", None;
    AALOAD = 0x32 => "aaload", None;
    BALOAD = 0x33 => "baload", None;
    CALOAD = 0x34 => "caload", None;
    SALOAD = 0x35 => "saload", None;
    ISTORE = 0x36 => "istore", Local;
    LSTORE = 0x37 => "lstore", Local;
    FSTORE = 0x38 => "fstore", Local;
    DSTORE = 0x39 => "dstore", Local;
    ASTORE = 0x3a => "astore", Local;
    ISTORE_0 = 0x3b => "istore_0", None;
    ISTORE_1 = 0x3c => "istore_1", None;
    ISTORE_2 = 0x3d => "istore_2", None;
    ISTORE_3 = 0x3e => "istore_3", None;
    LSTORE_0 = 0x3f => "lstore_0", None;
    LSTORE_1 = 0x40 => "lstore_1", None;
    LSTORE_2 = 0x41 => "lstore_2", None;
    LSTORE_3 = 0x42 => "lstore_3", None;
    FSTORE_0 = 0x43 => "fstore_0", None;
    FSTORE_1 = 0x44 => "fstore_1", None;
    FSTORE_2 = 0x45 => "fstore_2", None;
    FSTORE_3 = 0x46 => "fstore_3", None;
    DSTORE_0 = 0x47 => "dstore_0", None;
    DSTORE_1 = 0x48 => "dstore_1", None;
    DSTORE_2 = 0x49 => "dstore_2", None;
    DSTORE_3 = 0x4a => "dstore_3", None;
    ASTORE_0 = 0x4b => "astore_0", None;
    ASTORE_1 = 0x4c => "astore_1", None;
    ASTORE_2 = 0x4d => "astore_2", None;
    ASTORE_3 = 0x4e => "astore_3", None;
    IASTORE = 0x4f => "iastore", None;
    LASTORE = 0x50 => "lastore", None;
    FASTORE = 0x51 => "fastore", None;
    DASTORE = 0x52 => "dastore", None;
    AASTORE = 0x53 => "aastore", None;
    BASTORE = 0x54 => "bastore", None;
    CASTORE = 0x55 => "castore", None;
    SASTORE = 0x56 => "sastore", None;
    POP = 0x57 => "pop", None;
    POP2 = 0x58 => "pop2", None;
    DUP = 0x59 => "dup", None;
    DUP_X1 = 0x5a => "dup_x1", None;
    DUP_X2 = 0x5b => "dup_x2", None;
    DUP2 = 0x5c => "dup2", None;
    DUP2_X1 = 0x5d => "dup2_x1", None;
    DUP2_X2 = 0x5e => "dup2_x2", None;
    SWAP = 0x5f => "swap", None;
    IADD = 0x60 => "iadd", None;
    LADD = 0x61 => "ladd", None;
    FADD = 0x62 => "fadd", None;
    DADD = 0x63 => "dadd", None;
    ISUB = 0x64 => "isub", None;
    LSUB = 0x65 => "lsub", None;
    FSUB = 0x66 => "fsub", None;
    DSUB = 0x67 => "dsub", None;
    IMUL = 0x68 => "imul", None;
    LMUL = 0x69 => "lmul", None;
    FMUL = 0x6a => "fmul", None;
    DMUL = 0x6b => "dmul", None;
    IDIV = 0x6c => "idiv", None;
    LDIV = 0x6d => "ldiv", None;
    FDIV = 0x6e => "fdiv", None;
    DDIV = 0x6f => "ddiv", None;
    IREM = 0x70 => "irem", None;
    LREM = 0x71 => "lrem", None;
    FREM = 0x72 => "frem", None;
    DREM = 0x73 => "drem", None;
    INEG = 0x74 => "ineg", None;
    LNEG = 0x75 => "lneg", None;
    FNEG = 0x76 => "fneg", None;
    DNEG = 0x77 => "dneg", None;
    ISHL = 0x78 => "ishl", None;
    LSHL = 0x79 => "lshl", None;
    ISHR = 0x7a => "ishr", None;
    LSHR = 0x7b => "lshr", None;
    IUSHR = 0x7c => "iushr", None;
    LUSHR = 0x7d => "lushr", None;
    IAND = 0x7e => "iand", None;
    LAND = 0x7f => "land", None;
    IOR = 0x80 => "ior", None;
    LOR = 0x81 => "lor", None;
    IXOR = 0x82 => "ixor", None;
    LXOR = 0x83 => "lxor", None;
    IINC = 0x84 => "iinc", Increment;
    I2L = 0x85 => "i2l", None;
    I2F = 0x86 => "i2f", None;
    I2D = 0x87 => "i2d", None;
    L2I = 0x88 => "l2i", None;
    L2F = 0x89 => "l2f", None;
    L2D = 0x8a => "l2d", None;
    F2I = 0x8b => "f2i", None;
    F2L = 0x8c => "f2l", None;
    F2D = 0x8d => "f2d", None;
    D2I = 0x8e => "d2i", None;
    D2L = 0x8f => "d2l", None;
    D2F = 0x90 => "d2f", None;
    I2B = 0x91 => "i2b", None;
    I2C = 0x92 => "i2c", None;
    I2S = 0x93 => "i2s", None;
    LCMP = 0x94 => "lcmp", None;
    FCMPL = 0x95 => "fcmpl", None;
    FCMPG = 0x96 => "fcmpg", None;
    DCMPL = 0x97 => "dcmpl", None;
    DCMPG = 0x98 => "dcmpg", None;
    IFEQ = 0x99 => "ifeq", Jump;
    IFNE = 0x9a => "ifne", Jump;
    IFLT = 0x9b => "iflt", Jump;
    IFGE = 0x9c => "ifge", Jump;
    IFGT = 0x9d => "ifgt", Jump;
    IFLE = 0x9e => "ifle", Jump;
    IF_ICMPEQ = 0x9f => "if_icmpeq", Jump;
    IF_ICMPNE = 0xa0 => "if_icmpne", Jump;
    IF_ICMPLT = 0xa1 => "if_icmplt", Jump;
    IF_ICMPGE = 0xa2 => "if_icmpge", Jump;
    IF_ICMPGT = 0xa3 => "if_icmpgt", Jump;
    IF_ICMPLE = 0xa4 => "if_icmple", Jump;
    IF_ACMPEQ = 0xa5 => "if_acmpeq", Jump;
    IF_ACMPNE = 0xa6 => "if_acmpne", Jump;
    GOTO = 0xa7 => "goto", Jump;
    JSR = 0xa8 => "jsr", Jump;
    RET = 0xa9 => "ret", Local;
    TABLESWITCH = 0xaa => "tableswitch", Raw;
    LOOKUPSWITCH = 0xab => "lookupswitch", Raw;
    IRETURN = 0xac => "ireturn", None;
    LRETURN = 0xad => "lreturn", None;
    FRETURN = 0xae => "freturn", None;
    DRETURN = 0xaf => "dreturn", None;
    ARETURN = 0xb0 => "areturn", None;
    RETURN = 0xb1 => "return", None;
    GETSTATIC = 0xb2 => "getstatic", Field;
    PUTSTATIC = 0xb3 => "putstatic", Field;
    GETFIELD = 0xb4 => "getfield", Field;
    PUTFIELD = 0xb5 => "putfield", Field;
    INVOKEVIRTUAL = 0xb6 => "invokevirtual", Method;
    INVOKESPECIAL = 0xb7 => "invokespecial", Method;
    INVOKESTATIC = 0xb8 => "invokestatic", Method;
    INVOKEINTERFACE = 0xb9 => "invokeinterface", Method;
    INVOKEDYNAMIC = 0xba => "invokedynamic", Raw;
    NEW = 0xbb => "new", Type;
    NEWARRAY = 0xbc => "newarray", Int;
    ANEWARRAY = 0xbd => "anewarray", Type;
    ARRAYLENGTH = 0xbe => "arraylength", None;
    ATHROW = 0xbf => "athrow", None;
    CHECKCAST = 0xc0 => "checkcast", Type;
    INSTANCEOF = 0xc1 => "instanceof", Type;
    MONITORENTER = 0xc2 => "monitorenter", None;
    MONITOREXIT = 0xc3 => "monitorexit", None;
    WIDE = 0xc4 => "wide", Raw;
    MULTIANEWARRAY = 0xc5 => "multianewarray", Raw;
    IFNULL = 0xc6 => "ifnull", Jump;
    IFNONNULL = 0xc7 => "ifnonnull", Jump;
    GOTO_W = 0xc8 => "goto_w", Jump;
    JSR_W = 0xc9 => "jsr_w", Jump;
    ///
    /// Pseudo-opcode of label anchors (reserved `impdep2`).
    LABEL = 0xff => "label", Label;
}

/// Opcode table indexed by opcode byte.
///
/// Unassigned slots are `None`.
pub static OPCODES: [Option<OpcodeInfo>; 256] = build_table();

/// Looks up the static description of an opcode.
///
/// Returns `None` for bytes that are not part of the instruction set.
#[must_use]
pub fn info(opcode: u8) -> Option<&'static OpcodeInfo> {
    OPCODES[opcode as usize].as_ref()
}

/// Returns the mnemonic of an opcode, or `"<unknown>"`.
#[must_use]
pub fn mnemonic(opcode: u8) -> &'static str {
    info(opcode).map_or("<unknown>", |i| i.mnemonic)
}

/// Returns `true` for opcodes that unconditionally end a method's normal control flow.
#[must_use]
pub const fn is_return(opcode: u8) -> bool {
    matches!(opcode, IRETURN..=RETURN | ATHROW)
}
