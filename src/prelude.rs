//! # bytehook Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the bytehook
//! library. Import this module to get quick access to the essential types for defining and
//! dispatching hooks.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all bytehook operations
pub use crate::Error;

/// The result type used throughout bytehook
pub use crate::Result;

/// Mapping mode and validation switches
pub use crate::TransformerConfig;

// ================================================================================================
// Instruction Model
// ================================================================================================

/// Instructions and their operands
pub use crate::bytecode::{
    Constant, Instruction, InstructionStream, Label, LabelFault, MemberRef, Operand,
};

/// Wildcard sentinels for patterns
pub use crate::bytecode::{ANY_INT, ANY_SLOT, WILDCARD};

/// Wildcard-aware instruction comparison
pub use crate::bytecode::insn_equal;

/// Instruction patterns
pub use crate::pattern::Pattern;

// ================================================================================================
// Symbol Mapping
// ================================================================================================

/// Dual-name member references
pub use crate::mapping::{MappingMode, SymbolRef, SymbolTable};

// ================================================================================================
// Hooks and Dispatch
// ================================================================================================

/// Hook definitions and outcomes
pub use crate::hook::{EditOp, Hook, HookPriority, HookResult, HookStatus};

/// Class dispatch
pub use crate::transformer::{
    ClassNode, ClassTransformer, DispatchReport, HookRegistry, MethodAccessFlags, MethodNode,
    MethodTable,
};
