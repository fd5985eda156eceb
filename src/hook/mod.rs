//! Hooks: targeted, pattern-driven patches of method bodies.
//!
//! A [`Hook`] names one target method through a [`crate::mapping::SymbolRef`] and carries an
//! ordered chain of [`EditOp`]s. Applying the hook runs the chain against the method body in an
//! [`EditContext`]:
//!
//! - **Seek** operations move a cursor to the start of the body, or onto or past the next match
//!   of a [`crate::pattern::Pattern`]
//! - **Insert** and **replace** operations splice instructions in at the cursor
//! - **Mark label** anchors a branch target at the cursor
//!
//! Members whose names depend on the mapping mode are referred to with
//! [`crate::bytecode::Instruction::symbol`] and resolved when the hook runs.
//!
//! A seek that finds no match fails the whole hook. Such a failure usually means the target code
//! changed shape and the hook is stale, so it is always reported, never skipped silently.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `types` | [`EditOp`], [`HookStatus`], [`HookResult`], [`HookPriority`] |
//! | `core` | The [`Hook`] builder |
//! | `context` | The [`EditContext`] state machine and its [`SeekFailure`] |
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{opcodes::*, Instruction};
//! use bytehook::hook::Hook;
//! use bytehook::mapping::SymbolRef;
//! use bytehook::pattern::Pattern;
//!
//! let run_tick = SymbolRef::method("net.minecraft.client.Minecraft", "runTick", "func_71407_l", "()V");
//! let set_key_bind_state = SymbolRef::method(
//!     "net/minecraft/client/settings/KeyBinding",
//!     "setKeyBindState",
//!     "func_74510_a",
//!     "(IZ)V",
//! );
//!
//! let key_bind = Pattern::new(vec![
//!     Instruction::method(INVOKESTATIC, "org/lwjgl/input/Keyboard", "getEventKey", "()I"),
//!     Instruction::method(INVOKESTATIC, "org/lwjgl/input/Keyboard", "getEventKeyState", "()Z"),
//!     Instruction::symbol(INVOKESTATIC, set_key_bind_state),
//! ])?;
//! let fire_key_input = Pattern::new(vec![
//!     Instruction::method(INVOKESTATIC, "cpw/mods/fml/common/FMLCommonHandler", "instance", "()Lcpw/mods/fml/common/FMLCommonHandler;"),
//!     Instruction::method(INVOKEVIRTUAL, "cpw/mods/fml/common/FMLCommonHandler", "fireKeyInput", "()V"),
//! ])?;
//!
//! let hook = Hook::new("keyboard-event", run_tick)
//!     .seek_past(key_bind)
//!     .insert(vec![
//!         Instruction::type_insn(NEW, "net/malisis/core/event/user/KeyboardEvent"),
//!         Instruction::simple(DUP),
//!         Instruction::method(INVOKESPECIAL, "net/malisis/core/event/user/KeyboardEvent", "<init>", "()V"),
//!         Instruction::method(INVOKEVIRTUAL, "net/malisis/core/event/user/KeyboardEvent", "post", "()Z"),
//!         Instruction::jump(IFNE, "cancelled"),
//!     ])
//!     .seek_past(fire_key_input)
//!     .mark_label("cancelled");
//!
//! hook.validate()?;
//! # Ok::<(), bytehook::Error>(())
//! ```

mod context;
mod core;
mod types;

pub use context::{EditContext, SeekFailure};
pub use self::core::Hook;
pub use types::{EditOp, HookPriority, HookResult, HookStatus};
