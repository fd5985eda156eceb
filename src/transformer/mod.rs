//! Class dispatch: applying registered hooks to loaded classes.
//!
//! This module ties the hook engine to the class loading pipeline. Hooks are collected in a
//! [`HookRegistry`] at start-up; a [`ClassTransformer`] then patches each class as it is
//! loaded and returns a [`DispatchReport`] describing what every hook did.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | `class` | [`ClassNode`], [`MethodNode`] and [`MethodTable`], the decoded class structure |
//! | `dispatch` | [`apply`], which patches one class with a list of hooks |
//! | `registry` | [`HookRegistry`], validated start-up registration |
//! | `report` | [`DispatchReport`], the per-class outcome |
//! | `core` | [`ClassTransformer`], once-per-class dispatch over a sealed registry |
//!
//! # Failure Handling
//!
//! A hook that cannot be applied never aborts the class load. Each failure is logged and
//! recorded in the report as a [`crate::hook::HookStatus`]; callers that treat stale hooks as
//! fatal escalate through [`DispatchReport::into_result`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::bytecode::{opcodes::*, Instruction};
//! use bytehook::config::TransformerConfig;
//! use bytehook::hook::Hook;
//! use bytehook::mapping::SymbolRef;
//! use bytehook::transformer::{ClassNode, ClassTransformer, HookRegistry, MethodAccessFlags, MethodNode};
//!
//! let registry = HookRegistry::new(TransformerConfig::development());
//! registry.register(
//!     Hook::new(
//!         "render-block",
//!         SymbolRef::method(
//!             "net/minecraft/client/renderer/BlockRendererDispatcher",
//!             "renderBlock",
//!             "func_175018_a",
//!             "()Z",
//!         ),
//!     )
//!     .insert(vec![Instruction::simple(NOP)]),
//! )?;
//!
//! let transformer = ClassTransformer::new(registry);
//! let mut classes = vec![ClassNode::new("net.minecraft.client.renderer.BlockRendererDispatcher")
//!     .with_method(MethodNode::new(
//!         "renderBlock",
//!         "()Z",
//!         MethodAccessFlags::PUBLIC,
//!         vec![Instruction::simple(ICONST_1), Instruction::simple(IRETURN)],
//!     ))];
//!
//! for report in transformer.transform_all(&mut classes) {
//!     report.into_result()?;
//! }
//! # Ok::<(), bytehook::Error>(())
//! ```

mod class;
mod core;
mod dispatch;
mod registry;
mod report;

pub use class::{ClassNode, FieldNode, MethodAccessFlags, MethodNode, MethodTable};
pub use self::core::ClassTransformer;
pub use dispatch::apply;
pub use registry::HookRegistry;
pub use report::DispatchReport;
