// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # bytehook
//!
//! A load-time hook engine for JVM bytecode. Built in pure Rust, `bytehook` patches decoded
//! method bodies with small, declarative hooks: each hook names a target method, seeks to a
//! location described by an instruction pattern, and inserts, replaces or removes instructions
//! there.
//!
//! ## Features
//!
//! - **Typed instruction model** - Opcodes, operands, labels and wildcard sentinels
//! - **Wildcard patterns** - Match instruction sequences while ignoring owners, names, slots or
//!   constants
//! - **Dual naming** - Hook targets and the mapped members inside patterns carry a readable and
//!   a remapped name; one [`config::TransformerConfig`] switch picks which one dispatch resolves
//! - **Edit chains** - Cursor-based seek, insert, replace and label operations
//! - **Per-hook isolation** - A stale hook is reported, never allowed to abort a class load
//! - **Parallel dispatch** - Independent classes are transformed on a `rayon` pool
//!
//! ## Quick Start
//!
//! ### Using the Prelude
//!
//! ```rust,no_run
//! use bytehook::prelude::*;
//! use bytehook::bytecode::opcodes::*;
//!
//! let attack_entity = SymbolRef::method(
//!     "net/minecraft/client/multiplayer/PlayerControllerMP",
//!     "attackEntity",
//!     "func_78764_a",
//!     "(Lnet/minecraft/entity/player/EntityPlayer;Lnet/minecraft/entity/Entity;)V",
//! );
//!
//! let registry = HookRegistry::new(TransformerConfig::production());
//! registry.register(
//!     Hook::new("user-attack", attack_entity)
//!         .insert(vec![
//!             Instruction::type_insn(NEW, "net/malisis/core/event/user/UserAttackEvent"),
//!             Instruction::simple(DUP),
//!             Instruction::local(ALOAD, 1),
//!             Instruction::local(ALOAD, 2),
//!             Instruction::method(
//!                 INVOKESPECIAL,
//!                 "net/malisis/core/event/user/UserAttackEvent",
//!                 "<init>",
//!                 "(Lnet/minecraft/entity/player/EntityPlayer;Lnet/minecraft/entity/Entity;)V",
//!             ),
//!             Instruction::method(INVOKEVIRTUAL, "net/malisis/core/event/user/UserAttackEvent", "post", "()Z"),
//!             Instruction::jump(IFEQ, "proceed"),
//!             Instruction::simple(RETURN),
//!         ])
//!         .mark_label("proceed"),
//! )?;
//!
//! let transformer = ClassTransformer::new(registry);
//! # let mut class = ClassNode::new("net/minecraft/client/multiplayer/PlayerControllerMP");
//! let report = transformer.transform(&mut class);
//! for failure in report.failures() {
//!     eprintln!("{failure}");
//! }
//! # Ok::<(), bytehook::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`bytecode`] - Instructions, operands, wildcard equality and the editable instruction stream
//! - [`pattern`] - Instruction patterns and the leftmost-match search
//! - [`mapping`] - Dual-name member references and declared-member tables
//! - [`hook`] - Hook definitions and the edit chain that applies them
//! - [`transformer`] - Registration, per-class dispatch and reporting
//! - [`config`] - Mapping mode and validation switches
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! `bytehook` logs through the [`log`](https://docs.rs/log) facade. Applied hooks are logged at
//! `info`, failures at `error`, and individual edit operations at `debug`. Install any logger
//! implementation to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use bytehook::prelude::*;
///
/// let registry = HookRegistry::new(TransformerConfig::development());
/// assert!(registry.is_empty());
/// ```
pub mod prelude;

pub mod bytecode;
pub mod config;
pub mod hook;
pub mod mapping;
pub mod pattern;
pub mod transformer;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::{Result, pattern::Pattern, bytecode::{opcodes::RETURN, Instruction}};
///
/// fn returns() -> Result<Pattern> {
///     Pattern::new(vec![Instruction::simple(RETURN)])
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `bytehook` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::{Error, hook::Hook, mapping::SymbolRef, transformer::HookRegistry, TransformerConfig};
///
/// let registry = HookRegistry::new(TransformerConfig::minimal());
/// let hook = Hook::new("tick", SymbolRef::unmapped_method("a/B", "tick", "()V"));
/// match registry.register(hook) {
///     Ok(()) => println!("registered"),
///     Err(Error::RegistrationClosed) => println!("too late, classes are already loading"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Configuration shared by registration and dispatch.
///
/// See [`config::TransformerConfig`].
pub use config::TransformerConfig;
