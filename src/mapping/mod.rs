//! Symbol mapping between human-readable and remapped member names.
//!
//! Compiled classes may be shipped with remapped member names while the hooks that patch them
//! are written against readable names. A [`SymbolRef`] carries both physical variants of a
//! member name; [`SymbolRef::resolve`] picks one for the active [`MappingMode`].
//!
//! The mode is plain configuration: it is set once in
//! [`crate::config::TransformerConfig`] and passed down to dispatch. Nothing in this crate keeps
//! it in global state.
//!
//! [`SymbolTable`] lists the members each type declares, so that hooks referring to members that
//! do not exist are rejected at registration instead of failing at class load.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bytehook::mapping::{MappingMode, SymbolRef, SymbolTable};
//!
//! let tick = SymbolRef::method("net/minecraft/client/Minecraft", "runTick", "func_71407_l", "()V");
//!
//! let table = SymbolTable::new();
//! table.declare_method("net/minecraft/client/Minecraft", "func_71407_l", "()V");
//! table.validate(&tick)?;
//!
//! assert_eq!(tick.resolve(MappingMode::Remapped), "func_71407_l");
//! # Ok::<(), bytehook::Error>(())
//! ```

mod symbol;
mod table;

pub use symbol::{internal_name, MappingMode, MemberKind, SymbolRef};
pub use table::{DeclaredMember, SymbolTable};
