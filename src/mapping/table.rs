//! Declared members per type, used to validate symbol references at registration time.

use dashmap::DashMap;

use crate::{
    mapping::symbol::{internal_name, MemberKind, SymbolRef},
    Result,
};

/// A member declared by a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredMember {
    /// Method or field
    pub kind: MemberKind,
    /// Physical member name
    pub name: String,
    /// Member descriptor
    pub descriptor: String,
}

/// Index of the members each known type declares.
///
/// The table is filled during start-up, typically from the decoded classes of the application,
/// and consulted by [`crate::transformer::HookRegistry`] when
/// [`crate::config::TransformerConfig::validate_members`] is set. Types are keyed by internal
/// name; binary names are normalised on the way in.
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: DashMap<String, Vec<DeclaredMember>>,
}

impl SymbolTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a member of `owner`.
    pub fn declare(&self, owner: &str, kind: MemberKind, name: &str, descriptor: &str) {
        self.types
            .entry(internal_name(owner))
            .or_default()
            .push(DeclaredMember {
                kind,
                name: name.to_string(),
                descriptor: descriptor.to_string(),
            });
    }

    /// Records a method of `owner`.
    pub fn declare_method(&self, owner: &str, name: &str, descriptor: &str) {
        self.declare(owner, MemberKind::Method, name, descriptor);
    }

    /// Records a field of `owner`.
    pub fn declare_field(&self, owner: &str, name: &str, descriptor: &str) {
        self.declare(owner, MemberKind::Field, name, descriptor);
    }

    /// Returns the number of types with at least one declared member.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if `owner` declares a member with the given kind, name and descriptor.
    #[must_use]
    pub fn declares(&self, owner: &str, kind: MemberKind, name: &str, descriptor: &str) -> bool {
        self.types.get(&internal_name(owner)).is_some_and(|members| {
            members
                .iter()
                .any(|m| m.kind == kind && m.name == name && m.descriptor == descriptor)
        })
    }

    /// Checks that the declaring type of `symbol` declares it under at least one of its names.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Configuration`] if neither name variant is declared.
    pub fn validate(&self, symbol: &SymbolRef) -> Result<()> {
        let found = symbol.name_variants().iter().any(|name| {
            self.declares(
                symbol.declaring_type(),
                symbol.kind(),
                name,
                symbol.descriptor(),
            )
        });

        if found {
            Ok(())
        } else {
            Err(config_error!(
                "{} {} is not declared by {} under either name",
                symbol.kind(),
                symbol,
                symbol.declaring_type()
            ))
        }
    }
}
