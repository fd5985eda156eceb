//! Logical member references with two physical name variants.

use std::fmt;

use strum::{Display, EnumString};

use crate::bytecode::{Instruction, MemberRef, Operand};

/// The naming scheme of the classes being transformed.
///
/// Selected once at start-up and passed to dispatch through
/// [`crate::config::TransformerConfig`]; it never changes while classes are transformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum MappingMode {
    /// Human-readable names, as found in a development environment
    #[default]
    Named,
    /// Remapped (obfuscated) names, as found in a shipped build
    Remapped,
}

/// Whether a [`SymbolRef`] designates a method or a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A method, matched by name and method descriptor
    Method,
    /// A field, matched by name and field descriptor
    Field,
}

/// Converts a binary type name (`a.b.C`) into its internal form (`a/b/C`).
///
/// Internal names are returned unchanged.
#[must_use]
pub fn internal_name(name: &str) -> String {
    name.replace('.', "/")
}

/// A logical reference to a method or field whose physical name depends on the [`MappingMode`].
///
/// The declaring type is always stored as an internal name, whichever form was passed in.
///
/// # Examples
///
/// ```rust,no_run
/// use bytehook::mapping::{MappingMode, SymbolRef};
///
/// let attack = SymbolRef::method(
///     "net.minecraft.client.multiplayer.PlayerControllerMP",
///     "attackEntity",
///     "func_78764_a",
///     "(Lnet/minecraft/entity/player/EntityPlayer;Lnet/minecraft/entity/Entity;)V",
/// );
///
/// assert_eq!(attack.declaring_type(), "net/minecraft/client/multiplayer/PlayerControllerMP");
/// assert_eq!(attack.resolve(MappingMode::Named), "attackEntity");
/// assert_eq!(attack.resolve(MappingMode::Remapped), "func_78764_a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolRef {
    kind: MemberKind,
    declaring_type: String,
    logical_name: String,
    primary: String,
    alt: String,
    descriptor: String,
}

impl SymbolRef {
    /// Creates a reference with an explicit logical name.
    ///
    /// # Arguments
    ///
    /// * `kind` - Method or field
    /// * `declaring_type` - Owning type, binary (`a.b.C`) or internal (`a/b/C`) form
    /// * `logical_name` - Name used in logs and reports
    /// * `primary` - Physical name in [`MappingMode::Named`]
    /// * `alt` - Physical name in [`MappingMode::Remapped`]
    /// * `descriptor` - Method or field descriptor
    #[must_use]
    pub fn new(
        kind: MemberKind,
        declaring_type: &str,
        logical_name: impl Into<String>,
        primary: impl Into<String>,
        alt: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        SymbolRef {
            kind,
            declaring_type: internal_name(declaring_type),
            logical_name: logical_name.into(),
            primary: primary.into(),
            alt: alt.into(),
            descriptor: descriptor.into(),
        }
    }

    /// A method reference whose logical name is its primary name.
    #[must_use]
    pub fn method(
        declaring_type: &str,
        primary: &str,
        alt: &str,
        descriptor: impl Into<String>,
    ) -> Self {
        SymbolRef::new(
            MemberKind::Method,
            declaring_type,
            primary,
            primary,
            alt,
            descriptor,
        )
    }

    /// A field reference whose logical name is its primary name.
    #[must_use]
    pub fn field(
        declaring_type: &str,
        primary: &str,
        alt: &str,
        descriptor: impl Into<String>,
    ) -> Self {
        SymbolRef::new(
            MemberKind::Field,
            declaring_type,
            primary,
            primary,
            alt,
            descriptor,
        )
    }

    /// A method that keeps the same name in both modes (constructors, library methods).
    #[must_use]
    pub fn unmapped_method(declaring_type: &str, name: &str, descriptor: impl Into<String>) -> Self {
        SymbolRef::method(declaring_type, name, name, descriptor)
    }

    /// Returns whether this is a method or a field reference.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Returns the internal name of the declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Returns the logical name.
    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Returns the member descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Returns the physical name for `mode`.
    #[must_use]
    pub fn resolve(&self, mode: MappingMode) -> &str {
        match mode {
            MappingMode::Named => &self.primary,
            MappingMode::Remapped => &self.alt,
        }
    }

    /// Returns both physical names, primary first.
    #[must_use]
    pub fn name_variants(&self) -> [&str; 2] {
        [&self.primary, &self.alt]
    }

    /// Returns the member reference for `mode`.
    #[must_use]
    pub fn member_ref(&self, mode: MappingMode) -> MemberRef {
        MemberRef::new(
            self.declaring_type.as_str(),
            self.resolve(mode),
            self.descriptor.as_str(),
        )
    }

    /// Builds the instruction that invokes or accesses this member in `mode`.
    ///
    /// The opcode is taken as given; pass an `invoke*` opcode for methods and a
    /// `get*`/`put*` opcode for fields.
    ///
    /// Hooks usually leave the choice of name to dispatch through
    /// [`Instruction::symbol`] instead of calling this directly.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use bytehook::bytecode::opcodes::INVOKEVIRTUAL;
    /// use bytehook::mapping::{MappingMode, SymbolRef};
    ///
    /// let set = SymbolRef::method(
    ///     "net/minecraft/world/chunk/storage/ExtendedBlockStorage",
    ///     "set",
    ///     "func_177484_a",
    ///     "(IIILnet/minecraft/block/state/IBlockState;)V",
    /// );
    /// let call = set.instruction(INVOKEVIRTUAL, MappingMode::Remapped);
    /// assert!(call.to_string().contains("func_177484_a"));
    /// ```
    #[must_use]
    pub fn instruction(&self, opcode: u8, mode: MappingMode) -> Instruction {
        let member = self.member_ref(mode);
        match self.kind {
            MemberKind::Method => Instruction::new(opcode, Operand::Method(member)),
            MemberKind::Field => Instruction::new(opcode, Operand::Field(member)),
        }
    }
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}{} ({}/{})",
            self.declaring_type, self.logical_name, self.descriptor, self.primary, self.alt
        )
    }
}
