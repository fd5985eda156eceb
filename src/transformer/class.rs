//! Decoded class structure handed to dispatch.
//!
//! These types are the boundary to the class file reader and writer: the reader produces a
//! [`ClassNode`] with decoded method bodies, dispatch patches the bodies in place, and the writer
//! encodes the result. Nothing here parses or emits class file bytes.

use bitflags::bitflags;

use crate::{
    bytecode::{Instruction, InstructionStream},
    mapping::{internal_name, SymbolTable},
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method access and property flags, as stored in a class file
    pub struct MethodAccessFlags: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Declared protected
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Declared synchronized
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments
        const VARARGS = 0x0080;
        /// Declared native, no body
        const NATIVE = 0x0100;
        /// Declared abstract, no body
        const ABSTRACT = 0x0400;
        /// Declared strictfp
        const STRICT = 0x0800;
        /// Not present in the source code
        const SYNTHETIC = 0x1000;
    }
}

/// A method of a decoded class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNode {
    /// Physical method name
    pub name: String,
    /// Method descriptor
    pub descriptor: String,
    /// Access flags
    pub access: MethodAccessFlags,
    /// Method body, empty for abstract and native methods
    pub instructions: InstructionStream,
}

impl MethodNode {
    /// Creates a method node.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        descriptor: impl Into<String>,
        access: MethodAccessFlags,
        instructions: Vec<Instruction>,
    ) -> Self {
        MethodNode {
            name: name.into(),
            descriptor: descriptor.into(),
            access,
            instructions: instructions.into(),
        }
    }

    /// Returns `false` for abstract and native methods.
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self
            .access
            .intersects(MethodAccessFlags::ABSTRACT | MethodAccessFlags::NATIVE)
    }
}

/// The methods of one class, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodTable {
    methods: Vec<MethodNode>,
}

impl MethodTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a method.
    pub fn push(&mut self, method: MethodNode) {
        self.methods.push(method);
    }

    /// Returns the number of methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if the table holds no methods.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Returns an iterator over the methods.
    pub fn iter(&self) -> std::slice::Iter<'_, MethodNode> {
        self.methods.iter()
    }

    /// Returns the index of the method with the given name and descriptor.
    #[must_use]
    pub fn position(&self, name: &str, descriptor: &str) -> Option<usize> {
        self.methods
            .iter()
            .position(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Returns the method with the given name and descriptor.
    #[must_use]
    pub fn find(&self, name: &str, descriptor: &str) -> Option<&MethodNode> {
        self.position(name, descriptor).map(|i| &self.methods[i])
    }

    /// Returns the method with the given name and descriptor for editing.
    pub fn find_mut(&mut self, name: &str, descriptor: &str) -> Option<&mut MethodNode> {
        self.methods
            .iter_mut()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Returns the first method with the given name, whatever its descriptor.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&MethodNode> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Returns the method at `index` for editing.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MethodNode> {
        self.methods.get_mut(index)
    }
}

impl FromIterator<MethodNode> for MethodTable {
    fn from_iter<T: IntoIterator<Item = MethodNode>>(iter: T) -> Self {
        MethodTable {
            methods: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MethodTable {
    type Item = &'a MethodNode;
    type IntoIter = std::slice::Iter<'a, MethodNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}

/// A field of a decoded class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    /// Physical field name
    pub name: String,
    /// Field descriptor
    pub descriptor: String,
}

/// A decoded class: its internal name, fields and methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Internal name (`net/minecraft/client/Minecraft`)
    pub name: String,
    /// Declared fields
    pub fields: Vec<FieldNode>,
    /// Declared methods
    pub methods: MethodTable,
}

impl ClassNode {
    /// Creates a class without members; binary names are converted to internal form.
    #[must_use]
    pub fn new(name: &str) -> Self {
        ClassNode {
            name: internal_name(name),
            fields: Vec::new(),
            methods: MethodTable::new(),
        }
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodNode) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        self.fields.push(FieldNode {
            name: name.into(),
            descriptor: descriptor.into(),
        });
        self
    }

    /// Records every field and method of this class in `table`.
    pub fn declare_members(&self, table: &SymbolTable) {
        for field in &self.fields {
            table.declare_field(&self.name, &field.name, &field.descriptor);
        }
        for method in &self.methods {
            table.declare_method(&self.name, &method.name, &method.descriptor);
        }
    }
}
