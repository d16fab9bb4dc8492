//! Global type registry.
//!
//! This module indexes the named complex and simple type definitions that
//! appear directly under `xs:schema`. Inline type definitions are never
//! indexed; they are interpreted in place by the content walker.

use std::collections::HashMap;

use crate::schema::{SchemaDocument, SchemaNode, XsdTag};

/// The two kinds of named type definitions a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// An `xs:complexType` definition.
    Complex,
    /// An `xs:simpleType` definition.
    Simple,
}

/// A borrowed view of a registered type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefinition<'a> {
    /// A global `xs:complexType`.
    Complex(&'a SchemaNode),
    /// A global `xs:simpleType`.
    Simple(&'a SchemaNode),
}

impl<'a> TypeDefinition<'a> {
    /// Returns the definition node.
    #[must_use]
    pub const fn node(&self) -> &'a SchemaNode {
        match *self {
            Self::Complex(node) | Self::Simple(node) => node,
        }
    }

    /// Returns which kind of definition this is.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Complex(_) => TypeKind::Complex,
            Self::Simple(_) => TypeKind::Simple,
        }
    }
}

/// Name-keyed index over the global type definitions of one schema.
///
/// Lookup failure is a normal outcome meaning "not a global named type".
///
/// # Example
///
/// ```
/// use xsd_sample::{SchemaDocument, TypeKind, TypeRegistry};
///
/// let schema = SchemaDocument::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///         <xs:complexType name="PartyType"/>
///         <xs:simpleType name="Max35Text">
///             <xs:restriction base="xs:string"/>
///         </xs:simpleType>
///     </xs:schema>"#,
/// )
/// .expect("valid schema");
///
/// let registry = TypeRegistry::index(&schema);
/// assert!(registry.lookup("PartyType", TypeKind::Complex).is_some());
/// assert!(registry.lookup("PartyType", TypeKind::Simple).is_none());
/// assert!(registry.find("Max35Text").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry<'a> {
    complex_types: HashMap<&'a str, &'a SchemaNode>,
    simple_types: HashMap<&'a str, &'a SchemaNode>,
}

impl<'a> TypeRegistry<'a> {
    /// Builds the registry from the direct children of the schema root.
    ///
    /// When two definitions of the same kind share a name, the first one in
    /// document order is kept.
    #[must_use]
    pub fn index(schema: &'a SchemaDocument) -> Self {
        let mut registry = Self::default();
        for child in schema.root().children() {
            let Some(name) = child.name() else {
                continue;
            };
            let table = match child.tag() {
                XsdTag::ComplexType => &mut registry.complex_types,
                XsdTag::SimpleType => &mut registry.simple_types,
                _ => continue,
            };
            table.entry(name).or_insert(child);
        }
        registry
    }

    /// Looks up a definition of a specific kind by its unqualified name.
    #[must_use]
    pub fn lookup(&self, name: &str, kind: TypeKind) -> Option<TypeDefinition<'a>> {
        match kind {
            TypeKind::Complex => self
                .complex_types
                .get(name)
                .copied()
                .map(TypeDefinition::Complex),
            TypeKind::Simple => self
                .simple_types
                .get(name)
                .copied()
                .map(TypeDefinition::Simple),
        }
    }

    /// Looks up a definition of either kind, preferring complex types.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<TypeDefinition<'a>> {
        self.lookup(name, TypeKind::Complex)
            .or_else(|| self.lookup(name, TypeKind::Simple))
    }

    /// Returns the number of indexed complex types.
    #[must_use]
    pub fn complex_type_count(&self) -> usize {
        self.complex_types.len()
    }

    /// Returns the number of indexed simple types.
    #[must_use]
    pub fn simple_type_count(&self) -> usize {
        self.simple_types.len()
    }
}
