//! Type resolution for element and attribute declarations.
//!
//! Resolution is an ordered list of [`ResolutionStep`]s. Each step either
//! produces a definitive [`TypeReference`] or defers to the next one, and
//! the chain ends in a guaranteed `string` primitive so callers always get
//! something they can synthesize.

use crate::registry::{TypeDefinition, TypeRegistry};
use crate::schema::{QName, SchemaNode, XsdTag};

/// Primitive used when a declaration carries no usable type information.
pub const DEFAULT_PRIMITIVE: &str = "string";

/// The effective type of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeReference<'a> {
    /// An XML Schema built-in type, by unqualified local name.
    Primitive(String),
    /// A global named type found in the registry.
    Registered(TypeDefinition<'a>),
    /// A type that cannot be resolved locally.
    Unresolved {
        /// The qualified name as written, or `None` for an inline definition
        /// that exposes no resolvable base.
        name: Option<QName>,
    },
}

/// One strategy in the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStep {
    /// The declaration names its type with a `type` attribute.
    ExplicitType,
    /// The declaration refers to another global declaration via `ref`.
    DeclarationReference,
    /// The declaration carries an inline `xs:complexType`.
    InlineComplexType,
    /// The declaration carries an inline `xs:simpleType`.
    InlineSimpleType,
}

/// The order in which resolution steps are tried; the first match wins.
pub const RESOLUTION_ORDER: [ResolutionStep; 4] = [
    ResolutionStep::ExplicitType,
    ResolutionStep::DeclarationReference,
    ResolutionStep::InlineComplexType,
    ResolutionStep::InlineSimpleType,
];

/// Resolves declarations against one schema's [`TypeRegistry`].
///
/// # Example
///
/// ```
/// use xsd_sample::{SchemaDocument, TypeReference, TypeRegistry, TypeResolver};
///
/// let schema = SchemaDocument::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///         <xs:element name="Amount" type="xs:decimal"/>
///     </xs:schema>"#,
/// )
/// .expect("valid schema");
/// let registry = TypeRegistry::index(&schema);
/// let resolver = TypeResolver::new(&registry);
/// let amount = schema.find_global_element("Amount").expect("declared");
///
/// assert_eq!(
///     resolver.resolve(amount),
///     TypeReference::Primitive("decimal".to_owned())
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'r, 'a> {
    registry: &'r TypeRegistry<'a>,
}

impl<'r, 'a> TypeResolver<'r, 'a> {
    /// Creates a resolver over the given registry.
    #[must_use]
    pub const fn new(registry: &'r TypeRegistry<'a>) -> Self {
        Self { registry }
    }

    /// Determines the effective type of an element or attribute declaration.
    #[must_use]
    pub fn resolve(&self, declaration: &SchemaNode) -> TypeReference<'a> {
        RESOLUTION_ORDER
            .iter()
            .find_map(|step| self.apply(*step, declaration))
            .unwrap_or_else(|| TypeReference::Primitive(DEFAULT_PRIMITIVE.to_owned()))
    }

    /// Resolves a qualified type name.
    ///
    /// Built-in names become primitives. Other names are looked up by local
    /// name, and a miss means the type lives in a schema that was not loaded.
    #[must_use]
    pub fn resolve_name(&self, name: &QName) -> TypeReference<'a> {
        if name.is_builtin() {
            return TypeReference::Primitive(name.local_name().to_owned());
        }
        self.registry.find(name.local_name()).map_or_else(
            || TypeReference::Unresolved {
                name: Some(name.clone()),
            },
            TypeReference::Registered,
        )
    }

    /// Applies a single step, returning `None` when it does not apply.
    #[must_use]
    pub fn apply(&self, step: ResolutionStep, declaration: &SchemaNode) -> Option<TypeReference<'a>> {
        match step {
            ResolutionStep::ExplicitType => declaration
                .type_name()
                .map(|name| self.resolve_name(name)),
            ResolutionStep::DeclarationReference => declaration
                .reference()
                .map(|_| TypeReference::Primitive(DEFAULT_PRIMITIVE.to_owned())),
            ResolutionStep::InlineComplexType => {
                declaration.child(&XsdTag::ComplexType).map(|complex| {
                    self.resolve_inline_base(
                        complex
                            .child(&XsdTag::SimpleContent)
                            .and_then(|content| content.child(&XsdTag::Extension)),
                    )
                })
            }
            ResolutionStep::InlineSimpleType => {
                declaration.child(&XsdTag::SimpleType).map(|simple| {
                    self.resolve_inline_base(simple.child(&XsdTag::Restriction))
                })
            }
        }
    }

    fn resolve_inline_base(&self, derivation: Option<&SchemaNode>) -> TypeReference<'a> {
        derivation
            .and_then(SchemaNode::base)
            .map_or(TypeReference::Unresolved { name: None }, |base| {
                self.resolve_name(base)
            })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::registry::TypeKind;
    use crate::schema::SchemaDocument;

    #[fixture]
    fn schema() -> SchemaDocument {
        SchemaDocument::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                         xmlns:ext="urn:example:external">
                <xs:element name="Explicit" type="xs:date"/>
                <xs:element name="Named" type="AccountType"/>
                <xs:element name="Foreign" type="ext:Party"/>
                <xs:element name="Ref" ref="Explicit"/>
                <xs:element name="InlineSimpleContent">
                    <xs:complexType>
                        <xs:simpleContent>
                            <xs:extension base="xs:decimal">
                                <xs:attribute name="Ccy" type="xs:string"/>
                            </xs:extension>
                        </xs:simpleContent>
                    </xs:complexType>
                </xs:element>
                <xs:element name="InlineComplex">
                    <xs:complexType>
                        <xs:sequence/>
                    </xs:complexType>
                </xs:element>
                <xs:element name="InlineSimple">
                    <xs:simpleType>
                        <xs:restriction base="xs:int"/>
                    </xs:simpleType>
                </xs:element>
                <xs:element name="InlineList">
                    <xs:simpleType>
                        <xs:list itemType="xs:int"/>
                    </xs:simpleType>
                </xs:element>
                <xs:element name="Bare"/>
                <xs:element name="TypeAndInline" type="xs:boolean">
                    <xs:simpleType>
                        <xs:restriction base="xs:int"/>
                    </xs:simpleType>
                </xs:element>
                <xs:complexType name="AccountType"/>
            </xs:schema>"#,
        )
        .expect("fixture schema should parse")
    }

    fn resolve<'a>(schema: &'a SchemaDocument, element: &str) -> TypeReference<'a> {
        let registry = TypeRegistry::index(schema);
        let declaration = schema
            .find_global_element(element)
            .expect("element should be declared");
        TypeResolver::new(&registry).resolve(declaration)
    }

    #[rstest]
    #[case("Explicit", "date")]
    #[case("Ref", "string")]
    #[case("InlineSimpleContent", "decimal")]
    #[case("InlineSimple", "int")]
    #[case("Bare", "string")]
    #[case("TypeAndInline", "boolean")]
    fn resolves_to_primitive(schema: SchemaDocument, #[case] element: &str, #[case] expected: &str) {
        assert_eq!(
            resolve(&schema, element),
            TypeReference::Primitive(expected.to_owned())
        );
    }

    #[rstest]
    fn resolves_registered_type(schema: SchemaDocument) {
        match resolve(&schema, "Named") {
            TypeReference::Registered(definition) => {
                assert_eq!(definition.kind(), TypeKind::Complex);
                assert_eq!(definition.node().name(), Some("AccountType"));
            }
            other => panic!("expected registered type, got {other:?}"),
        }
    }

    #[rstest]
    fn foreign_type_is_unresolved_with_name(schema: SchemaDocument) {
        assert_eq!(
            resolve(&schema, "Foreign"),
            TypeReference::Unresolved {
                name: Some(QName::new(Some("ext"), Some("urn:example:external"), "Party"))
            }
        );
    }

    #[rstest]
    #[case("InlineComplex")]
    #[case("InlineList")]
    fn inline_without_base_is_unresolved(schema: SchemaDocument, #[case] element: &str) {
        assert_eq!(
            resolve(&schema, element),
            TypeReference::Unresolved { name: None }
        );
    }

    #[rstest]
    fn steps_that_do_not_apply_defer(schema: SchemaDocument) {
        let registry = TypeRegistry::index(&schema);
        let resolver = TypeResolver::new(&registry);
        let bare = schema.find_global_element("Bare").expect("declared");

        for step in RESOLUTION_ORDER {
            assert_eq!(resolver.apply(step, bare), None, "{step:?} should defer");
        }
    }
}
