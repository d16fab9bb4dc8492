//! Schema document ingestion.
//!
//! This module turns raw XSD text into an owned, immutable tree of
//! [`SchemaNode`]s. Only elements in the XML Schema namespace become nodes;
//! foreign content such as `xs:appinfo` payloads is dropped. QName-valued
//! attributes are resolved against the in-scope namespace declarations while
//! the source document is still available, so later stages never depend on
//! the literal prefix a schema author picked.

use std::fmt;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

use crate::error::SchemaError;

/// The XML Schema namespace URI.
pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Maximum accepted size of a schema document (16 MiB).
const MAX_SCHEMA_SIZE: usize = 16 * 1024 * 1024;

/// Prefixes conventionally bound to the XML Schema namespace.
const CONVENTIONAL_XS_PREFIXES: [&str; 2] = ["xs", "xsd"];

/// A qualified name taken from a `type`, `base`, `ref`, `itemType` or
/// `memberTypes` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    prefix: Option<String>,
    namespace: Option<String>,
    local_name: String,
}

impl QName {
    /// Creates a qualified name from its parts.
    ///
    /// # Example
    ///
    /// ```
    /// use xsd_sample::{QName, XS_NAMESPACE};
    ///
    /// let name = QName::new(Some("xs"), Some(XS_NAMESPACE), "decimal");
    /// assert!(name.is_builtin());
    /// assert_eq!(name.to_string(), "xs:decimal");
    /// ```
    #[must_use]
    pub fn new(prefix: Option<&str>, namespace: Option<&str>, local_name: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_owned),
            namespace: namespace.map(str::to_owned),
            local_name: local_name.to_owned(),
        }
    }

    fn resolve(raw: &str, node: Node<'_, '_>) -> Self {
        let (prefix, local_name) = match raw.split_once(':') {
            Some((prefix, local_name)) => (Some(prefix), local_name),
            None => (None, raw),
        };
        Self::new(prefix, node.lookup_namespace_uri(prefix), local_name)
    }

    /// Returns the name without its prefix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns the namespace the prefix was bound to, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the prefix as written in the schema.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns `true` when the name refers to an XML Schema built-in type.
    ///
    /// A name is built-in when its prefix resolved to the XML Schema
    /// namespace, or when the prefix is unbound but is one of the
    /// conventional `xs`/`xsd` spellings.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        match self.namespace.as_deref() {
            Some(namespace) => namespace == XS_NAMESPACE,
            None => self
                .prefix
                .as_deref()
                .is_some_and(|prefix| CONVENTIONAL_XS_PREFIXES.contains(&prefix)),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local_name),
            None => f.write_str(&self.local_name),
        }
    }
}

/// The XML Schema construct a [`SchemaNode`] represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XsdTag {
    /// `xs:schema`.
    Schema,
    /// `xs:element`.
    Element,
    /// `xs:attribute`.
    Attribute,
    /// `xs:complexType`.
    ComplexType,
    /// `xs:simpleType`.
    SimpleType,
    /// `xs:sequence`.
    Sequence,
    /// `xs:all`.
    All,
    /// `xs:choice`.
    Choice,
    /// `xs:complexContent`.
    ComplexContent,
    /// `xs:simpleContent`.
    SimpleContent,
    /// `xs:extension`.
    Extension,
    /// `xs:restriction`.
    Restriction,
    /// `xs:enumeration` facet.
    Enumeration,
    /// `xs:list`.
    List,
    /// `xs:union`.
    Union,
    /// `xs:group`.
    Group,
    /// `xs:attributeGroup`.
    AttributeGroup,
    /// `xs:any` element wildcard.
    Any,
    /// `xs:anyAttribute` wildcard.
    AnyAttribute,
    /// `xs:annotation`.
    Annotation,
    /// `xs:include`.
    Include,
    /// `xs:import`.
    Import,
    /// Any other XML Schema construct, such as non-enumeration facets.
    Other(String),
}

impl XsdTag {
    fn from_local_name(name: &str) -> Self {
        match name {
            "schema" => Self::Schema,
            "element" => Self::Element,
            "attribute" => Self::Attribute,
            "complexType" => Self::ComplexType,
            "simpleType" => Self::SimpleType,
            "sequence" => Self::Sequence,
            "all" => Self::All,
            "choice" => Self::Choice,
            "complexContent" => Self::ComplexContent,
            "simpleContent" => Self::SimpleContent,
            "extension" => Self::Extension,
            "restriction" => Self::Restriction,
            "enumeration" => Self::Enumeration,
            "list" => Self::List,
            "union" => Self::Union,
            "group" => Self::Group,
            "attributeGroup" => Self::AttributeGroup,
            "any" => Self::Any,
            "anyAttribute" => Self::AnyAttribute,
            "annotation" => Self::Annotation,
            "include" => Self::Include,
            "import" => Self::Import,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the local name of the construct as written in XSD.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Schema => "schema",
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::ComplexType => "complexType",
            Self::SimpleType => "simpleType",
            Self::Sequence => "sequence",
            Self::All => "all",
            Self::Choice => "choice",
            Self::ComplexContent => "complexContent",
            Self::SimpleContent => "simpleContent",
            Self::Extension => "extension",
            Self::Restriction => "restriction",
            Self::Enumeration => "enumeration",
            Self::List => "list",
            Self::Union => "union",
            Self::Group => "group",
            Self::AttributeGroup => "attributeGroup",
            Self::Any => "any",
            Self::AnyAttribute => "anyAttribute",
            Self::Annotation => "annotation",
            Self::Include => "include",
            Self::Import => "import",
            Self::Other(name) => name,
        }
    }
}

/// One schema-definition node: a declaration, type definition, model group
/// or facet, with its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    tag: XsdTag,
    attributes: Vec<(String, String)>,
    type_name: Option<QName>,
    base: Option<QName>,
    reference: Option<QName>,
    item_type: Option<QName>,
    member_types: Vec<QName>,
    children: Vec<SchemaNode>,
}

impl SchemaNode {
    fn from_xml(node: Node<'_, '_>) -> Option<Self> {
        if node.tag_name().namespace() != Some(XS_NAMESPACE) {
            return None;
        }
        let qname = |attribute: &str| {
            node.attribute(attribute)
                .map(|raw| QName::resolve(raw.trim(), node))
        };
        let member_types = node
            .attribute("memberTypes")
            .map(|raw| {
                raw.split_whitespace()
                    .map(|name| QName::resolve(name, node))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            tag: XsdTag::from_local_name(node.tag_name().name()),
            attributes: node
                .attributes()
                .filter(|attribute| attribute.namespace().is_none())
                .map(|attribute| (attribute.name().to_owned(), attribute.value().to_owned()))
                .collect(),
            type_name: qname("type"),
            base: qname("base"),
            reference: qname("ref"),
            item_type: qname("itemType"),
            member_types,
            children: node
                .children()
                .filter(Node::is_element)
                .filter_map(Self::from_xml)
                .collect(),
        })
    }

    /// Returns the construct this node represents.
    #[must_use]
    pub const fn tag(&self) -> &XsdTag {
        &self.tag
    }

    /// Returns the value of an unqualified attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the `name` attribute, treating an empty value as absent.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attribute("name").filter(|name| !name.is_empty())
    }

    /// Returns the resolved `type` attribute.
    #[must_use]
    pub const fn type_name(&self) -> Option<&QName> {
        self.type_name.as_ref()
    }

    /// Returns the resolved `base` attribute of an extension or restriction.
    #[must_use]
    pub const fn base(&self) -> Option<&QName> {
        self.base.as_ref()
    }

    /// Returns the resolved `ref` attribute.
    #[must_use]
    pub const fn reference(&self) -> Option<&QName> {
        self.reference.as_ref()
    }

    /// Returns the resolved `itemType` attribute of an `xs:list`.
    #[must_use]
    pub const fn item_type(&self) -> Option<&QName> {
        self.item_type.as_ref()
    }

    /// Returns the resolved `memberTypes` of an `xs:union`.
    #[must_use]
    pub fn member_types(&self) -> &[QName] {
        &self.member_types
    }

    /// Returns the child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the first child with the given tag.
    #[must_use]
    pub fn child(&self, tag: &XsdTag) -> Option<&Self> {
        self.children.iter().find(|child| child.tag == *tag)
    }

    /// Iterates over the children with the given tag.
    pub fn children_with(&self, tag: XsdTag) -> impl Iterator<Item = &Self> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Returns the values of the `xs:enumeration` facets directly under this
    /// node.
    #[must_use]
    pub fn enumeration_values(&self) -> Vec<&str> {
        self.children_with(XsdTag::Enumeration)
            .filter_map(|facet| facet.attribute("value"))
            .collect()
    }
}

/// A parsed XSD: the `xs:schema` node and its target namespace.
///
/// The document is immutable once loaded.
///
/// # Example
///
/// ```
/// use xsd_sample::SchemaDocument;
///
/// let schema = SchemaDocument::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
///                  targetNamespace="urn:example:books">
///         <xs:element name="Book" type="xs:string"/>
///     </xs:schema>"#,
/// )
/// .expect("valid schema");
///
/// assert_eq!(schema.target_namespace(), Some("urn:example:books"));
/// assert_eq!(schema.global_elements().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    root: SchemaNode,
    target_namespace: Option<String>,
}

impl SchemaDocument {
    /// Parses a schema document from XSD text.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if:
    /// - The text exceeds 16 MiB
    /// - The text is not well-formed XML
    /// - The document element is not `xs:schema`
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        if text.len() > MAX_SCHEMA_SIZE {
            return Err(SchemaError::TooLarge {
                size: text.len(),
                max: MAX_SCHEMA_SIZE,
            });
        }

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document =
            Document::parse_with_options(text, options).map_err(|e| SchemaError::Parse {
                message: e.to_string(),
            })?;
        let element = document.root_element();
        let tag = element.tag_name();
        if tag.name() != "schema" || tag.namespace() != Some(XS_NAMESPACE) {
            return Err(SchemaError::NotASchema {
                found: tag.name().to_owned(),
            });
        }

        let root = SchemaNode::from_xml(element).ok_or_else(|| SchemaError::NotASchema {
            found: tag.name().to_owned(),
        })?;
        let target_namespace = root
            .attribute("targetNamespace")
            .filter(|namespace| !namespace.is_empty())
            .map(str::to_owned);

        let external = root
            .children()
            .iter()
            .filter(|child| matches!(child.tag(), XsdTag::Include | XsdTag::Import))
            .count();
        if external > 0 {
            debug!(
                count = external,
                "schema includes or imports other documents; their definitions are not indexed"
            );
        }

        Ok(Self {
            root,
            target_namespace,
        })
    }

    /// Loads a schema document from a file inside a capability directory.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the file cannot be read, or any error
    /// from [`SchemaDocument::parse`].
    pub fn from_file(dir: &Dir, path: &Utf8Path) -> Result<Self, SchemaError> {
        let contents = dir.read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::parse(&contents)
    }

    /// Loads a schema document from a path, opening its parent directory with
    /// ambient authority.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] if the directory or file cannot be opened,
    /// or any error from [`SchemaDocument::parse`].
    pub fn open(path: &Utf8Path) -> Result<Self, SchemaError> {
        let io_error = |message: String| SchemaError::Io {
            path: path.to_path_buf(),
            message,
        };
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("schema path must name a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;

        Self::from_file(&dir, Utf8Path::new(file_name)).map_err(|err| match err {
            SchemaError::Io { message, .. } => io_error(message),
            other => other,
        })
    }

    /// Returns the `xs:schema` node.
    #[must_use]
    pub const fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Returns the target namespace, or `None` when the schema declares none.
    #[must_use]
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// Iterates over the global element declarations in document order.
    pub fn global_elements(&self) -> impl Iterator<Item = &SchemaNode> {
        self.root.children_with(XsdTag::Element)
    }

    /// Finds a global element declaration by name.
    #[must_use]
    pub fn find_global_element(&self, name: &str) -> Option<&SchemaNode> {
        self.global_elements()
            .find(|element| element.name() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const BOOKS_XSD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
                    xmlns:bk="urn:example:books"
                    xmlns:doc="urn:example:docs"
                    targetNamespace="urn:example:books">
            <xsd:annotation>
                <xsd:appinfo><doc:note>ignored</doc:note></xsd:appinfo>
            </xsd:annotation>
            <xsd:element name="Book" type="bk:BookType"/>
            <xsd:element name="Isbn" type="xsd:string"/>
            <xsd:complexType name="BookType">
                <xsd:sequence>
                    <xsd:element name="Title" type="xsd:string"/>
                </xsd:sequence>
            </xsd:complexType>
        </xsd:schema>"#;

    #[test]
    fn parses_target_namespace_and_globals() {
        let schema = SchemaDocument::parse(BOOKS_XSD).expect("valid schema");

        assert_eq!(schema.target_namespace(), Some("urn:example:books"));
        let names: Vec<_> = schema.global_elements().filter_map(SchemaNode::name).collect();
        assert_eq!(names, ["Book", "Isbn"]);
    }

    #[test]
    fn resolves_qualified_type_names_against_scope() {
        let schema = SchemaDocument::parse(BOOKS_XSD).expect("valid schema");
        let book = schema.find_global_element("Book").expect("Book declared");
        let isbn = schema.find_global_element("Isbn").expect("Isbn declared");

        let book_type = book.type_name().expect("Book has a type");
        assert_eq!(book_type.namespace(), Some("urn:example:books"));
        assert!(!book_type.is_builtin());

        let isbn_type = isbn.type_name().expect("Isbn has a type");
        assert_eq!(isbn_type.local_name(), "string");
        assert!(isbn_type.is_builtin());
    }

    #[test]
    fn drops_foreign_namespace_content() {
        let schema = SchemaDocument::parse(BOOKS_XSD).expect("valid schema");
        let annotation = schema
            .root()
            .child(&XsdTag::Annotation)
            .expect("annotation kept");
        let appinfo = annotation.children().first().expect("appinfo kept");

        assert!(appinfo.children().is_empty());
    }

    #[test]
    fn collects_enumeration_values_in_order() {
        let schema = SchemaDocument::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                <xs:simpleType name="CreditDebitCode">
                    <xs:restriction base="xs:string">
                        <xs:enumeration value="CRDT"/>
                        <xs:enumeration value="DBIT"/>
                    </xs:restriction>
                </xs:simpleType>
            </xs:schema>"#,
        )
        .expect("valid schema");
        let restriction = schema
            .root()
            .child(&XsdTag::SimpleType)
            .and_then(|simple| simple.child(&XsdTag::Restriction))
            .expect("restriction present");

        assert_eq!(restriction.enumeration_values(), ["CRDT", "DBIT"]);
    }

    #[rstest]
    #[case::bound_xs(Some("xs"), Some(XS_NAMESPACE), true)]
    #[case::unbound_conventional(Some("xsd"), None, true)]
    #[case::foreign(Some("iso"), Some("urn:iso:std"), false)]
    #[case::unprefixed_local(None, None, false)]
    #[case::rebound_conventional(Some("xs"), Some("urn:not-schema"), false)]
    fn detects_builtin_names(
        #[case] prefix: Option<&str>,
        #[case] namespace: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(QName::new(prefix, namespace, "string").is_builtin(), expected);
    }

    #[test]
    fn rejects_non_schema_root() {
        let result = SchemaDocument::parse("<Document xmlns=\"urn:example\"/>");
        assert_eq!(
            result,
            Err(SchemaError::NotASchema {
                found: "Document".to_owned()
            })
        );
    }

    #[test]
    fn rejects_malformed_xml() {
        let result = SchemaDocument::parse("<xs:schema");
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }

    #[test]
    fn schema_without_target_namespace_has_none() {
        let schema = SchemaDocument::parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"/>"#,
        )
        .expect("valid schema");
        assert_eq!(schema.target_namespace(), None);
    }
}
