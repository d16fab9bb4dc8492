//! Content models and the walker that expands them.
//!
//! [`ContentModel`] is a typed view over the structural node of a complex
//! type. The walker interprets it against a target [`XmlElement`], adding
//! attributes, child elements or text. Anything it cannot expand (group
//! references, wildcards, unknown constructs) becomes a warning and the walk
//! continues.

use rand::seq::IndexedRandom;

use crate::element::XmlElement;
use crate::error::SchemaError;
use crate::generator::Generator;
use crate::occurrence::OccurrenceBounds;
use crate::options::ChoicePolicy;
use crate::registry::TypeDefinition;
use crate::report::GenerationWarning;
use crate::resolver::{DEFAULT_PRIMITIVE, TypeReference};
use crate::schema::{QName, SchemaNode, XsdTag};
use crate::values::ValueSynthesizer;

/// Order in which a type definition's children are searched for its content
/// model; the first present wins.
pub const CONTENT_SEARCH_ORDER: [XsdTag; 5] = [
    XsdTag::Sequence,
    XsdTag::All,
    XsdTag::Choice,
    XsdTag::ComplexContent,
    XsdTag::SimpleContent,
];

/// The structural rule governing an element's content.
///
/// Derivation variants hold the `xs:extension` or `xs:restriction` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel<'a> {
    /// `xs:sequence`.
    Sequence(&'a SchemaNode),
    /// `xs:all`.
    All(&'a SchemaNode),
    /// `xs:choice`.
    Choice(&'a SchemaNode),
    /// `xs:complexContent/xs:extension`.
    ComplexContentExtension(&'a SchemaNode),
    /// `xs:complexContent/xs:restriction`.
    ComplexContentRestriction(&'a SchemaNode),
    /// `xs:simpleContent/xs:extension`.
    SimpleContentExtension(&'a SchemaNode),
    /// `xs:simpleContent/xs:restriction`.
    SimpleContentRestriction(&'a SchemaNode),
    /// A node with no generation rule.
    Unsupported(&'a SchemaNode),
}

impl<'a> ContentModel<'a> {
    /// Finds the content model of a complex type definition.
    ///
    /// # Example
    ///
    /// ```
    /// use xsd_sample::{ContentModel, SchemaDocument};
    ///
    /// let schema = SchemaDocument::parse(
    ///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
    ///         <xs:complexType name="AmountType">
    ///             <xs:simpleContent>
    ///                 <xs:extension base="xs:decimal"/>
    ///             </xs:simpleContent>
    ///         </xs:complexType>
    ///     </xs:schema>"#,
    /// )
    /// .expect("valid schema");
    /// let definition = schema.root().children().first().expect("type declared");
    ///
    /// assert!(matches!(
    ///     ContentModel::locate(definition),
    ///     Some(ContentModel::SimpleContentExtension(_))
    /// ));
    /// ```
    #[must_use]
    pub fn locate(definition: &'a SchemaNode) -> Option<Self> {
        CONTENT_SEARCH_ORDER
            .iter()
            .find_map(|tag| definition.child(tag))
            .map(Self::classify)
    }

    /// Classifies a model group or content node.
    #[must_use]
    pub fn classify(node: &'a SchemaNode) -> Self {
        match node.tag() {
            XsdTag::Sequence => Self::Sequence(node),
            XsdTag::All => Self::All(node),
            XsdTag::Choice => Self::Choice(node),
            XsdTag::ComplexContent => Self::derivation(
                node,
                Self::ComplexContentExtension,
                Self::ComplexContentRestriction,
            ),
            XsdTag::SimpleContent => Self::derivation(
                node,
                Self::SimpleContentExtension,
                Self::SimpleContentRestriction,
            ),
            _ => Self::Unsupported(node),
        }
    }

    fn derivation(
        node: &'a SchemaNode,
        extension: fn(&'a SchemaNode) -> Self,
        restriction: fn(&'a SchemaNode) -> Self,
    ) -> Self {
        node.child(&XsdTag::Extension)
            .map(extension)
            .or_else(|| node.child(&XsdTag::Restriction).map(restriction))
            .unwrap_or(Self::Unsupported(node))
    }

    /// Returns the `base` of a derivation, or `None` for model groups.
    #[must_use]
    pub fn base(&self) -> Option<&'a QName> {
        match *self {
            Self::ComplexContentExtension(node)
            | Self::ComplexContentRestriction(node)
            | Self::SimpleContentExtension(node)
            | Self::SimpleContentRestriction(node) => node.base(),
            Self::Sequence(_) | Self::All(_) | Self::Choice(_) | Self::Unsupported(_) => None,
        }
    }
}

fn reference_label(node: &SchemaNode) -> String {
    node.reference()
        .map(ToString::to_string)
        .or_else(|| node.name().map(str::to_owned))
        .unwrap_or_default()
}

impl<'a> Generator<'a> {
    /// Applies a complex type body: its attributes, then its content model.
    pub(crate) fn apply_complex_type(
        &mut self,
        element: &mut XmlElement,
        definition: &'a SchemaNode,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        self.apply_attributes(element, definition, path);
        match ContentModel::locate(definition) {
            Some(model) => self.walk(element, model, path, depth, chain),
            None => match definition.child(&XsdTag::Group) {
                Some(group) => self.generate_particle(element, group, path, depth),
                None => Ok(()),
            },
        }
    }

    /// Expands one content model into `element`.
    pub(crate) fn walk(
        &mut self,
        element: &mut XmlElement,
        model: ContentModel<'a>,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        match model {
            ContentModel::Sequence(node) | ContentModel::All(node) => {
                for particle in node.children() {
                    self.generate_particle(element, particle, path, depth)?;
                }
                Ok(())
            }
            ContentModel::Choice(node) => match self.select_alternative(node) {
                Some(alternative) => self.generate_particle(element, alternative, path, depth),
                None => {
                    self.warn(GenerationWarning::EmptyChoice {
                        path: path.to_owned(),
                    });
                    Ok(())
                }
            },
            ContentModel::ComplexContentExtension(node) => {
                if let Some(base) = node.base() {
                    self.apply_base(element, base, path, depth, chain)?;
                }
                self.apply_derivation(element, node, path, depth, chain)
            }
            ContentModel::ComplexContentRestriction(node) => {
                self.apply_derivation(element, node, path, depth, chain)
            }
            ContentModel::SimpleContentExtension(node)
            | ContentModel::SimpleContentRestriction(node) => {
                self.apply_simple_content(element, node, path, depth, chain)
            }
            ContentModel::Unsupported(node) => {
                self.warn(GenerationWarning::UnsupportedConstruct {
                    path: path.to_owned(),
                    construct: node.tag().as_str().to_owned(),
                });
                Ok(())
            }
        }
    }

    fn generate_particle(
        &mut self,
        element: &mut XmlElement,
        particle: &'a SchemaNode,
        path: &str,
        depth: usize,
    ) -> Result<(), SchemaError> {
        match particle.tag() {
            XsdTag::Element => self.generate_element(element, particle, path, depth),
            XsdTag::Sequence | XsdTag::All | XsdTag::Choice => {
                let bounds = OccurrenceBounds::from_declaration(particle)?;
                for _ in 0..bounds.sample(&mut self.rng) {
                    self.walk(element, ContentModel::classify(particle), path, depth, 0)?;
                }
                Ok(())
            }
            XsdTag::Group => {
                self.warn(GenerationWarning::GroupReferenceSkipped {
                    path: path.to_owned(),
                    reference: reference_label(particle),
                });
                Ok(())
            }
            XsdTag::Any => {
                self.warn(GenerationWarning::WildcardSkipped {
                    path: path.to_owned(),
                    construct: particle.tag().as_str().to_owned(),
                });
                Ok(())
            }
            XsdTag::Annotation
            | XsdTag::Attribute
            | XsdTag::AttributeGroup
            | XsdTag::AnyAttribute => Ok(()),
            other => {
                self.warn(GenerationWarning::UnsupportedConstruct {
                    path: path.to_owned(),
                    construct: other.as_str().to_owned(),
                });
                Ok(())
            }
        }
    }

    fn select_alternative(&mut self, choice: &'a SchemaNode) -> Option<&'a SchemaNode> {
        let is_group =
            |node: &&SchemaNode| matches!(node.tag(), XsdTag::Sequence | XsdTag::All | XsdTag::Choice);
        match self.choice_policy {
            ChoicePolicy::FirstAlternative => choice
                .children_with(XsdTag::Element)
                .next()
                .or_else(|| choice.children().iter().find(is_group)),
            ChoicePolicy::RandomAlternative => {
                let alternatives: Vec<&'a SchemaNode> = choice
                    .children()
                    .iter()
                    .filter(|node| *node.tag() == XsdTag::Element || is_group(node))
                    .collect();
                alternatives.choose(&mut self.rng).copied()
            }
        }
    }

    /// Replays a complex-content base type before the derivation's own
    /// content.
    fn apply_base(
        &mut self,
        element: &mut XmlElement,
        base: &QName,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        match self.resolver().resolve_name(base) {
            TypeReference::Registered(TypeDefinition::Complex(definition)) => {
                let next = chain.saturating_add(1);
                if next > self.max_depth {
                    self.warn(GenerationWarning::RecursionLimit {
                        path: path.to_owned(),
                        max_depth: self.max_depth,
                    });
                    return Ok(());
                }
                self.apply_complex_type(element, definition, path, depth, next)
            }
            TypeReference::Unresolved { name: Some(name) } => {
                self.warn(GenerationWarning::UnresolvedType {
                    path: path.to_owned(),
                    type_name: name.to_string(),
                });
                Ok(())
            }
            TypeReference::Registered(TypeDefinition::Simple(_))
            | TypeReference::Primitive(_)
            | TypeReference::Unresolved { name: None } => Ok(()),
        }
    }

    /// Applies the attributes and own model group of an `xs:extension` or
    /// `xs:restriction` under `xs:complexContent`.
    fn apply_derivation(
        &mut self,
        element: &mut XmlElement,
        derivation: &'a SchemaNode,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        self.apply_attributes(element, derivation, path);
        for child in derivation.children() {
            match child.tag() {
                XsdTag::Sequence | XsdTag::All | XsdTag::Choice => {
                    self.walk(element, ContentModel::classify(child), path, depth, chain)?;
                }
                XsdTag::Group => self.generate_particle(element, child, path, depth)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn apply_simple_content(
        &mut self,
        element: &mut XmlElement,
        derivation: &'a SchemaNode,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        let enumeration = derivation.enumeration_values();
        let base_text = match derivation.base().map(|base| self.resolver().resolve_name(base)) {
            Some(TypeReference::Registered(TypeDefinition::Complex(definition))) => {
                let next = chain.saturating_add(1);
                if next > self.max_depth {
                    self.warn(GenerationWarning::RecursionLimit {
                        path: path.to_owned(),
                        max_depth: self.max_depth,
                    });
                } else {
                    self.apply_complex_type(element, definition, path, depth, next)?;
                }
                element.text().map(str::to_owned)
            }
            Some(reference) if enumeration.is_empty() => {
                Some(self.text_for_reference(reference, path, chain))
            }
            Some(_) | None => None,
        };
        let text = ValueSynthesizer::pick_enumeration(&enumeration, &mut self.rng)
            .or(base_text)
            .unwrap_or_else(|| self.synthesize_primitive(DEFAULT_PRIMITIVE));

        element.set_text(text);
        self.apply_attributes(element, derivation, path);
        Ok(())
    }

    /// Adds the attributes declared directly under `holder`.
    pub(crate) fn apply_attributes(
        &mut self,
        element: &mut XmlElement,
        holder: &'a SchemaNode,
        path: &str,
    ) {
        for child in holder.children() {
            match child.tag() {
                XsdTag::Attribute => self.apply_attribute(element, child, path),
                XsdTag::AttributeGroup => self.warn(GenerationWarning::AttributeGroupSkipped {
                    path: path.to_owned(),
                    reference: reference_label(child),
                }),
                XsdTag::AnyAttribute => self.warn(GenerationWarning::WildcardSkipped {
                    path: path.to_owned(),
                    construct: child.tag().as_str().to_owned(),
                }),
                _ => {}
            }
        }
    }

    fn apply_attribute(&mut self, element: &mut XmlElement, declaration: &'a SchemaNode, path: &str) {
        if declaration.attribute("use") == Some("prohibited") {
            return;
        }

        if let Some(name) = declaration.name() {
            let value = match declaration.attribute("fixed") {
                Some(fixed) => fixed.to_owned(),
                None => match declaration.child(&XsdTag::SimpleType) {
                    Some(simple) => self.synthesize_simple_type(simple, path, 0),
                    None => {
                        let reference = self.resolver().resolve(declaration);
                        self.text_for_reference(reference, path, 0)
                    }
                },
            };
            element.set_attribute(name, value);
        } else if let Some(reference) = declaration.reference() {
            let local = reference.local_name();
            element.set_attribute(local, format!("ref_value_for_{local}"));
            self.warn(GenerationWarning::AttributeReferencePlaceholder {
                path: path.to_owned(),
                reference: reference.to_string(),
            });
        } else {
            self.warn(GenerationWarning::UnnamedDeclaration {
                path: path.to_owned(),
                construct: XsdTag::Attribute.as_str().to_owned(),
            });
        }
    }

    /// Produces text for an `xs:simpleType` definition.
    ///
    /// Enumerations win over the restriction base. Registered bases are
    /// followed up to the configured maximum depth.
    pub(crate) fn synthesize_simple_type(
        &mut self,
        definition: &'a SchemaNode,
        path: &str,
        chain: usize,
    ) -> String {
        if chain > self.max_depth {
            self.warn(GenerationWarning::RecursionLimit {
                path: path.to_owned(),
                max_depth: self.max_depth,
            });
            return self.synthesize_primitive(DEFAULT_PRIMITIVE);
        }
        let next = chain.saturating_add(1);

        if let Some(restriction) = definition.child(&XsdTag::Restriction) {
            let enumeration = restriction.enumeration_values();
            if let Some(value) = ValueSynthesizer::pick_enumeration(&enumeration, &mut self.rng) {
                return value;
            }
            return match (restriction.base(), restriction.child(&XsdTag::SimpleType)) {
                (Some(base), _) => self.synthesize_named(base, path, next),
                (None, Some(inline)) => self.synthesize_simple_type(inline, path, next),
                (None, None) => self.synthesize_primitive(DEFAULT_PRIMITIVE),
            };
        }

        if let Some(list) = definition.child(&XsdTag::List) {
            return match (list.item_type(), list.child(&XsdTag::SimpleType)) {
                (Some(item), _) => self.synthesize_named(item, path, next),
                (None, Some(inline)) => self.synthesize_simple_type(inline, path, next),
                (None, None) => self.synthesize_primitive(DEFAULT_PRIMITIVE),
            };
        }

        if let Some(union) = definition.child(&XsdTag::Union) {
            return match (union.member_types().first(), union.child(&XsdTag::SimpleType)) {
                (Some(member), _) => self.synthesize_named(member, path, next),
                (None, Some(inline)) => self.synthesize_simple_type(inline, path, next),
                (None, None) => self.synthesize_primitive(DEFAULT_PRIMITIVE),
            };
        }

        self.synthesize_primitive(DEFAULT_PRIMITIVE)
    }

    fn synthesize_named(&mut self, name: &QName, path: &str, chain: usize) -> String {
        let reference = self.resolver().resolve_name(name);
        self.text_for_reference(reference, path, chain)
    }

    /// Produces text for a resolved type reference.
    ///
    /// Unresolved names are reported and replaced with the unknown-type
    /// placeholder.
    pub(crate) fn text_for_reference(
        &mut self,
        reference: TypeReference<'a>,
        path: &str,
        chain: usize,
    ) -> String {
        match reference {
            TypeReference::Primitive(name) => self.synthesize_primitive(&name),
            TypeReference::Registered(TypeDefinition::Simple(definition)) => {
                self.synthesize_simple_type(definition, path, chain)
            }
            TypeReference::Unresolved { name: Some(name) } => {
                self.warn(GenerationWarning::UnresolvedType {
                    path: path.to_owned(),
                    type_name: name.to_string(),
                });
                ValueSynthesizer::placeholder(name.local_name())
            }
            TypeReference::Registered(TypeDefinition::Complex(_))
            | TypeReference::Unresolved { name: None } => {
                self.synthesize_primitive(DEFAULT_PRIMITIVE)
            }
        }
    }

    fn synthesize_primitive(&mut self, name: &str) -> String {
        self.synthesizer.synthesize(name, &mut self.rng)
    }
}
