//! Document assembly: root selection and the per-element generator.
//!
//! A run selects one global element declaration, turns it into the document
//! element, and expands it depth-first. Everything random flows through one
//! seeded `ChaCha8Rng`, so a run is fully reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::element::XmlElement;
use crate::error::{GenerationError, SchemaError};
use crate::occurrence::OccurrenceBounds;
use crate::options::{ChoicePolicy, GenerationOptions};
use crate::registry::{TypeDefinition, TypeRegistry};
use crate::report::{GenerationReport, GenerationWarning};
use crate::resolver::{TypeReference, TypeResolver};
use crate::schema::{SchemaDocument, SchemaNode, XsdTag};
use crate::serialize::to_xml_bytes;
use crate::values::ValueSynthesizer;

/// The result of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    root: XmlElement,
    seed: u64,
    warnings: Vec<GenerationWarning>,
}

impl GeneratedDocument {
    /// Returns the document element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Returns the seed that reproduces this document.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the non-fatal warnings raised during generation.
    #[must_use]
    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    /// Builds the serializable run report.
    #[must_use]
    pub fn report(&self) -> GenerationReport {
        GenerationReport::new(
            self.root.name().to_owned(),
            self.seed,
            self.root.element_count(),
            self.warnings.clone(),
        )
    }

    /// Serializes the document as indented UTF-8 XML with a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Serialization`] if the writer fails.
    pub fn to_xml(&self) -> Result<Vec<u8>, GenerationError> {
        to_xml_bytes(&self.root)
    }
}

/// Generates a sample document and serializes it.
///
/// When `root` is `None` the first global element declaration is used.
///
/// # Errors
///
/// Returns [`GenerationError`] if:
/// - `root` names no global element declaration
/// - The schema declares no global element
/// - An occurrence attribute is malformed
/// - Serialization fails
///
/// # Example
///
/// ```
/// use xsd_sample::{SchemaDocument, generate};
///
/// let schema = SchemaDocument::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
///                  targetNamespace="urn:example:payments">
///         <xs:element name="Amount" type="xs:decimal"/>
///     </xs:schema>"#,
/// )
/// .expect("valid schema");
///
/// let xml = String::from_utf8(generate(&schema, None).expect("generated")).expect("UTF-8");
/// assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
/// assert!(xml.contains("<Amount xmlns=\"urn:example:payments\">"));
/// ```
pub fn generate(schema: &SchemaDocument, root: Option<&str>) -> Result<Vec<u8>, GenerationError> {
    let options = match root {
        Some(name) => GenerationOptions::new().with_root(name),
        None => GenerationOptions::new(),
    };
    generate_document(schema, &options)?.to_xml()
}

/// Generates a sample document tree.
///
/// The selected global declaration becomes the document element itself. It
/// is expanded exactly once and is not wrapped in a second element of the
/// same name.
///
/// # Errors
///
/// Returns [`GenerationError::MissingRoot`] when the requested root is not a
/// global element, [`GenerationError::NoGlobalElement`] when there is nothing
/// to start from, and [`GenerationError::Schema`] for malformed occurrence
/// attributes.
pub fn generate_document(
    schema: &SchemaDocument,
    options: &GenerationOptions,
) -> Result<GeneratedDocument, GenerationError> {
    let declaration = select_root(schema, options.root())?;
    let name = declaration
        .name()
        .ok_or(GenerationError::NoGlobalElement)?;
    let seed = options.seed().unwrap_or_else(|| rand::rng().random());
    debug!(root = name, seed, "generating sample document");

    let mut generator = Generator::new(schema, options, seed);
    let root = generator.build_instance(declaration, name, &format!("/{name}"), 1)?;

    Ok(GeneratedDocument {
        root,
        seed,
        warnings: generator.warnings,
    })
}

fn select_root<'a>(
    schema: &'a SchemaDocument,
    requested: Option<&str>,
) -> Result<&'a SchemaNode, GenerationError> {
    if let Some(name) = requested {
        return schema
            .find_global_element(name)
            .ok_or_else(|| GenerationError::MissingRoot {
                name: name.to_owned(),
            });
    }

    let declaration = schema
        .global_elements()
        .find(|element| element.name().is_some())
        .ok_or(GenerationError::NoGlobalElement)?;
    info!(
        root = declaration.name().unwrap_or_default(),
        "no root element requested; using the first global element"
    );
    Ok(declaration)
}

/// Mutable state of one generation run.
pub(crate) struct Generator<'a> {
    pub(crate) registry: TypeRegistry<'a>,
    pub(crate) synthesizer: ValueSynthesizer,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) choice_policy: ChoicePolicy,
    pub(crate) max_depth: usize,
    namespace: Option<&'a str>,
    warnings: Vec<GenerationWarning>,
}

impl<'a> Generator<'a> {
    fn new(schema: &'a SchemaDocument, options: &GenerationOptions, seed: u64) -> Self {
        Self {
            registry: TypeRegistry::index(schema),
            synthesizer: ValueSynthesizer::new(options.reference_time()),
            rng: ChaCha8Rng::seed_from_u64(seed),
            choice_policy: options.choice_policy(),
            max_depth: options.max_depth(),
            namespace: schema.target_namespace(),
            warnings: Vec::new(),
        }
    }

    pub(crate) const fn resolver(&self) -> TypeResolver<'_, 'a> {
        TypeResolver::new(&self.registry)
    }

    pub(crate) fn warn(&mut self, warning: GenerationWarning) {
        warning.emit();
        self.warnings.push(warning);
    }

    /// Materializes a child element declaration under `parent`, repeated
    /// according to its sampled occurrence count.
    pub(crate) fn generate_element(
        &mut self,
        parent: &mut XmlElement,
        declaration: &'a SchemaNode,
        parent_path: &str,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let Some(name) = declaration
            .name()
            .or_else(|| declaration.reference().map(|reference| reference.local_name()))
        else {
            self.warn(GenerationWarning::UnnamedDeclaration {
                path: parent_path.to_owned(),
                construct: XsdTag::Element.as_str().to_owned(),
            });
            return Ok(());
        };

        let bounds = OccurrenceBounds::from_declaration(declaration)?;
        if bounds.is_prohibited() {
            return Ok(());
        }

        let path = format!("{parent_path}/{name}");
        if declaration.name().is_none()
            && let Some(reference) = declaration.reference()
        {
            self.warn(GenerationWarning::ElementReferenceFallback {
                path: path.clone(),
                reference: reference.to_string(),
            });
        }
        for _ in 0..bounds.sample(&mut self.rng) {
            let child = self.build_instance(declaration, name, &path, depth.saturating_add(1))?;
            parent.push_child(child);
        }
        Ok(())
    }

    /// Builds one fully expanded instance of an element declaration.
    fn build_instance(
        &mut self,
        declaration: &'a SchemaNode,
        name: &str,
        path: &str,
        depth: usize,
    ) -> Result<XmlElement, SchemaError> {
        let mut element = XmlElement::new(name, self.namespace);
        if depth > self.max_depth {
            self.warn(GenerationWarning::RecursionLimit {
                path: path.to_owned(),
                max_depth: self.max_depth,
            });
            return Ok(element);
        }

        self.populate(&mut element, declaration, path, depth)?;
        if let Some(fixed) = declaration.attribute("fixed") {
            element.set_text(fixed.to_owned());
        }
        Ok(element)
    }

    fn populate(
        &mut self,
        element: &mut XmlElement,
        declaration: &'a SchemaNode,
        path: &str,
        depth: usize,
    ) -> Result<(), SchemaError> {
        let reference = self.resolver().resolve(declaration);
        if declaration.type_name().is_some()
            && let TypeReference::Registered(definition) = reference
        {
            return self.apply_type(element, definition, path, depth, 0);
        }

        self.apply_attributes(element, declaration, path);
        if let Some(complex) = declaration.child(&XsdTag::ComplexType) {
            self.apply_complex_type(element, complex, path, depth, 0)
        } else if let Some(simple) = declaration.child(&XsdTag::SimpleType) {
            let text = self.synthesize_simple_type(simple, path, 0);
            element.set_text(text);
            Ok(())
        } else {
            let text = self.text_for_reference(reference, path, 0);
            element.set_text(text);
            Ok(())
        }
    }

    /// Applies a registered type: its own attributes, then its content.
    pub(crate) fn apply_type(
        &mut self,
        element: &mut XmlElement,
        definition: TypeDefinition<'a>,
        path: &str,
        depth: usize,
        chain: usize,
    ) -> Result<(), SchemaError> {
        match definition {
            TypeDefinition::Complex(node) => {
                self.apply_complex_type(element, node, path, depth, chain)
            }
            TypeDefinition::Simple(node) => {
                self.apply_attributes(element, node, path);
                let text = self.synthesize_simple_type(node, path, chain);
                element.set_text(text);
                Ok(())
            }
        }
    }
}
