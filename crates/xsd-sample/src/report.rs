//! Non-fatal generation warnings and the machine-readable run report.
//!
//! Warnings never stop generation. Each one is logged through `tracing` when
//! it is raised and collected so callers can inspect or persist it.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A condition that degraded the generated output without failing the run.
///
/// Every variant carries the instance path, such as
/// `/Document/BkToCstmrStmt/Stmt`, where the condition was met.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GenerationWarning {
    /// An `xs:group` reference was skipped rather than expanded.
    #[error("group reference '{reference}' at {path} was not expanded")]
    GroupReferenceSkipped {
        /// Instance path of the parent element.
        path: String,
        /// The referenced group name.
        reference: String,
    },

    /// An `xs:attributeGroup` reference was skipped rather than expanded.
    #[error("attribute group reference '{reference}' at {path} was not expanded")]
    AttributeGroupSkipped {
        /// Instance path of the element carrying the reference.
        path: String,
        /// The referenced attribute group name.
        reference: String,
    },

    /// A type name could not be resolved against the loaded schema.
    #[error("type '{type_name}' at {path} is not defined in this schema")]
    UnresolvedType {
        /// Instance path of the element or attribute.
        path: String,
        /// The unresolved qualified type name.
        type_name: String,
    },

    /// An element reference was generated as string content instead of
    /// expanding the referenced declaration.
    #[error("element reference '{reference}' at {path} was generated with string content")]
    ElementReferenceFallback {
        /// Instance path of the generated element.
        path: String,
        /// The referenced element name.
        reference: String,
    },

    /// An attribute reference received a placeholder value.
    #[error("attribute reference '{reference}' at {path} was given a placeholder value")]
    AttributeReferencePlaceholder {
        /// Instance path of the element carrying the attribute.
        path: String,
        /// The referenced attribute name.
        reference: String,
    },

    /// A declaration had neither a name nor a reference and was skipped.
    #[error("unnamed {construct} declaration at {path} was skipped")]
    UnnamedDeclaration {
        /// Instance path of the enclosing element.
        path: String,
        /// The XSD construct, such as `element` or `attribute`.
        construct: String,
    },

    /// A choice offered no alternative that could be generated.
    #[error("choice at {path} has no alternatives")]
    EmptyChoice {
        /// Instance path of the enclosing element.
        path: String,
    },

    /// An `xs:any` or `xs:anyAttribute` wildcard was skipped.
    #[error("{construct} wildcard at {path} was skipped")]
    WildcardSkipped {
        /// Instance path of the enclosing element.
        path: String,
        /// The wildcard construct.
        construct: String,
    },

    /// A construct with no generation rule was ignored.
    #[error("unsupported construct '{construct}' at {path} was ignored")]
    UnsupportedConstruct {
        /// Instance path of the enclosing element.
        path: String,
        /// The XSD construct name.
        construct: String,
    },

    /// The recursion-depth guard stopped expanding an element.
    #[error("element at {path} exceeds the maximum depth of {max_depth}; content omitted")]
    RecursionLimit {
        /// Instance path of the truncated element.
        path: String,
        /// The configured maximum depth.
        max_depth: usize,
    },
}

impl GenerationWarning {
    /// Returns the instance path the warning refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::GroupReferenceSkipped { path, .. }
            | Self::AttributeGroupSkipped { path, .. }
            | Self::UnresolvedType { path, .. }
            | Self::ElementReferenceFallback { path, .. }
            | Self::AttributeReferencePlaceholder { path, .. }
            | Self::UnnamedDeclaration { path, .. }
            | Self::EmptyChoice { path }
            | Self::WildcardSkipped { path, .. }
            | Self::UnsupportedConstruct { path, .. }
            | Self::RecursionLimit { path, .. } => path,
        }
    }

    pub(crate) fn emit(&self) {
        warn!(path = self.path(), "{self}");
    }
}

/// Summary of one generation run, serializable as JSON.
///
/// # Example
///
/// ```
/// use xsd_sample::{GenerationOptions, SchemaDocument, generate_document};
///
/// let schema = SchemaDocument::parse(
///     r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
///         <xs:element name="Note" type="xs:string"/>
///     </xs:schema>"#,
/// )
/// .expect("valid schema");
/// let document = generate_document(&schema, &GenerationOptions::new().with_seed(1))
///     .expect("generation succeeds");
/// let json = document.report().to_json().expect("report serializes");
///
/// assert!(json.contains("\"root\": \"Note\""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    root: String,
    seed: u64,
    element_count: usize,
    warnings: Vec<GenerationWarning>,
}

impl GenerationReport {
    pub(crate) const fn new(
        root: String,
        seed: u64,
        element_count: usize,
        warnings: Vec<GenerationWarning>,
    ) -> Self {
        Self {
            root,
            seed,
            element_count,
            warnings,
        }
    }

    /// Returns the name of the document element.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the seed that reproduces the run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of generated elements, including the root.
    #[must_use]
    pub const fn element_count(&self) -> usize {
        self.element_count
    }

    /// Returns the collected warnings in the order they were raised.
    #[must_use]
    pub fn warnings(&self) -> &[GenerationWarning] {
        &self.warnings
    }

    /// Encodes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        GenerationWarning::GroupReferenceSkipped {
            path: "/Document".to_owned(),
            reference: "tns:Header".to_owned(),
        },
        "group reference 'tns:Header' at /Document was not expanded"
    )]
    #[case(
        GenerationWarning::ElementReferenceFallback {
            path: "/Document/Code".to_owned(),
            reference: "tns:Code".to_owned(),
        },
        "element reference 'tns:Code' at /Document/Code was generated with string content"
    )]
    #[case(
        GenerationWarning::EmptyChoice { path: "/Document/Ntry".to_owned() },
        "choice at /Document/Ntry has no alternatives"
    )]
    #[case(
        GenerationWarning::RecursionLimit { path: "/Node/Node".to_owned(), max_depth: 1 },
        "element at /Node/Node exceeds the maximum depth of 1; content omitted"
    )]
    fn warnings_format_correctly(#[case] warning: GenerationWarning, #[case] expected: &str) {
        assert_eq!(warning.to_string(), expected);
    }

    #[test]
    fn path_is_exposed_for_every_variant() {
        let warning = GenerationWarning::WildcardSkipped {
            path: "/Document/Ext".to_owned(),
            construct: "any".to_owned(),
        };
        assert_eq!(warning.path(), "/Document/Ext");
    }

    #[test]
    fn report_serializes_with_camel_case_fields() {
        let report = GenerationReport::new(
            "Document".to_owned(),
            42,
            3,
            vec![GenerationWarning::UnresolvedType {
                path: "/Document/Pty".to_owned(),
                type_name: "ext:Party".to_owned(),
            }],
        );
        let json: serde_json::Value =
            serde_json::from_str(&report.to_json().expect("report serializes"))
                .expect("report is valid JSON");

        assert_eq!(json["root"], "Document");
        assert_eq!(json["seed"], 42);
        assert_eq!(json["elementCount"], 3);
        assert_eq!(json["warnings"][0]["kind"], "unresolvedType");
        assert_eq!(json["warnings"][0]["typeName"], "ext:Party");
    }
}
