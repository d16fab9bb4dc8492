//! XML text output for generated trees.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::element::XmlElement;
use crate::error::GenerationError;

/// Spaces per nesting level in serialized output.
const INDENT_WIDTH: usize = 2;

/// Serializes a tree as indented UTF-8 XML prefixed with an XML declaration.
///
/// A default namespace declaration is written on the root when it has a
/// namespace, and again wherever a child's namespace differs from its
/// parent's.
///
/// # Errors
///
/// Returns [`GenerationError::Serialization`] if the writer fails.
pub(crate) fn to_xml_bytes(root: &XmlElement) -> Result<Vec<u8>, GenerationError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_element(&mut writer, root, None)?;
    Ok(writer.into_inner())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
    parent_namespace: Option<&str>,
) -> Result<(), GenerationError> {
    let mut start = BytesStart::new(element.name());
    if element.namespace() != parent_namespace {
        start.push_attribute(("xmlns", element.namespace().unwrap_or_default()));
    }
    for (name, value) in element.attributes() {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    match (element.children(), element.text()) {
        ([], None) => write_event(writer, Event::Empty(start)),
        ([], Some(text)) => {
            write_event(writer, Event::Start(start))?;
            write_event(writer, Event::Text(BytesText::new(text)))?;
            write_event(writer, Event::End(BytesEnd::new(element.name())))
        }
        (children, _) => {
            write_event(writer, Event::Start(start))?;
            for child in children {
                write_element(writer, child, element.namespace())?;
            }
            write_event(writer, Event::End(BytesEnd::new(element.name())))
        }
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), GenerationError> {
    writer
        .write_event(event)
        .map_err(|e| GenerationError::Serialization {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:camt.053.001.08";

    fn serialize(root: &XmlElement) -> String {
        let bytes = to_xml_bytes(root).expect("serialization succeeds");
        String::from_utf8(bytes).expect("output is UTF-8")
    }

    #[test]
    fn writes_declaration_and_default_namespace() {
        let mut root = XmlElement::new("Document", Some(NAMESPACE));
        let mut amount = XmlElement::new("Amt", Some(NAMESPACE));
        amount.set_attribute("Ccy", "EUR".to_owned());
        amount.set_text("12.50".to_owned());
        root.push_child(amount);

        let xml = serialize(&root);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<Document xmlns="urn:iso:std:iso:20022:tech:xsd:camt.053.001.08">"#));
        assert!(xml.contains(r#"<Amt Ccy="EUR">12.50</Amt>"#));

        let document = roxmltree::Document::parse(&xml).expect("output is well-formed");
        let amt = document
            .descendants()
            .find(|node| node.has_tag_name((NAMESPACE, "Amt")))
            .expect("Amt is namespace-qualified");
        assert_eq!(amt.text(), Some("12.50"));
    }

    #[test]
    fn unqualified_document_has_no_namespace_declaration() {
        let mut root = XmlElement::new("Note", None);
        root.push_child(XmlElement::new("Empty", None));

        let xml = serialize(&root);
        assert!(!xml.contains("xmlns"));
        assert!(xml.contains("<Empty/>"));
    }

    #[test]
    fn escapes_text_and_attribute_values() {
        let mut root = XmlElement::new("Memo", None);
        root.set_attribute("note", "a \"quoted\" <value>".to_owned());
        root.set_text("Fish & Chips <cheap>".to_owned());

        let xml = serialize(&root);
        let document = roxmltree::Document::parse(&xml).expect("output is well-formed");
        let memo = document.root_element();

        assert_eq!(memo.text(), Some("Fish & Chips <cheap>"));
        assert_eq!(memo.attribute("note"), Some("a \"quoted\" <value>"));
    }

    #[test]
    fn children_in_another_namespace_redeclare_it() {
        let mut root = XmlElement::new("Envelope", Some("urn:outer"));
        root.push_child(XmlElement::new("Body", None));

        let xml = serialize(&root);
        let document = roxmltree::Document::parse(&xml).expect("output is well-formed");
        let body = document
            .descendants()
            .find(|node| node.has_tag_name("Body"))
            .expect("Body present");

        assert_eq!(body.tag_name().namespace(), None);
    }
}
