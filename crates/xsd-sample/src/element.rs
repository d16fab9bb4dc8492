//! The generated document tree.

/// One element of a generated instance document.
///
/// An element carries either text or child elements. The one exception is
/// simple content, where text is combined with attributes but there are
/// still no element children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<XmlElement>,
    text: Option<String>,
}

impl XmlElement {
    /// Creates an empty element in the given namespace.
    #[must_use]
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            namespace: namespace.map(str::to_owned),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Returns the local name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the namespace URI the element belongs to.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Iterates over the children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Returns the text content, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Sets an attribute, replacing any existing value for the same name
    /// while keeping its original position.
    pub fn set_attribute(&mut self, name: &str, value: String) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_owned(), value)),
        }
    }

    /// Appends a child element and drops any text content.
    pub fn push_child(&mut self, child: Self) {
        self.text = None;
        self.children.push(child);
    }

    /// Sets the text content. Ignored when the element already has children.
    pub fn set_text(&mut self, text: String) {
        if self.children.is_empty() {
            self.text = Some(text);
        }
    }

    /// Counts this element and all of its descendants.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.children
            .iter()
            .map(Self::element_count)
            .fold(1, usize::saturating_add)
    }
}
