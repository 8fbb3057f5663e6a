use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// DOM-like container node produced by component renders.
///
/// Elements collected during a render pass are appended, in component
/// order, to the attach target supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub class_name: Option<String>,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Appends every element in order and returns how many were added.
    pub fn append_all(&mut self, elements: impl IntoIterator<Item = Element>) -> usize {
        let before = self.children.len();
        self.children.extend(elements);
        self.children.len() - before
    }

    #[must_use]
    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_name
            .as_deref()
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    /// Depth-first search over descendants (including `self`).
    #[must_use]
    pub fn find_by_class(&self, class_name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class_name, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class_name: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class_name) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class_name, found);
        }
    }
}
