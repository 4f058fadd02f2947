use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Separator placed between name elements when a hierarchy is spelled out.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NameDelimiter {
    #[default]
    Dot,
    DoubleColon,
}

impl NameDelimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameDelimiter::Dot => ".",
            NameDelimiter::DoubleColon => "::",
        }
    }
}

/// One component of a qualified name.
///
/// `prefix` and `postfix` carry the signature of callables and typed members,
/// e.g. `void` / `(int)` for `void bar(int)`. They are part of the identity of
/// the element but are omitted from the plain qualified name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NameElement {
    pub name: String,
    pub prefix: String,
    pub postfix: String,
}

impl NameElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: String::new(),
            postfix: String::new(),
        }
    }

    pub fn with_signature(
        name: impl Into<String>,
        prefix: impl Into<String>,
        postfix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            postfix: postfix.into(),
        }
    }

    /// Synthetic element for a declaration without a source name, such as an
    /// anonymous class. Distinct per (file, line, column).
    pub fn anonymous(what: &str, file: &Path, line: usize, col: usize) -> Self {
        Self::new(format!(
            "anonymous {} ({}<{}:{}>)",
            what,
            file.display(),
            line,
            col
        ))
    }

    pub fn has_signature(&self) -> bool {
        !self.prefix.is_empty() || !self.postfix.is_empty()
    }
}

/// An ordered sequence of name elements, outermost first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NameHierarchy {
    pub delimiter: NameDelimiter,
    pub elements: Vec<NameElement>,
}

impl NameHierarchy {
    pub fn new(delimiter: NameDelimiter) -> Self {
        Self {
            delimiter,
            elements: Vec::new(),
        }
    }

    pub fn from_elements(delimiter: NameDelimiter, elements: Vec<NameElement>) -> Self {
        Self {
            delimiter,
            elements,
        }
    }

    /// Builds a hierarchy of signature-less elements by splitting on the delimiter.
    pub fn from_qualified(delimiter: NameDelimiter, qualified: &str) -> Self {
        let elements = qualified
            .split(delimiter.as_str())
            .filter(|s| !s.is_empty())
            .map(NameElement::new)
            .collect();
        Self {
            delimiter,
            elements,
        }
    }

    pub fn push(&mut self, element: NameElement) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<NameElement> {
        self.elements.pop()
    }

    pub fn child(&self, element: NameElement) -> NameHierarchy {
        let mut child = self.clone();
        child.push(element);
        child
    }

    pub fn parent(&self) -> Option<NameHierarchy> {
        if self.elements.len() < 2 {
            return None;
        }
        let mut parent = self.clone();
        parent.pop();
        Some(parent)
    }

    pub fn last(&self) -> Option<&NameElement> {
        self.elements.last()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn starts_with(&self, other: &NameHierarchy) -> bool {
        self.elements.len() >= other.elements.len()
            && self.elements[..other.elements.len()] == other.elements[..]
    }

    /// Element names joined by the delimiter, signatures omitted.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                out.push_str(self.delimiter.as_str());
            }
            out.push_str(&element.name);
        }
        out
    }

    /// The qualified name framed by the signature of the last element,
    /// e.g. `void foo.A.bar(int)`.
    pub fn qualified_name_with_signature(&self) -> String {
        let qualified = self.qualified_name();
        match self.last() {
            Some(last) if last.has_signature() => {
                let mut out = String::new();
                if !last.prefix.is_empty() {
                    out.push_str(&last.prefix);
                    out.push(' ');
                }
                out.push_str(&qualified);
                out.push_str(&last.postfix);
                out
            }
            _ => qualified,
        }
    }
}

impl fmt::Display for NameHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name_with_signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method_name() -> NameHierarchy {
        let mut name = NameHierarchy::from_qualified(NameDelimiter::Dot, "foo.A");
        name.push(NameElement::with_signature("bar", "void", "(int)"));
        name
    }

    #[test]
    fn qualified_name_omits_signature() {
        assert_eq!(method_name().qualified_name(), "foo.A.bar");
        assert_eq!(method_name().qualified_name_with_signature(), "void foo.A.bar(int)");
    }

    #[test]
    fn cxx_names_use_double_colon() {
        let name = NameHierarchy::from_qualified(NameDelimiter::DoubleColon, "ns::Widget::draw");
        assert_eq!(name.len(), 3);
        assert_eq!(name.qualified_name(), "ns::Widget::draw");
    }

    #[test]
    fn signature_is_part_of_identity() {
        let mut other = method_name();
        other.pop();
        other.push(NameElement::with_signature("bar", "void", "(float)"));
        assert_ne!(method_name(), other);
        assert_eq!(method_name().qualified_name(), other.qualified_name());
    }

    #[test]
    fn anonymous_elements_differ_by_position() {
        let a = NameElement::anonymous("class", Path::new("Main.java"), 7, 17);
        let b = NameElement::anonymous("class", Path::new("Main.java"), 10, 3);
        assert_eq!(a.name, "anonymous class (Main.java<7:17>)");
        assert_ne!(a, b);
    }

    #[test]
    fn parent_and_prefix() {
        let name = method_name();
        let parent = name.parent().unwrap();
        assert_eq!(parent.qualified_name(), "foo.A");
        assert!(name.starts_with(&parent));
        assert!(NameHierarchy::from_qualified(NameDelimiter::Dot, "foo").parent().is_none());
    }
}
