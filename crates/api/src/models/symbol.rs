use super::location::ParseLocation;
use super::naming::NameHierarchy;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Package,
    Namespace,
    Class,
    Struct,
    Union,
    Interface,
    Annotation,
    Enum,
    EnumConstant,
    Record,
    Typedef,
    TypeParameter,
    Method,
    Constructor,
    Function,
    Field,
    GlobalVariable,
    Macro,
    /// A referenced type whose declaration was not seen.
    Type,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Class => "class",
            SymbolKind::Struct => "struct",
            SymbolKind::Union => "union",
            SymbolKind::Interface => "interface",
            SymbolKind::Annotation => "annotation",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumConstant => "enum_constant",
            SymbolKind::Record => "record",
            SymbolKind::Typedef => "typedef",
            SymbolKind::TypeParameter => "type_parameter",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Function => "function",
            SymbolKind::Field => "field",
            SymbolKind::GlobalVariable => "global_variable",
            SymbolKind::Macro => "macro",
            SymbolKind::Type => "type",
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(
            self,
            SymbolKind::Class
                | SymbolKind::Struct
                | SymbolKind::Union
                | SymbolKind::Interface
                | SymbolKind::Annotation
                | SymbolKind::Enum
                | SymbolKind::Record
                | SymbolKind::Typedef
                | SymbolKind::Type
        )
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            SymbolKind::Method | SymbolKind::Constructor | SymbolKind::Function
        )
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared visibility of a symbol. `None` is used for symbols that have no
/// notion of access, such as packages, locals and type parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    #[default]
    None,
    Public,
    Protected,
    Private,
    Default,
}

impl AccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessKind::None => "",
            AccessKind::Public => "public",
            AccessKind::Protected => "protected",
            AccessKind::Private => "private",
            AccessKind::Default => "default",
        }
    }
}

/// How much of a symbol a declaration site establishes. Ordered so that a
/// merge keeps the strongest kind seen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    /// Referenced only, never declared in the indexed text.
    #[default]
    None,
    /// Declared without a body (forward declaration, prototype, abstract method).
    Declaration,
    /// Implied by the language, such as a default constructor.
    Implicit,
    Explicit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Call,
    Inheritance,
    Override,
    TypeUsage,
    TypeArgument,
    Usage,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Call => "call",
            ReferenceKind::Inheritance => "inheritance",
            ReferenceKind::Override => "override",
            ReferenceKind::TypeUsage => "type_usage",
            ReferenceKind::TypeArgument => "type_argument",
            ReferenceKind::Usage => "usage",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LocalAccess {
    Declaration,
    Read,
    Write,
}

/// A symbol as reported by a front end.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolDeclaration {
    pub name: NameHierarchy,
    pub kind: SymbolKind,
    pub access: AccessKind,
    pub is_static: bool,
    pub definition: DefinitionKind,
    /// Where the name is spelled.
    pub location: Option<ParseLocation>,
    /// The full extent of the declaration, e.g. class keyword to closing brace.
    pub scope: Option<ParseLocation>,
}

impl SymbolDeclaration {
    pub fn new(name: NameHierarchy, kind: SymbolKind) -> Self {
        Self {
            name,
            kind,
            access: AccessKind::None,
            is_static: false,
            definition: DefinitionKind::Explicit,
            location: None,
            scope: None,
        }
    }

    pub fn with_access(mut self, access: AccessKind) -> Self {
        self.access = access;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_definition(mut self, definition: DefinitionKind) -> Self {
        self.definition = definition;
        self
    }

    pub fn at(mut self, location: ParseLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn spanning(mut self, scope: ParseLocation) -> Self {
        self.scope = Some(scope);
        self
    }
}
