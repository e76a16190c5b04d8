//! Identity and type information carried by every catalog element.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque unique identifier of a catalog element.
///
/// The catalog assigns these; infracat never parses or orders them by meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Open metadata type of an element: its own type name plus the names of
/// every type it inherits from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementType {
    pub type_name: String,
    #[serde(default)]
    pub super_type_names: Vec<String>,
}

impl ElementType {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            super_type_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_super_types<I, S>(mut self, super_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.super_type_names = super_types.into_iter().map(Into::into).collect();
        self
    }

    /// Own type name followed by the super types, most specific first.
    pub fn lineage(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.type_name.as_str()).chain(self.super_type_names.iter().map(String::as_str))
    }
}

/// Identity plus type of a catalog element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementHeader {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
}

impl ElementHeader {
    pub fn new(id: impl Into<ElementId>, element_type: ElementType) -> Self {
        Self {
            id: id.into(),
            element_type,
        }
    }
}
