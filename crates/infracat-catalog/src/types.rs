//! Types exchanged with a catalog backend.

use std::collections::BTreeMap;

use infracat_core::{ElementHeader, ElementId};
use serde::{Deserialize, Serialize};

/// A catalogued child element as returned by lookups and paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub header: ElementHeader,
    /// Unique name of the element.
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Parent system this entry was catalogued under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

impl CatalogEntry {
    pub fn id(&self) -> &ElementId {
        &self.header.id
    }
}

/// Properties for creating a child element directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProperties {
    pub type_name: String,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub parent_id: ElementId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

impl ChildProperties {
    /// Properties named after the external resource: the external name is
    /// both the qualified and the display name.
    pub fn named(type_name: impl Into<String>, name: &str, parent_id: ElementId) -> Self {
        Self {
            type_name: type_name.into(),
            qualified_name: name.to_string(),
            display_name: Some(name.to_string()),
            parent_id,
            additional_properties: BTreeMap::new(),
        }
    }
}

/// Overrides applied when copying a template element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateProperties {
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub parent_id: ElementId,
}

/// Properties for cataloguing a parent system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentProperties {
    pub type_name: String,
    #[serde(default)]
    pub super_type_names: Vec<String>,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Technology of the platform, e.g. "Apache Kafka Server".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,
    /// Network addresses the platform can be reached on.
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// A catalogued parent system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRecord {
    pub header: ElementHeader,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ParentRecord {
    pub fn id(&self) -> &ElementId {
        &self.header.id
    }

    /// First endpoint with a non-blank address.
    pub fn primary_endpoint(&self) -> Option<&str> {
        self.endpoints
            .iter()
            .map(String::as_str)
            .find(|address| !address.trim().is_empty())
    }
}

/// Properties of the capability record that scopes a parent's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityProperties {
    pub type_name: String,
    pub qualified_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional_properties: BTreeMap<String, String>,
}

/// How a capability relates to a child it is linked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetUseType {
    Owns,
    Governs,
    Maintains,
    Uses,
}

impl std::fmt::Display for AssetUseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetUseType::Owns => write!(f, "owns"),
            AssetUseType::Governs => write!(f, "governs"),
            AssetUseType::Maintains => write!(f, "maintains"),
            AssetUseType::Uses => write!(f, "uses"),
        }
    }
}
