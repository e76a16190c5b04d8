//! Seed data for the in-memory catalog.
//!
//! A seed is a JSON document describing parents and entries (typically
//! templates) that exist before the controller starts:
//!
//! ```json
//! {
//!   "parents": [
//!     { "id": "broker-1", "typeName": "SoftwareServerPlatform",
//!       "qualifiedName": "Apache Kafka Server:localhost",
//!       "platformType": "Apache Kafka Server", "endpoints": ["localhost:9092"] }
//!   ],
//!   "entries": [
//!     { "id": "kafka-topic-template", "typeName": "KafkaTopic",
//!       "qualifiedName": "KafkaTopic:template" }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use infracat_catalog::{CatalogEntry, ParentRecord};
use infracat_core::{ElementHeader, ElementId, ElementType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InMemoryCatalog;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSeed {
    #[serde(default)]
    pub parents: Vec<SeedParent>,
    #[serde(default)]
    pub entries: Vec<SeedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedParent {
    /// Fixed id; a random one is assigned when absent.
    #[serde(default)]
    pub id: Option<ElementId>,
    pub type_name: String,
    #[serde(default)]
    pub super_type_names: Vec<String>,
    pub qualified_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEntry {
    #[serde(default)]
    pub id: Option<ElementId>,
    pub type_name: String,
    pub qualified_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Parent the entry is catalogued under; templates usually have none.
    #[serde(default)]
    pub parent_id: Option<ElementId>,
    #[serde(default)]
    pub additional_properties: BTreeMap<String, String>,
}

fn id_or_random(id: &Option<ElementId>) -> ElementId {
    id.clone()
        .unwrap_or_else(|| ElementId::new(Uuid::new_v4().to_string()))
}

impl CatalogSeed {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty() && self.entries.is_empty()
    }

    /// Inserts every parent and entry into `catalog`, bypassing validation.
    ///
    /// Returns the number of elements inserted.
    pub fn apply(&self, catalog: &InMemoryCatalog) -> usize {
        for parent in &self.parents {
            catalog.insert_parent(ParentRecord {
                header: ElementHeader::new(
                    id_or_random(&parent.id),
                    ElementType::new(&parent.type_name)
                        .with_super_types(parent.super_type_names.iter().cloned()),
                ),
                qualified_name: parent.qualified_name.clone(),
                display_name: parent.display_name.clone(),
                platform_type: parent.platform_type.clone(),
                endpoints: parent.endpoints.clone(),
            });
        }
        for entry in &self.entries {
            catalog.insert_entry(CatalogEntry {
                header: ElementHeader::new(
                    id_or_random(&entry.id),
                    ElementType::new(&entry.type_name),
                ),
                qualified_name: entry.qualified_name.clone(),
                display_name: entry.display_name.clone(),
                parent_id: entry.parent_id.clone(),
                additional_properties: entry.additional_properties.clone(),
            });
        }
        self.parents.len() + self.entries.len()
    }
}
