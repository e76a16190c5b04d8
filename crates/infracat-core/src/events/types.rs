//! Event type definitions.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::element::{ElementHeader, ElementId, ElementType};

/// Type of element change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementEventType {
    Created,
    Updated,
    Deleted,
}

impl ElementEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementEventType::Created => "created",
            ElementEventType::Updated => "updated",
            ElementEventType::Deleted => "deleted",
        }
    }
}

impl std::fmt::Display for ElementEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Notification that a catalog element changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementEvent {
    pub event_type: ElementEventType,
    pub header: ElementHeader,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ElementEvent {
    pub fn new(event_type: ElementEventType, header: ElementHeader) -> Self {
        Self {
            event_type,
            header,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn created(header: ElementHeader) -> Self {
        Self::new(ElementEventType::Created, header)
    }

    pub fn updated(header: ElementHeader) -> Self {
        Self::new(ElementEventType::Updated, header)
    }

    pub fn deleted(header: ElementHeader) -> Self {
        Self::new(ElementEventType::Deleted, header)
    }

    pub fn element_id(&self) -> &ElementId {
        &self.header.id
    }

    pub fn element_type(&self) -> &ElementType {
        &self.header.element_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = ElementEvent::created(ElementHeader::new(
            "p-1",
            ElementType::new("SoftwareServerPlatform"),
        ));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "created");
        assert_eq!(json["header"]["id"], "p-1");
        assert!(json["timestamp"].is_string());
    }
}
