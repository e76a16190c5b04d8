use infracat_catalog::Catalog;
use infracat_core::ElementId;

use crate::error::TemplateError;

/// Resolves a template's qualified name to its element id.
///
/// Name lookups may match loosely, so only entries whose qualified name is
/// exactly `qualified_name` count. When several do, the last one wins.
pub async fn resolve_template(
    catalog: &dyn Catalog,
    qualified_name: &str,
) -> Result<ElementId, TemplateError> {
    let entries = catalog
        .find_by_name(qualified_name)
        .await
        .map_err(|source| TemplateError::Lookup {
            qualified_name: qualified_name.to_string(),
            source,
        })?;

    entries
        .into_iter()
        .rev()
        .find(|entry| entry.qualified_name == qualified_name)
        .map(|entry| entry.header.id)
        .ok_or_else(|| TemplateError::NotFound {
            qualified_name: qualified_name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use infracat_catalog::CatalogEntry;
    use infracat_catalog_memory::InMemoryCatalog;
    use infracat_core::{ElementHeader, ElementType};

    fn entry(id: &str, qualified_name: &str, display_name: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            header: ElementHeader::new(id, ElementType::new("KafkaTopic")),
            qualified_name: qualified_name.to_string(),
            display_name: display_name.map(str::to_string),
            parent_id: None,
            additional_properties: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_exact_match_required() {
        let catalog = InMemoryCatalog::new();
        // Matches by display name only.
        catalog.insert_entry(entry("other", "KafkaTopic:other", Some("KafkaTopic:template")));

        let err = resolve_template(&catalog, "KafkaTopic:template")
            .await
            .unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));

        catalog.insert_entry(entry("tmpl", "KafkaTopic:template", None));
        let id = resolve_template(&catalog, "KafkaTopic:template")
            .await
            .unwrap();
        assert_eq!(id.as_str(), "tmpl");
    }
}
