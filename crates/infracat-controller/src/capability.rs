use std::collections::BTreeMap;

use infracat_catalog::CapabilityProperties;

use crate::settings::CapabilitySettings;

/// Properties of the capability record that scopes the children of the
/// parent named `parent_qualified_name`.
pub fn capability_properties(
    settings: &CapabilitySettings,
    parent_qualified_name: &str,
) -> CapabilityProperties {
    let mut additional_properties = BTreeMap::new();
    additional_properties.insert(
        "componentCode".to_string(),
        settings.component_code.to_string(),
    );
    additional_properties.insert("componentWikiURL".to_string(), settings.wiki_url.clone());
    additional_properties.insert(
        "developmentStatus".to_string(),
        settings.development_status.clone(),
    );
    additional_properties.insert("serviceURLMarker".to_string(), settings.url_marker.clone());

    CapabilityProperties {
        type_name: settings.type_name.clone(),
        qualified_name: format!("{parent_qualified_name}:{}", settings.service_name),
        display_name: Some(settings.service_name.clone()),
        description: Some(settings.description.clone()),
        additional_properties,
    }
}
