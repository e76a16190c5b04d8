use infracat_core::{ParentKind, ParentKindSet};

/// Description of the capability record created once per parent to scope
/// its children. Defaults describe a Kafka topic manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySettings {
    pub type_name: String,
    pub service_name: String,
    pub description: String,
    pub component_code: u32,
    pub url_marker: String,
    pub wiki_url: String,
    pub development_status: String,
}

impl Default for CapabilitySettings {
    fn default() -> Self {
        Self {
            type_name: "SoftwareService".to_string(),
            service_name: "Apache Kafka Topic Manager".to_string(),
            description: "Event Broker".to_string(),
            component_code: 99,
            url_marker: "kafka".to_string(),
            wiki_url: "https://kafka.apache.org/".to_string(),
            development_status: "STABLE".to_string(),
        }
    }
}

/// Runtime settings of the controller, resolved from configuration.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Name used in audit events.
    pub connector_name: String,
    /// Element kinds treated as monitorable parent systems.
    pub parent_kinds: ParentKindSet,
    /// Catalog name filter for the startup sweep. `None` sweeps every parent.
    pub platform_name: Option<String>,
    /// Required `platform_type` of a parent. `None` accepts any.
    pub platform_type: Option<String>,
    /// Type of the child elements created directly.
    pub child_type_name: String,
    /// Qualified name of the template element used to create children.
    pub template_qualified_name: Option<String>,
    /// Address used instead of the parent's catalogued endpoint.
    pub endpoint_override: Option<String>,
    /// Page size when listing catalogued children and parents.
    pub page_size: usize,
    /// Upper bound on passes running at the same time during a refresh.
    pub max_concurrent_passes: usize,
    pub capability: CapabilitySettings,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            connector_name: "infracat".to_string(),
            parent_kinds: ParentKindSet::from(ParentKind::SoftwareServerPlatform),
            platform_name: None,
            platform_type: None,
            child_type_name: "KafkaTopic".to_string(),
            template_qualified_name: None,
            endpoint_override: None,
            page_size: 50,
            max_concurrent_passes: 4,
            capability: CapabilitySettings::default(),
        }
    }
}
