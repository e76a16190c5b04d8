use std::time::Duration;

use infracat_controller::{CapabilitySettings, ControllerSettings, RefreshSchedule};
use infracat_core::ParentKindSet;
use infracat_enumerator::RestProxyConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub connector: ConnectorConfig,
    /// Capability record created once per monitored parent
    #[serde(default)]
    pub capability: CapabilityConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub enumerator: EnumeratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Demo data for the in-memory catalog and static enumerator
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        // Connector validations
        if self.connector.parent_kinds.is_empty() {
            return Err("connector.parent_kinds must not be empty".into());
        }
        ParentKindSet::parse(&self.connector.parent_kinds)
            .map_err(|e| format!("connector.parent_kinds: {e}"))?;
        if self.connector.child_type_name.trim().is_empty() {
            return Err("connector.child_type_name must not be empty".into());
        }
        if self.connector.page_size == 0 {
            return Err("connector.page_size must be > 0".into());
        }
        if let Some(endpoint) = &self.connector.endpoint_override
            && endpoint.trim().is_empty()
        {
            return Err("connector.endpoint_override must not be blank when set".into());
        }
        if self.capability.service_name.trim().is_empty() {
            return Err("capability.service_name must not be empty".into());
        }
        // Refresh validations
        if self.refresh.interval_secs == 0 {
            return Err("refresh.interval_secs must be > 0".into());
        }
        if self.refresh.max_concurrent_passes == 0 {
            return Err("refresh.max_concurrent_passes must be > 0".into());
        }
        // Enumerator validations
        if self.enumerator.timeout_ms == 0 {
            return Err("enumerator.timeout_ms must be > 0".into());
        }
        if !self.enumerator.topics_path.starts_with('/') {
            return Err("enumerator.topics_path must start with '/'".into());
        }
        // Logging validation
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Controller settings resolved from the `[connector]`, `[capability]`
    /// and `[refresh]` sections.
    pub fn controller_settings(&self) -> Result<ControllerSettings, String> {
        let parent_kinds = ParentKindSet::parse(&self.connector.parent_kinds)
            .map_err(|e| format!("connector.parent_kinds: {e}"))?;
        let capability = &self.capability;
        Ok(ControllerSettings {
            connector_name: self.connector.name.clone(),
            parent_kinds,
            platform_name: self.connector.platform_name.clone(),
            platform_type: self.connector.platform_type.clone(),
            child_type_name: self.connector.child_type_name.clone(),
            template_qualified_name: self.connector.template_qualified_name.clone(),
            endpoint_override: self.connector.endpoint_override.clone(),
            page_size: self.connector.page_size,
            max_concurrent_passes: self.refresh.max_concurrent_passes,
            capability: CapabilitySettings {
                type_name: capability.type_name.clone(),
                service_name: capability.service_name.clone(),
                description: capability.description.clone(),
                component_code: capability.component_code,
                url_marker: capability.url_marker.clone(),
                wiki_url: capability.wiki_url.clone(),
                development_status: capability.development_status.clone(),
            },
        })
    }

    pub fn refresh_schedule(&self) -> RefreshSchedule {
        RefreshSchedule {
            interval: Duration::from_secs(self.refresh.interval_secs),
            run_on_start: self.refresh.run_on_start,
        }
    }

    pub fn rest_proxy_config(&self) -> RestProxyConfig {
        RestProxyConfig::default()
            .with_timeout(Duration::from_millis(self.enumerator.timeout_ms))
            .with_topics_path(self.enumerator.topics_path.clone())
            .with_include_internal(self.enumerator.include_internal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default = "default_connector_name")]
    pub name: String,
    /// Element types monitored as parent systems
    #[serde(default = "default_parent_kinds")]
    pub parent_kinds: Vec<String>,
    /// Only sweep parents with this name at startup
    #[serde(default)]
    pub platform_name: Option<String>,
    /// Only reconcile parents whose platform type matches
    #[serde(default)]
    pub platform_type: Option<String>,
    #[serde(default = "default_child_type_name")]
    pub child_type_name: String,
    #[serde(default)]
    pub template_qualified_name: Option<String>,
    #[serde(default)]
    pub endpoint_override: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_connector_name() -> String {
    "infracat".into()
}
fn default_parent_kinds() -> Vec<String> {
    vec!["SoftwareServerPlatform".into()]
}
fn default_child_type_name() -> String {
    "KafkaTopic".into()
}
fn default_page_size() -> usize {
    50
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            name: default_connector_name(),
            parent_kinds: default_parent_kinds(),
            platform_name: None,
            platform_type: None,
            child_type_name: default_child_type_name(),
            template_qualified_name: None,
            endpoint_override: None,
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    pub type_name: String,
    pub service_name: String,
    pub description: String,
    pub component_code: u32,
    pub url_marker: String,
    pub wiki_url: String,
    pub development_status: String,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        let defaults = CapabilitySettings::default();
        Self {
            type_name: defaults.type_name,
            service_name: defaults.service_name,
            description: defaults.description,
            component_code: defaults.component_code,
            url_marker: defaults.url_marker,
            wiki_url: defaults.wiki_url,
            development_status: defaults.development_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_max_concurrent_passes")]
    pub max_concurrent_passes: usize,
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
}

fn default_interval_secs() -> u64 {
    60
}
fn default_max_concurrent_passes() -> usize {
    4
}
fn default_run_on_start() -> bool {
    true
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_concurrent_passes: default_max_concurrent_passes(),
            run_on_start: default_run_on_start(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnumeratorKind {
    /// Live children come from the seed file
    #[default]
    Static,
    /// Live children come from a Kafka REST proxy
    RestProxy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumeratorConfig {
    #[serde(default)]
    pub kind: EnumeratorKind,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_topics_path")]
    pub topics_path: String,
    #[serde(default)]
    pub include_internal: bool,
}

fn default_timeout_ms() -> u64 {
    10_000
}
fn default_topics_path() -> String {
    "/topics".into()
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            kind: EnumeratorKind::default(),
            timeout_ms: default_timeout_ms(),
            topics_path: default_topics_path(),
            include_internal: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeedConfig {
    #[serde(default)]
    pub path: Option<String>,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::{Path, PathBuf};

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        let pathbuf = PathBuf::from(path.unwrap_or("infracat.toml"));
        if pathbuf.exists() {
            builder = builder.add_source(File::from(pathbuf));
        }
        // Environment variable overrides, e.g., INFRACAT__REFRESH__INTERVAL_SECS=30
        builder = builder.add_source(
            Environment::with_prefix("INFRACAT")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("connector.parent_kinds"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn load_config_with_default_path<P: AsRef<Path>>(
        path: Option<P>,
    ) -> Result<AppConfig, String> {
        let p = path
            .as_ref()
            .map(|p| p.as_ref().to_string_lossy().to_string());
        load_config(p.as_deref())
    }
}
