//! Audit codes for the observable events of the controller.
//!
//! Every audit event is a `tracing` event carrying an `audit_code` field,
//! logged at the severity of its code. Use the [`audit!`] macro:
//!
//! ```ignore
//! audit!(AuditCode::ChildDeleted, parent_id = %id, child = %name, "Deleted stale child");
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSeverity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditCode {
    ConnectorConfiguration,
    ConnectorStarted,
    ConnectorStopping,
    RetrievedChildren,
    ChildCreated,
    ChildCreatedFromTemplate,
    ChildDeleted,
    ChildActionFailed,
    CapabilityCreated,
    MissingTemplate,
    UnableToRetrieveChildren,
    UnknownParent,
    ParentRegistered,
}

impl AuditCode {
    pub const ALL: [AuditCode; 13] = [
        AuditCode::ConnectorConfiguration,
        AuditCode::ConnectorStarted,
        AuditCode::ConnectorStopping,
        AuditCode::RetrievedChildren,
        AuditCode::ChildCreated,
        AuditCode::ChildCreatedFromTemplate,
        AuditCode::ChildDeleted,
        AuditCode::ChildActionFailed,
        AuditCode::CapabilityCreated,
        AuditCode::MissingTemplate,
        AuditCode::UnableToRetrieveChildren,
        AuditCode::UnknownParent,
        AuditCode::ParentRegistered,
    ];

    /// Stable identifier, safe to alert on.
    pub fn id(&self) -> &'static str {
        match self {
            AuditCode::ConnectorConfiguration => "INFRACAT-0001",
            AuditCode::ConnectorStarted => "INFRACAT-0002",
            AuditCode::ConnectorStopping => "INFRACAT-0003",
            AuditCode::RetrievedChildren => "INFRACAT-0004",
            AuditCode::ChildCreated => "INFRACAT-0005",
            AuditCode::ChildCreatedFromTemplate => "INFRACAT-0006",
            AuditCode::ChildDeleted => "INFRACAT-0007",
            AuditCode::ChildActionFailed => "INFRACAT-0008",
            AuditCode::CapabilityCreated => "INFRACAT-0009",
            AuditCode::MissingTemplate => "INFRACAT-0010",
            AuditCode::UnableToRetrieveChildren => "INFRACAT-0011",
            AuditCode::UnknownParent => "INFRACAT-0012",
            AuditCode::ParentRegistered => "INFRACAT-0013",
        }
    }

    pub fn severity(&self) -> AuditSeverity {
        match self {
            AuditCode::ChildActionFailed | AuditCode::UnableToRetrieveChildren => {
                AuditSeverity::Error
            }
            AuditCode::MissingTemplate | AuditCode::UnknownParent => AuditSeverity::Warning,
            _ => AuditSeverity::Info,
        }
    }
}

impl fmt::Display for AuditCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Logs a `tracing` event for an [`AuditCode`] at the code's severity.
macro_rules! audit {
    ($code:expr, $($rest:tt)+) => {{
        let code: $crate::audit::AuditCode = $code;
        match code.severity() {
            $crate::audit::AuditSeverity::Info => {
                ::tracing::info!(audit_code = code.id(), $($rest)+)
            }
            $crate::audit::AuditSeverity::Warning => {
                ::tracing::warn!(audit_code = code.id(), $($rest)+)
            }
            $crate::audit::AuditSeverity::Error => {
                ::tracing::error!(audit_code = code.id(), $($rest)+)
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = AuditCode::ALL.iter().map(AuditCode::id).collect();
        assert_eq!(ids.len(), AuditCode::ALL.len());
    }

    #[test]
    fn test_failures_are_errors() {
        assert_eq!(AuditCode::ChildActionFailed.severity(), AuditSeverity::Error);
        assert_eq!(AuditCode::MissingTemplate.severity(), AuditSeverity::Warning);
        assert_eq!(AuditCode::ChildCreated.severity(), AuditSeverity::Info);
        assert_eq!(AuditCode::ChildDeleted.to_string(), "INFRACAT-0007");
    }
}
