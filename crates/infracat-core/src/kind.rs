//! Recognized kinds of parent systems.
//!
//! Catalog elements carry free-form type names. Before an element can be
//! monitored its lineage is resolved against the closed set of [`ParentKind`]s
//! the controller was configured to watch.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::element::ElementType;

/// A kind of external system whose children infracat catalogues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParentKind {
    /// A running software platform such as an event broker.
    SoftwareServerPlatform,
    /// A server hosted on a platform.
    SoftwareServer,
    /// A physical or virtual host.
    Host,
}

impl ParentKind {
    pub const ALL: [ParentKind; 3] = [
        ParentKind::SoftwareServerPlatform,
        ParentKind::SoftwareServer,
        ParentKind::Host,
    ];

    /// Open metadata type name for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParentKind::SoftwareServerPlatform => "SoftwareServerPlatform",
            ParentKind::SoftwareServer => "SoftwareServer",
            ParentKind::Host => "Host",
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown parent kind: {0}")]
pub struct UnknownParentKind(pub String);

impl FromStr for ParentKind {
    type Err = UnknownParentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParentKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == s)
            .ok_or_else(|| UnknownParentKind(s.to_string()))
    }
}

/// The resolved set of parent kinds a controller monitors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParentKindSet(BTreeSet<ParentKind>);

impl ParentKindSet {
    pub fn new<I: IntoIterator<Item = ParentKind>>(kinds: I) -> Self {
        Self(kinds.into_iter().collect())
    }

    /// Resolve configured type names, rejecting anything unrecognized.
    pub fn parse<I, S>(names: I) -> Result<Self, UnknownParentKind>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| n.as_ref().parse::<ParentKind>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, kind: ParentKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ParentKind> + '_ {
        self.0.iter().copied()
    }

    /// Classify an element: the most specific type in its lineage that is a
    /// monitored kind, or `None` if the element is not a monitored parent.
    pub fn classify(&self, element_type: &ElementType) -> Option<ParentKind> {
        element_type
            .lineage()
            .filter_map(|name| name.parse::<ParentKind>().ok())
            .find(|kind| self.contains(*kind))
    }
}

impl From<ParentKind> for ParentKindSet {
    fn from(kind: ParentKind) -> Self {
        Self::new([kind])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            "SoftwareServerPlatform".parse::<ParentKind>().unwrap(),
            ParentKind::SoftwareServerPlatform
        );
        assert!("softwareserverplatform".parse::<ParentKind>().is_err());
    }

    #[test]
    fn test_set_parse_rejects_unknown() {
        let err = ParentKindSet::parse(["Host", "Mainframe"]).unwrap_err();
        assert_eq!(err.0, "Mainframe");
    }

    #[test]
    fn test_classify_by_own_type() {
        let set = ParentKindSet::from(ParentKind::SoftwareServerPlatform);
        let t = ElementType::new("SoftwareServerPlatform");
        assert_eq!(set.classify(&t), Some(ParentKind::SoftwareServerPlatform));
    }

    #[test]
    fn test_classify_by_super_type() {
        let set = ParentKindSet::from(ParentKind::SoftwareServerPlatform);
        let t = ElementType::new("KafkaBrokerPlatform")
            .with_super_types(["SoftwareServerPlatform", "ITInfrastructure"]);
        assert_eq!(set.classify(&t), Some(ParentKind::SoftwareServerPlatform));
    }

    #[test]
    fn test_classify_ignores_unmonitored_kinds() {
        let set = ParentKindSet::from(ParentKind::Host);
        let t = ElementType::new("SoftwareServerPlatform");
        assert_eq!(set.classify(&t), None);
    }

    #[test]
    fn test_classify_requires_exact_name() {
        let set = ParentKindSet::from(ParentKind::SoftwareServer);
        let t = ElementType::new("SoftwareServerPlatform");
        assert_eq!(set.classify(&t), None);
    }
}
