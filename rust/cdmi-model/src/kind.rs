use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The four addressable CDMI resource kinds.
///
/// A kind determines both the media type a client declares when writing a
/// resource (`object_type`, which is also the `objectType` field of every
/// representation) and the media type the endpoint produces when serving
/// one (`media_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A directory-like resource holding child resources
    Container,
    /// A resource carrying an opaque payload and metadata
    DataObject,
    /// An administrative namespace resource
    Domain,
    /// A descriptor of backend-advertised storage features
    Capability,
}

impl ResourceKind {
    /// The declared media type of this kind, used as the `objectType`
    /// representation field and as the `Content-Type` of write requests
    pub fn object_type(&self) -> &'static str {
        match self {
            ResourceKind::Container => "application/cdmi-container",
            ResourceKind::DataObject => "application/cdmi-object",
            ResourceKind::Domain => "application/cdmi-domain",
            ResourceKind::Capability => "application/cdmi-capability",
        }
    }

    /// The media type produced when serving a resource of this kind
    pub fn media_type(&self) -> &'static str {
        match self {
            ResourceKind::Container => "application/cdmi-container+json",
            ResourceKind::DataObject => "application/cdmi-object+json",
            ResourceKind::Domain => "application/cdmi-domain+json",
            ResourceKind::Capability => "application/cdmi-capability+json",
        }
    }

    /// Resolve a declared write media type back to a kind
    pub fn from_object_type(media_type: &str) -> Option<Self> {
        match media_type {
            "application/cdmi-container" => Some(ResourceKind::Container),
            "application/cdmi-object" => Some(ResourceKind::DataObject),
            "application/cdmi-domain" => Some(ResourceKind::Domain),
            "application/cdmi-capability" => Some(ResourceKind::Capability),
            _ => None,
        }
    }

    /// Short lower-case name of the kind, used in capability subtree paths
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Container => "container",
            ResourceKind::DataObject => "dataobject",
            ResourceKind::Domain => "domain",
            ResourceKind::Capability => "capability",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_declared_media_types_to_kinds() {
        for kind in [
            ResourceKind::Container,
            ResourceKind::DataObject,
            ResourceKind::Domain,
            ResourceKind::Capability,
        ] {
            assert_eq!(ResourceKind::from_object_type(kind.object_type()), Some(kind));
        }

        assert_eq!(ResourceKind::from_object_type("application/cdmi-widget"), None);
        assert_eq!(ResourceKind::from_object_type("application/json"), None);
    }

    #[test]
    fn it_produces_json_media_types() {
        assert_eq!(
            ResourceKind::DataObject.media_type(),
            "application/cdmi-object+json"
        );
        assert_eq!(
            ResourceKind::Container.media_type(),
            "application/cdmi-container+json"
        );
    }
}
