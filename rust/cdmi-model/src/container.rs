use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CdmiResource, ObjectId, ResourceKind, children_range};

/// A directory-like resource owning an ordered listing of child names.
///
/// The child ordering is irrelevant to identity but observable through
/// ordinal range queries, so it is preserved as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Container {
    /// Declared media type of the resource
    #[serde(rename = "objectType")]
    pub object_type: String,

    /// Globally unique object id
    #[serde(rename = "objectID")]
    pub object_id: ObjectId,

    /// Final path segment of the resource
    #[serde(rename = "objectName")]
    pub object_name: String,

    /// URI of the parent resource
    #[serde(rename = "parentURI")]
    pub parent_uri: String,

    /// URI of the capability subtree describing this kind
    #[serde(rename = "capabilitiesURI")]
    pub capabilities_uri: String,

    /// URI of the administrative domain of this resource
    #[serde(rename = "domainURI")]
    pub domain_uri: String,

    /// Ordered names of the child resources
    pub children: Vec<String>,

    /// Ordinal range covered by `children`
    pub childrenrange: String,

    /// User metadata mapping
    pub metadata: Map<String, Value>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            object_type: ResourceKind::Container.object_type().to_string(),
            object_id: ObjectId::default(),
            object_name: String::new(),
            parent_uri: String::new(),
            capabilities_uri: "/cdmi_capabilities/container/".to_string(),
            domain_uri: "/cdmi_domains/".to_string(),
            children: Vec::new(),
            childrenrange: String::new(),
            metadata: Map::new(),
        }
    }
}

impl CdmiResource for Container {
    const KIND: ResourceKind = ResourceKind::Container;

    fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    fn assign_identity(&mut self, id: ObjectId, name: &str, parent_uri: &str) {
        self.object_type = Self::KIND.object_type().to_string();
        self.object_id = id;
        self.object_name = name.to_string();
        self.parent_uri = parent_uri.to_string();
    }

    fn set_children(&mut self, children: Vec<String>) {
        self.childrenrange = children_range(&children);
        self.children = children;
    }
}
