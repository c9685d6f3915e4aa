use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CdmiResource, ObjectId, ResourceKind, children_range};

/// A node in the capability tree rooted at `/cdmi_capabilities`.
///
/// Capability nodes describe the features a storage backend advertises.
/// They are written once at bootstrap and read-only afterwards; each node
/// keeps a reference to its parent node, so the tree can be walked upward
/// from any descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Capability {
    /// Declared media type of the resource
    #[serde(rename = "objectType")]
    pub object_type: String,

    /// Globally unique object id
    #[serde(rename = "objectID")]
    pub object_id: ObjectId,

    /// Final path segment of the resource
    #[serde(rename = "objectName")]
    pub object_name: String,

    /// URI of the parent capability node
    #[serde(rename = "parentURI")]
    pub parent_uri: String,

    /// Object id of the parent capability node
    #[serde(rename = "parentID")]
    pub parent_id: String,

    /// Advertised feature mapping (feature name to value)
    pub capabilities: Map<String, Value>,

    /// User metadata mapping
    pub metadata: Map<String, Value>,

    /// Ordered names of the child capability nodes
    pub children: Vec<String>,

    /// Ordinal range covered by `children`
    pub childrenrange: String,
}

impl Default for Capability {
    fn default() -> Self {
        Self {
            object_type: ResourceKind::Capability.object_type().to_string(),
            object_id: ObjectId::default(),
            object_name: String::new(),
            parent_uri: String::new(),
            parent_id: String::new(),
            capabilities: Map::new(),
            metadata: Map::new(),
            children: Vec::new(),
            childrenrange: String::new(),
        }
    }
}

impl CdmiResource for Capability {
    const KIND: ResourceKind = ResourceKind::Capability;

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
