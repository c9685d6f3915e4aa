use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CdmiResource, ObjectId, ResourceKind};

/// Mime type assigned to data objects created without one
pub const DEFAULT_MIMETYPE: &str = "text/plain";

/// A resource carrying an opaque string payload and a metadata mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataObject {
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

    /// Mime type of the payload
    pub mimetype: String,

    /// The stored payload
    pub value: String,

    /// Byte range covered by `value`, when a partial payload is served
    pub valuerange: String,

    /// User metadata mapping
    pub metadata: Map<String, Value>,
}

impl Default for DataObject {
    fn default() -> Self {
        Self {
            object_type: ResourceKind::DataObject.object_type().to_string(),
            object_id: ObjectId::default(),
            object_name: String::new(),
            parent_uri: String::new(),
            capabilities_uri: "/cdmi_capabilities/dataobject/".to_string(),
            domain_uri: "/cdmi_domains/".to_string(),
            mimetype: DEFAULT_MIMETYPE.to_string(),
            value: String::new(),
            valuerange: String::new(),
            metadata: Map::new(),
        }
    }
}

impl CdmiResource for DataObject {
    const KIND: ResourceKind = ResourceKind::DataObject;

    fn object_id(&self) -> &ObjectId {
        &self.object_id
    }

    fn assign_identity(&mut self, id: ObjectId, name: &str, parent_uri: &str) {
        self.object_type = Self::KIND.object_type().to_string();
        self.object_id = id;
        self.object_name = name.to_string();
        self.parent_uri = parent_uri.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn it_defaults_the_mimetype() -> Result<()> {
        let body: Map<String, Value> = serde_json::from_str(r#"{"value": "hello"}"#)?;
        let object = DataObject::from_representation(&body)?;

        assert_eq!(object.value, "hello");
        assert_eq!(object.mimetype, "text/plain");

        Ok(())
    }

    #[test]
    fn it_preserves_a_declared_mimetype() -> Result<()> {
        let body: Map<String, Value> =
            serde_json::from_str(r#"{"value": "{}", "mimetype": "application/json"}"#)?;
        let object = DataObject::from_representation(&body)?;

        assert_eq!(object.mimetype, "application/json");

        Ok(())
    }
}
