use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{ModelError, ObjectId, ResourceKind};

/// Common surface of the four addressable resource types.
///
/// A [CdmiResource] round-trips between its typed form and the flat JSON
/// mapping that travels over the wire and sits on disk. Stores assign
/// identity (id, name, parent) at creation time through
/// [CdmiResource::assign_identity]; everything else in the representation
/// comes from the client or from type defaults.
pub trait CdmiResource:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// The kind of this resource type
    const KIND: ResourceKind;

    /// The globally unique id of this resource
    fn object_id(&self) -> &ObjectId;

    /// Fix the identity fields of a freshly stored resource
    fn assign_identity(&mut self, id: ObjectId, name: &str, parent_uri: &str);

    /// Replace the child listing of this resource, if it has one.
    ///
    /// Kinds without children ignore the call; container-like kinds also
    /// refresh their `childrenrange` to describe the new listing.
    fn set_children(&mut self, _children: Vec<String>) {}

    /// The full JSON representation of this resource
    fn to_representation(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ModelError::EncodeFailed(format!(
                "expected an object representation, got {other}"
            ))),
            Err(error) => Err(ModelError::EncodeFailed(error.to_string())),
        }
    }

    /// Rebuild a resource from a JSON representation; unknown fields are
    /// ignored and missing fields take their type defaults
    fn from_representation(source: &Map<String, Value>) -> Result<Self, ModelError> {
        serde_json::from_value(Value::Object(source.clone()))
            .map_err(|error| ModelError::DecodeFailed(error.to_string()))
    }
}

/// Render a `childrenrange` value describing a child listing: `"0-N"` for a
/// populated listing, the empty string for a childless one.
pub fn children_range(children: &[String]) -> String {
    if children.is_empty() {
        String::new()
    } else {
        format!("0-{}", children.len() - 1)
    }
}
