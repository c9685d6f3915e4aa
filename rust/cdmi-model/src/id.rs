use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of random bytes backing a generated [ObjectId]
const OBJECT_ID_BYTES: usize = 16;

/// A globally unique, immutable identifier for a CDMI resource.
///
/// Object ids are generated once at creation time and never reused; they
/// address a resource independently of its hierarchical path. The string
/// form is an optional deployment-configured prefix followed by the
/// hex-encoded random id material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh id with the given deployment prefix
    pub fn generate(prefix: &str) -> Self {
        let material: [u8; OBJECT_ID_BYTES] = rand::thread_rng().r#gen();
        Self(format!("{}{}", prefix, hex::encode(material)))
    }

    /// The string form of this id
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this id has not been assigned yet
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ObjectId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_generates_prefixed_hex_ids() {
        let id = ObjectId::generate("0x");

        assert!(id.as_str().starts_with("0x"));
        assert_eq!(id.as_str().len(), 2 + OBJECT_ID_BYTES * 2);
        assert!(
            id.as_str()[2..]
                .chars()
                .all(|character| character.is_ascii_hexdigit())
        );
    }

    #[test]
    fn it_generates_distinct_ids() {
        let one = ObjectId::generate("");
        let another = ObjectId::generate("");

        assert_ne!(one, another);
    }
}
