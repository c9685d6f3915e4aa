use cdmi_model::{Capability, CdmiResource, Container, Domain, ResourceKind};
use cdmi_store::{ResourceStore, ResourceStores};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::CdmiError;

/// Path of the capability tree root
pub const CAPABILITIES_ROOT: &str = "/cdmi_capabilities";

/// Path of the domain tree root
pub const DOMAINS_ROOT: &str = "/cdmi_domains";

/// A capability descriptor advertised by a storage backend: the feature
/// and metadata mappings are copied verbatim into a capability node under
/// the subtree named by `kind`.
#[derive(Debug, Clone)]
pub struct BackendCapability {
    /// Name of the capability node to create
    pub name: String,
    /// Which subtree the node belongs under (container or dataobject)
    pub kind: ResourceKind,
    /// Advertised feature mapping
    pub capabilities: Map<String, Value>,
    /// Advertised metadata mapping
    pub metadata: Map<String, Value>,
}

/// Error produced when a backend capability source cannot be provisioned
#[derive(Error, Debug)]
pub enum BackendSourceError {
    /// The configured backend profile name is not known
    #[error("Unknown storage backend profile: {0}")]
    UnknownProfile(String),
}

/// The SPI through which storage backends advertise their capabilities at
/// bootstrap time.
pub trait BackendCapabilitySource: Send + Sync {
    /// The capability descriptors this backend advertises
    fn capabilities(&self) -> Result<Vec<BackendCapability>, BackendSourceError>;
}

/// A [BackendCapabilitySource] keyed by a configured profile name.
///
/// The `filesystem` profile describes what the bundled stores can do; an
/// unknown profile name reproduces the degraded bootstrap path (logged and
/// swallowed, no backend capabilities advertised).
pub struct ProfileCapabilitySource {
    profile: String,
}

impl ProfileCapabilitySource {
    /// Create a source for the given profile name
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }
}

impl BackendCapabilitySource for ProfileCapabilitySource {
    fn capabilities(&self) -> Result<Vec<BackendCapability>, BackendSourceError> {
        match self.profile.as_str() {
            "filesystem" => Ok(vec![
                BackendCapability {
                    name: self.profile.clone(),
                    kind: ResourceKind::Container,
                    capabilities: features(&[
                        "cdmi_create_container",
                        "cdmi_delete_container",
                        "cdmi_list_children",
                        "cdmi_read_metadata",
                        "cdmi_modify_metadata",
                    ]),
                    metadata: Map::new(),
                },
                BackendCapability {
                    name: self.profile.clone(),
                    kind: ResourceKind::DataObject,
                    capabilities: features(&[
                        "cdmi_read_value",
                        "cdmi_read_value_range",
                        "cdmi_modify_value",
                        "cdmi_delete_dataobject",
                        "cdmi_read_metadata",
                        "cdmi_modify_metadata",
                    ]),
                    metadata: Map::new(),
                },
            ]),
            other => Err(BackendSourceError::UnknownProfile(other.to_string())),
        }
    }
}

fn features(names: &[&str]) -> Map<String, Value> {
    names
        .iter()
        .map(|name| (name.to_string(), Value::Bool(true)))
        .collect()
}

/// Seed the root resources and import backend-advertised capabilities.
///
/// Runs once at process start and is idempotent: every node is created
/// only if a resource does not already exist at its path. A backend
/// configuration error is logged and swallowed - bootstrap degrades to
/// advertising no backend capabilities rather than failing startup.
pub async fn bootstrap<S>(
    stores: &S,
    source: &dyn BackendCapabilitySource,
) -> Result<(), CdmiError>
where
    S: ResourceStores,
{
    let root_container = match stores.containers().find_by_path("/").await? {
        Some(existing) => existing,
        None => {
            let created = stores.containers().create("/", Container::default()).await?;
            debug!("created root container");
            created
        }
    };

    let root = ensure_capability_node(
        stores,
        CAPABILITIES_ROOT,
        root_container.object_id().as_str(),
    )
    .await?;
    let container_node = ensure_capability_node(
        stores,
        &format!("{CAPABILITIES_ROOT}/{}", ResourceKind::Container.label()),
        root.object_id().as_str(),
    )
    .await?;
    let dataobject_node = ensure_capability_node(
        stores,
        &format!("{CAPABILITIES_ROOT}/{}", ResourceKind::DataObject.label()),
        root.object_id().as_str(),
    )
    .await?;

    if stores.domains().find_by_path(DOMAINS_ROOT).await?.is_none() {
        stores
            .domains()
            .create(DOMAINS_ROOT, Domain::default())
            .await?;
        debug!("created root domain");
    }

    match source.capabilities() {
        Ok(descriptors) => {
            for descriptor in descriptors {
                let parent = match descriptor.kind {
                    ResourceKind::Container => &container_node,
                    ResourceKind::DataObject => &dataobject_node,
                    other => {
                        warn!(kind = %other, name = %descriptor.name, "skipping capability with unsupported kind");
                        continue;
                    }
                };

                let path = format!(
                    "{CAPABILITIES_ROOT}/{}/{}",
                    descriptor.kind.label(),
                    descriptor.name
                );

                if stores.capabilities().find_by_path(&path).await?.is_some() {
                    continue;
                }

                let mut node = Capability::default();
                node.capabilities = descriptor.capabilities;
                node.metadata = descriptor.metadata;
                node.parent_id = parent.object_id().as_str().to_string();

                stores.capabilities().create(&path, node).await?;
                debug!(%path, "imported backend capability");
            }
        }
        Err(error) => {
            warn!(%error, "no backend capabilities advertised");
        }
    }

    Ok(())
}

async fn ensure_capability_node<S>(
    stores: &S,
    path: &str,
    parent_id: &str,
) -> Result<Capability, CdmiError>
where
    S: ResourceStores,
{
    if let Some(existing) = stores.capabilities().find_by_path(path).await? {
        return Ok(existing);
    }

    let mut node = Capability::default();
    node.parent_id = parent_id.to_string();

    Ok(stores.capabilities().create(path, node).await?)
}
