use async_trait::async_trait;
use cdmi_model::{CdmiResource, Capability, Container, DataObject, Domain, ObjectId, split_path};

use crate::StoreError;

/// A [ResourceStore] persists one kind of CDMI resource, addressable by
/// hierarchical path and by object id.
///
/// Paths are normalized before use, so `/foo/` and `foo` address the same
/// resource. A miss on any lookup or delete is `Ok(None)`, never an error;
/// callers compose fallback probing across stores by ordered
/// short-circuit.
#[async_trait]
pub trait ResourceStore: Clone + Send + Sync + 'static {
    /// The resource type held by this store
    type Resource: CdmiResource;

    /// Retrieve the resource (if any) stored at the given path
    async fn find_by_path(&self, path: &str) -> Result<Option<Self::Resource>, StoreError>;

    /// Retrieve the resource (if any) stored against the given object id
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Self::Resource>, StoreError>;

    /// Store a resource at the given path and return it with its identity
    /// fields assigned.
    ///
    /// Creating onto an occupied path replaces the stored representation
    /// but retains the existing object id: ids are immutable for the
    /// lifetime of the resource at that path.
    async fn create(
        &self,
        path: &str,
        resource: Self::Resource,
    ) -> Result<Self::Resource, StoreError>;

    /// Update the resource at the given path, either wholesale (`fields`
    /// is `None`) or restricted to the named top-level representation
    /// fields. Returns `None` when nothing is stored at the path.
    async fn update(
        &self,
        path: &str,
        resource: Self::Resource,
        fields: Option<&[String]>,
    ) -> Result<Option<Self::Resource>, StoreError>;

    /// Remove and return the resource stored at the given path
    async fn delete_by_path(&self, path: &str) -> Result<Option<Self::Resource>, StoreError>;
}

/// Build the replacement for `existing` out of `incoming`.
///
/// With `fields` present, only the named top-level representation fields
/// are taken from `incoming` (field specifiers may carry a `:`-suffixed
/// range part, which is ignored here); otherwise `incoming` replaces the
/// representation wholesale. Identity fields are re-fixed from the stored
/// resource either way.
pub(crate) fn merge_update<R: CdmiResource>(
    existing: &R,
    incoming: R,
    path: &str,
    fields: Option<&[String]>,
) -> Result<R, StoreError> {
    let mut replacement = match fields {
        None => incoming,
        Some(fields) => {
            let mut representation = existing.to_representation()?;
            let patch = incoming.to_representation()?;

            for specifier in fields {
                let name = specifier
                    .split_once(':')
                    .map(|(name, _)| name)
                    .unwrap_or(specifier);

                if let Some(value) = patch.get(name) {
                    representation.insert(name.to_string(), value.clone());
                }
            }

            R::from_representation(&representation)?
        }
    };

    let (parent_uri, name) = split_path(path);
    replacement.assign_identity(existing.object_id().clone(), &name, &parent_uri);

    Ok(replacement)
}

/// The bundle of per-kind store handles a deployment injects into the
/// resolver once at startup.
pub trait ResourceStores: Clone + Send + Sync + 'static {
    /// The container store type
    type Containers: ResourceStore<Resource = Container>;
    /// The data object store type
    type Objects: ResourceStore<Resource = DataObject>;
    /// The domain store type
    type Domains: ResourceStore<Resource = Domain>;
    /// The capability store type
    type Capabilities: ResourceStore<Resource = Capability>;

    /// The container store handle
    fn containers(&self) -> &Self::Containers;
    /// The data object store handle
    fn data_objects(&self) -> &Self::Objects;
    /// The domain store handle
    fn domains(&self) -> &Self::Domains;
    /// The capability store handle
    fn capabilities(&self) -> &Self::Capabilities;
}
