use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use cdmi_model::{
    Capability, CdmiResource, Container, DataObject, Domain, ObjectId, normalize_path, split_path,
};
use tokio::sync::RwLock;

use crate::{Membership, ResourceStore, ResourceStores, StoreError, merge_update};

/// A trivial implementation of [ResourceStore] - backed by a [HashMap] -
/// where all resources are kept in memory and never persisted.
#[derive(Clone)]
pub struct MemoryResourceStore<R>
where
    R: CdmiResource,
{
    resources: Arc<RwLock<HashMap<String, R>>>,
    ids: Arc<RwLock<HashMap<ObjectId, String>>>,
    membership: Membership,
    id_prefix: String,
}

impl<R> MemoryResourceStore<R>
where
    R: CdmiResource,
{
    /// Create a store sharing the given child index, generating object ids
    /// with the given prefix
    pub fn new(membership: Membership, id_prefix: impl Into<String>) -> Self {
        Self {
            resources: Arc::new(RwLock::new(HashMap::new())),
            ids: Arc::new(RwLock::new(HashMap::new())),
            membership,
            id_prefix: id_prefix.into(),
        }
    }

    async fn hydrate(&self, path: &str, mut resource: R) -> R {
        resource.set_children(self.membership.children_of(path).await);
        resource
    }
}

#[async_trait]
impl<R> ResourceStore for MemoryResourceStore<R>
where
    R: CdmiResource,
{
    type Resource = R;

    async fn find_by_path(&self, path: &str) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);
        let resource = self.resources.read().await.get(&path).cloned();

        match resource {
            Some(resource) => Ok(Some(self.hydrate(&path, resource).await)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<R>, StoreError> {
        let path = self.ids.read().await.get(id).cloned();

        match path {
            Some(path) => self.find_by_path(&path).await,
            None => Ok(None),
        }
    }

    async fn create(&self, path: &str, mut resource: R) -> Result<R, StoreError> {
        let path = normalize_path(path);
        let (parent_uri, name) = split_path(&path);

        let existing_id = self
            .resources
            .read()
            .await
            .get(&path)
            .map(|existing| existing.object_id().clone());
        let replacing = existing_id.is_some();
        let id = existing_id.unwrap_or_else(|| ObjectId::generate(&self.id_prefix));

        resource.assign_identity(id.clone(), &name, &parent_uri);

        self.resources
            .write()
            .await
            .insert(path.clone(), resource.clone());
        self.ids.write().await.insert(id, path.clone());

        if !replacing && path != "/" {
            self.membership.note(&parent_uri, &name).await?;
        }

        Ok(self.hydrate(&path, resource).await)
    }

    async fn update(
        &self,
        path: &str,
        resource: R,
        fields: Option<&[String]>,
    ) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);

        let Some(existing) = self.resources.read().await.get(&path).cloned() else {
            return Ok(None);
        };

        let replacement = merge_update(&existing, resource, &path, fields)?;
        self.resources
            .write()
            .await
            .insert(path.clone(), replacement.clone());

        Ok(Some(self.hydrate(&path, replacement).await))
    }

    async fn delete_by_path(&self, path: &str) -> Result<Option<R>, StoreError> {
        let path = normalize_path(path);
        let (parent_uri, name) = split_path(&path);

        let Some(removed) = self.resources.write().await.remove(&path) else {
            return Ok(None);
        };

        self.ids.write().await.remove(removed.object_id());
        self.membership.forget(&parent_uri, &name, &path).await?;

        Ok(Some(removed))
    }
}

/// An in-memory [ResourceStores] bundle: four per-kind stores sharing one
/// child index. Nothing survives the process; intended for tests and
/// ephemeral deployments.
#[derive(Clone)]
pub struct MemoryStores {
    containers: MemoryResourceStore<Container>,
    objects: MemoryResourceStore<DataObject>,
    domains: MemoryResourceStore<Domain>,
    capabilities: MemoryResourceStore<Capability>,
}

impl MemoryStores {
    /// Create a bundle generating unprefixed object ids
    pub fn new() -> Self {
        Self::with_id_prefix("")
    }

    /// Create a bundle generating object ids with the given prefix
    pub fn with_id_prefix(id_prefix: &str) -> Self {
        let membership = Membership::in_memory();

        Self {
            containers: MemoryResourceStore::new(membership.clone(), id_prefix),
            objects: MemoryResourceStore::new(membership.clone(), id_prefix),
            domains: MemoryResourceStore::new(membership.clone(), id_prefix),
            capabilities: MemoryResourceStore::new(membership, id_prefix),
        }
    }
}

impl Default for MemoryStores {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStores for MemoryStores {
    type Containers = MemoryResourceStore<Container>;
    type Objects = MemoryResourceStore<DataObject>;
    type Domains = MemoryResourceStore<Domain>;
    type Capabilities = MemoryResourceStore<Capability>;

    fn containers(&self) -> &Self::Containers {
        &self.containers
    }

    fn data_objects(&self) -> &Self::Objects {
        &self.objects
    }

    fn domains(&self) -> &Self::Domains {
        &self.domains
    }

    fn capabilities(&self) -> &Self::Capabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn it_stores_and_retrieves_a_resource() -> Result<()> {
        let stores = MemoryStores::new();

        let mut object = DataObject::default();
        object.value = "hello".to_string();

        let stored = stores.data_objects().create("/greeting", object).await?;
        assert_eq!(stored.object_name, "greeting");
        assert_eq!(stored.parent_uri, "/");
        assert!(!stored.object_id.is_unassigned());

        let by_path = stores
            .data_objects()
            .find_by_path("/greeting/")
            .await?
            .expect("resource is stored");
        assert_eq!(by_path.value, "hello");

        let by_id = stores
            .data_objects()
            .find_by_id(&stored.object_id)
            .await?
            .expect("resource resolves by id");
        assert_eq!(by_id.value, "hello");

        Ok(())
    }

    #[tokio::test]
    async fn it_retains_the_object_id_when_replacing() -> Result<()> {
        let stores = MemoryStores::new();

        let first = stores
            .data_objects()
            .create("/note", DataObject::default())
            .await?;

        let mut replacement = DataObject::default();
        replacement.value = "revised".to_string();
        let second = stores.data_objects().create("/note", replacement).await?;

        assert_eq!(first.object_id, second.object_id);
        assert_eq!(second.value, "revised");

        Ok(())
    }

    #[tokio::test]
    async fn it_lists_children_on_parent_containers() -> Result<()> {
        let stores = MemoryStores::new();

        stores
            .containers()
            .create("/", Container::default())
            .await?;
        stores
            .containers()
            .create("/reports", Container::default())
            .await?;
        stores
            .data_objects()
            .create("/readme", DataObject::default())
            .await?;

        let root = stores
            .containers()
            .find_by_path("/")
            .await?
            .expect("root container exists");

        assert_eq!(root.children, vec!["reports", "readme"]);
        assert_eq!(root.childrenrange, "0-1");

        Ok(())
    }

    #[tokio::test]
    async fn it_updates_only_requested_fields() -> Result<()> {
        let stores = MemoryStores::new();

        let mut domain = Domain::default();
        domain
            .metadata
            .insert("owner".to_string(), serde_json::Value::String("a".into()));
        stores.domains().create("/cdmi_domains/d", domain).await?;

        let mut patch = Domain::default();
        patch
            .metadata
            .insert("owner".to_string(), serde_json::Value::String("b".into()));

        let fields = vec!["metadata".to_string()];
        let updated = stores
            .domains()
            .update("/cdmi_domains/d", patch, Some(&fields))
            .await?
            .expect("domain is stored");

        assert_eq!(
            updated.metadata.get("owner"),
            Some(&serde_json::Value::String("b".into()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn it_deletes_and_forgets_membership() -> Result<()> {
        let stores = MemoryStores::new();

        stores
            .containers()
            .create("/", Container::default())
            .await?;
        stores
            .data_objects()
            .create("/scratch", DataObject::default())
            .await?;

        let removed = stores.data_objects().delete_by_path("/scratch").await?;
        assert!(removed.is_some());
        assert!(stores.data_objects().find_by_path("/scratch").await?.is_none());

        let root = stores
            .containers()
            .find_by_path("/")
            .await?
            .expect("root container exists");
        assert!(root.children.is_empty());
        assert_eq!(root.childrenrange, "");

        let again = stores.data_objects().delete_by_path("/scratch").await?;
        assert!(again.is_none());

        Ok(())
    }
}
